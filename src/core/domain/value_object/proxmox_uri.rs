use crate::core::domain::{
    error::{ProxmoxResult, ValidationError},
    value_object::{ProxmoxHost, ProxmoxPort},
};

const MAX_URL_LENGTH: usize = 2083;

/// The base URL of a Proxmox server, always ending in `/`.
///
/// Built from a [`ProxmoxHost`] and a [`ProxmoxPort`]; API paths are joined
/// onto it with [`ProxmoxUrl::api_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxmoxUrl(String);

impl ProxmoxUrl {
    /// Composes and validates `{scheme}://{host}:{port}/`.
    pub fn new(host: &ProxmoxHost, port: &ProxmoxPort, secure: bool) -> ProxmoxResult<Self> {
        let scheme = if secure { "https" } else { "http" };
        let url = format!("{}://{}:{}/", scheme, host.as_str(), port.get());
        validate_url(&url)?;
        Ok(Self(url))
    }

    /// Creates a URL without validation.
    #[allow(unused)]
    pub(crate) fn new_unchecked(url: String) -> Self {
        Self(url)
    }

    /// Returns the URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins a path below `/api2/json/`.
    #[must_use]
    pub fn api_path(&self, path: &str) -> String {
        format!(
            "{}/api2/json/{}",
            self.0.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Validates a base URL.
pub(crate) fn validate_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Err(ValidationError::Field {
            field: "url".to_string(),
            message: "URL cannot be empty".to_string(),
        });
    }

    if url.len() > MAX_URL_LENGTH {
        return Err(ValidationError::Format(format!(
            "URL exceeds maximum length of {} characters",
            MAX_URL_LENGTH
        )));
    }

    let parsed = url::Url::parse(url)
        .map_err(|e| ValidationError::Format(format!("Invalid URL format: {}", e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::ConstraintViolation(
            "Invalid scheme. Must be one of: http, https".to_string(),
        ));
    }

    Ok(())
}
