use crate::core::domain::{
    error::{ProxmoxResult, ValidationError},
    value_object::UserId,
};

/// An API token bound to a user, used instead of ticket login.
///
/// Rendered as `PVEAPIToken=user@realm!name=secret` in the `Authorization`
/// header of every request.
#[derive(Clone)]
pub struct ProxmoxApiToken {
    user: UserId,
    name: String,
    secret: String,
}

impl ProxmoxApiToken {
    /// Creates a new API token. The owner is normalised like any other user
    /// identifier.
    pub fn new(
        user: &str,
        name: impl Into<String>,
        secret: impl Into<String>,
    ) -> ProxmoxResult<Self> {
        let name = name.into();
        let secret = secret.into();
        validate_token_name(&name)?;
        if secret.is_empty() {
            return Err(ValidationError::Field {
                field: "token_value".to_string(),
                message: "Token value cannot be empty".to_string(),
            }
            .into());
        }
        Ok(Self {
            user: UserId::normalize(user),
            name,
            secret,
        })
    }

    /// Returns the owning user.
    #[must_use]
    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// Returns the token name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Formats the token as an `Authorization` header value.
    #[must_use]
    pub fn as_authorization_header(&self) -> String {
        format!("PVEAPIToken={}!{}={}", self.user, self.name, self.secret)
    }
}

impl std::fmt::Debug for ProxmoxApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxmoxApiToken")
            .field("user", &self.user)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn validate_token_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::Field {
            field: "token_name".to_string(),
            message: "Token name cannot be empty".to_string(),
        });
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.';
    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) || !name.chars().all(allowed) {
        return Err(ValidationError::Format(
            "Token name must start with a letter and contain only alphanumeric, -, _, ."
                .to_string(),
        ));
    }
    Ok(())
}
