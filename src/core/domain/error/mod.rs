use thiserror::Error;

/// The main error type for Proxmox manager operations.
///
/// Local validation failures are raised before any request leaves the
/// process. Everything the remote side or the network reports is surfaced
/// unchanged through `Connection`, `Authentication` or `Api`.
#[derive(Error, Debug)]
pub enum ProxmoxError {
    /// Represents errors that occur while talking to the server
    ///
    /// # Fields
    /// * `0` - A description of what went wrong during the request
    #[error("Connection error: {0}")]
    Connection(String),

    /// Represents authentication failures
    ///
    /// # Fields
    /// * `0` - A description of the authentication failure
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The server answered with a non-success HTTP status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Represents validation failures detected locally
    ///
    /// # Fields
    /// * `source` - The underlying validation error
    #[error("Validation error: {source}")]
    Validation { source: ValidationError },

    /// A collection lookup missed after the latest listing
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// Node selection had no candidates to choose from
    #[error("No {}nodes found", online_prefix(.online_only))]
    NoNodes { online_only: bool },

    /// A response could not be reshaped into the expected structure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ValidationError> for ProxmoxError {
    fn from(error: ValidationError) -> Self {
        ProxmoxError::Validation { source: error }
    }
}

/// Specialized error type for validation failures.
///
/// This enum provides detailed context about why a validation
/// failed, including field-specific errors and format violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Represents a validation failure for a specific field
    ///
    /// # Fields
    /// * `field` - The name of the field that failed validation
    /// * `message` - A detailed message about why validation failed
    #[error("Field '{field}' validation failed: {message}")]
    Field { field: String, message: String },

    /// Represents format/syntax validation failures
    ///
    /// # Fields
    /// * `0` - Description of the format violation
    #[error("Format error: {0}")]
    Format(String),

    /// Represents violations of domain constraints
    ///
    /// # Fields
    /// * `0` - Description of the constraint violation
    #[error("Domain constraint violation: {0}")]
    ConstraintViolation(String),
}

fn online_prefix(online_only: &bool) -> &'static str {
    if *online_only { "online " } else { "" }
}

/// Type alias for Results that may fail with a ProxmoxError
pub type ProxmoxResult<T> = Result<T, ProxmoxError>;
