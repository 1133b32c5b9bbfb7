use crate::core::domain::error::{ProxmoxResult, ValidationError};

/// The realm assumed for every user identifier that does not name one.
///
/// Users of this realm live in the Proxmox VE authentication database; they
/// are the only users the manager lists and grants permissions to.
pub const DEFAULT_REALM: &str = "pve";

/// Realms recognised as an explicit suffix of a user identifier.
pub const KNOWN_REALMS: [&str; 4] = ["pam", "pve", "ldap", "ad"];

const MIN_REALM_LENGTH: usize = 2;
const MAX_REALM_LENGTH: usize = 32;

/// A validated Proxmox authentication realm.
///
/// # Examples
///
/// ```
/// use pve_manager::ProxmoxRealm;
///
/// let realm = ProxmoxRealm::new("pam").unwrap();
/// assert_eq!(realm.as_str(), "pam");
/// assert!(ProxmoxRealm::new("PAM").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxmoxRealm(String);

impl ProxmoxRealm {
    /// Creates a new validated realm.
    pub fn new(realm: impl Into<String>) -> ProxmoxResult<Self> {
        let realm = realm.into();
        validate_realm(&realm)?;
        Ok(Self(realm))
    }

    /// Creates a new realm without validation.
    #[allow(unused)]
    pub(crate) fn new_unchecked(realm: String) -> Self {
        Self(realm)
    }

    /// Returns the realm as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProxmoxRealm {
    fn default() -> Self {
        Self(DEFAULT_REALM.to_string())
    }
}

/// Returns `true` if `realm` is one of [`KNOWN_REALMS`].
pub(crate) fn is_known_realm(realm: &str) -> bool {
    KNOWN_REALMS.contains(&realm)
}

/// Validates a realm name.
pub(crate) fn validate_realm(realm: &str) -> Result<(), ValidationError> {
    if realm.is_empty() {
        return Err(ValidationError::Field {
            field: "realm".to_string(),
            message: "Realm cannot be empty".to_string(),
        });
    }

    if realm.len() < MIN_REALM_LENGTH || realm.len() > MAX_REALM_LENGTH {
        return Err(ValidationError::Format(format!(
            "Realm length must be between {} and {} characters",
            MIN_REALM_LENGTH, MAX_REALM_LENGTH
        )));
    }

    let allowed = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_';
    if !realm.chars().all(allowed) {
        return Err(ValidationError::Format(
            "Realm contains invalid characters".to_string(),
        ));
    }

    if !is_known_realm(realm) {
        return Err(ValidationError::ConstraintViolation(format!(
            "Invalid realm. Allowed realms are: {}",
            KNOWN_REALMS.join(", ")
        )));
    }

    Ok(())
}
