use crate::core::domain::value_object::proxmox_realm::{DEFAULT_REALM, is_known_realm};
use std::fmt;

/// A realm-qualified user identifier such as `alice@pve`.
///
/// Identifiers whose last `@`-suffix is not a recognised realm are qualified
/// with [`DEFAULT_REALM`], and a warning is logged because the caller most
/// likely forgot the realm.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId {
    name: String,
    realm: String,
}

impl UserId {
    /// Normalises `userid`, appending the default realm when none is given.
    ///
    /// # Examples
    ///
    /// ```
    /// use pve_manager::UserId;
    ///
    /// assert_eq!(UserId::normalize("alice").to_string(), "alice@pve");
    /// assert_eq!(UserId::normalize("bob@pam").to_string(), "bob@pam");
    /// assert_eq!(UserId::normalize("eve@corp").to_string(), "eve@corp@pve");
    /// assert_eq!(UserId::normalize("carol@").to_string(), "carol@pve");
    /// ```
    pub fn normalize(userid: &str) -> Self {
        // A dangling separator means the realm was left out.
        let userid = userid.strip_suffix('@').unwrap_or(userid);
        if let Some((name, realm)) = userid.rsplit_once('@') {
            if is_known_realm(realm) {
                return Self {
                    name: name.to_string(),
                    realm: realm.to_string(),
                };
            }
        }
        tracing::warn!(
            "Username {} doesn't specify realm - \"@{}\" will be appended to username",
            userid,
            DEFAULT_REALM
        );
        Self {
            name: userid.to_string(),
            realm: DEFAULT_REALM.to_string(),
        }
    }

    /// Qualifies a name known to belong to the default realm, without logging.
    pub(crate) fn in_default_realm(name: &str) -> Self {
        Self {
            name: name.to_string(),
            realm: DEFAULT_REALM.to_string(),
        }
    }

    /// Returns the name without its realm.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the realm.
    #[must_use]
    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Returns `true` if this user lives in [`DEFAULT_REALM`].
    #[must_use]
    pub fn is_default_realm(&self) -> bool {
        self.realm == DEFAULT_REALM
    }
}

impl From<&str> for UserId {
    fn from(userid: &str) -> Self {
        Self::normalize(userid)
    }
}

impl From<String> for UserId {
    fn from(userid: String) -> Self {
        Self::normalize(&userid)
    }
}

impl From<&UserId> for UserId {
    fn from(userid: &UserId) -> Self {
        userid.clone()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.realm)
    }
}
