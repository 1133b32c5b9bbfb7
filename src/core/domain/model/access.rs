//! Domain models for users, roles and access-control entries.

use crate::core::domain::value_object::serde_helpers::{flag_option, pve_bool};
use serde::{Deserialize, Serialize};

/// A user as listed by `/access/users`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UserListItem {
    /// Realm-qualified identifier, e.g. `alice@pve`.
    pub userid: String,
    /// Whether the account is enabled.
    #[serde(
        default,
        deserialize_with = "flag_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Account expiry as a UNIX timestamp; `0` means never.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire: Option<u64>,
}

/// A role as listed by `/access/roles`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RoleEntry {
    pub roleid: String,
    /// Comma separated privilege list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privs: Option<String>,
    /// Set for built-in roles.
    #[serde(
        default,
        deserialize_with = "flag_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub special: Option<bool>,
}

/// One entry of `/access/acl`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AclEntry {
    /// Resource path, e.g. `/vms/100`.
    pub path: String,
    /// Principal kind: `user`, `group` or `token`.
    #[serde(rename = "type")]
    pub principal_type: String,
    /// User, group or token identifier.
    pub ugid: String,
    pub roleid: String,
    #[serde(
        default,
        deserialize_with = "flag_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub propagate: Option<bool>,
}

/// Body of `PUT /access/acl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AclUpdate {
    pub path: String,
    pub roles: String,
    pub users: String,
    /// Remove instead of add.
    #[serde(serialize_with = "pve_bool::serialize")]
    pub delete: bool,
    #[serde(serialize_with = "pve_bool::serialize")]
    pub propagate: bool,
}

/// Body of `POST /access/users`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateUserParams {
    /// Realm-qualified identifier.
    pub userid: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Comma separated group list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<String>,
    /// Account expiry as a UNIX timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire: Option<u64>,
    #[serde(
        serialize_with = "pve_bool::serialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub enable: Option<bool>,
}

/// Body of `PUT /access/password`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangePasswordParams {
    pub userid: String,
    /// The new password.
    pub password: String,
    /// The current password.
    #[serde(rename = "confirmation-password")]
    pub confirmation_password: String,
}
