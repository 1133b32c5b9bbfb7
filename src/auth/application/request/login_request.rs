use serde::Serialize;

/// Body of `POST /access/ticket`.
#[derive(Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Omitted when `username` already carries its realm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realm: Option<String>,
}
