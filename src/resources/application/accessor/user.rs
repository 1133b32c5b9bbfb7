use crate::{
    core::domain::{
        error::ProxmoxResult,
        model::{access::ChangePasswordParams, proxmox_auth::ProxmoxAuth},
        value_object::{ProxmoxPassword, UserId},
    },
    resources::application::context::ResourceContext,
};
use serde_json::Value;
use std::hash::{Hash, Hasher};

/// A user account, identified by its realm-stripped name.
#[derive(Clone)]
pub struct User {
    ctx: ResourceContext,
    id: UserId,
}

impl User {
    pub(crate) fn new(ctx: ResourceContext, id: UserId) -> Self {
        Self { ctx, id }
    }

    /// Returns the name without its realm.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.name()
    }

    /// Returns the realm-qualified identifier sent to the server.
    #[must_use]
    pub fn qualified_id(&self) -> String {
        self.id.to_string()
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.id
    }

    /// Fetches `/access/users/{userid}` unmodified.
    pub async fn get_config(&self) -> ProxmoxResult<Value> {
        self.ctx.api().get_user(&self.qualified_id()).await
    }

    /// Logs in as this user and returns the issued ticket and CSRF token.
    pub async fn get_tokens(&self, password: &str) -> ProxmoxResult<ProxmoxAuth> {
        self.ctx
            .api()
            .get_user_tokens(&self.qualified_id(), password)
            .await
    }

    /// Changes the password; the new one is validated before any request.
    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> ProxmoxResult<Value> {
        let new_password =
            ProxmoxPassword::new(new_password, self.ctx.config().password_min_score)?;
        let params = ChangePasswordParams {
            userid: self.qualified_id(),
            password: new_password.as_str().to_string(),
            confirmation_password: old_password.to_string(),
        };
        self.ctx.api().change_user_password(params).await
    }

    pub async fn delete(&self) -> ProxmoxResult<Value> {
        self.ctx.api().delete_user(&self.qualified_id()).await
    }

    /// Fetches the effective permissions of this user.
    pub async fn get_permissions(&self) -> ProxmoxResult<Value> {
        self.ctx
            .api()
            .list_permissions(Some(self.qualified_id()))
            .await
    }
}

impl From<&User> for UserId {
    fn from(user: &User) -> Self {
        user.id.clone()
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("User").field(&self.qualified_id()).finish()
    }
}
