use crate::{
    core::domain::{
        error::{ProxmoxResult, ValidationError},
        model::access::{CreateUserParams, UserListItem},
        value_object::{DEFAULT_REALM, ProxmoxPassword, UserId},
    },
    resources::application::{
        accessor::user::User,
        collection::{Listing, ResourceCollection},
        context::ResourceContext,
    },
};
use async_trait::async_trait;
use serde_json::Value;

/// Users of the default realm as listed by `/access/users`.
pub struct UserListing;

fn default_realm_name(userid: &str) -> Option<&str> {
    userid
        .rsplit_once('@')
        .filter(|(_, realm)| *realm == DEFAULT_REALM)
        .map(|(name, _)| name)
}

#[async_trait]
impl Listing for UserListing {
    type Entry = UserListItem;
    type Resource = User;

    const KIND: &'static str = "User";

    async fn fetch(ctx: &ResourceContext) -> ProxmoxResult<Vec<UserListItem>> {
        let users = ctx.api().list_users().await?;
        Ok(users
            .into_iter()
            .filter(|user| default_realm_name(&user.userid).is_some())
            .collect())
    }

    fn key(entry: &UserListItem) -> String {
        default_realm_name(&entry.userid)
            .unwrap_or(&entry.userid)
            .to_string()
    }

    fn build(ctx: &ResourceContext, entry: &UserListItem) -> User {
        User::new(ctx.clone(), UserId::in_default_realm(&Self::key(entry)))
    }

    /// Accepts both `alice` and `alice@pve`.
    fn lookup_key(id: &str) -> String {
        default_realm_name(id).unwrap_or(id).to_string()
    }
}

/// Optional attributes of a new user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateUserOptions {
    pub email: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub comment: Option<String>,
    /// Comma separated group list.
    pub groups: Option<String>,
    /// Account expiry as a UNIX timestamp.
    pub expire: Option<u64>,
    pub enable: Option<bool>,
}

/// Default-realm users keyed by their realm-stripped name.
pub type UserCollection = ResourceCollection<UserListing>;

impl ResourceCollection<UserListing> {
    /// Creates a user.
    ///
    /// The password is validated first, then the id is checked against the
    /// listing; either failure happens before the create request.
    pub async fn create(
        &self,
        userid: &str,
        password: &str,
        options: CreateUserOptions,
    ) -> ProxmoxResult<Value> {
        let password = ProxmoxPassword::new(password, self.context().config().password_min_score)?;
        let userid = UserId::normalize(userid);
        if userid.is_default_realm() && self.contains(userid.name()).await? {
            return Err(ValidationError::ConstraintViolation(format!(
                "User {} already exists",
                userid
            ))
            .into());
        }

        let CreateUserOptions {
            email,
            firstname,
            lastname,
            comment,
            groups,
            expire,
            enable,
        } = options;
        let params = CreateUserParams {
            userid: userid.to_string(),
            password: password.as_str().to_string(),
            email,
            firstname,
            lastname,
            comment,
            groups,
            expire,
            enable,
        };
        let result = self.context().api().create_user(params).await;
        self.invalidate().await;
        result
    }

    /// Deletes a listed user.
    pub async fn remove(&self, userid: &str) -> ProxmoxResult<Value> {
        let user = self.get(userid).await?;
        let result = user.delete().await;
        self.invalidate().await;
        result
    }
}
