//! A Proxmox VE cluster manager.
//!
//! Nodes, users, virtual machines and containers are exposed as map-like
//! collections of lightweight accessors. Every accessor method maps to one
//! request against the Proxmox REST API.

mod auth;
mod core;
mod resources;

#[cfg(test)]
mod tests;

pub use crate::core::{
    domain::{
        error::{ProxmoxError, ProxmoxResult, ValidationError},
        model::{
            access::{
                AclEntry, AclUpdate, ChangePasswordParams, CreateUserParams, RoleEntry,
                UserListItem,
            },
            client_config::{ClientConfig, RateLimitConfig},
            cluster_resource::{
                ClusterResource, CommonResourceFields, GuestResource, NodeResource, ResourceType,
                StorageResource,
            },
            guest::{CloneParams, GuestKind, GuestListItem, PowerAction, PowerParams},
            node_list_item::NodeListItem,
            node_status::MemoryInfo,
            proxmox_auth::ProxmoxAuth,
            proxmox_connection::{Credentials, ProxmoxConnection},
            task::{TaskListItem, TaskLogLine, TaskStatus},
        },
        value_object::{
            DEFAULT_PORT, DEFAULT_REALM, KNOWN_REALMS, MIN_PASSWORD_LENGTH, ProxmoxApiToken,
            ProxmoxCSRFToken, ProxmoxHost, ProxmoxPassword, ProxmoxPort, ProxmoxRealm,
            ProxmoxTicket, ProxmoxUrl, ProxmoxUsername, UserId, Vmid,
        },
    },
    infrastructure::{api_client::ApiClient, proxmox_api::ProxmoxApi},
};
pub use crate::resources::application::{
    accessor::{
        container::Container,
        guest::CloneOptions,
        node::Node,
        user::User,
        vm::VirtualMachine,
    },
    collection::{
        GuestEntry, Listing, ResourceCollection,
        containers::{ContainerCollection, ContainerListing},
        nodes::{NodeCollection, NodeListing},
        users::{CreateUserOptions, UserCollection, UserListing},
        vms::{VmCollection, VmListing},
    },
    context::ResourceContext,
};

use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Entry point bundling one connection to a Proxmox VE cluster.
///
/// # Examples
///
/// ```no_run
/// use pve_manager::{ProxmoxManager, ProxmoxResult};
///
/// #[tokio::main]
/// async fn main() -> ProxmoxResult<()> {
///     let manager = ProxmoxManager::builder()
///         .host("proxmox.example.com")
///         .port(8006)
///         .credentials("root", "password", "pam")
///         .accept_invalid_certs(true)
///         .build()?;
///
///     let node = manager.nodes().choose_by_most_free_ram(true, true).await?;
///     println!("next free id on {}: {}", node.id(), manager.smallest_free_vmid().await?);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ProxmoxManager {
    ctx: ResourceContext,
}

/// Builder for ProxmoxManager configuration
#[derive(Debug)]
pub struct ProxmoxManagerBuilder {
    host: Option<String>,
    port: Option<u16>,
    username: Option<String>,
    password: Option<String>,
    realm: Option<String>,
    api_token: Option<(String, String, String)>,
    secure: bool,
    accept_invalid_certs: bool,
    config: ClientConfig,
}

impl Default for ProxmoxManagerBuilder {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            username: None,
            password: None,
            realm: None,
            api_token: None,
            secure: true,
            accept_invalid_certs: false,
            config: ClientConfig::default(),
        }
    }
}

fn required(field: &str) -> ProxmoxError {
    ValidationError::Field {
        field: field.to_string(),
        message: format!("{} is required", field),
    }
    .into()
}

impl ProxmoxManagerBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Defaults to [`DEFAULT_PORT`].
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Ticket login with a username, password and realm.
    pub fn credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        realm: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self.realm = Some(realm.into());
        self
    }

    /// Authenticates with an API token instead; takes precedence over
    /// [`Self::credentials`].
    pub fn api_token(
        mut self,
        user: impl Into<String>,
        token_name: impl Into<String>,
        token_value: impl Into<String>,
    ) -> Self {
        self.api_token = Some((user.into(), token_name.into(), token_value.into()));
        self
    }

    /// Use HTTPS (the default).
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Accept self-signed certificates.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Validates the settings and creates the manager. No request is made;
    /// the first login happens on the first call that needs it.
    pub fn build(self) -> ProxmoxResult<ProxmoxManager> {
        let host = ProxmoxHost::new(self.host.ok_or_else(|| required("host"))?)?;
        let port = ProxmoxPort::new(self.port.unwrap_or(DEFAULT_PORT))?;

        let credentials = match (self.api_token, self.username) {
            (Some((user, name, value)), _) => {
                Credentials::ApiToken(ProxmoxApiToken::new(&user, name, value)?)
            }
            (None, Some(username)) => Credentials::Password {
                username: ProxmoxUsername::new(username)?,
                password: ProxmoxPassword::new(
                    self.password.ok_or_else(|| required("password"))?,
                    None,
                )?,
                realm: ProxmoxRealm::new(self.realm.ok_or_else(|| required("realm"))?)?,
            },
            (None, None) => return Err(required("username")),
        };

        let url = ProxmoxUrl::new(&host, &port, self.secure)?;
        let connection = ProxmoxConnection::new(credentials, self.accept_invalid_certs, url);
        let client = ApiClient::new(connection, self.config.clone())?;

        Ok(ProxmoxManager {
            ctx: ResourceContext::new(Arc::new(client), Arc::new(self.config)),
        })
    }
}

impl ProxmoxManager {
    /// Creates a new builder for ProxmoxManager configuration
    pub fn builder() -> ProxmoxManagerBuilder {
        ProxmoxManagerBuilder::default()
    }

    /// Wraps an existing transport with the default [`ClientConfig`].
    pub fn from_api(api: Arc<dyn ProxmoxApi>) -> Self {
        Self {
            ctx: ResourceContext::from_api(api),
        }
    }

    /// A fresh node collection.
    pub fn nodes(&self) -> NodeCollection {
        NodeCollection::new(self.ctx.clone())
    }

    /// A fresh collection of default-realm users.
    pub fn users(&self) -> UserCollection {
        UserCollection::new(self.ctx.clone())
    }

    pub fn vms(&self) -> VmCollection {
        VmCollection::new(self.ctx.clone())
    }

    pub fn containers(&self) -> ContainerCollection {
        ContainerCollection::new(self.ctx.clone())
    }

    pub async fn version(&self) -> ProxmoxResult<Value> {
        self.ctx.api().version().await
    }

    pub async fn list_roles(&self) -> ProxmoxResult<Vec<RoleEntry>> {
        self.ctx.api().list_roles().await
    }

    /// Role ids in listing order.
    pub async fn list_role_names(&self) -> ProxmoxResult<Vec<String>> {
        Ok(self
            .list_roles()
            .await?
            .into_iter()
            .map(|role| role.roleid)
            .collect())
    }

    /// Fetches the configuration of any user, appending the default realm
    /// when `userid` has none.
    pub async fn get_user(&self, userid: &str) -> ProxmoxResult<Value> {
        let userid = UserId::normalize(userid);
        self.ctx.api().get_user(&userid.to_string()).await
    }

    /// Creates a user in any realm; an id without a realm gets the default
    /// one. Same checks as [`UserCollection::create`].
    pub async fn create_user(
        &self,
        userid: &str,
        password: &str,
        options: CreateUserOptions,
    ) -> ProxmoxResult<Value> {
        self.users().create(userid, password, options).await
    }

    /// Logs in as `userid` and returns its ticket and CSRF token.
    pub async fn get_user_tokens(
        &self,
        userid: &str,
        password: &str,
    ) -> ProxmoxResult<ProxmoxAuth> {
        let userid = UserId::normalize(userid);
        self.ctx
            .api()
            .get_user_tokens(&userid.to_string(), password)
            .await
    }

    /// Grants `role` to `userid` on an arbitrary ACL `path`, without
    /// propagation.
    pub async fn give_permission_to_user(
        &self,
        userid: &str,
        role: &str,
        path: &str,
    ) -> ProxmoxResult<Value> {
        self.update_user_permission(userid, role, path, false).await
    }

    /// Revokes a grant made by [`Self::give_permission_to_user`].
    pub async fn remove_permission_from_user(
        &self,
        userid: &str,
        role: &str,
        path: &str,
    ) -> ProxmoxResult<Value> {
        self.update_user_permission(userid, role, path, true).await
    }

    async fn update_user_permission(
        &self,
        userid: &str,
        role: &str,
        path: &str,
        delete: bool,
    ) -> ProxmoxResult<Value> {
        let update = AclUpdate {
            path: path.to_string(),
            roles: role.to_string(),
            users: UserId::normalize(userid).to_string(),
            delete,
            propagate: false,
        };
        self.ctx.api().update_access_control_list(update).await
    }

    pub async fn get_permissions_for_user(&self, userid: &str) -> ProxmoxResult<Value> {
        let userid = UserId::normalize(userid);
        self.ctx
            .api()
            .list_permissions(Some(userid.to_string()))
            .await
    }

    pub async fn list_resources(
        &self,
        resource_type: Option<ResourceType>,
    ) -> ProxmoxResult<Vec<ClusterResource>> {
        self.ctx.api().list_resources(resource_type).await
    }

    /// The lowest id at or above [`Vmid::MIN`] used by neither a VM nor a
    /// container.
    ///
    /// # Errors
    /// `ProxmoxError::Validation` if every id up to [`Vmid::MAX`] is taken.
    pub async fn smallest_free_vmid(&self) -> ProxmoxResult<String> {
        let mut taken = BTreeSet::new();
        let vm_ids = self.vms().keys().await?;
        let container_ids = self.containers().keys().await?;
        for id in vm_ids.iter().chain(container_ids.iter()) {
            match id.parse::<u32>() {
                Ok(id) if id >= Vmid::MIN => {
                    taken.insert(id);
                }
                _ => {}
            }
        }

        let mut candidate = Vmid::MIN;
        for id in taken {
            if id != candidate {
                break;
            }
            candidate += 1;
        }

        if candidate > Vmid::MAX {
            return Err(ValidationError::ConstraintViolation(
                "No free VM id left".to_string(),
            )
            .into());
        }
        Ok(candidate.to_string())
    }
}
