//! The transport seam between resource wrappers and the Proxmox REST API.

use crate::core::domain::{
    error::ProxmoxResult,
    model::{
        access::{
            AclEntry, AclUpdate, ChangePasswordParams, CreateUserParams, RoleEntry, UserListItem,
        },
        cluster_resource::{ClusterResource, ResourceType},
        guest::{CloneParams, GuestKind, GuestListItem, PowerAction, PowerParams},
        node_list_item::NodeListItem,
        proxmox_auth::ProxmoxAuth,
        task::{TaskListItem, TaskLogLine, TaskStatus},
    },
};
use async_trait::async_trait;
use serde_json::Value;

/// One method per remote endpoint, each performing exactly one round trip.
///
/// User identifiers passed here are always realm-qualified. Results are the
/// `data` member of the server response; endpoints whose shape varies
/// between releases are returned as raw JSON.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProxmoxApi: Send + Sync {
    /// `GET /version`
    async fn version(&self) -> ProxmoxResult<Value>;

    /// `GET /access/users`
    async fn list_users(&self) -> ProxmoxResult<Vec<UserListItem>>;

    /// `GET /access/users/{userid}`
    async fn get_user(&self, userid: &str) -> ProxmoxResult<Value>;

    /// `POST /access/users`
    async fn create_user(&self, params: CreateUserParams) -> ProxmoxResult<Value>;

    /// `DELETE /access/users/{userid}`
    async fn delete_user(&self, userid: &str) -> ProxmoxResult<Value>;

    /// `PUT /access/password`
    async fn change_user_password(&self, params: ChangePasswordParams) -> ProxmoxResult<Value>;

    /// `POST /access/ticket` as `userid`, returning that user's session.
    async fn get_user_tokens(&self, userid: &str, password: &str) -> ProxmoxResult<ProxmoxAuth>;

    /// `GET /access/roles`
    async fn list_roles(&self) -> ProxmoxResult<Vec<RoleEntry>>;

    /// `GET /access/permissions`, optionally for another user.
    async fn list_permissions(&self, userid: Option<String>) -> ProxmoxResult<Value>;

    /// `GET /access/acl`
    async fn get_access_control_list(&self) -> ProxmoxResult<Vec<AclEntry>>;

    /// `PUT /access/acl`
    async fn update_access_control_list(&self, update: AclUpdate) -> ProxmoxResult<Value>;

    /// `GET /nodes`
    async fn list_nodes(&self) -> ProxmoxResult<Vec<NodeListItem>>;

    /// `GET /nodes/{node}/status`
    async fn get_node_status(&self, node: &str) -> ProxmoxResult<Value>;

    /// `GET /cluster/resources`
    async fn list_resources(
        &self,
        resource_type: Option<ResourceType>,
    ) -> ProxmoxResult<Vec<ClusterResource>>;

    /// `GET /nodes/{node}/{kind}`
    async fn list_guests(&self, kind: GuestKind, node: &str) -> ProxmoxResult<Vec<GuestListItem>>;

    /// `GET /nodes/{node}/{kind}/{vmid}/status/current`
    async fn get_guest_status(&self, kind: GuestKind, node: &str, vmid: &str)
    -> ProxmoxResult<Value>;

    /// `GET /nodes/{node}/{kind}/{vmid}/config`
    async fn get_guest_config(&self, kind: GuestKind, node: &str, vmid: &str)
    -> ProxmoxResult<Value>;

    /// `DELETE /nodes/{node}/{kind}/{vmid}`
    async fn delete_guest(&self, kind: GuestKind, node: &str, vmid: &str) -> ProxmoxResult<Value>;

    /// `POST /nodes/{node}/{kind}/{vmid}/clone`
    async fn clone_guest(
        &self,
        kind: GuestKind,
        node: &str,
        vmid: &str,
        params: CloneParams,
    ) -> ProxmoxResult<Value>;

    /// `POST /nodes/{node}/{kind}/{vmid}/status/{action}`
    async fn guest_power_action(
        &self,
        kind: GuestKind,
        node: &str,
        vmid: &str,
        action: PowerAction,
        params: PowerParams,
    ) -> ProxmoxResult<Value>;

    /// `GET /nodes/{node}/tasks`
    async fn list_tasks(&self, node: &str) -> ProxmoxResult<Vec<TaskListItem>>;

    /// `GET /nodes/{node}/tasks/{upid}/log`
    async fn get_task_log(&self, node: &str, upid: &str) -> ProxmoxResult<Vec<TaskLogLine>>;

    /// `GET /nodes/{node}/tasks/{upid}/status`
    async fn get_task_status(&self, node: &str, upid: &str) -> ProxmoxResult<TaskStatus>;
}
