//! Behaviour shared by virtual machines and containers.

use crate::{
    core::domain::{
        error::{ProxmoxError, ProxmoxResult},
        model::{
            access::AclUpdate,
            guest::{CloneParams, GuestKind, PowerAction, PowerParams},
        },
        value_object::{DEFAULT_REALM, UserId, Vmid},
    },
    resources::application::{accessor::user::User, context::ResourceContext},
};
use serde_json::Value;

/// Optional arguments of a clone request.
///
/// # Examples
///
/// ```
/// use pve_manager::CloneOptions;
///
/// let options = CloneOptions::new().target("pve2").name("web-02").full(false);
/// assert_eq!(options.target_node(), Some("pve2"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneOptions {
    target: Option<String>,
    name: Option<String>,
    full: bool,
}

impl CloneOptions {
    /// A full clone onto the source node.
    pub fn new() -> Self {
        Self {
            target: None,
            name: None,
            full: true,
        }
    }

    /// Clones onto another node, given by name or as a [`Node`](super::node::Node).
    pub fn target(mut self, node: impl AsRef<str>) -> Self {
        self.target = Some(node.as_ref().to_string());
        self
    }

    /// Name of a new VM, or hostname of a new container.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Full copy (`true`, the default) or linked clone.
    pub fn full(mut self, full: bool) -> Self {
        self.full = full;
        self
    }

    pub fn target_node(&self) -> Option<&str> {
        self.target.as_deref()
    }
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A guest identity plus the transport, shared by the VM and container
/// accessors.
#[derive(Clone)]
pub(crate) struct GuestHandle {
    ctx: ResourceContext,
    kind: GuestKind,
    vmid: String,
    node: String,
}

impl GuestHandle {
    pub(crate) fn new(ctx: ResourceContext, kind: GuestKind, vmid: String, node: String) -> Self {
        Self {
            ctx,
            kind,
            vmid,
            node,
        }
    }

    pub(crate) fn vmid(&self) -> &str {
        &self.vmid
    }

    pub(crate) fn node(&self) -> &str {
        &self.node
    }

    pub(crate) fn kind(&self) -> GuestKind {
        self.kind
    }

    pub(crate) async fn status_report(&self) -> ProxmoxResult<Value> {
        self.ctx
            .api()
            .get_guest_status(self.kind, &self.node, &self.vmid)
            .await
    }

    pub(crate) async fn config(&self) -> ProxmoxResult<Value> {
        self.ctx
            .api()
            .get_guest_config(self.kind, &self.node, &self.vmid)
            .await
    }

    pub(crate) async fn running(&self) -> ProxmoxResult<bool> {
        let status = self.status_report().await?;
        Ok(status.get("status").and_then(Value::as_str) == Some("running"))
    }

    pub(crate) async fn is_template(&self) -> ProxmoxResult<bool> {
        let config = self.config().await?;
        Ok(config.get("template").is_some_and(is_set))
    }

    pub(crate) async fn delete(&self) -> ProxmoxResult<Value> {
        self.ctx
            .api()
            .delete_guest(self.kind, &self.node, &self.vmid)
            .await
    }

    pub(crate) async fn power(
        &self,
        action: PowerAction,
        params: PowerParams,
    ) -> ProxmoxResult<Value> {
        tracing::debug!(
            kind = %self.kind,
            vmid = %self.vmid,
            node = %self.node,
            %action,
            "power action"
        );
        self.ctx
            .api()
            .guest_power_action(self.kind, &self.node, &self.vmid, action, params)
            .await
    }

    /// Validates `new_id` locally, then issues the clone request.
    pub(crate) async fn create_clone<I>(
        &self,
        new_id: I,
        options: CloneOptions,
    ) -> ProxmoxResult<Value>
    where
        I: TryInto<Vmid, Error = ProxmoxError>,
    {
        let new_id = new_id.try_into()?;
        let CloneOptions { target, name, full } = options;
        let (name, hostname) = match self.kind {
            GuestKind::Qemu => (name, None),
            GuestKind::Lxc => (None, name),
        };
        let params = CloneParams {
            newid: new_id.to_string(),
            target,
            name,
            hostname,
            full,
        };
        self.ctx
            .api()
            .clone_guest(self.kind, &self.node, &self.vmid, params)
            .await
    }

    fn acl_path(&self) -> String {
        format!("/vms/{}", self.vmid)
    }

    /// Lists `(user, role)` pairs granted directly on this guest to users of
    /// the default realm, in listing order.
    pub(crate) async fn view_permissions(&self) -> ProxmoxResult<Vec<(User, String)>> {
        let path = self.acl_path();
        let acl = self.ctx.api().get_access_control_list().await?;
        Ok(acl
            .into_iter()
            .filter(|entry| entry.path == path && entry.principal_type == "user")
            .filter_map(|entry| {
                let (name, realm) = entry.ugid.rsplit_once('@')?;
                (realm == DEFAULT_REALM).then(|| {
                    let user = User::new(self.ctx.clone(), UserId::in_default_realm(name));
                    (user, entry.roleid)
                })
            })
            .collect())
    }

    pub(crate) async fn update_permission(
        &self,
        user: UserId,
        role: &str,
        delete: bool,
    ) -> ProxmoxResult<Value> {
        let update = AclUpdate {
            path: self.acl_path(),
            roles: role.to_string(),
            users: user.to_string(),
            delete,
            propagate: false,
        };
        self.ctx.api().update_access_control_list(update).await
    }

    /// Removes every permission [`Self::view_permissions`] reports, one
    /// request each. Stops at the first failure.
    pub(crate) async fn remove_all_permissions(&self) -> ProxmoxResult<()> {
        for (user, role) in self.view_permissions().await? {
            self.update_permission(user.user_id().clone(), &role, true).await?;
        }
        Ok(())
    }
}

fn is_set(flag: &Value) -> bool {
    match flag {
        Value::Bool(value) => *value,
        Value::Number(value) => value.as_u64() == Some(1),
        Value::String(value) => value == "1",
        _ => false,
    }
}
