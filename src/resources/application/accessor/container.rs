use crate::{
    core::domain::{
        error::{ProxmoxError, ProxmoxResult},
        model::guest::{GuestKind, PowerAction, PowerParams},
        value_object::{UserId, Vmid},
    },
    resources::application::{
        accessor::{
            guest::{CloneOptions, GuestHandle},
            user::User,
        },
        context::ResourceContext,
    },
};
use serde_json::Value;
use std::hash::{Hash, Hasher};

/// An LXC container, identified by `(vmid, node)`.
#[derive(Clone)]
pub struct Container {
    guest: GuestHandle,
}

impl Container {
    pub(crate) fn new(ctx: ResourceContext, vmid: String, node: String) -> Self {
        Self {
            guest: GuestHandle::new(ctx, GuestKind::Lxc, vmid, node),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        self.guest.vmid()
    }

    #[must_use]
    pub fn node(&self) -> &str {
        self.guest.node()
    }

    pub async fn get_status_report(&self) -> ProxmoxResult<Value> {
        self.guest.status_report().await
    }

    pub async fn get_config(&self) -> ProxmoxResult<Value> {
        self.guest.config().await
    }

    pub async fn running(&self) -> ProxmoxResult<bool> {
        self.guest.running().await
    }

    pub async fn is_template(&self) -> ProxmoxResult<bool> {
        self.guest.is_template().await
    }

    pub async fn start(&self) -> ProxmoxResult<Value> {
        self.guest
            .power(PowerAction::Start, PowerParams::default())
            .await
    }

    pub async fn stop(&self) -> ProxmoxResult<Value> {
        self.guest
            .power(PowerAction::Stop, PowerParams::default())
            .await
    }

    pub async fn shutdown(
        &self,
        timeout: Option<u32>,
        force_stop: bool,
    ) -> ProxmoxResult<Value> {
        let params = PowerParams {
            timeout,
            force_stop: Some(force_stop),
            ..Default::default()
        };
        self.guest.power(PowerAction::Shutdown, params).await
    }

    pub async fn reboot(&self, timeout: Option<u32>) -> ProxmoxResult<Value> {
        let params = PowerParams {
            timeout,
            ..Default::default()
        };
        self.guest.power(PowerAction::Reboot, params).await
    }

    /// Forwarded as is; Proxmox VE does not support suspending containers
    /// in practice.
    pub async fn suspend(&self) -> ProxmoxResult<Value> {
        self.guest
            .power(PowerAction::Suspend, PowerParams::default())
            .await
    }

    /// See [`Container::suspend`].
    pub async fn resume(&self) -> ProxmoxResult<Value> {
        self.guest
            .power(PowerAction::Resume, PowerParams::default())
            .await
    }

    pub async fn delete(&self) -> ProxmoxResult<Value> {
        self.guest.delete().await
    }

    /// Clones this container to `new_id`; the option name becomes the
    /// hostname of the copy.
    pub async fn create_clone<I>(&self, new_id: I, options: CloneOptions) -> ProxmoxResult<Value>
    where
        I: TryInto<Vmid, Error = ProxmoxError>,
    {
        self.guest.create_clone(new_id, options).await
    }

    pub async fn view_permissions(&self) -> ProxmoxResult<Vec<(User, String)>> {
        self.guest.view_permissions().await
    }

    /// Grants `role` on this container. `user` is a [`User`] or a raw id; a raw
    /// id without a realm gets the default one.
    pub async fn add_permission(
        &self,
        user: impl Into<UserId>,
        role: &str,
    ) -> ProxmoxResult<Value> {
        self.guest.update_permission(user.into(), role, false).await
    }

    /// Revokes `role` on this container; `user` is taken as in
    /// [`Self::add_permission`].
    pub async fn remove_permission(
        &self,
        user: impl Into<UserId>,
        role: &str,
    ) -> ProxmoxResult<Value> {
        self.guest.update_permission(user.into(), role, true).await
    }

    pub async fn remove_all_permissions(&self) -> ProxmoxResult<()> {
        self.guest.remove_all_permissions().await
    }
}

impl PartialEq for Container {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id() && self.node() == other.node()
    }
}

impl Eq for Container {}

impl Hash for Container {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
        self.node().hash(state);
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("id", &self.id())
            .field("node", &self.node())
            .field("kind", &self.guest.kind())
            .finish()
    }
}
