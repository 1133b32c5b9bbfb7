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

/// A QEMU virtual machine, identified by `(vmid, node)`.
///
/// Every method is one request against
/// `/nodes/{node}/qemu/{vmid}`; nothing is cached locally.
#[derive(Clone)]
pub struct VirtualMachine {
    guest: GuestHandle,
}

impl VirtualMachine {
    pub(crate) fn new(ctx: ResourceContext, vmid: String, node: String) -> Self {
        Self {
            guest: GuestHandle::new(ctx, GuestKind::Qemu, vmid, node),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        self.guest.vmid()
    }

    /// Name of the node hosting this VM.
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

    /// `true` if the status report says `running`.
    pub async fn running(&self) -> ProxmoxResult<bool> {
        self.guest.running().await
    }

    /// `true` if the config carries `template: 1`.
    pub async fn is_template(&self) -> ProxmoxResult<bool> {
        self.guest.is_template().await
    }

    pub async fn start(&self, timeout: Option<u32>) -> ProxmoxResult<Value> {
        let params = PowerParams {
            timeout,
            ..Default::default()
        };
        self.guest.power(PowerAction::Start, params).await
    }

    /// Hard stop.
    pub async fn stop(&self, timeout: Option<u32>) -> ProxmoxResult<Value> {
        let params = PowerParams {
            timeout,
            ..Default::default()
        };
        self.guest.power(PowerAction::Stop, params).await
    }

    /// ACPI shutdown. With `force_stop` the VM is stopped hard if it does
    /// not go down within `timeout`; `forceStop` is always sent.
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

    pub async fn reset(&self) -> ProxmoxResult<Value> {
        self.guest
            .power(PowerAction::Reset, PowerParams::default())
            .await
    }

    pub async fn reboot(&self, timeout: Option<u32>) -> ProxmoxResult<Value> {
        let params = PowerParams {
            timeout,
            ..Default::default()
        };
        self.guest.power(PowerAction::Reboot, params).await
    }

    /// Suspends to RAM, or to disk when `to_disk` is set; `todisk` is always
    /// sent.
    pub async fn suspend(&self, to_disk: bool) -> ProxmoxResult<Value> {
        let params = PowerParams {
            to_disk: Some(to_disk),
            ..Default::default()
        };
        self.guest.power(PowerAction::Suspend, params).await
    }

    pub async fn resume(&self) -> ProxmoxResult<Value> {
        self.guest
            .power(PowerAction::Resume, PowerParams::default())
            .await
    }

    pub async fn delete(&self) -> ProxmoxResult<Value> {
        self.guest.delete().await
    }

    /// Clones this VM to `new_id`.
    ///
    /// `new_id` must be an integer in `[100, 999999999]`, given as a number
    /// or a string; anything else fails before a request is made.
    pub async fn create_clone<I>(&self, new_id: I, options: CloneOptions) -> ProxmoxResult<Value>
    where
        I: TryInto<Vmid, Error = ProxmoxError>,
    {
        self.guest.create_clone(new_id, options).await
    }

    /// Users of the default realm with a role on `/vms/{vmid}`.
    pub async fn view_permissions(&self) -> ProxmoxResult<Vec<(User, String)>> {
        self.guest.view_permissions().await
    }

    /// Grants `role` on this VM. `user` is a [`User`] or a raw id; a raw
    /// id without a realm gets the default one.
    pub async fn add_permission(
        &self,
        user: impl Into<UserId>,
        role: &str,
    ) -> ProxmoxResult<Value> {
        self.guest.update_permission(user.into(), role, false).await
    }

    /// Revokes `role` on this VM; `user` is taken as in
    /// [`Self::add_permission`].
    pub async fn remove_permission(
        &self,
        user: impl Into<UserId>,
        role: &str,
    ) -> ProxmoxResult<Value> {
        self.guest.update_permission(user.into(), role, true).await
    }

    /// Removes each permission in turn; not atomic.
    pub async fn remove_all_permissions(&self) -> ProxmoxResult<()> {
        self.guest.remove_all_permissions().await
    }
}

impl PartialEq for VirtualMachine {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id() && self.node() == other.node()
    }
}

impl Eq for VirtualMachine {}

impl Hash for VirtualMachine {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
        self.node().hash(state);
    }
}

impl std::fmt::Debug for VirtualMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualMachine")
            .field("id", &self.id())
            .field("node", &self.node())
            .finish()
    }
}
