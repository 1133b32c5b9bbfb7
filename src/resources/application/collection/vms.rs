use crate::{
    core::domain::{error::ProxmoxResult, model::guest::GuestKind},
    resources::application::{
        accessor::vm::VirtualMachine,
        collection::{GuestEntry, Listing, ResourceCollection, fetch_guests},
        context::ResourceContext,
    },
};
use async_trait::async_trait;
use serde_json::Value;

/// QEMU guests of every node.
pub struct VmListing;

#[async_trait]
impl Listing for VmListing {
    type Entry = GuestEntry;
    type Resource = VirtualMachine;

    const KIND: &'static str = "VM";

    async fn fetch(ctx: &ResourceContext) -> ProxmoxResult<Vec<GuestEntry>> {
        fetch_guests(ctx, GuestKind::Qemu).await
    }

    fn key(entry: &GuestEntry) -> String {
        entry.item.vmid.clone()
    }

    fn build(ctx: &ResourceContext, entry: &GuestEntry) -> VirtualMachine {
        VirtualMachine::new(ctx.clone(), entry.item.vmid.clone(), entry.node.clone())
    }
}

/// Every VM of the cluster, keyed by id.
pub type VmCollection = ResourceCollection<VmListing>;

impl ResourceCollection<VmListing> {
    /// Deletes a listed VM.
    pub async fn remove(&self, id: &str) -> ProxmoxResult<Value> {
        let vm = self.get(id).await?;
        let result = vm.delete().await;
        self.invalidate().await;
        result
    }
}
