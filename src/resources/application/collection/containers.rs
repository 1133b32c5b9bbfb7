use crate::{
    core::domain::{error::ProxmoxResult, model::guest::GuestKind},
    resources::application::{
        accessor::container::Container,
        collection::{GuestEntry, Listing, ResourceCollection, fetch_guests},
        context::ResourceContext,
    },
};
use async_trait::async_trait;
use serde_json::Value;

/// LXC guests of every node.
pub struct ContainerListing;

#[async_trait]
impl Listing for ContainerListing {
    type Entry = GuestEntry;
    type Resource = Container;

    const KIND: &'static str = "Container";

    async fn fetch(ctx: &ResourceContext) -> ProxmoxResult<Vec<GuestEntry>> {
        fetch_guests(ctx, GuestKind::Lxc).await
    }

    fn key(entry: &GuestEntry) -> String {
        entry.item.vmid.clone()
    }

    fn build(ctx: &ResourceContext, entry: &GuestEntry) -> Container {
        Container::new(ctx.clone(), entry.item.vmid.clone(), entry.node.clone())
    }
}

/// Every container of the cluster, keyed by id.
pub type ContainerCollection = ResourceCollection<ContainerListing>;

impl ResourceCollection<ContainerListing> {
    pub async fn remove(&self, id: &str) -> ProxmoxResult<Value> {
        let container = self.get(id).await?;
        let result = container.delete().await;
        self.invalidate().await;
        result
    }
}
