use crate::{
    core::domain::{
        error::{ProxmoxError, ProxmoxResult},
        model::node_list_item::NodeListItem,
    },
    resources::application::{
        accessor::node::Node,
        collection::{Listing, ResourceCollection},
        context::ResourceContext,
    },
};
use async_trait::async_trait;
use rand::seq::SliceRandom;

/// Nodes as listed by `/nodes`.
pub struct NodeListing;

#[async_trait]
impl Listing for NodeListing {
    type Entry = NodeListItem;
    type Resource = Node;

    const KIND: &'static str = "Node";

    async fn fetch(ctx: &ResourceContext) -> ProxmoxResult<Vec<NodeListItem>> {
        ctx.api().list_nodes().await
    }

    fn key(entry: &NodeListItem) -> String {
        entry.node.clone()
    }

    fn build(ctx: &ResourceContext, entry: &NodeListItem) -> Node {
        Node::new(ctx.clone(), entry.clone())
    }
}

/// Every node of the cluster, keyed by name.
pub type NodeCollection = ResourceCollection<NodeListing>;

impl ResourceCollection<NodeListing> {
    async fn candidates(&self, online_only: bool) -> ProxmoxResult<Vec<Node>> {
        let candidates: Vec<Node> = self
            .values()
            .await?
            .into_iter()
            .filter(|node| !online_only || node.online())
            .collect();
        if candidates.is_empty() {
            return Err(ProxmoxError::NoNodes { online_only });
        }
        Ok(candidates)
    }

    /// Picks a node uniformly at random.
    ///
    /// # Errors
    /// `ProxmoxError::NoNodes` if no node qualifies.
    pub async fn choose_at_random(&self, online_only: bool) -> ProxmoxResult<Node> {
        let candidates = self.candidates(online_only).await?;
        candidates
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or(ProxmoxError::NoNodes { online_only })
    }

    /// Picks the node with the most free memory, either in bytes
    /// (`absolute`) or as a fraction of its total. Ties go to the node
    /// listed first. Fetches one status report per candidate.
    ///
    /// # Errors
    /// `ProxmoxError::NoNodes` if no node qualifies, or the first failing
    /// status request.
    pub async fn choose_by_most_free_ram(
        &self,
        absolute: bool,
        online_only: bool,
    ) -> ProxmoxResult<Node> {
        let mut best: Option<(Node, f64)> = None;
        for node in self.candidates(online_only).await? {
            let memory = node.memory().await?;
            let rating = if absolute {
                memory.free as f64
            } else {
                memory.free_ratio()
            };
            tracing::debug!(node = node.id(), rating, "rated node");
            if best.as_ref().is_none_or(|(_, top)| rating > *top) {
                best = Some((node, rating));
            }
        }
        best.map(|(node, _)| node)
            .ok_or(ProxmoxError::NoNodes { online_only })
    }
}
