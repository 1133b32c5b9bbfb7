use crate::{
    core::domain::{
        error::ProxmoxResult,
        model::{
            node_list_item::NodeListItem,
            node_status::MemoryInfo,
            task::{TaskListItem, TaskLogLine, TaskStatus},
        },
    },
    resources::application::context::ResourceContext,
};
use serde_json::Value;
use std::hash::{Hash, Hasher};

/// A cluster node, identified by its name.
///
/// The online state is the one reported by the node listing this accessor
/// was created from; everything else is fetched on demand.
#[derive(Clone)]
pub struct Node {
    ctx: ResourceContext,
    listing: NodeListItem,
}

impl Node {
    pub(crate) fn new(ctx: ResourceContext, listing: NodeListItem) -> Self {
        Self { ctx, listing }
    }

    /// Returns the node name.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.listing.node
    }

    /// Returns `true` if the listing reported the node as `online`.
    #[must_use]
    pub fn online(&self) -> bool {
        self.listing.is_online()
    }

    /// Returns the listing entry this node was built from.
    #[must_use]
    pub fn listing(&self) -> &NodeListItem {
        &self.listing
    }

    /// Fetches `/nodes/{node}/status` unmodified.
    pub async fn get_status_report(&self) -> ProxmoxResult<Value> {
        self.ctx.api().get_node_status(self.id()).await
    }

    /// Fetches the status report and extracts its memory section.
    pub async fn memory(&self) -> ProxmoxResult<MemoryInfo> {
        let mut report = self.get_status_report().await?;
        let memory = report
            .get_mut("memory")
            .map(Value::take)
            .unwrap_or(Value::Null);
        Ok(serde_json::from_value(memory)?)
    }

    pub async fn list_tasks(&self) -> ProxmoxResult<Vec<TaskListItem>> {
        self.ctx.api().list_tasks(self.id()).await
    }

    pub async fn get_task_log(&self, upid: &str) -> ProxmoxResult<Vec<TaskLogLine>> {
        self.ctx.api().get_task_log(self.id(), upid).await
    }

    pub async fn get_task_status(&self, upid: &str) -> ProxmoxResult<TaskStatus> {
        self.ctx.api().get_task_status(self.id(), upid).await
    }
}

impl AsRef<str> for Node {
    fn as_ref(&self) -> &str {
        self.id()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.listing.node)
            .field("status", &self.listing.status)
            .finish()
    }
}
