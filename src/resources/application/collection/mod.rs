//! Map-like views over every resource of one kind.
//!
//! A collection fetches its listing on first use and serves later reads
//! from that snapshot until [`ResourceCollection::refresh`] is called or a
//! mutation issued through the collection invalidates it. Accessors are
//! built fresh on every read.

pub mod containers;
pub mod nodes;
pub mod users;
pub mod vms;

use crate::{
    core::domain::{
        error::{ProxmoxError, ProxmoxResult},
        model::guest::{GuestKind, GuestListItem},
    },
    resources::application::context::ResourceContext,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// How one kind of resource is listed and wrapped.
#[async_trait]
pub trait Listing: Send + Sync + 'static {
    /// One entry of the remote listing.
    type Entry: Clone + Send + Sync;
    /// The accessor handed to callers.
    type Resource;

    /// Used in not-found errors.
    const KIND: &'static str;

    async fn fetch(ctx: &ResourceContext) -> ProxmoxResult<Vec<Self::Entry>>;

    fn key(entry: &Self::Entry) -> String;

    fn build(ctx: &ResourceContext, entry: &Self::Entry) -> Self::Resource;

    /// Maps a caller-supplied id onto the key space.
    fn lookup_key(id: &str) -> String {
        id.to_string()
    }
}

/// A read-through cache of one listing.
pub struct ResourceCollection<L: Listing> {
    ctx: ResourceContext,
    cache: Mutex<Option<Arc<Vec<L::Entry>>>>,
}

impl<L: Listing> ResourceCollection<L> {
    pub(crate) fn new(ctx: ResourceContext) -> Self {
        Self {
            ctx,
            cache: Mutex::new(None),
        }
    }

    pub(crate) fn context(&self) -> &ResourceContext {
        &self.ctx
    }

    async fn entries(&self) -> ProxmoxResult<Arc<Vec<L::Entry>>> {
        let mut cache = self.cache.lock().await;
        if let Some(entries) = cache.as_ref() {
            return Ok(Arc::clone(entries));
        }
        tracing::debug!(kind = L::KIND, "fetching listing");
        let entries = Arc::new(dedup_last_wins(L::fetch(&self.ctx).await?, L::key));
        *cache = Some(Arc::clone(&entries));
        Ok(entries)
    }

    /// Drops the cached listing so the next read fetches again.
    pub(crate) async fn invalidate(&self) {
        *self.cache.lock().await = None;
    }

    /// Discards the cached listing and fetches it again.
    pub async fn refresh(&self) -> ProxmoxResult<()> {
        self.invalidate().await;
        self.entries().await.map(|_| ())
    }

    /// Ids in listing order.
    pub async fn keys(&self) -> ProxmoxResult<Vec<String>> {
        Ok(self.entries().await?.iter().map(L::key).collect())
    }

    pub async fn values(&self) -> ProxmoxResult<Vec<L::Resource>> {
        let entries = self.entries().await?;
        Ok(entries.iter().map(|e| L::build(&self.ctx, e)).collect())
    }

    pub async fn items(&self) -> ProxmoxResult<Vec<(String, L::Resource)>> {
        let entries = self.entries().await?;
        Ok(entries
            .iter()
            .map(|e| (L::key(e), L::build(&self.ctx, e)))
            .collect())
    }

    /// Looks up one resource.
    ///
    /// # Errors
    /// `ProxmoxError::NotFound` if the listing has no such id.
    pub async fn get(&self, id: &str) -> ProxmoxResult<L::Resource> {
        let key = L::lookup_key(id);
        let entries = self.entries().await?;
        entries
            .iter()
            .find(|e| L::key(e) == key)
            .map(|e| L::build(&self.ctx, e))
            .ok_or_else(|| ProxmoxError::NotFound {
                kind: L::KIND,
                id: id.to_string(),
            })
    }

    pub async fn contains(&self, id: &str) -> ProxmoxResult<bool> {
        let key = L::lookup_key(id);
        Ok(self.entries().await?.iter().any(|e| L::key(e) == key))
    }

    pub async fn len(&self) -> ProxmoxResult<usize> {
        Ok(self.entries().await?.len())
    }

    pub async fn is_empty(&self) -> ProxmoxResult<bool> {
        Ok(self.entries().await?.is_empty())
    }
}

impl<L: Listing> std::fmt::Debug for ResourceCollection<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceCollection")
            .field("kind", &L::KIND)
            .finish_non_exhaustive()
    }
}

/// A guest listing entry together with the node that reported it.
#[derive(Debug, Clone, PartialEq)]
pub struct GuestEntry {
    pub node: String,
    pub item: GuestListItem,
}

/// Lists the guests of every node, in node order.
async fn fetch_guests(ctx: &ResourceContext, kind: GuestKind) -> ProxmoxResult<Vec<GuestEntry>> {
    let mut entries = Vec::new();
    for node in ctx.api().list_nodes().await? {
        let guests = ctx.api().list_guests(kind, &node.node).await?;
        entries.extend(guests.into_iter().map(|item| GuestEntry {
            node: node.node.clone(),
            item,
        }));
    }
    Ok(entries)
}

/// Keeps the first position of each key with the last value seen for it.
fn dedup_last_wins<T>(entries: Vec<T>, key: impl Fn(&T) -> String) -> Vec<T> {
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(entries.len());
    let mut unique: Vec<T> = Vec::with_capacity(entries.len());
    for entry in entries {
        match positions.get(&key(&entry)) {
            Some(&index) => unique[index] = entry,
            None => {
                positions.insert(key(&entry), unique.len());
                unique.push(entry);
            }
        }
    }
    unique
}
