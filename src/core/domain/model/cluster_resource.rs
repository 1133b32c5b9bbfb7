//! Domain models for `/cluster/resources`.
//!
//! The listing mixes guests, storages, nodes and other entries, each tagged
//! by a `type` field.

use serde::{Deserialize, Serialize};

/// Resource kinds accepted by the `type` filter of `/cluster/resources`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Vm,
    Storage,
    Node,
    Sdn,
}

impl ResourceType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Vm => "vm",
            ResourceType::Storage => "storage",
            ResourceType::Node => "node",
            ResourceType::Sdn => "sdn",
        }
    }
}

/// One entry of the cluster resource listing.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClusterResource {
    /// A QEMU virtual machine.
    Qemu(GuestResource),
    /// An LXC container.
    Lxc(GuestResource),
    /// A storage on one node.
    Storage(StorageResource),
    /// A cluster member.
    Node(NodeResource),
    /// Pools, SDN zones and anything newer servers add.
    #[serde(other)]
    Other,
}

impl ClusterResource {
    /// Returns the node the resource lives on, if it has one.
    #[must_use]
    pub fn node(&self) -> Option<&str> {
        match self {
            ClusterResource::Qemu(r) | ClusterResource::Lxc(r) => Some(&r.common.node),
            ClusterResource::Storage(r) => Some(&r.common.node),
            ClusterResource::Node(r) => Some(&r.common.node),
            ClusterResource::Other => None,
        }
    }
}

/// Fields shared by every typed resource.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CommonResourceFields {
    pub node: String,
    /// Resource identifier (e.g., `qemu/100`, `node/pve1`).
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
}

/// A VM or container.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GuestResource {
    #[serde(flatten)]
    pub common: CommonResourceFields,
    pub vmid: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxcpu: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxmem: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxdisk: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageResource {
    #[serde(flatten)]
    pub common: CommonResourceFields,
    pub storage: String,
    /// Storage plugin (e.g., `dir`, `zfspool`, `lvm`).
    #[serde(
        rename = "plugintype",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub plugin_type: Option<String>,
    /// Used space in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<u64>,
    /// Capacity in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxdisk: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NodeResource {
    #[serde(flatten)]
    pub common: CommonResourceFields,
    /// CPU usage (0.0 to 1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxcpu: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxmem: Option<u64>,
}
