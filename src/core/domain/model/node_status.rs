//! Domain model for the memory section of `/nodes/{node}/status`.

use serde::{Deserialize, Serialize};

/// Memory usage information of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct MemoryInfo {
    /// Total memory in bytes.
    pub total: u64,
    /// Used memory in bytes.
    #[serde(default)]
    pub used: u64,
    /// Free memory in bytes.
    pub free: u64,
}

impl MemoryInfo {
    /// Free memory as a fraction of the total; `0.0` when the total is unknown.
    #[must_use]
    pub fn free_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.free as f64 / self.total as f64
        }
    }
}
