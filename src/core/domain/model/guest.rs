//! Domain models shared by QEMU virtual machines and LXC containers.
//!
//! Both guest kinds live under `/nodes/{node}/{qemu|lxc}/{vmid}` and accept
//! the same families of requests, so one set of types serves both.

use crate::core::domain::value_object::serde_helpers::{
    display_string, flag_option, pve_bool, string_or_number,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two kinds of guests a node can host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuestKind {
    /// A QEMU virtual machine.
    Qemu,
    /// An LXC container.
    Lxc,
}

impl GuestKind {
    /// Path segment used by the API for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            GuestKind::Qemu => "qemu",
            GuestKind::Lxc => "lxc",
        }
    }

    /// Human readable name for error messages.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            GuestKind::Qemu => "VM",
            GuestKind::Lxc => "Container",
        }
    }
}

impl fmt::Display for GuestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A guest as returned by `/nodes/{node}/qemu` or `/nodes/{node}/lxc`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GuestListItem {
    /// The guest identifier; LXC listings report it as a string.
    #[serde(deserialize_with = "string_or_number")]
    pub vmid: String,
    /// VM name or container hostname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Current status (e.g., "running", "stopped").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Whether the guest is a template.
    #[serde(
        default,
        deserialize_with = "flag_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub template: Option<bool>,
    /// Maximum memory in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxmem: Option<u64>,
    /// Uptime in seconds (if running).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
}

/// Power-state transitions exposed under `status/{action}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerAction {
    Start,
    Stop,
    Shutdown,
    Reset,
    Reboot,
    Suspend,
    Resume,
}

impl PowerAction {
    /// Path segment used by the API for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerAction::Start => "start",
            PowerAction::Stop => "stop",
            PowerAction::Shutdown => "shutdown",
            PowerAction::Reset => "reset",
            PowerAction::Reboot => "reboot",
            PowerAction::Suspend => "suspend",
            PowerAction::Resume => "resume",
        }
    }
}

impl fmt::Display for PowerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional parameters of a power action. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PowerParams {
    /// Seconds the server waits before giving up on the action.
    #[serde(
        serialize_with = "display_string::serialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<u32>,
    /// Stop the guest if a graceful shutdown fails.
    #[serde(
        rename = "forceStop",
        serialize_with = "pve_bool::serialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub force_stop: Option<bool>,
    /// Suspend a VM to disk instead of RAM.
    #[serde(
        rename = "todisk",
        serialize_with = "pve_bool::serialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub to_disk: Option<bool>,
}

/// Body of a clone request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloneParams {
    /// Id of the new guest, already range checked.
    pub newid: String,
    /// Target node; omitted to clone onto the source node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Name of a new VM.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Hostname of a new container.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Full copy instead of a linked clone.
    #[serde(serialize_with = "pve_bool::serialize")]
    pub full: bool,
}
