//! Domain models for node tasks under `/nodes/{node}/tasks`.

use serde::{Deserialize, Serialize};

/// A task as listed by `/nodes/{node}/tasks`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TaskListItem {
    /// Unique task identifier.
    pub upid: String,
    pub node: String,
    /// Task type (e.g., `qmstart`, `vzcreate`).
    #[serde(rename = "type")]
    pub task_type: String,
    /// The user that started the task.
    pub user: String,
    /// Start time as a UNIX timestamp.
    pub starttime: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endtime: Option<u64>,
    /// Exit status; absent while the task runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// One line of a task log.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TaskLogLine {
    /// Line number, starting at 1.
    pub n: u64,
    /// Line text.
    pub t: String,
}

/// Status of a single task.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TaskStatus {
    pub upid: String,
    /// `running` or `stopped`.
    pub status: String,
    /// Exit status once stopped (e.g., `OK`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exitstatus: Option<String>,
    #[serde(rename = "type")]
    pub task_type: String,
    pub node: String,
}

impl TaskStatus {
    /// Returns `true` once the task stopped with exit status `OK`.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == "stopped" && self.exitstatus.as_deref() == Some("OK")
    }
}
