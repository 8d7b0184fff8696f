use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for a task that has not been stored yet. Defaults are already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub completed: bool,
}

/// Aggregate counts over all tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
}

impl TaskStats {
    /// Build stats from the two counts the store reports.
    ///
    /// The counts come from separate reads, so a concurrent delete can leave
    /// `completed` above `total`; `pending` saturates at zero in that case.
    pub fn new(total: u64, completed: u64) -> Self {
        TaskStats {
            total,
            completed,
            pending: total.saturating_sub(completed),
        }
    }
}
