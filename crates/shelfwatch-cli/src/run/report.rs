//! Serializable run report: what ran, what failed, and what the outputs
//! contain. Written as JSON next to the data files.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use shelfwatch_core::{Platform, SearchTask};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TaskStatus {
    Completed,
    Failed,
}

/// One matrix cell's outcome: either a record count or an error string.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct TaskReport {
    pub keyword: String,
    pub region: String,
    pub status: TaskStatus,
    pub records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskReport {
    pub fn completed(task: &SearchTask, records: usize) -> Self {
        Self {
            keyword: task.keyword.clone(),
            region: task.region.clone(),
            status: TaskStatus::Completed,
            records,
            error: None,
        }
    }

    pub fn failed(task: &SearchTask, error: impl Into<String>) -> Self {
        Self {
            keyword: task.keyword.clone(),
            region: task.region.clone(),
            status: TaskStatus::Failed,
            records: 0,
            error: Some(error.into()),
        }
    }
}

/// Summary counters over the whole run.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct RunTotals {
    pub tasks: usize,
    pub completed: usize,
    pub failed: usize,
    pub records: usize,
    pub brands: usize,
}

impl RunTotals {
    pub fn tally(tasks: &[TaskReport], records: usize, brands: usize) -> Self {
        let completed = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count();
        Self {
            tasks: tasks.len(),
            completed,
            failed: tasks.len() - completed,
            records,
            brands,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RunReport {
    pub run_id: Uuid,
    pub platform: Platform,
    pub weighting: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub tasks: Vec<TaskReport>,
    pub totals: RunTotals,
}
