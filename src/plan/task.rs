//! Single-task state within an execution plan.

use serde::{Deserialize, Serialize};

use crate::sse::TaskSeed;

/// Status of one task. Transitions are monotonic:
/// `Pending -> InProgress -> {Completed | Failed}`, never backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl TaskStatus {
    /// Whether this status is a sink - no further transitions allowed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

/// One step of an automation plan, owned by its [`TaskPlan`].
///
/// Mutation goes through [`start`], [`complete`] and [`fail`], which
/// enforce the monotonic status contract: once a task is terminal,
/// replayed or stale events for the same id are no-ops.
///
/// [`TaskPlan`]: crate::plan::TaskPlan
/// [`start`]: Task::start
/// [`complete`]: Task::complete
/// [`fail`]: Task::fail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Backend-assigned id, unique within the plan
    pub id: String,
    /// Service the task targets (e.g. "jira")
    pub service: String,
    /// Action name (e.g. "create_issue")
    pub action: String,
    /// Human-readable description
    pub description: String,
    /// Ids of tasks this one depends on (display metadata)
    #[serde(default)]
    pub depends_on: Vec<String>,
    pub status: TaskStatus,
    /// Present iff the task completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Present iff the task failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Task {
    /// Build a pending task from a `plan` event announcement.
    pub fn from_seed(seed: TaskSeed) -> Self {
        Self {
            id: seed.id,
            service: seed.service,
            action: seed.action,
            description: seed.description,
            depends_on: seed.depends_on,
            status: TaskStatus::Pending,
            result: None,
            error: None,
        }
    }

    /// Build an in-progress task for a `task_started` event whose id was
    /// never announced. Missing display fields get placeholders.
    pub fn unplanned(
        id: String,
        service: Option<String>,
        action: Option<String>,
        description: Option<String>,
    ) -> Self {
        let description =
            description.unwrap_or_else(|| format!("Task {}", id));
        Self {
            id,
            service: service.unwrap_or_else(|| "unknown".to_string()),
            action: action.unwrap_or_else(|| "unknown".to_string()),
            description,
            depends_on: Vec::new(),
            status: TaskStatus::InProgress,
            result: None,
            error: None,
        }
    }

    /// Mark the task running. No-op once terminal.
    pub fn start(&mut self) {
        if !self.status.is_terminal() {
            self.status = TaskStatus::InProgress;
        }
    }

    /// Mark the task completed with its result. No-op once terminal, so a
    /// duplicate delivery leaves the task byte-for-byte unchanged.
    pub fn complete(&mut self, result: Option<String>) {
        if self.status.is_terminal() {
            return;
        }
        self.status = TaskStatus::Completed;
        self.result = result;
    }

    /// Mark the task failed with its error. No-op once terminal.
    pub fn fail(&mut self, error: Option<String>) {
        if self.status.is_terminal() {
            return;
        }
        self.status = TaskStatus::Failed;
        self.error = error;
    }
}
