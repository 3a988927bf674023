//! Decoded protocol event types.
//!
//! One `StreamEvent` per `data: ` line from the orchestrator's streaming
//! endpoint. The kind set is closed; the decoder drops anything it does
//! not recognize rather than surfacing it here.

use crate::models::ActionOutcome;

/// A task announced by a `plan` event, before execution begins.
///
/// Display metadata only; the client never schedules or reorders tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSeed {
    pub id: String,
    pub service: String,
    pub action: String,
    pub description: String,
    /// Ids of tasks this one depends on, as announced by the backend.
    pub depends_on: Vec<String>,
}

/// Typed events from the orchestrator's task-execution stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// The backend is still deciding what to do.
    Planning { message: Option<String> },
    /// The full execution plan, sent once before any task runs.
    Plan { tasks: Vec<TaskSeed> },
    /// A task began executing.
    TaskStarted {
        task_id: String,
        service: Option<String>,
        action: Option<String>,
        description: Option<String>,
    },
    /// A task finished successfully.
    TaskCompleted {
        task_id: String,
        result: Option<String>,
    },
    /// A task failed.
    TaskFailed {
        task_id: String,
        error: Option<String>,
    },
    /// The whole exchange finished; carries the final assistant message.
    Complete {
        message: Option<String>,
        actions_taken: Vec<ActionOutcome>,
    },
    /// The backend reported a fatal, application-level failure.
    Error { message: Option<String> },
}

impl StreamEvent {
    /// The wire name of this event's kind, for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            StreamEvent::Planning { .. } => "planning",
            StreamEvent::Plan { .. } => "plan",
            StreamEvent::TaskStarted { .. } => "task_started",
            StreamEvent::TaskCompleted { .. } => "task_completed",
            StreamEvent::TaskFailed { .. } => "task_failed",
            StreamEvent::Complete { .. } => "complete",
            StreamEvent::Error { .. } => "error",
        }
    }

    /// Whether this event ends the session (`complete` or `error`).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StreamEvent::Complete { .. } | StreamEvent::Error { .. }
        )
    }
}
