//! The task-plan state machine.
//!
//! [`TaskPlan`] folds decoded [`StreamEvent`]s into a render-ready view of
//! the in-flight automation: the ordered task list, a narration line, and
//! a pointer to the task currently running. The fold is deliberately
//! forgiving - duplicate, late, or unknown-id events can never corrupt it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::AssistantReply;
use crate::plan::task::{Task, TaskStatus};
use crate::sse::StreamEvent;

/// Result of applying one event to the plan.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// The plan was (possibly) mutated; the session continues.
    Progress,
    /// A `complete` event arrived; the plan is cleared and done.
    Completed(AssistantReply),
    /// An `error` event arrived; the plan is cleared, narration attached.
    Failed(String),
}

/// Aggregate view of one stream session's automation plan.
///
/// Created empty when the session starts, populated by the first `plan`
/// event, mutated in place by `task_*` events, and cleared by a terminal
/// event. Counters are recomputed from the task list on every read so
/// they cannot drift from the tasks they describe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPlan {
    tasks: Vec<Task>,
    status: String,
    current_task_id: Option<String>,
}

impl TaskPlan {
    /// Create an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// The ordered task list. Order is insertion order: the `plan` event's
    /// announcement order, with self-healed tasks appended at the end.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The latest progress narration (last writer wins).
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn total(&self) -> usize {
        self.tasks.len()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Failed)
            .count()
    }

    /// Id of the task last reported as running, if any.
    pub fn current_task_id(&self) -> Option<&str> {
        self.current_task_id.as_deref()
    }

    /// Resolve the current task by id. The pointer is a key, not a
    /// reference: if the task is gone the lookup just misses.
    pub fn current_task(&self) -> Option<&Task> {
        let id = self.current_task_id.as_deref()?;
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Fold one event into the plan.
    ///
    /// Terminal events (`complete`, `error`) clear the plan and hand back
    /// the finalized outcome; everything else returns [`Applied::Progress`].
    pub fn apply(&mut self, event: StreamEvent) -> Applied {
        match event {
            StreamEvent::Planning { message } => {
                self.status = message.unwrap_or_else(|| "Planning tasks...".to_string());
                Applied::Progress
            }
            StreamEvent::Plan { tasks } => {
                if !self.tasks.is_empty() {
                    // The plan is announced once; a repeat is a stale signal.
                    debug!("ignoring duplicate plan event");
                    return Applied::Progress;
                }
                self.tasks = tasks.into_iter().map(Task::from_seed).collect();
                self.status = format!("Executing {} task(s)...", self.tasks.len());
                Applied::Progress
            }
            StreamEvent::TaskStarted {
                task_id,
                service,
                action,
                description,
            } => {
                match self.tasks.iter_mut().find(|t| t.id == task_id) {
                    Some(task) => task.start(),
                    None => {
                        // An unannounced task (dynamically discovered
                        // sub-step): grow the plan instead of erroring.
                        self.tasks
                            .push(Task::unplanned(task_id.clone(), service, action, description));
                    }
                }
                if let Some(task) = self.tasks.iter().find(|t| t.id == task_id) {
                    self.status = format!("Executing: {}", task.description);
                }
                self.current_task_id = Some(task_id);
                Applied::Progress
            }
            StreamEvent::TaskCompleted { task_id, result } => {
                match self.tasks.iter_mut().find(|t| t.id == task_id) {
                    Some(task) => task.complete(result),
                    // Completion without an observed start is a stale or
                    // duplicate signal; dropping it is safe.
                    None => debug!(task_id = %task_id, "ignoring completion for unknown task"),
                }
                Applied::Progress
            }
            StreamEvent::TaskFailed { task_id, error } => {
                match self.tasks.iter_mut().find(|t| t.id == task_id) {
                    Some(task) => task.fail(error),
                    None => debug!(task_id = %task_id, "ignoring failure for unknown task"),
                }
                Applied::Progress
            }
            StreamEvent::Complete {
                message,
                actions_taken,
            } => {
                self.clear();
                let text = message.unwrap_or_else(|| "All tasks completed.".to_string());
                Applied::Completed(AssistantReply::new(text, actions_taken))
            }
            StreamEvent::Error { message } => {
                self.clear();
                Applied::Failed(message.unwrap_or_else(|| "Task execution failed.".to_string()))
            }
        }
    }

    fn clear(&mut self) {
        self.tasks.clear();
        self.status.clear();
        self.current_task_id = None;
    }
}
