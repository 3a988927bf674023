//! Payload deserialization structs for the streaming wire format.
//!
//! Every `data: ` line carries a JSON envelope with an event-kind
//! discriminator and a nested payload object. These structs are tolerant
//! by design: optional fields default, unknown fields are ignored, and
//! serde aliases accept the alternate spellings the backend has used
//! (`event_type`/`data` for the envelope, `id` for `task_id`).

use serde::Deserialize;

use crate::models::ActionOutcome;

/// The outer envelope of one protocol event.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawEvent {
    #[serde(alias = "event_type")]
    pub kind: String,
    #[serde(default, alias = "data")]
    pub payload: serde_json::Value,
}

/// `planning` payload: free-text progress narration.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PlanningPayload {
    #[serde(default)]
    pub message: Option<String>,
}

/// One task record inside a `plan` payload.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TaskRecord {
    #[serde(alias = "id")]
    pub task_id: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// `plan` payload: the announced task list.
///
/// The backend also echoes `total`/`completed`/`failed` counters here;
/// the client derives its own and does not read them.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PlanPayload {
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
}

/// `task_started` payload.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TaskStartedPayload {
    #[serde(alias = "id")]
    pub task_id: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// `task_completed` payload.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TaskCompletedPayload {
    #[serde(alias = "id")]
    pub task_id: String,
    #[serde(default)]
    pub result: Option<String>,
}

/// `task_failed` payload.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TaskFailedPayload {
    #[serde(alias = "id")]
    pub task_id: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// `complete` payload: final narration plus the executed actions.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CompletePayload {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub actions_taken: Vec<ActionOutcome>,
}

/// `error` payload. The backend's error schema names the text `detail`
/// in REST responses and `message` on the stream; both are accepted.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorPayload {
    #[serde(default, alias = "detail")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_event_kind_payload() {
        let json = r#"{"kind": "planning", "payload": {"message": "thinking"}}"#;
        let raw: RawEvent = serde_json::from_str(json).unwrap();
        assert_eq!(raw.kind, "planning");
        assert_eq!(raw.payload["message"], "thinking");
    }

    #[test]
    fn test_raw_event_backend_spelling() {
        // The backend's schema names the fields event_type/data.
        let json = r#"{"event_type": "task_started", "data": {"task_id": "t1"}}"#;
        let raw: RawEvent = serde_json::from_str(json).unwrap();
        assert_eq!(raw.kind, "task_started");
        assert_eq!(raw.payload["task_id"], "t1");
    }

    #[test]
    fn test_raw_event_missing_payload_defaults() {
        let json = r#"{"kind": "complete"}"#;
        let raw: RawEvent = serde_json::from_str(json).unwrap();
        assert_eq!(raw.kind, "complete");
        assert!(raw.payload.is_null());
    }

    #[test]
    fn test_task_record_full() {
        let json = r#"{
            "task_id": "task_1",
            "service": "jira",
            "action": "create_issue",
            "description": "Create a ticket for the login bug",
            "status": "pending",
            "depends_on": ["task_0"]
        }"#;
        let record: TaskRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.task_id, "task_1");
        assert_eq!(record.service, Some("jira".to_string()));
        assert_eq!(record.depends_on, vec!["task_0"]);
    }

    #[test]
    fn test_task_record_id_alias_and_defaults() {
        let json = r#"{"id": "t9"}"#;
        let record: TaskRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.task_id, "t9");
        assert!(record.service.is_none());
        assert!(record.depends_on.is_empty());
    }

    #[test]
    fn test_plan_payload_unknown_fields_ignored() {
        let json = r#"{"tasks": [{"task_id": "t1"}], "total": 1, "completed": 0, "failed": 0}"#;
        let payload: PlanPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.tasks.len(), 1);
    }

    #[test]
    fn test_complete_payload_with_actions() {
        let json = r#"{
            "message": "All done",
            "actions_taken": [
                {"service": "slack", "action": "send_message", "success": true, "result": "ok"}
            ]
        }"#;
        let payload: CompletePayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.message, Some("All done".to_string()));
        assert_eq!(payload.actions_taken.len(), 1);
        assert!(payload.actions_taken[0].success);
    }

    #[test]
    fn test_error_payload_detail_alias() {
        let payload: ErrorPayload = serde_json::from_str(r#"{"detail": "boom"}"#).unwrap();
        assert_eq!(payload.message, Some("boom".to_string()));

        let payload: ErrorPayload = serde_json::from_str(r#"{"message": "bang"}"#).unwrap();
        assert_eq!(payload.message, Some("bang".to_string()));

        let payload: ErrorPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.message.is_none());
    }
}
