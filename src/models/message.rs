//! Finalized message types produced at the end of a stream session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one executed action, as reported by the backend in the
/// terminal `complete` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Service the action ran against (e.g. "jira", "slack")
    pub service: String,
    /// Action name (e.g. "create_issue", "send_message")
    pub action: String,
    /// Whether the action succeeded
    pub success: bool,
    /// Result summary, present on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Error text, present on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The finalized assistant message for one completed exchange.
///
/// Handed to the terminal callback exactly once; persisting it is the
/// conversation-history layer's job, not this crate's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantReply {
    /// Narration text shown to the user
    pub text: String,
    /// Actions the backend executed for this exchange
    pub actions_taken: Vec<ActionOutcome>,
    /// When the reply was finalized on the client
    pub created_at: DateTime<Utc>,
}

impl AssistantReply {
    /// Create a reply stamped with the current time.
    pub fn new(text: impl Into<String>, actions_taken: Vec<ActionOutcome>) -> Self {
        Self {
            text: text.into(),
            actions_taken,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_outcome_serialization() {
        let outcome = ActionOutcome {
            service: "jira".to_string(),
            action: "create_issue".to_string(),
            success: true,
            result: Some("PROJ-42 created".to_string()),
            error: None,
        };

        let json = serde_json::to_string(&outcome).expect("Failed to serialize");
        assert!(json.contains("PROJ-42"));
        // Absent error must be omitted entirely
        assert!(!json.contains("\"error\""));

        let deserialized: ActionOutcome = serde_json::from_str(&json).expect("Failed to deserialize");
        assert_eq!(outcome, deserialized);
    }

    #[test]
    fn test_action_outcome_failure_shape() {
        let json = r#"{"service": "slack", "action": "send_message", "success": false, "error": "channel not found"}"#;
        let outcome: ActionOutcome = serde_json::from_str(json).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.error, Some("channel not found".to_string()));
        assert!(outcome.result.is_none());
    }

    #[test]
    fn test_assistant_reply_new() {
        let reply = AssistantReply::new("All done", vec![]);
        assert_eq!(reply.text, "All done");
        assert!(reply.actions_taken.is_empty());
    }
}
