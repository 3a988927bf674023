//! Stream event decoding.
//!
//! Filters framed lines for the protocol's `data: ` prefix and parses the
//! remainder into a typed [`StreamEvent`]. Decoding is deliberately
//! lossy-but-never-fatal: a malformed record or an unrecognized kind is
//! logged and dropped, and the stream continues.

use serde_json::Value;
use tracing::{debug, warn};

use crate::sse::events::{StreamEvent, TaskSeed};
use crate::sse::payloads::{
    CompletePayload, ErrorPayload, PlanPayload, PlanningPayload, RawEvent, TaskCompletedPayload,
    TaskFailedPayload, TaskStartedPayload,
};

/// Prefix marking a line as an event record. Exact and case-sensitive,
/// including the space; anything else (blank separator lines, comments,
/// partial garbage) is skipped without comment.
pub const DATA_PREFIX: &str = "data: ";

/// Decode one framed line into an event, or `None` if the line carries no
/// decodable event. Never fails: every problem short of a decoded `error`
/// event is local to its line.
pub fn decode_line(line: &str) -> Option<StreamEvent> {
    let rest = line.strip_prefix(DATA_PREFIX)?;

    let raw: RawEvent = match serde_json::from_str(rest) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "dropping malformed stream event");
            return None;
        }
    };

    // Kinds like `complete` may legally arrive with no payload at all.
    let payload = if raw.payload.is_null() {
        Value::Object(Default::default())
    } else {
        raw.payload
    };

    parse_event(&raw.kind, payload)
}

/// Dispatch a kind discriminator and payload object to the typed event.
fn parse_event(kind: &str, payload: Value) -> Option<StreamEvent> {
    match kind {
        "planning" => from_payload::<PlanningPayload>(kind, payload)
            .map(|p| StreamEvent::Planning { message: p.message }),
        "plan" => from_payload::<PlanPayload>(kind, payload).map(|p| StreamEvent::Plan {
            tasks: p.tasks.into_iter().map(seed_from_record).collect(),
        }),
        "task_started" => {
            from_payload::<TaskStartedPayload>(kind, payload).map(|p| StreamEvent::TaskStarted {
                task_id: p.task_id,
                service: p.service,
                action: p.action,
                description: p.description,
            })
        }
        "task_completed" => from_payload::<TaskCompletedPayload>(kind, payload).map(|p| {
            StreamEvent::TaskCompleted {
                task_id: p.task_id,
                result: p.result,
            }
        }),
        "task_failed" => {
            from_payload::<TaskFailedPayload>(kind, payload).map(|p| StreamEvent::TaskFailed {
                task_id: p.task_id,
                error: p.error,
            })
        }
        "complete" => from_payload::<CompletePayload>(kind, payload).map(|p| StreamEvent::Complete {
            message: p.message,
            actions_taken: p.actions_taken,
        }),
        "error" => from_payload::<ErrorPayload>(kind, payload)
            .map(|p| StreamEvent::Error { message: p.message }),
        other => {
            debug!(kind = other, "ignoring unrecognized stream event kind");
            None
        }
    }
}

fn from_payload<T: serde::de::DeserializeOwned>(kind: &str, payload: Value) -> Option<T> {
    match serde_json::from_value(payload) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(kind, error = %e, "dropping stream event with unusable payload");
            None
        }
    }
}

fn seed_from_record(record: crate::sse::payloads::TaskRecord) -> TaskSeed {
    TaskSeed {
        id: record.task_id,
        service: record.service.unwrap_or_default(),
        action: record.action.unwrap_or_default(),
        description: record.description.unwrap_or_default(),
        depends_on: record.depends_on,
    }
}
