//! Outbound request types for the streaming endpoint.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error building a [`StreamRequest`].
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("message must not be empty")]
    EmptyMessage,
    #[error("user id must not be empty")]
    EmptyUserId,
}

/// Request body for one streaming exchange.
///
/// Carries the user identifier, the message text, and, when continuing an
/// existing conversation, that conversation's id. A fresh `session_id` is
/// generated per request; the backend scopes the response stream to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamRequest {
    /// The user sending the message
    pub user_id: String,
    /// The message text
    pub message: String,
    /// Client-generated id for this exchange
    pub session_id: String,
    /// Existing conversation to continue - None starts a new one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl StreamRequest {
    /// Create a request that starts a new conversation.
    pub fn new(user_id: impl Into<String>, message: impl Into<String>) -> Result<Self, RequestError> {
        let user_id = user_id.into();
        let message = message.into();
        if user_id.trim().is_empty() {
            return Err(RequestError::EmptyUserId);
        }
        if message.trim().is_empty() {
            return Err(RequestError::EmptyMessage);
        }
        Ok(Self {
            user_id,
            message,
            session_id: Uuid::new_v4().to_string(),
            conversation_id: None,
        })
    }

    /// Continue an existing conversation (builder pattern).
    pub fn with_conversation(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }
}
