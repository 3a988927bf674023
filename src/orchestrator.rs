//! Orchestrator API client.
//!
//! Thin HTTP layer over the orchestrator backend: it opens the streaming
//! chat endpoint and hands the raw byte stream to the session controller,
//! which owns all decoding. Credentials are an explicit parameter - the
//! client never reads tokens from ambient storage.

use std::pin::Pin;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use reqwest::Client;

use crate::models::StreamRequest;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// The response body as an unparsed chunk stream.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, OrchestratorError>> + Send>>;

/// Error type for orchestrator client operations
#[derive(Debug)]
pub enum OrchestratorError {
    /// HTTP request failed (connect error, aborted read, ...)
    Http(reqwest::Error),
    /// Server answered with a non-success status before streaming began
    ServerError { status: u16, message: String },
}

impl std::fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchestratorError::Http(e) => write!(f, "HTTP error: {}", e),
            OrchestratorError::ServerError { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
        }
    }
}

impl std::error::Error for OrchestratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OrchestratorError::Http(e) => Some(e),
            OrchestratorError::ServerError { .. } => None,
        }
    }
}

impl From<reqwest::Error> for OrchestratorError {
    fn from(e: reqwest::Error) -> Self {
        OrchestratorError::Http(e)
    }
}

/// Client for the orchestrator backend API.
///
/// Reused across sessions; each [`open_stream`] call issues one request
/// whose response body is a newline-delimited event stream.
///
/// [`open_stream`]: OrchestratorClient::open_stream
pub struct OrchestratorClient {
    base_url: String,
    client: Client,
    auth_token: Option<String>,
}

impl OrchestratorClient {
    /// Create a client against the default base URL.
    pub fn new() -> Self {
        Self::with_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL.
    pub fn with_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
            auth_token: None,
        }
    }

    /// Attach a bearer token sent with every request (builder pattern).
    pub fn with_auth(mut self, token: &str) -> Self {
        self.auth_token = Some(token.to_string());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Open the streaming chat endpoint for one exchange.
    ///
    /// Sends a POST to `/chat/stream` and returns the raw byte stream of
    /// the response body. A non-success status is mapped to
    /// [`OrchestratorError::ServerError`] without opening the stream.
    pub async fn open_stream(
        &self,
        request: &StreamRequest,
    ) -> Result<ByteStream, OrchestratorError> {
        let url = format!("{}/chat/stream", self.base_url);

        let mut builder = self
            .client
            .post(&url)
            .header("Accept", "text/event-stream")
            .json(request);
        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(OrchestratorError::ServerError { status, message });
        }

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(OrchestratorError::from));
        Ok(Box::pin(stream))
    }

    /// Check if the orchestrator API is healthy and reachable.
    pub async fn health_check(&self) -> Result<bool, OrchestratorError> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        Ok(response.status().is_success())
    }
}

impl Default for OrchestratorClient {
    fn default() -> Self {
        Self::new()
    }
}
