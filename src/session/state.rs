//! Session lifecycle states.

/// Lifecycle of one stream session.
///
/// `Idle -> Connecting -> Streaming -> {Completed | Failed | Cancelled}`.
/// Terminal states are sinks; a session is single-use and never restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, request not yet issued
    Idle,
    /// Request sent, waiting for the response head
    Connecting,
    /// Response open, events flowing
    Streaming,
    /// Terminal: a `complete` event arrived (or EOF fallback)
    Completed,
    /// Terminal: transport failure or backend `error` event
    Failed,
    /// Terminal: the caller invoked the cancel handle
    Cancelled,
}

impl SessionState {
    /// Whether this state is a sink.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Completed | SessionState::Failed | SessionState::Cancelled
        )
    }

    /// Whether the machine permits moving from `self` to `next`.
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        use SessionState::*;
        match (self, next) {
            (Idle, Connecting) => true,
            (Connecting, Streaming) => true,
            (Connecting, Failed) | (Connecting, Cancelled) => true,
            (Streaming, Completed) | (Streaming, Failed) | (Streaming, Cancelled) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Connecting => "connecting",
            SessionState::Streaming => "streaming",
            SessionState::Completed => "completed",
            SessionState::Failed => "failed",
            SessionState::Cancelled => "cancelled",
        };
        write!(f, "{}", name)
    }
}
