//! The stream session controller.
//!
//! Orchestrates one end-to-end exchange: issue the request, pump the
//! response bytes through the framer / decoder / plan pipeline, surface a
//! plan snapshot to the observer after every event, and resolve exactly
//! one terminal outcome. The controller is single-use; a new message means
//! a new session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::StreamExt;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use crate::models::{AssistantReply, StreamRequest};
use crate::orchestrator::{ByteStream, OrchestratorClient};
use crate::plan::{Applied, TaskPlan};
use crate::session::state::SessionState;
use crate::sse::{decode_line, LineFramer};

/// The single terminal result of a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// The exchange finished; here is the final assistant message.
    Reply(AssistantReply),
    /// The exchange failed - backend `error` event or transport failure.
    Error(String),
}

/// Caller-supplied observer and terminal callbacks for one session.
///
/// The observer runs synchronously with event processing, once per
/// processed event, with the current plan snapshot. The terminal callback
/// fires at most once; a cancelled session fires neither.
pub struct SessionCallbacks {
    on_update: Box<dyn FnMut(&TaskPlan) + Send>,
    on_terminal: Option<Box<dyn FnOnce(SessionOutcome) + Send>>,
}

impl SessionCallbacks {
    pub fn new(
        on_update: impl FnMut(&TaskPlan) + Send + 'static,
        on_terminal: impl FnOnce(SessionOutcome) + Send + 'static,
    ) -> Self {
        Self {
            on_update: Box::new(on_update),
            on_terminal: Some(Box::new(on_terminal)),
        }
    }

    fn update(&mut self, plan: &TaskPlan) {
        (self.on_update)(plan);
    }

    /// Deliver the terminal outcome. Taking the closure out makes a second
    /// delivery structurally impossible.
    fn finish(&mut self, outcome: SessionOutcome) {
        if let Some(terminal) = self.on_terminal.take() {
            terminal(outcome);
        }
    }
}

/// Handle returned by [`StreamSession::start`].
///
/// Cancelling is idempotent, aborts the in-flight read promptly, and
/// silences every further callback: cancellation is a distinct terminal
/// state, never reported as an error.
#[derive(Clone)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
    state: Arc<Mutex<SessionState>>,
}

impl CancelHandle {
    /// Stop the session. Safe to call any number of times.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            info!("stream session cancel requested");
            self.notify.notify_one();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Current lifecycle state of the session.
    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap()
    }
}

/// One streaming exchange against the orchestrator.
pub struct StreamSession;

impl StreamSession {
    /// Start a session: issue the request and spawn the pipeline task.
    ///
    /// Returns immediately with the cancel handle. The caller is
    /// responsible for not starting a second session for the same
    /// conversation while this one is live.
    pub fn start(
        client: Arc<OrchestratorClient>,
        request: StreamRequest,
        callbacks: SessionCallbacks,
    ) -> CancelHandle {
        let handle = CancelHandle {
            cancelled: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
            state: Arc::new(Mutex::new(SessionState::Idle)),
        };

        let task_handle = handle.clone();
        tokio::spawn(async move {
            run(client, request, callbacks, task_handle).await;
        });

        handle
    }
}

/// Advance the shared state cell, refusing illegal transitions so a
/// terminal state can never be overwritten.
fn set_state(cell: &Mutex<SessionState>, next: SessionState) {
    let mut state = cell.lock().unwrap();
    if state.can_transition_to(next) {
        debug!(from = %*state, to = %next, "session state change");
        *state = next;
    }
}

async fn run(
    client: Arc<OrchestratorClient>,
    request: StreamRequest,
    mut callbacks: SessionCallbacks,
    handle: CancelHandle,
) {
    set_state(&handle.state, SessionState::Connecting);

    let opened = tokio::select! {
        _ = handle.notify.notified() => None,
        result = client.open_stream(&request) => Some(result),
    };

    let stream = match opened {
        None => {
            set_state(&handle.state, SessionState::Cancelled);
            info!("session cancelled while connecting");
            return;
        }
        Some(Err(e)) => {
            if handle.is_cancelled() {
                set_state(&handle.state, SessionState::Cancelled);
                return;
            }
            warn!(error = %e, "failed to open stream");
            set_state(&handle.state, SessionState::Failed);
            callbacks.finish(SessionOutcome::Error(e.to_string()));
            return;
        }
        Some(Ok(stream)) => {
            if handle.is_cancelled() {
                set_state(&handle.state, SessionState::Cancelled);
                return;
            }
            stream
        }
    };

    set_state(&handle.state, SessionState::Streaming);
    consume(stream, &mut callbacks, &handle).await;
}

/// Whether the pipeline keeps reading after a processed line.
#[derive(PartialEq)]
enum Flow {
    Continue,
    Stop,
}

/// Drive the framer -> decoder -> reducer pipeline until a terminal
/// outcome. Each received chunk is processed to completion before the
/// next read, so events are handled strictly in arrival order.
async fn consume(mut stream: ByteStream, callbacks: &mut SessionCallbacks, handle: &CancelHandle) {
    let mut framer = LineFramer::new();
    let mut plan = TaskPlan::new();

    loop {
        let next = tokio::select! {
            _ = handle.notify.notified() => {
                set_state(&handle.state, SessionState::Cancelled);
                info!("session cancelled while streaming");
                return;
            }
            chunk = stream.next() => chunk,
        };

        match next {
            Some(Ok(chunk)) => {
                for line in framer.push(&chunk) {
                    if process_line(&line, &mut plan, callbacks, handle) == Flow::Stop {
                        return;
                    }
                }
            }
            Some(Err(e)) => {
                if handle.is_cancelled() {
                    set_state(&handle.state, SessionState::Cancelled);
                    return;
                }
                warn!(error = %e, "stream read failed");
                set_state(&handle.state, SessionState::Failed);
                callbacks.finish(SessionOutcome::Error(e.to_string()));
                return;
            }
            None => {
                // Stream ended. The final event may have arrived without
                // its newline; offer the leftover fragment to the decoder
                // before falling back to a synthesized completion.
                if let Some(fragment) = framer.finish() {
                    if process_line(&fragment, &mut plan, callbacks, handle) == Flow::Stop {
                        return;
                    }
                }
                if handle.is_cancelled() {
                    set_state(&handle.state, SessionState::Cancelled);
                    return;
                }
                debug!("stream ended without a terminal event");
                set_state(&handle.state, SessionState::Completed);
                callbacks.finish(SessionOutcome::Reply(AssistantReply::new(
                    "All tasks completed.",
                    Vec::new(),
                )));
                return;
            }
        }
    }
}

fn process_line(
    line: &str,
    plan: &mut TaskPlan,
    callbacks: &mut SessionCallbacks,
    handle: &CancelHandle,
) -> Flow {
    let Some(event) = decode_line(line) else {
        return Flow::Continue;
    };

    // Between the cancel call and the next read the pipeline may still be
    // mid-chunk; re-checking here keeps callbacks silent from then on.
    if handle.is_cancelled() {
        set_state(&handle.state, SessionState::Cancelled);
        return Flow::Stop;
    }

    match plan.apply(event) {
        Applied::Progress => {
            callbacks.update(plan);
            Flow::Continue
        }
        Applied::Completed(reply) => {
            set_state(&handle.state, SessionState::Completed);
            info!("stream session completed");
            callbacks.finish(SessionOutcome::Reply(reply));
            Flow::Stop
        }
        Applied::Failed(message) => {
            set_state(&handle.state, SessionState::Failed);
            warn!(message = %message, "stream session failed");
            callbacks.finish(SessionOutcome::Error(message));
            Flow::Stop
        }
    }
}
