//! taskstream - streaming client for the orchestrator task-execution API.
//!
//! One user message opens one long-lived response stream. The crate
//! decodes the stream's newline-delimited events into a live [`TaskPlan`]
//! view and resolves exactly one terminal outcome per session:
//!
//! ```text
//! network bytes -> LineFramer -> decode_line -> TaskPlan -> observer
//!                     (StreamSession coordinates lifecycle + cancel)
//! ```
//!
//! Everything around the stream - auth screens, history persistence,
//! rendering, the integration catalog - belongs to the embedding
//! application, not this crate.
//!
//! [`TaskPlan`]: crate::plan::TaskPlan

pub mod models;
pub mod orchestrator;
pub mod plan;
pub mod session;
pub mod sse;
