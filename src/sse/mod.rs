//! Stream wire-format handling.
//!
//! The orchestrator's streaming endpoint emits newline-delimited records;
//! each meaningful line is `data: ` followed by a JSON envelope with an
//! event kind and payload, and blank lines separate events.
//!
//! # Module structure
//! - `framer` - chunk-to-line reassembly ([`LineFramer`])
//! - `events` - typed event definitions ([`StreamEvent`], [`TaskSeed`])
//! - `payloads` - internal payload deserialization structs
//! - `decoder` - line filtering and parsing ([`decode_line`])

mod decoder;
mod events;
mod framer;
mod payloads;

pub use decoder::{decode_line, DATA_PREFIX};
pub use events::{StreamEvent, TaskSeed};
pub use framer::LineFramer;
