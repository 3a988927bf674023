//! Stream session lifecycle: the controller that drives one exchange and
//! the cancellation handle it hands back.

mod controller;
mod state;

pub use controller::{CancelHandle, SessionCallbacks, SessionOutcome, StreamSession};
pub use state::SessionState;
