//! Worker tasks that back the runtime orchestration.
//!
//! The session worker owns the authoritative state and applies intents one
//! at a time.

mod session;

pub use session::{Command, SessionWorker};
