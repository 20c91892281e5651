//! Runtime orchestration for one haunted-house session.
//!
//! This crate wires together the intent provider abstraction, oracle access,
//! and the session worker into a cohesive runtime API. Consumers embed
//! [`Runtime`] to seat players, subscribe to events, and submit intents
//! through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`workers`] keeps background tasks internal to the crate
//! - [`oracle`] adapts `game-content` tables to the engine's oracles
pub mod api;
pub mod events;
pub mod oracle;
pub mod runtime;

mod workers;

pub use api::{IntentProvider, Result, RuntimeError, RuntimeHandle, ScriptedProvider};
pub use events::{Event, EventBus, HauntEvent, SessionNotice, Topic, TurnEvent};
pub use oracle::OracleManager;
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
