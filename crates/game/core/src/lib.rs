//! Deterministic rules for a haunted-house exploration game.
//!
//! `game-core` defines the canonical rules (intents, engine, session state)
//! and exposes pure APIs reused by the runtime and offline tools. All state
//! mutation flows through [`engine::apply_intent`], and supporting crates
//! depend on the types re-exported here.
pub mod action;
pub mod combat;
pub mod config;
pub mod dice;
pub mod engine;
pub mod env;
pub mod error;
pub mod event;
pub mod haunt;
pub mod map;
pub mod state;
pub mod stats;

pub use action::{
    ActionTransition, CardError, ChoiceError, CombatError, DiscoveryError, HauntError, Intent,
    MoveError, RollError, TravelError, TurnError,
};
pub use config::{DiceMode, GameConfig};
pub use dice::{DiceError, DiceRoll};
pub use engine::{
    ExecuteError, FizzleReason, GameEngine, ReleaseReason, Seat, SessionEvent, SetupError,
    TransitionPhase, TransitionPhaseError, TravelKind, apply_intent, new_session,
};
pub use env::{
    CardDefinition, CardOracle, CharacterDefinition, CharacterOracle, Env, GameEnv, OracleError,
    PcgRng, RngOracle, RoomDefinition, RoomOracle,
};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use state::{
    CardId, CardKind, CharacterId, Direction, Floor, GameState, PlayerId, Prompt, RoomId,
    Rotation, Stat,
};
