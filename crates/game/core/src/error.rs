//! Severity, context and the [`GameError`] trait shared by every rule error.
//!
//! Each intent family keeps its own enum next to its transition (`MoveError`
//! in `action::movement`, `CombatError` in `action::combat`, ...).

use crate::state::{PlayerId, RoomId};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// Rule violations are `Recoverable` or `Validation`. Nothing in the rules
/// engine is fatal to a session; `Fatal` is reserved for a miswired
/// environment (a missing oracle).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative intent.
    ///
    /// Examples: not your turn, no moves left, door blocked
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown player, card of the wrong kind, bad dice faces
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: player seated on a room that is not revealed
    /// These indicate bugs and should be investigated.
    Internal,

    /// Fatal error - game state corrupted, cannot continue.
    ///
    /// Examples: missing required oracle
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Internal and fatal errors point at a bug or a miswired session.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for debugging and diagnostics.
///
/// Context is captured at the point of error creation and includes relevant
/// game state information that helps diagnose the failure.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Player that submitted the intent (if applicable).
    pub actor: Option<PlayerId>,

    /// Room the actor stood in (if applicable).
    pub room: Option<RoomId>,

    /// Game nonce at the time of error.
    ///
    /// The nonce counts applied intents and correlates a rejection with the
    /// snapshot it was evaluated against.
    pub nonce: u64,

    /// Optional static message providing additional context.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    /// Creates a new error context with the given nonce.
    #[must_use]
    pub const fn new(nonce: u64) -> Self {
        Self {
            actor: None,
            room: None,
            nonce,
            message: None,
        }
    }

    /// Attaches an actor to this context (builder pattern).
    #[must_use]
    pub fn with_actor(mut self, actor: PlayerId) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Attaches a room to this context (builder pattern).
    #[must_use]
    pub fn with_room(mut self, room: RoomId) -> Self {
        self.room = Some(room);
        self
    }

    /// Attaches a static message to this context (builder pattern).
    #[must_use]
    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Classification shared by rule errors. The runtime reports `error_code`
/// to clients and logs `severity`.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Gatekeeping rejections carry context; wrapped family errors do not.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Stable SCREAMING_SNAKE identifier, e.g. `NOT_YOUR_TURN`.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
