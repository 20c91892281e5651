//! Error types for the intent execution pipeline.

use crate::action::{
    ActionTransition, CardError, ChoiceError, CombatError, DiscoveryError, HauntError, MoveError,
    RollError, SelectCardAction, SubmitRollAction, TravelError, TurnError,
};
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::state::PlayerId;

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

impl<E: GameError> GameError for TransitionPhaseError<E> {
    fn severity(&self) -> ErrorSeverity {
        self.error.severity()
    }

    fn context(&self) -> Option<&ErrorContext> {
        self.error.context()
    }

    fn error_code(&self) -> &'static str {
        self.error.error_code()
    }
}

/// Errors surfaced while applying an intent.
///
/// The first group is checked by the engine before any transition runs; the
/// rest wrap the failing transition together with the phase it failed in.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    #[error("the game is over")]
    GameOver { context: ErrorContext },

    #[error("player {player} is not seated")]
    UnknownPlayer {
        player: PlayerId,
        context: ErrorContext,
    },

    #[error("player {player} is dead")]
    PlayerDead {
        player: PlayerId,
        context: ErrorContext,
    },

    #[error("waiting for player {awaited}, not {actor}")]
    NotYourTurn {
        actor: PlayerId,
        awaited: PlayerId,
        context: ErrorContext,
    },

    #[error("a {expected} prompt must be answered first")]
    PromptPending {
        expected: &'static str,
        context: ErrorContext,
    },

    #[error("combat must be finished first")]
    CombatPending { context: ErrorContext },

    #[error("follow-up work did not settle after {steps} steps")]
    Unsettled { steps: usize, context: ErrorContext },

    #[error("move failed: {0}")]
    Move(TransitionPhaseError<MoveError>),

    #[error("room discovery failed: {0}")]
    Discovery(TransitionPhaseError<DiscoveryError>),

    #[error("roll failed: {0}")]
    Roll(TransitionPhaseError<<SubmitRollAction as ActionTransition>::Error>),

    #[error("card selection failed: {0}")]
    Card(TransitionPhaseError<<SelectCardAction as ActionTransition>::Error>),

    #[error("combat failed: {0}")]
    Combat(TransitionPhaseError<CombatError>),

    #[error("choice failed: {0}")]
    Choice(TransitionPhaseError<ChoiceError>),

    #[error("travel failed: {0}")]
    Travel(TransitionPhaseError<TravelError>),

    #[error("end turn failed: {0}")]
    Turn(TransitionPhaseError<TurnError>),

    #[error("haunt trigger failed: {0}")]
    Haunt(TransitionPhaseError<HauntError>),
}

impl ExecuteError {
    pub fn not_your_turn(actor: PlayerId, awaited: PlayerId, nonce: u64) -> Self {
        Self::NotYourTurn {
            actor,
            awaited,
            context: ErrorContext::new(nonce).with_actor(actor),
        }
    }

    /// Phase the wrapped transition failed in, if any.
    pub fn phase(&self) -> Option<TransitionPhase> {
        match self {
            Self::Move(e) => Some(e.phase),
            Self::Discovery(e) => Some(e.phase),
            Self::Roll(e) => Some(e.phase),
            Self::Card(e) => Some(e.phase),
            Self::Combat(e) => Some(e.phase),
            Self::Choice(e) => Some(e.phase),
            Self::Travel(e) => Some(e.phase),
            Self::Turn(e) => Some(e.phase),
            Self::Haunt(e) => Some(e.phase),
            _ => None,
        }
    }
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::GameOver { .. }
            | Self::NotYourTurn { .. }
            | Self::PromptPending { .. }
            | Self::CombatPending { .. } => ErrorSeverity::Recoverable,
            Self::UnknownPlayer { .. } | Self::PlayerDead { .. } => ErrorSeverity::Validation,
            Self::Unsettled { .. } => ErrorSeverity::Internal,
            Self::Move(e) => e.severity(),
            Self::Discovery(e) => e.severity(),
            Self::Roll(e) => e.severity(),
            Self::Card(e) => e.severity(),
            Self::Combat(e) => e.severity(),
            Self::Choice(e) => e.severity(),
            Self::Travel(e) => e.severity(),
            Self::Turn(e) => e.severity(),
            Self::Haunt(e) => e.severity(),
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::GameOver { context }
            | Self::UnknownPlayer { context, .. }
            | Self::PlayerDead { context, .. }
            | Self::NotYourTurn { context, .. }
            | Self::PromptPending { context, .. }
            | Self::CombatPending { context }
            | Self::Unsettled { context, .. } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::GameOver { .. } => "GAME_OVER",
            Self::UnknownPlayer { .. } => "UNKNOWN_PLAYER",
            Self::PlayerDead { .. } => "PLAYER_DEAD",
            Self::NotYourTurn { .. } => "NOT_YOUR_TURN",
            Self::PromptPending { .. } => "PROMPT_PENDING",
            Self::CombatPending { .. } => "COMBAT_PENDING",
            Self::Unsettled { .. } => "ENGINE_UNSETTLED",
            Self::Move(e) => e.error_code(),
            Self::Discovery(e) => e.error_code(),
            Self::Roll(e) => e.error_code(),
            Self::Card(e) => e.error_code(),
            Self::Combat(e) => e.error_code(),
            Self::Choice(e) => e.error_code(),
            Self::Travel(e) => e.error_code(),
            Self::Turn(e) => e.error_code(),
            Self::Haunt(e) => e.error_code(),
        }
    }
}
