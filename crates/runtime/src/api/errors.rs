//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, session setup, and intent
//! providers so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use game_core::{ExecuteError, GameError, PlayerId, SetupError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("session worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires content to be configured before building")]
    MissingContent,

    #[error("session not started: no seats and no initial state were provided")]
    SessionNotStarted,

    #[error("failed to seat players")]
    Setup(#[from] SetupError),

    #[error("intent rejected ({code}): {error}")]
    Rejected {
        code: &'static str,
        #[source]
        error: ExecuteError,
    },

    #[error("the session is not waiting on anyone")]
    NothingAwaited,

    #[error("no intent provider registered for player {player}")]
    ProviderNotSet { player: PlayerId },

    #[error("scripted intents for player {player} are exhausted")]
    ScriptExhausted { player: PlayerId },

    #[error("invalid value '{value}' for {key}")]
    InvalidConfig { key: &'static str, value: String },
}

impl RuntimeError {
    pub(crate) fn rejected(error: ExecuteError) -> Self {
        Self::Rejected {
            code: error.error_code(),
            error,
        }
    }

    /// Error code of a rejected intent.
    pub fn rejection_code(&self) -> Option<&'static str> {
        match self {
            Self::Rejected { code, .. } => Some(code),
            _ => None,
        }
    }
}
