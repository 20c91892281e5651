//! Event types for different topics.

use game_core::engine::TransitionPhase;
use game_core::{GameState, Intent, PlayerId, SessionEvent};
use serde::{Deserialize, Serialize};

/// Outcome of one submitted intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionNotice {
    /// The intent was applied; the session moved to `nonce`.
    IntentApplied {
        player: PlayerId,
        intent: Intent,
        events: Vec<SessionEvent>,
        nonce: u64,
        /// Hex SHA-256 of the new snapshot.
        state_root: String,
        awaiting: Option<PlayerId>,
    },

    /// The intent was rejected and the session did not change.
    IntentRejected {
        player: PlayerId,
        intent: Intent,
        code: String,
        phase: Option<TransitionPhase>,
        error: String,
        nonce: u64,
    },
}

impl SessionNotice {
    pub(crate) fn applied(
        player: PlayerId,
        intent: Intent,
        events: Vec<SessionEvent>,
        state: &GameState,
    ) -> Self {
        SessionNotice::IntentApplied {
            player,
            intent,
            events,
            nonce: state.nonce,
            state_root: hex::encode(state.state_root()),
            awaiting: state.awaited_player(),
        }
    }
}

/// Turn hand-off (lightweight)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnEvent {
    pub event: SessionEvent,
    pub nonce: u64,
}

/// Haunt began, a player died, or the game ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HauntEvent {
    pub event: SessionEvent,
    pub nonce: u64,
}
