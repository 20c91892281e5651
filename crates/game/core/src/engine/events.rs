//! Notices produced while applying an intent.
//!
//! Events are returned alongside the new snapshot so the session layer can
//! broadcast them. They describe what happened; the snapshot stays the
//! source of truth.

use crate::env::{Outcome, RoomTrigger};
use crate::state::{
    CardId, CardKind, CombatResult, Direction, Floor, GridPos, PlayerId, RoomId, Rotation,
    SpecialToken, Stat, Winner,
};

/// How a player got into a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TravelKind {
    Door,
    Stairs,
    Elevator,
    SecretPassage,
    Teleport,
    Fall,
    /// Dragged next to an opponent by a forced attack.
    Forced,
    /// Placed on a freely drawn tile.
    Placed,
}

/// Why a trapped player was let go.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReleaseReason {
    Escaped,
    AutoReleased,
    Rescued,
}

/// Data-integrity faults that cancel one effect without failing the intent.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FizzleReason {
    #[error("card '{0}' is not in the deck")]
    UnknownCard(CardId),

    #[error("room '{0}' is not in the catalog")]
    UnknownRoom(RoomId),

    #[error("room '{0}' has not been discovered")]
    RoomNotRevealed(RoomId),

    #[error("no outcome of '{card}' matches a roll of {total}")]
    NoMatchingOutcome { card: CardId, total: u8 },

    #[error("no {0} cards left to draw")]
    DeckExhausted(CardKind),

    #[error("no player qualifies as a target")]
    NoTarget,

    #[error("no revealed room to land in")]
    NoDestination,

    #[error("player {0} is not seated")]
    UnknownPlayer(PlayerId),

    #[error("character '{0}' is not in the roster")]
    UnknownCharacter(String),

    #[error("{0}")]
    Blocked(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SessionEvent {
    PlayerMoved {
        player: PlayerId,
        from: RoomId,
        to: RoomId,
        via: TravelKind,
    },
    RoomDiscovered {
        player: PlayerId,
        room: RoomId,
        floor: Floor,
        position: GridPos,
        rotation: Rotation,
    },
    ConnectionHealed {
        from: RoomId,
        direction: Direction,
        stale: RoomId,
    },
    ElevatorMoved {
        room: RoomId,
        floor: Floor,
        position: GridPos,
    },
    SpecialTokenPlaced {
        room: RoomId,
        token: SpecialToken,
    },
    PromptOpened {
        player: PlayerId,
        prompt: String,
    },
    DiceRolled {
        player: PlayerId,
        prompt: String,
        faces: Vec<u8>,
        total: u8,
    },
    RoomEffectResolved {
        player: PlayerId,
        room: RoomId,
        trigger: RoomTrigger,
        passed: bool,
    },
    CardDrawn {
        player: PlayerId,
        card: CardId,
        kind: CardKind,
    },
    OutcomeApplied {
        player: PlayerId,
        card: CardId,
        outcome: Outcome,
    },
    StatChanged {
        player: PlayerId,
        stat: Stat,
        before: u8,
        after: u8,
    },
    CombatStarted {
        room: RoomId,
        attacker: PlayerId,
        defender: PlayerId,
        forced: bool,
    },
    CombatDeclined {
        attacker: PlayerId,
        defender: PlayerId,
    },
    CombatResolved {
        room: RoomId,
        result: CombatResult,
    },
    PlayerTrapped {
        player: PlayerId,
        card: CardId,
    },
    PlayerReleased {
        player: PlayerId,
        reason: ReleaseReason,
    },
    PersistentEffectAdded {
        player: PlayerId,
        card: CardId,
    },
    PersistentEffectsCleared {
        player: PlayerId,
        room: RoomId,
        count: usize,
    },
    EventQueued {
        card: CardId,
        source: PlayerId,
        target: PlayerId,
    },
    EffectFizzled {
        player: Option<PlayerId>,
        reason: FizzleReason,
    },
    TurnAdvanced {
        player: PlayerId,
        moves: u8,
        round: u32,
    },
    HauntBegan {
        scenario: u32,
        traitor: PlayerId,
    },
    PlayerDied {
        player: PlayerId,
    },
    GameOver {
        winner: Winner,
        dead_players: Vec<PlayerId>,
    },
}

impl SessionEvent {
    pub fn fizzled(player: impl Into<Option<PlayerId>>, reason: FizzleReason) -> Self {
        SessionEvent::EffectFizzled {
            player: player.into(),
            reason,
        }
    }

    /// Whether the event belongs on the turn topic.
    pub fn is_turn_event(&self) -> bool {
        matches!(self, SessionEvent::TurnAdvanced { .. })
    }

    /// Whether the event belongs on the haunt topic.
    pub fn is_haunt_event(&self) -> bool {
        matches!(
            self,
            SessionEvent::HauntBegan { .. }
                | SessionEvent::PlayerDied { .. }
                | SessionEvent::GameOver { .. }
        )
    }
}
