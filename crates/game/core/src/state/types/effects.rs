use super::common::{CardId, PlayerId, Stat};
use crate::env::{AllyFailure, MovementRestriction, TrappedSpec, TurnStartPenalty};

/// A player held in place until an escape roll succeeds.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrappedRecord {
    pub card: CardId,
    pub escape_stat: Stat,
    pub threshold: u8,
    /// Released automatically on this many failed escapes.
    pub auto_escape_after: u8,
    pub ally_can_help: bool,
    pub ally_failure: AllyFailure,
    pub turns_trapped: u8,
}

impl TrappedRecord {
    pub fn from_spec(card: CardId, spec: &TrappedSpec, default_auto_escape: u8) -> Self {
        Self {
            card,
            escape_stat: spec.escape_stat,
            threshold: spec.threshold,
            auto_escape_after: spec.auto_escape_after.unwrap_or(default_auto_escape),
            ally_can_help: spec.ally_can_help,
            ally_failure: spec.ally_failure,
            turns_trapped: 0,
        }
    }
}

/// Recurring per-turn penalty.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PersistentRecord {
    pub card: CardId,
    pub on_turn_start: Option<TurnStartPenalty>,
    pub movement_restriction: Option<MovementRestriction>,
}

impl PersistentRecord {
    /// Plain records are released by ending a turn in a release room.
    pub fn is_plain(&self) -> bool {
        self.movement_restriction.is_none()
    }
}

/// Event deferred to another player's next turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueuedEvent {
    pub card: CardId,
    pub source: PlayerId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatChoiceReason {
    PersistentPenalty,
    AllPlayersLoseStat,
}

/// Stat loss a player must pick on their own turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingStatChoice {
    pub options: Vec<Stat>,
    pub amount: u8,
    pub reason: StatChoiceReason,
}

/// Everything deferred for one player.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingEffects {
    pub trapped: Option<TrappedRecord>,
    pub persistent: Vec<PersistentRecord>,
    pub queued_events: Vec<QueuedEvent>,
    pub stat_choices: Vec<PendingStatChoice>,
    /// Next discovery ignores the connection-shaped tile filter.
    pub free_discovery: bool,
}

impl PendingEffects {
    pub fn is_trapped(&self) -> bool {
        self.trapped.is_some()
    }

    /// Tightest moves-per-turn cap among active restrictions.
    pub fn movement_cap(&self) -> Option<u8> {
        self.persistent
            .iter()
            .filter_map(|record| record.movement_restriction.as_ref())
            .map(|restriction| restriction.moves_per_turn)
            .min()
    }

    pub fn is_empty(&self) -> bool {
        self.trapped.is_none()
            && self.persistent.is_empty()
            && self.queued_events.is_empty()
            && self.stat_choices.is_empty()
            && !self.free_discovery
    }
}
