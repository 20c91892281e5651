//! Explicit named states for every decision the engine waits on.

use super::common::{CardId, CardKind, Direction, PlayerId, RoomId, Stat, StatGroup};
use super::effects::StatChoiceReason;
use crate::env::{OutcomeEntry, Outcome, RoomTrigger, TrappedSpec};

/// Dice available to a roll prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RollPool {
    /// Pool size fixed when the prompt opened. `stat` names the trait rolled,
    /// if any.
    Single { stat: Option<Stat>, dice: u8 },
    /// The roller names one of these stats with the roll.
    Choose(Vec<(Stat, u8)>),
}

impl RollPool {
    pub fn fixed(dice: u8) -> Self {
        RollPool::Single { stat: None, dice }
    }

    pub fn stat(stat: Stat, dice: u8) -> Self {
        RollPool::Single {
            stat: Some(stat),
            dice,
        }
    }

    /// Resolves the pool against the stat named in the intent.
    pub fn select(&self, chosen: Option<Stat>) -> Option<(Option<Stat>, u8)> {
        match self {
            RollPool::Single { stat, dice } => Some((*stat, *dice)),
            RollPool::Choose(options) => {
                let chosen = chosen?;
                options
                    .iter()
                    .find(|(stat, _)| *stat == chosen)
                    .map(|(stat, dice)| (Some(*stat), *dice))
            }
        }
    }
}

/// How an interrupted move continues once its room-effect roll settles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Passage {
    Door(Direction),
    Stairs,
}

impl Passage {
    pub fn retry(self, player: PlayerId) -> Step {
        match self {
            Passage::Door(direction) => Step::RetryMove { player, direction },
            Passage::Stairs => Step::RetryStairs { player },
        }
    }
}

/// The single decision the session currently waits on.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Prompt {
    /// Pick a tile and rotation for the door at `direction` of `from`.
    RoomDiscovery {
        player: PlayerId,
        from: RoomId,
        direction: Direction,
        /// Any tile of the floor is allowed, not only connection-shaped ones.
        free_choice: bool,
    },
    RoomEffectRoll {
        player: PlayerId,
        room: RoomId,
        trigger: RoomTrigger,
        /// Move to retry once the roll is settled.
        via: Passage,
        target: u8,
        pool: RollPool,
    },
    DrawCard {
        player: PlayerId,
        kind: CardKind,
        room: RoomId,
    },
    EventRoll {
        player: PlayerId,
        card: CardId,
        pool: RollPool,
    },
    SecondRoll {
        player: PlayerId,
        card: CardId,
        pool: RollPool,
        results: Vec<OutcomeEntry>,
    },
    DamageRoll {
        player: PlayerId,
        group: StatGroup,
        pool: RollPool,
        /// Trap applied once the damage is distributed.
        then_trapped: Option<(CardId, TrappedSpec)>,
    },
    DamageDistribution {
        player: PlayerId,
        group: StatGroup,
        amount: u8,
    },
    StatChoice {
        player: PlayerId,
        options: Vec<Stat>,
        amount: u8,
        reason: StatChoiceReason,
    },
    TrappedEscape {
        player: PlayerId,
        stat: Stat,
        threshold: u8,
        pool: RollPool,
    },
    Rescue {
        player: PlayerId,
        trapped: PlayerId,
        threshold: u8,
        pool: RollPool,
    },
    MultiPlayerRoll {
        player: PlayerId,
        card: CardId,
        pool: RollPool,
        /// Players still to roll after this one, in turn order.
        remaining: Vec<PlayerId>,
    },
    SecretPassage {
        player: PlayerId,
        destinations: Vec<RoomId>,
    },
}

impl Prompt {
    /// Player the prompt is addressed to.
    pub fn player(&self) -> PlayerId {
        match self {
            Prompt::RoomDiscovery { player, .. }
            | Prompt::RoomEffectRoll { player, .. }
            | Prompt::DrawCard { player, .. }
            | Prompt::EventRoll { player, .. }
            | Prompt::SecondRoll { player, .. }
            | Prompt::DamageRoll { player, .. }
            | Prompt::DamageDistribution { player, .. }
            | Prompt::StatChoice { player, .. }
            | Prompt::TrappedEscape { player, .. }
            | Prompt::Rescue { player, .. }
            | Prompt::MultiPlayerRoll { player, .. }
            | Prompt::SecretPassage { player, .. } => *player,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Prompt::RoomDiscovery { .. } => "room_discovery",
            Prompt::RoomEffectRoll { .. } => "room_effect_roll",
            Prompt::DrawCard { .. } => "draw_card",
            Prompt::EventRoll { .. } => "event_roll",
            Prompt::SecondRoll { .. } => "second_roll",
            Prompt::DamageRoll { .. } => "damage_roll",
            Prompt::DamageDistribution { .. } => "damage_distribution",
            Prompt::StatChoice { .. } => "stat_choice",
            Prompt::TrappedEscape { .. } => "trapped_escape",
            Prompt::Rescue { .. } => "rescue",
            Prompt::MultiPlayerRoll { .. } => "multi_player_roll",
            Prompt::SecretPassage { .. } => "secret_passage",
        }
    }

    /// Dice pool when this prompt is answered with `SubmitRoll`.
    pub fn roll_pool(&self) -> Option<&RollPool> {
        match self {
            Prompt::RoomEffectRoll { pool, .. }
            | Prompt::EventRoll { pool, .. }
            | Prompt::SecondRoll { pool, .. }
            | Prompt::DamageRoll { pool, .. }
            | Prompt::TrappedEscape { pool, .. }
            | Prompt::Rescue { pool, .. }
            | Prompt::MultiPlayerRoll { pool, .. } => Some(pool),
            _ => None,
        }
    }
}

/// Work item the resolver runs once no prompt or combat is open.
///
/// Steps are consumed front to back; a step that produces follow-ups puts
/// them at the front, so dependent effects run before anything queued
/// earlier.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Step {
    Open(Prompt),
    /// Resolve an event card as if `player` had drawn it.
    ResolveCard { player: PlayerId, card: CardId },
    ApplyOutcome {
        player: PlayerId,
        card: CardId,
        outcome: Outcome,
        rolled: Option<Stat>,
    },
    Trap {
        player: PlayerId,
        card: CardId,
        spec: TrappedSpec,
    },
    /// Re-run a move after a room-effect roll.
    RetryMove { player: PlayerId, direction: Direction },
    /// Re-run a stairs climb after a room-effect roll.
    RetryStairs { player: PlayerId },
}

impl Step {
    pub fn player(&self) -> PlayerId {
        match self {
            Step::Open(prompt) => prompt.player(),
            Step::ResolveCard { player, .. }
            | Step::ApplyOutcome { player, .. }
            | Step::Trap { player, .. }
            | Step::RetryMove { player, .. }
            | Step::RetryStairs { player } => *player,
        }
    }
}
