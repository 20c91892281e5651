//! Card deck oracle and the closed set of event outcomes.
//!
//! Event cards are pure data: a roll specification plus an outcome table.
//! The event engine in [`crate::event`] interprets them.

use std::fmt;
use std::str::FromStr;

use crate::state::{CardId, CardKind, Floor, RoomId, Stat, StatGroup};

/// Inclusive roll window an outcome entry matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum RollRange {
    /// `"4+"`
    AtLeast(u8),
    /// `"2-3"`
    Between(u8, u8),
    /// `"0"`
    Exact(u8),
}

impl RollRange {
    pub fn contains(self, total: u8) -> bool {
        match self {
            RollRange::AtLeast(min) => total >= min,
            RollRange::Between(min, max) => total >= min && total <= max,
            RollRange::Exact(value) => total == value,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid roll range '{0}'")]
pub struct RollRangeParseError(pub String);

impl FromStr for RollRange {
    type Err = RollRangeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || RollRangeParseError(s.to_string());
        if let Some(min) = trimmed.strip_suffix('+') {
            return min.parse().map(RollRange::AtLeast).map_err(|_| invalid());
        }
        if let Some((min, max)) = trimmed.split_once('-') {
            let min = min.trim().parse().map_err(|_| invalid())?;
            let max = max.trim().parse().map_err(|_| invalid())?;
            return Ok(RollRange::Between(min, max));
        }
        trimmed.parse().map(RollRange::Exact).map_err(|_| invalid())
    }
}

impl fmt::Display for RollRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollRange::AtLeast(min) => write!(f, "{min}+"),
            RollRange::Between(min, max) => write!(f, "{min}-{max}"),
            RollRange::Exact(value) => write!(f, "{value}"),
        }
    }
}

impl TryFrom<String> for RollRange {
    type Error = RollRangeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RollRange> for String {
    fn from(value: RollRange) -> Self {
        value.to_string()
    }
}

/// Which trait an outcome touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatRef {
    Fixed(Stat),
    /// The trait the player rolled for this card.
    Rolled,
}

/// Who receives a queued event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum QueueTarget {
    /// A living player other than the roller, picked with the session RNG.
    Random,
    /// The next player in turn order.
    RightPlayer,
    /// The previous player in turn order.
    LeftPlayer,
}

/// Who a forced attack pulls the roller into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ForcedTarget {
    AdjacentLowestMight,
}

/// How a trapped player's failed rescuer is punished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AllyFailure {
    #[default]
    Nothing,
    AlsoTrapped,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrappedSpec {
    pub escape_stat: Stat,
    pub threshold: u8,
    /// Release after this many failed escapes. Falls back to the config default.
    #[cfg_attr(feature = "serde", serde(default))]
    pub auto_escape_after: Option<u8>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ally_can_help: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ally_failure: AllyFailure,
}

/// Condition that lifts a movement restriction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RemoveCondition {
    SameRoomWithPlayer,
    HasCandle,
    InFurnaceRoom,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementRestriction {
    pub moves_per_turn: u8,
    pub remove_conditions: Vec<RemoveCondition>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnStartPenalty {
    pub group: StatGroup,
    pub amount: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PersistentSpec {
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_turn_start: Option<TurnStartPenalty>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub movement_restriction: Option<MovementRestriction>,
}

/// Stat change applied to the player nearest the roller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NearestPlayerEffect {
    /// Raise the stat when set, lower it otherwise.
    pub gain: bool,
    pub stat: Stat,
    pub amount: u8,
}

impl NearestPlayerEffect {
    pub fn delta(&self) -> i16 {
        let amount = i16::from(self.amount);
        if self.gain { amount } else { -amount }
    }
}

/// One row of an outcome table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutcomeEntry {
    pub range: RollRange,
    pub outcome: Outcome,
}

impl OutcomeEntry {
    pub fn new(range: RollRange, outcome: Outcome) -> Self {
        Self { range, outcome }
    }
}

/// Closed set of effects an event can produce.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Outcome {
    Nothing,
    GainStat {
        stat: StatRef,
        amount: u8,
        /// Side effect on the nearest other player, found over connections.
        #[cfg_attr(feature = "serde", serde(default))]
        nearest_player: Option<NearestPlayerEffect>,
    },
    LoseStat {
        stat: StatRef,
        amount: u8,
    },
    LoseStats {
        changes: Vec<(Stat, u8)>,
        /// Teleport afterwards to a random revealed room from this list.
        #[cfg_attr(feature = "serde", serde(default))]
        then_teleport: Vec<RoomId>,
    },
    PhysicalDamage {
        dice: u8,
        #[cfg_attr(feature = "serde", serde(default))]
        then_trapped: Option<TrappedSpec>,
    },
    MentalDamage {
        dice: u8,
    },
    /// Physical then mental damage rolls.
    Damage {
        physical: u8,
        mental: u8,
    },
    Teleport {
        to: RoomId,
    },
    DrawItem {
        count: u8,
    },
    DrawEvent {
        count: u8,
    },
    SecondRoll {
        dice: u8,
        results: Vec<OutcomeEntry>,
    },
    /// The player to the right attacks the roller.
    Attack {
        attacker_dice: u8,
        defender_stat: Stat,
    },
    ForcedAttack {
        target: ForcedTarget,
    },
    Trapped(TrappedSpec),
    Persistent(PersistentSpec),
    AllPlayersLoseStat {
        amount: u8,
    },
    SetStatToLowest {
        stat: StatRef,
    },
    QueueEvent {
        card: CardId,
        target: QueueTarget,
    },
    /// Multi-player variant of teleport.
    TeleportToRoom {
        room: RoomId,
    },
    /// The roller's next discovery may use any tile of the floor.
    DrawRoomTile,
}

/// Which dice pool an event roll uses.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RollSpec {
    Stat(Stat),
    /// The roller picks one of these stats when submitting the roll.
    ChooseStat(Vec<Stat>),
    Fixed(u8),
}

/// Comparison of a roll against the number of omens in play.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OmenComparison {
    pub at_least: Vec<Outcome>,
    pub less_than: Vec<Outcome>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OutcomeTable {
    Ranges(Vec<OutcomeEntry>),
    OmenComparison(OmenComparison),
}

impl Default for OutcomeTable {
    fn default() -> Self {
        OutcomeTable::Ranges(Vec::new())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChapelBonus {
    pub add_dice: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomModifier {
    pub room: RoomId,
    pub dice_reduction: u8,
}

/// Filters for events that hit several players.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MultiPlayerSpec {
    pub affected_floor: Option<Floor>,
    pub affected_rooms: Vec<RoomId>,
    /// Rooms with an outdoor window qualify alongside `affected_rooms`.
    pub outdoor_window: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EventCard {
    /// `None` means the card resolves `immediate` without a roll.
    pub roll: Option<RollSpec>,
    pub immediate: Vec<Outcome>,
    pub table: OutcomeTable,
    pub chapel_bonus: Option<ChapelBonus>,
    pub room_modifier: Option<RoomModifier>,
    pub multi_player: Option<MultiPlayerSpec>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardDefinition {
    pub id: CardId,
    pub name: String,
    pub kind: CardKind,
    /// Present on event cards.
    #[cfg_attr(feature = "serde", serde(default))]
    pub event: Option<EventCard>,
}

/// Read-only access to the card decks.
pub trait CardOracle: Send + Sync {
    fn card(&self, id: &CardId) -> Option<&CardDefinition>;

    fn deck(&self) -> &[CardDefinition];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_range_form() {
        assert_eq!("4+".parse(), Ok(RollRange::AtLeast(4)));
        assert_eq!("2-3".parse(), Ok(RollRange::Between(2, 3)));
        assert_eq!(" 0 ".parse(), Ok(RollRange::Exact(0)));
        assert!("x+".parse::<RollRange>().is_err());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let range = RollRange::Between(0, 3);
        assert!(range.contains(0));
        assert!(range.contains(3));
        assert!(!range.contains(4));
        assert!(RollRange::AtLeast(6).contains(9));
        assert!(!RollRange::Exact(2).contains(3));
    }
}
