use std::fmt;

use super::common::{PlayerId, RoomId, Stat};
use crate::dice::DiceRoll;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CombatPhase {
    /// The attacker may still decline.
    Confirm,
    AttackerRoll,
    DefenderRoll,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CombatKind {
    /// Both participants submit their own roll.
    Ordinary,
    /// Started by an event; `controller` submits both rolls.
    Forced { controller: PlayerId },
}

/// One side of a fight.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub player: PlayerId,
    pub stat: Stat,
    pub dice: u8,
    pub roll: Option<DiceRoll>,
}

impl Combatant {
    pub fn new(player: PlayerId, stat: Stat, dice: u8) -> Self {
        Self {
            player,
            stat,
            dice,
            roll: None,
        }
    }
}

/// Transient engagement between two players.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatSession {
    pub room: RoomId,
    pub attacker: Combatant,
    pub defender: Combatant,
    pub kind: CombatKind,
    pub phase: CombatPhase,
}

impl CombatSession {
    /// Player whose input the current phase waits for.
    pub fn awaited(&self) -> PlayerId {
        if let CombatKind::Forced { controller } = self.kind {
            return controller;
        }
        match self.phase {
            CombatPhase::Confirm | CombatPhase::AttackerRoll => self.attacker.player,
            CombatPhase::DefenderRoll => self.defender.player,
        }
    }

    pub fn involves(&self, player: PlayerId) -> bool {
        self.attacker.player == player || self.defender.player == player
    }

    pub fn key(&self) -> CombatKey {
        CombatKey::new(self.room.clone(), self.attacker.player, self.defender.player)
    }
}

/// Resolved totals of a fight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatResult {
    pub attacker_total: u8,
    pub defender_total: u8,
    /// `None` on a tie.
    pub winner: Option<PlayerId>,
    pub loser: Option<PlayerId>,
    pub damage: u8,
}

/// Unordered pair of players plus the room they fought in.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatKey {
    pub room: RoomId,
    pub low: PlayerId,
    pub high: PlayerId,
}

impl CombatKey {
    pub fn new(room: RoomId, a: PlayerId, b: PlayerId) -> Self {
        Self {
            room,
            low: a.min(b),
            high: a.max(b),
        }
    }

    pub fn involves(&self, player: PlayerId) -> bool {
        self.low == player || self.high == player
    }
}

impl fmt::Display for CombatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.room, self.low.0, self.high.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_order_independent() {
        let room = RoomId::new("foyer");
        let a = CombatKey::new(room.clone(), PlayerId(4), PlayerId(2));
        let b = CombatKey::new(room, PlayerId(2), PlayerId(4));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "foyer:2:4");
    }

    #[test]
    fn forced_combat_awaits_controller_in_every_phase() {
        let mut session = CombatSession {
            room: RoomId::new("foyer"),
            attacker: Combatant::new(PlayerId(2), Stat::Might, 3),
            defender: Combatant::new(PlayerId(1), Stat::Might, 4),
            kind: CombatKind::Forced {
                controller: PlayerId(1),
            },
            phase: CombatPhase::AttackerRoll,
        };
        assert_eq!(session.awaited(), PlayerId(1));
        session.phase = CombatPhase::DefenderRoll;
        assert_eq!(session.awaited(), PlayerId(1));
        session.kind = CombatKind::Ordinary;
        assert_eq!(session.awaited(), PlayerId(1));
        session.phase = CombatPhase::AttackerRoll;
        assert_eq!(session.awaited(), PlayerId(2));
    }
}
