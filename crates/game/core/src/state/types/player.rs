use std::collections::BTreeSet;

use super::common::{CardId, CardKind, CharacterId, Direction, PlayerId, RoomId, Stat};
use super::map::Zone;

/// Track indices for the four traits. Index 0 is lethal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterStats {
    pub speed: u8,
    pub might: u8,
    pub sanity: u8,
    pub knowledge: u8,
}

impl CharacterStats {
    pub fn new(speed: u8, might: u8, sanity: u8, knowledge: u8) -> Self {
        Self {
            speed,
            might,
            sanity,
            knowledge,
        }
    }

    pub fn index(&self, stat: Stat) -> u8 {
        match stat {
            Stat::Speed => self.speed,
            Stat::Might => self.might,
            Stat::Sanity => self.sanity,
            Stat::Knowledge => self.knowledge,
        }
    }

    pub fn index_mut(&mut self, stat: Stat) -> &mut u8 {
        match stat {
            Stat::Speed => &mut self.speed,
            Stat::Might => &mut self.might,
            Stat::Sanity => &mut self.sanity,
            Stat::Knowledge => &mut self.knowledge,
        }
    }

    pub fn any_at_zero(&self) -> bool {
        Stat::ALL.iter().any(|stat| self.index(*stat) == 0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Faction {
    /// Before the Haunt.
    #[default]
    None,
    Survivor,
    Traitor,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeldCards {
    pub omens: Vec<CardId>,
    pub events: Vec<CardId>,
    pub items: Vec<CardId>,
}

impl HeldCards {
    pub fn add(&mut self, kind: CardKind, card: CardId) {
        match kind {
            CardKind::Omen => self.omens.push(card),
            CardKind::Event => self.events.push(card),
            CardKind::Item => self.items.push(card),
        }
    }

    pub fn holds(&self, card: &CardId) -> bool {
        self.omens.contains(card) || self.events.contains(card) || self.items.contains(card)
    }
}

/// A seated player and everything the board tracks about them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerSession {
    pub id: PlayerId,
    pub character: CharacterId,
    pub room: RoomId,
    pub faction: Faction,
    pub dead: bool,
    pub cards: HeldCards,
    /// Side of the current room the player came in through.
    pub entry_direction: Option<Direction>,
    /// Half of a divided room the player stands in.
    pub zone: Option<Zone>,
    pub stats: CharacterStats,
    /// `"<room>:<trigger>"` keys of room-effect rolls already made this game.
    pub room_rolls: BTreeSet<String>,
}

impl PlayerSession {
    pub fn new(id: PlayerId, character: CharacterId, room: RoomId, stats: CharacterStats) -> Self {
        Self {
            id,
            character,
            room,
            faction: Faction::None,
            dead: false,
            cards: HeldCards::default(),
            entry_direction: None,
            zone: None,
            stats,
            room_rolls: BTreeSet::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    /// Living players of different factions after the Haunt.
    pub fn is_enemy_of(&self, other: &PlayerSession) -> bool {
        self.is_alive()
            && other.is_alive()
            && self.faction != Faction::None
            && other.faction != Faction::None
            && self.faction != other.faction
    }
}
