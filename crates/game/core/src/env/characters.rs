//! Character trait-track oracle.

use crate::config::GameConfig;
use crate::state::{CharacterId, Stat};

/// Fixed 8-slot value progression for one trait. Slot 0 is the skull.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraitTrack {
    pub values: [u8; GameConfig::TRACK_LEN],
    pub start_index: u8,
}

impl TraitTrack {
    pub const fn new(values: [u8; GameConfig::TRACK_LEN], start_index: u8) -> Self {
        Self {
            values,
            start_index,
        }
    }

    /// Value at `index`, clamped into the track.
    pub fn value_at(&self, index: u8) -> u8 {
        let index = usize::from(index.min(GameConfig::MAX_STAT_INDEX));
        self.values[index]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterDefinition {
    pub id: CharacterId,
    pub name: String,
    pub speed: TraitTrack,
    pub might: TraitTrack,
    pub sanity: TraitTrack,
    pub knowledge: TraitTrack,
}

impl CharacterDefinition {
    pub fn track(&self, stat: Stat) -> &TraitTrack {
        match stat {
            Stat::Speed => &self.speed,
            Stat::Might => &self.might,
            Stat::Sanity => &self.sanity,
            Stat::Knowledge => &self.knowledge,
        }
    }
}

/// Read-only access to the character roster.
pub trait CharacterOracle: Send + Sync {
    fn character(&self, id: &CharacterId) -> Option<&CharacterDefinition>;

    fn roster(&self) -> &[CharacterDefinition];
}
