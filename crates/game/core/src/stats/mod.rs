//! Character trait tracks.
//!
//! A player's stats are four indices into fixed 8-slot tracks owned by their
//! character. Everything here works on indices; values come from the
//! character definition.
//!
//! ```text
//! index   0    1   2   3   4   5   6   7
//! value  [☠]  v1  v2  v3  v4  v5  v6  v7
//! ```
//!
//! Index 0 on any track is lethal. Mutations clamp into `[0, 7]`; the death
//! pipeline itself lives in [`crate::haunt`].
mod damage;

pub use damage::{StatError, apply_allocation, damage_capacity, validate_allocation};

use crate::config::GameConfig;
use crate::env::CharacterDefinition;
use crate::state::{CharacterStats, PlayerSession, Stat};

/// Index movement produced by one stat mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatChange {
    pub stat: Stat,
    pub before: u8,
    pub after: u8,
}

impl StatChange {
    /// The change moved this track onto the skull.
    pub fn reached_zero(&self) -> bool {
        self.before > 0 && self.after == 0
    }
}

/// Moves `stat` by `delta` steps, clamped to `[0, MAX_STAT_INDEX]`.
pub fn apply_stat_delta(stats: &mut CharacterStats, stat: Stat, delta: i16) -> StatChange {
    let slot = stats.index_mut(stat);
    let before = *slot;
    let after = (i16::from(before) + delta).clamp(0, i16::from(GameConfig::MAX_STAT_INDEX));
    *slot = after as u8;
    StatChange {
        stat,
        before,
        after: *slot,
    }
}

/// Puts `stat` straight on index 0.
pub fn set_to_lowest(stats: &mut CharacterStats, stat: Stat) -> StatChange {
    let before = stats.index(stat);
    *stats.index_mut(stat) = 0;
    StatChange {
        stat,
        before,
        after: 0,
    }
}

/// Value of `stat` read from the character's track.
pub fn current_value(player: &PlayerSession, character: &CharacterDefinition, stat: Stat) -> u8 {
    character.track(stat).value_at(player.stats.index(stat))
}

/// Any track sits on index 0.
pub fn is_dead(stats: &CharacterStats) -> bool {
    stats.any_at_zero()
}

/// Starting indices of a character.
pub fn starting_stats(character: &CharacterDefinition) -> CharacterStats {
    CharacterStats::new(
        character.speed.start_index,
        character.might.start_index,
        character.sanity.start_index,
        character.knowledge.start_index,
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::env::TraitTrack;
    use crate::state::CharacterId;

    pub(crate) fn character() -> CharacterDefinition {
        CharacterDefinition {
            id: CharacterId::new("tester"),
            name: "Tester".into(),
            speed: TraitTrack::new([0, 2, 3, 4, 4, 5, 6, 7], 3),
            might: TraitTrack::new([0, 2, 3, 3, 4, 5, 6, 6], 3),
            sanity: TraitTrack::new([0, 1, 2, 3, 4, 5, 5, 6], 3),
            knowledge: TraitTrack::new([0, 2, 3, 4, 5, 5, 6, 8], 4),
        }
    }

    #[test]
    fn deltas_clamp_to_track() {
        let mut stats = CharacterStats::new(3, 3, 3, 3);
        assert_eq!(apply_stat_delta(&mut stats, Stat::Speed, 50).after, 7);
        assert_eq!(apply_stat_delta(&mut stats, Stat::Might, -50).after, 0);
        assert_eq!(apply_stat_delta(&mut stats, Stat::Sanity, -1).after, 2);
        assert!(is_dead(&stats));
    }

    #[test]
    fn reaching_zero_is_reported_once() {
        let mut stats = CharacterStats::new(1, 3, 3, 3);
        assert!(apply_stat_delta(&mut stats, Stat::Speed, -1).reached_zero());
        assert!(!apply_stat_delta(&mut stats, Stat::Speed, -1).reached_zero());
    }

    #[test]
    fn value_follows_index() {
        let def = character();
        let player = PlayerSession::new(
            crate::state::PlayerId(1),
            def.id.clone(),
            crate::state::RoomId::new("entrance-hall"),
            starting_stats(&def),
        );
        assert_eq!(current_value(&player, &def, Stat::Speed), 4);
        assert_eq!(current_value(&player, &def, Stat::Knowledge), 5);
    }
}
