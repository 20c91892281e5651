//! Combat resolution.
//!
//! Pure functions over dice totals. The phase machine that collects the
//! rolls lives in [`crate::action::combat`]; this module only decides the
//! winner and the damage, and keeps the completed-fight bookkeeping.
//!
//! - Damage is `|attacker - defender|`.
//! - The higher total wins; a tie has no winner, no loser and no damage.

use std::collections::BTreeSet;

use crate::state::{CombatKey, CombatResult, PlayerId, RoomId};

/// Decides a fight from the two totals.
pub fn resolve(
    attacker: PlayerId,
    attacker_total: u8,
    defender: PlayerId,
    defender_total: u8,
) -> CombatResult {
    let damage = attacker_total.abs_diff(defender_total);
    let (winner, loser) = match attacker_total.cmp(&defender_total) {
        std::cmp::Ordering::Greater => (Some(attacker), Some(defender)),
        std::cmp::Ordering::Less => (Some(defender), Some(attacker)),
        std::cmp::Ordering::Equal => (None, None),
    };
    CombatResult {
        attacker_total,
        defender_total,
        winner,
        loser,
        damage,
    }
}

/// A completed fight between the pair in `room` still blocks re-engagement.
pub fn is_blocked(completed: &BTreeSet<CombatKey>, room: &RoomId, a: PlayerId, b: PlayerId) -> bool {
    completed.contains(&CombatKey::new(room.clone(), a, b))
}

/// Forgets every fight `player` had in `room` once they walk out.
pub fn release_keys(completed: &mut BTreeSet<CombatKey>, room: &RoomId, player: PlayerId) -> usize {
    let before = completed.len();
    completed.retain(|key| !(key.room == *room && key.involves(player)));
    before - completed.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_total_wins_by_difference() {
        let result = resolve(PlayerId(1), 5, PlayerId(2), 2);
        assert_eq!(result.winner, Some(PlayerId(1)));
        assert_eq!(result.loser, Some(PlayerId(2)));
        assert_eq!(result.damage, 3);

        let result = resolve(PlayerId(1), 1, PlayerId(2), 4);
        assert_eq!(result.winner, Some(PlayerId(2)));
        assert_eq!(result.loser, Some(PlayerId(1)));
        assert_eq!(result.damage, 3);
    }

    #[test]
    fn tie_has_no_loser() {
        let result = resolve(PlayerId(1), 2, PlayerId(2), 2);
        assert_eq!(result.winner, None);
        assert_eq!(result.loser, None);
        assert_eq!(result.damage, 0);
    }

    #[test]
    fn leaving_clears_only_that_room() {
        let hall = RoomId::new("hall");
        let den = RoomId::new("den");
        let mut completed = BTreeSet::new();
        completed.insert(CombatKey::new(hall.clone(), PlayerId(1), PlayerId(2)));
        completed.insert(CombatKey::new(den.clone(), PlayerId(1), PlayerId(3)));

        assert!(is_blocked(&completed, &hall, PlayerId(2), PlayerId(1)));
        assert_eq!(release_keys(&mut completed, &hall, PlayerId(2)), 1);
        assert!(!is_blocked(&completed, &hall, PlayerId(1), PlayerId(2)));
        assert!(is_blocked(&completed, &den, PlayerId(1), PlayerId(3)));
    }
}
