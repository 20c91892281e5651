//! Splitting rolled damage across the two traits of a group.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{CharacterStats, Stat, StatGroup};

use super::{StatChange, apply_stat_delta};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatError {
    #[error("{stat} does not take {group} damage")]
    WrongGroup { stat: Stat, group: StatGroup },

    #[error("{stat} listed more than once")]
    DuplicateStat { stat: Stat },

    #[error("{stat} can absorb at most {max} damage")]
    OverCap { stat: Stat, max: u8 },

    #[error("allocated {allocated} damage, expected {expected}")]
    WrongTotal { allocated: u16, expected: u8 },
}

impl GameError for StatError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            StatError::WrongGroup { .. } => "STAT_WRONG_GROUP",
            StatError::DuplicateStat { .. } => "STAT_DUPLICATE",
            StatError::OverCap { .. } => "STAT_OVER_CAP",
            StatError::WrongTotal { .. } => "STAT_WRONG_TOTAL",
        }
    }
}

/// Damage the group can absorb: the sum of both current indices.
pub fn damage_capacity(stats: &CharacterStats, group: StatGroup) -> u8 {
    group
        .stats()
        .iter()
        .map(|stat| stats.index(*stat))
        .fold(0u8, u8::saturating_add)
}

/// Checks an allocation of `amount` damage over `group`.
///
/// Each stat absorbs at most its current index, and the allocation must
/// cover `min(amount, capacity)` exactly.
pub fn validate_allocation(
    stats: &CharacterStats,
    group: StatGroup,
    amount: u8,
    allocations: &[(Stat, u8)],
) -> Result<(), StatError> {
    let mut seen = Vec::with_capacity(2);
    let mut allocated = 0u16;
    for (stat, points) in allocations {
        if stat.group() != group {
            return Err(StatError::WrongGroup { stat: *stat, group });
        }
        if seen.contains(stat) {
            return Err(StatError::DuplicateStat { stat: *stat });
        }
        seen.push(*stat);
        let max = stats.index(*stat);
        if *points > max {
            return Err(StatError::OverCap { stat: *stat, max });
        }
        allocated += u16::from(*points);
    }
    let expected = amount.min(damage_capacity(stats, group));
    if allocated != u16::from(expected) {
        return Err(StatError::WrongTotal { allocated, expected });
    }
    Ok(())
}

/// Applies a validated allocation.
pub fn apply_allocation(stats: &mut CharacterStats, allocations: &[(Stat, u8)]) -> Vec<StatChange> {
    allocations
        .iter()
        .filter(|(_, points)| *points > 0)
        .map(|(stat, points)| apply_stat_delta(stats, *stat, -i16::from(*points)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_must_cover_damage() {
        let stats = CharacterStats::new(3, 2, 4, 4);
        let group = StatGroup::Physical;
        assert_eq!(
            validate_allocation(&stats, group, 3, &[(Stat::Speed, 2), (Stat::Might, 1)]),
            Ok(())
        );
        assert_eq!(
            validate_allocation(&stats, group, 3, &[(Stat::Speed, 2)]),
            Err(StatError::WrongTotal {
                allocated: 2,
                expected: 3
            })
        );
        assert_eq!(
            validate_allocation(&stats, group, 3, &[(Stat::Might, 3)]),
            Err(StatError::OverCap {
                stat: Stat::Might,
                max: 2
            })
        );
        assert!(matches!(
            validate_allocation(&stats, group, 1, &[(Stat::Sanity, 1)]),
            Err(StatError::WrongGroup { .. })
        ));
    }

    #[test]
    fn excess_damage_is_capped_by_capacity() {
        let stats = CharacterStats::new(1, 1, 4, 4);
        assert_eq!(damage_capacity(&stats, StatGroup::Physical), 2);
        assert_eq!(
            validate_allocation(
                &stats,
                StatGroup::Physical,
                6,
                &[(Stat::Speed, 1), (Stat::Might, 1)]
            ),
            Ok(())
        );
    }
}
