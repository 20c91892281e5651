//! House dice: six-sided with faces 0, 0, 1, 1, 2, 2.
//!
//! Depending on [`DiceMode`] the faces are reported by the acting client or
//! rolled by the engine. Either way totals are recomputed here and never
//! taken from the client.

use arrayvec::ArrayVec;

use crate::config::{DiceMode, GameConfig};
use crate::env::{RngOracle, compute_seed, rng_context};
use crate::state::PlayerId;

/// Faces of one roll.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiceRoll {
    pub faces: ArrayVec<u8, { GameConfig::MAX_DICE }>,
}

impl DiceRoll {
    pub fn total(&self) -> u8 {
        self.faces.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiceError {
    #[error("expected {expected} dice, got {actual}")]
    WrongCount { expected: u8, actual: usize },

    #[error("die face {face} is not on a house die")]
    InvalidFace { face: u8 },

    #[error("pool of {0} dice exceeds the table limit")]
    PoolTooLarge(u8),

    #[error("dice are rolled by the engine in this session")]
    EngineRolls,
}

/// Validates client faces or rolls a fresh set, returning the roll to use.
///
/// `salt` separates several rolls made while applying one intent.
pub fn settle_roll(
    mode: DiceMode,
    submitted: &[u8],
    count: u8,
    rng: &(impl RngOracle + ?Sized),
    seed: RollSeed,
) -> Result<DiceRoll, DiceError> {
    if usize::from(count) > GameConfig::MAX_DICE {
        return Err(DiceError::PoolTooLarge(count));
    }
    match mode {
        DiceMode::ClientReported => from_faces(submitted, count),
        DiceMode::EngineRolled => {
            if !submitted.is_empty() {
                return Err(DiceError::EngineRolls);
            }
            Ok(roll(rng, seed, count))
        }
    }
}

/// Builds a roll from reported faces, checking count and face values.
pub fn from_faces(faces: &[u8], count: u8) -> Result<DiceRoll, DiceError> {
    if faces.len() != usize::from(count) {
        return Err(DiceError::WrongCount {
            expected: count,
            actual: faces.len(),
        });
    }
    let mut roll = DiceRoll::default();
    for face in faces {
        if *face > GameConfig::MAX_DIE_FACE {
            return Err(DiceError::InvalidFace { face: *face });
        }
        roll.faces
            .try_push(*face)
            .map_err(|_| DiceError::PoolTooLarge(count))?;
    }
    Ok(roll)
}

/// Inputs that make an engine roll reproducible.
#[derive(Clone, Copy, Debug)]
pub struct RollSeed {
    pub game_seed: u64,
    pub nonce: u64,
    pub player: PlayerId,
    pub salt: u32,
}

/// Rolls `count` house dice.
pub fn roll(rng: &(impl RngOracle + ?Sized), seed: RollSeed, count: u8) -> DiceRoll {
    let mut roll = DiceRoll::default();
    for die in 0..u32::from(count).min(GameConfig::MAX_DICE as u32) {
        let draw = compute_seed(
            seed.game_seed,
            seed.nonce,
            seed.player.0,
            rng_context::DICE
                .wrapping_add(seed.salt.wrapping_mul(GameConfig::MAX_DICE as u32))
                .wrapping_add(die),
        );
        let face_index = (rng.roll_die(draw, 6) - 1) as usize;
        roll.faces.push(GameConfig::DIE_FACES[face_index]);
    }
    roll
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::PcgRng;

    fn seed() -> RollSeed {
        RollSeed {
            game_seed: 9,
            nonce: 3,
            player: PlayerId(1),
            salt: 0,
        }
    }

    #[test]
    fn reported_faces_are_checked() {
        assert_eq!(from_faces(&[2, 1, 0], 3).map(|r| r.total()), Ok(3));
        assert_eq!(
            from_faces(&[2, 1], 3),
            Err(DiceError::WrongCount {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(from_faces(&[3], 1), Err(DiceError::InvalidFace { face: 3 }));
    }

    #[test]
    fn engine_roll_rejects_submitted_faces() {
        let result = settle_roll(DiceMode::EngineRolled, &[1], 1, &PcgRng, seed());
        assert_eq!(result, Err(DiceError::EngineRolls));
    }

    #[test]
    fn engine_roll_is_reproducible_and_legal() {
        let a = roll(&PcgRng, seed(), 8);
        let b = roll(&PcgRng, seed(), 8);
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
        assert!(a.faces.iter().all(|face| *face <= 2));
    }
}
