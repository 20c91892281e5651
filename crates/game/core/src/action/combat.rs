//! Combat phase machine: confirm, attacker roll, defender roll.
//!
//! Ordinary fights take each roll from its owner. Forced fights opened by
//! an event take both rolls from the controller.

use crate::combat::resolve;
use crate::dice::{DiceError, settle_roll};
use crate::engine::SessionEvent;
use crate::engine::effects::push_front;
use crate::env::{GameEnv, OracleError};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{
    CombatPhase, CombatResult, CombatSession, GameState, PlayerId, Prompt, StatGroup, Step,
};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatError {
    #[error("no combat is in progress")]
    NoCombat,

    #[error("combat is in the {actual} phase, not {expected}")]
    WrongPhase {
        expected: CombatPhase,
        actual: CombatPhase,
    },

    #[error("combat is waiting for player {awaited}, not {actor}")]
    NotYourRoll { actor: PlayerId, awaited: PlayerId },

    #[error(transparent)]
    Dice(#[from] DiceError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CombatError::NoCombat | CombatError::WrongPhase { .. } | CombatError::NotYourRoll { .. } => {
                ErrorSeverity::Recoverable
            }
            CombatError::Dice(_) => ErrorSeverity::Validation,
            CombatError::Oracle(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CombatError::NoCombat => "COMBAT_NOT_ACTIVE",
            CombatError::WrongPhase { .. } => "COMBAT_WRONG_PHASE",
            CombatError::NotYourRoll { .. } => "COMBAT_NOT_YOUR_ROLL",
            CombatError::Dice(_) => "COMBAT_INVALID_DICE",
            CombatError::Oracle(error) => error.error_code(),
        }
    }
}

fn active_combat(state: &GameState, actor: PlayerId) -> Result<&CombatSession, CombatError> {
    let combat = state.combat.as_ref().ok_or(CombatError::NoCombat)?;
    let awaited = combat.awaited();
    if awaited != actor {
        return Err(CombatError::NotYourRoll { actor, awaited });
    }
    Ok(combat)
}

/// The attacker accepts or declines an offered fight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfirmCombatAction {
    pub actor: PlayerId,
    pub engage: bool,
}

impl ConfirmCombatAction {
    pub fn new(actor: PlayerId, engage: bool) -> Self {
        Self { actor, engage }
    }
}

impl super::ActionTransition for ConfirmCombatAction {
    type Error = CombatError;

    fn actor(&self) -> PlayerId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let combat = active_combat(state, self.actor)?;
        if combat.phase != CombatPhase::Confirm {
            return Err(CombatError::WrongPhase {
                expected: CombatPhase::Confirm,
                actual: combat.phase,
            });
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
        events: &mut Vec<SessionEvent>,
    ) -> Result<(), Self::Error> {
        if self.engage {
            let combat = state.combat.as_mut().ok_or(CombatError::NoCombat)?;
            combat.phase = CombatPhase::AttackerRoll;
            state.turn.attacked_this_turn = true;
            return Ok(());
        }
        let combat = state.combat.take().ok_or(CombatError::NoCombat)?;
        events.push(SessionEvent::CombatDeclined {
            attacker: combat.attacker.player,
            defender: combat.defender.player,
        });
        Ok(())
    }
}

/// One side's dice for the current roll phase.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatRollAction {
    pub actor: PlayerId,
    pub dice: Vec<u8>,
}

impl CombatRollAction {
    pub fn new(actor: PlayerId, dice: Vec<u8>) -> Self {
        Self { actor, dice }
    }
}

impl super::ActionTransition for CombatRollAction {
    type Error = CombatError;

    fn actor(&self) -> PlayerId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let combat = active_combat(state, self.actor)?;
        if combat.phase == CombatPhase::Confirm {
            return Err(CombatError::WrongPhase {
                expected: CombatPhase::AttackerRoll,
                actual: combat.phase,
            });
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        events: &mut Vec<SessionEvent>,
    ) -> Result<(), Self::Error> {
        let config = env.config()?;
        let rng = env.rng()?;
        let seed = state.roll_seed(self.actor);
        let mut combat = state.combat.take().ok_or(CombatError::NoCombat)?;

        let side = match combat.phase {
            CombatPhase::AttackerRoll => &mut combat.attacker,
            CombatPhase::DefenderRoll => &mut combat.defender,
            CombatPhase::Confirm => {
                return Err(CombatError::WrongPhase {
                    expected: CombatPhase::AttackerRoll,
                    actual: CombatPhase::Confirm,
                });
            }
        };
        let roll = settle_roll(config.dice_mode, &self.dice, side.dice, rng, seed)?;
        events.push(SessionEvent::DiceRolled {
            player: side.player,
            prompt: format!("combat_{}", combat.phase),
            faces: roll.faces.to_vec(),
            total: roll.total(),
        });
        side.roll = Some(roll);

        if combat.phase == CombatPhase::AttackerRoll {
            combat.phase = CombatPhase::DefenderRoll;
            state.combat = Some(combat);
            return Ok(());
        }

        let total = |roll: &Option<crate::dice::DiceRoll>| roll.as_ref().map_or(0, |r| r.total());
        let result = resolve(
            combat.attacker.player,
            total(&combat.attacker.roll),
            combat.defender.player,
            total(&combat.defender.roll),
        );
        finish(state, &combat, result, events);
        Ok(())
    }
}

/// Books a resolved fight: key, damage, and the attacker's lost momentum.
fn finish(
    state: &mut GameState,
    combat: &CombatSession,
    result: CombatResult,
    events: &mut Vec<SessionEvent>,
) {
    state.completed_combats.insert(combat.key());
    events.push(SessionEvent::CombatResolved {
        room: combat.room.clone(),
        result,
    });

    let attacker = combat.attacker.player;
    if result.loser == Some(attacker) {
        state.turn.set_moves(attacker, 0);
        let before = state.agenda.len();
        state.agenda.retain(|step| {
            !matches!(
                step,
                Step::Open(Prompt::DrawCard { player, room, .. })
                    if *player == attacker && *room == combat.room
            )
        });
        if state.agenda.len() != before {
            if let Some(tile) = state.map.room_mut(&combat.room) {
                tile.tokens_drawn = false;
            }
        }
    }

    if let Some(loser) = result.loser.filter(|_| result.damage > 0) {
        push_front(
            state,
            vec![Step::Open(Prompt::DamageDistribution {
                player: loser,
                group: StatGroup::Physical,
                amount: result.damage,
            })],
        );
    }
}
