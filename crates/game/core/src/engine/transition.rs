//! Intent dispatch and the three-phase transition pipeline.

use crate::action::{
    ActionTransition, ChooseStatAction, CombatRollAction, ConfirmCombatAction,
    DeclineRescueAction, DeclineSecretPassageAction, DistributeDamageAction, EndTurnAction,
    Intent, MoveAction, SelectCardAction, SelectRoomTileAction, SubmitRollAction,
    TriggerHauntAction, UseElevatorAction, UseSecretPassageAction, UseStairsAction,
};
use crate::env::GameEnv;
use crate::state::{GameState, PlayerId};

use super::errors::{ExecuteError, TransitionPhase, TransitionPhaseError};
use super::events::SessionEvent;

/// Executes a transition through the three-phase pipeline.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the game state and report events
/// 3. `post_validate` - Verify postconditions after mutation
#[inline]
fn drive_transition<T>(
    transition: &T,
    state: &mut GameState,
    env: &GameEnv<'_>,
    events: &mut Vec<SessionEvent>,
) -> Result<(), TransitionPhaseError<T::Error>>
where
    T: ActionTransition,
{
    transition
        .pre_validate(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    transition
        .apply(state, env, events)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))
}

/// Routes `intent` from `actor` to its transition.
pub(super) fn execute_transition(
    actor: PlayerId,
    intent: &Intent,
    state: &mut GameState,
    env: &GameEnv<'_>,
    events: &mut Vec<SessionEvent>,
) -> Result<(), ExecuteError> {
    match intent {
        Intent::Move { direction } => {
            drive_transition(&MoveAction::new(actor, *direction), state, env, events)
                .map_err(ExecuteError::Move)
        }
        Intent::SelectRoomTile { room, rotation } => drive_transition(
            &SelectRoomTileAction::new(actor, room.clone(), *rotation),
            state,
            env,
            events,
        )
        .map_err(ExecuteError::Discovery),
        Intent::SubmitRoll { dice, stat } => drive_transition(
            &SubmitRollAction::new(actor, dice.clone(), *stat),
            state,
            env,
            events,
        )
        .map_err(ExecuteError::Roll),
        Intent::SelectCard { card } => drive_transition(
            &SelectCardAction::new(actor, card.clone()),
            state,
            env,
            events,
        )
        .map_err(ExecuteError::Card),
        Intent::ConfirmCombat { engage } => {
            drive_transition(&ConfirmCombatAction::new(actor, *engage), state, env, events)
                .map_err(ExecuteError::Combat)
        }
        Intent::ConfirmCombatRoll { dice } => drive_transition(
            &CombatRollAction::new(actor, dice.clone()),
            state,
            env,
            events,
        )
        .map_err(ExecuteError::Combat),
        Intent::DistributeDamage { allocations } => drive_transition(
            &DistributeDamageAction::new(actor, allocations.clone()),
            state,
            env,
            events,
        )
        .map_err(ExecuteError::Choice),
        Intent::ChooseStat { stat } => {
            drive_transition(&ChooseStatAction::new(actor, *stat), state, env, events)
                .map_err(ExecuteError::Choice)
        }
        Intent::UseStairs => {
            drive_transition(&UseStairsAction { actor }, state, env, events)
                .map_err(ExecuteError::Travel)
        }
        Intent::UseElevator { floor } => drive_transition(
            &UseElevatorAction {
                actor,
                floor: *floor,
            },
            state,
            env,
            events,
        )
        .map_err(ExecuteError::Travel),
        Intent::UseSecretPassage { room } => drive_transition(
            &UseSecretPassageAction {
                actor,
                room: room.clone(),
            },
            state,
            env,
            events,
        )
        .map_err(ExecuteError::Travel),
        Intent::DeclineSecretPassage => {
            drive_transition(&DeclineSecretPassageAction { actor }, state, env, events)
                .map_err(ExecuteError::Travel)
        }
        Intent::DeclineRescue => {
            drive_transition(&DeclineRescueAction { actor }, state, env, events)
                .map_err(ExecuteError::Travel)
        }
        Intent::EndTurn => drive_transition(&EndTurnAction::new(actor), state, env, events)
            .map_err(ExecuteError::Turn),
        Intent::TriggerHaunt {
            scenario,
            traitor,
            omen,
            room,
        } => drive_transition(
            &TriggerHauntAction {
                actor,
                scenario: *scenario,
                traitor: *traitor,
                omen: omen.clone(),
                room: room.clone(),
            },
            state,
            env,
            events,
        )
        .map_err(ExecuteError::Haunt),
    }
}
