//! Turn scheduling and intent execution pipeline.
//!
//! The [`GameEngine`] is the authoritative reducer for [`GameState`]. Every
//! intent is checked against the awaited player and the open prompt, driven
//! through its transition phases, and then the agenda is settled until the
//! session waits on a decision again. [`apply_intent`] wraps this in a
//! clone so a rejected intent leaves the caller's snapshot untouched.

pub(crate) mod effects;
mod errors;
mod events;
mod resolver;
mod setup;
mod transition;
mod turns;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};
pub use events::{FizzleReason, ReleaseReason, SessionEvent, TravelKind};
pub use setup::{
    BASEMENT_LANDING, ENTRANCE_HALL, FOYER, GRAND_STAIRCASE, Seat, SetupError, UPPER_LANDING,
    new_session,
};
pub use turns::turn_budget;

use crate::action::Intent;
use crate::env::GameEnv;
use crate::error::ErrorContext;
use crate::state::{GameState, PlayerId};

/// Game engine that validates and applies intents against a session state.
///
/// All state mutations flow through the three-phase pipeline
/// (pre_validate → apply → post_validate) followed by agenda settlement.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    /// Applies `intent` from `player` in place.
    ///
    /// On error the state may be partially mutated; callers that need the
    /// old snapshot back should go through [`apply_intent`].
    pub fn execute(
        &mut self,
        env: &GameEnv<'_>,
        player: PlayerId,
        intent: &Intent,
    ) -> Result<Vec<SessionEvent>, ExecuteError> {
        self.validate(player, intent)?;

        let mut events = Vec::new();
        transition::execute_transition(player, intent, self.state, env, &mut events)?;
        resolver::settle(self.state, env, &mut events)?;

        self.state.nonce += 1;
        Ok(events)
    }

    /// Gatekeeping shared by every intent: the game is live, the player is
    /// seated and alive, and it is their decision to make.
    fn validate(&self, player: PlayerId, intent: &Intent) -> Result<(), ExecuteError> {
        let nonce = self.state.nonce;
        let context = || ErrorContext::new(nonce).with_actor(player);

        if self.state.is_game_over() {
            return Err(ExecuteError::GameOver { context: context() });
        }
        let session = self
            .state
            .player(player)
            .ok_or_else(|| ExecuteError::UnknownPlayer {
                player,
                context: context(),
            })?;
        if !session.is_alive() {
            return Err(ExecuteError::PlayerDead {
                player,
                context: context().with_room(session.room.clone()),
            });
        }

        if let Some(awaited) = self.state.awaited_player()
            && awaited != player
        {
            return Err(ExecuteError::not_your_turn(player, awaited, nonce));
        }
        if intent.is_external() {
            return Ok(());
        }

        if let Some(prompt) = &self.state.prompt {
            if !intent.answers(prompt) {
                return Err(ExecuteError::PromptPending {
                    expected: prompt.name(),
                    context: context(),
                });
            }
        } else if self.state.combat.is_some() != intent.is_combat() {
            return Err(if intent.is_combat() {
                ExecuteError::Combat(TransitionPhaseError::new(
                    TransitionPhase::PreValidate,
                    crate::action::CombatError::NoCombat,
                ))
            } else {
                ExecuteError::CombatPending { context: context() }
            });
        }
        Ok(())
    }
}

/// Applies `intent` to a copy of `state` and returns the new snapshot with
/// the events it produced. `state` itself is never modified.
pub fn apply_intent(
    state: &GameState,
    env: &GameEnv<'_>,
    player: PlayerId,
    intent: &Intent,
) -> Result<(GameState, Vec<SessionEvent>), ExecuteError> {
    let mut next = state.clone();
    let events = GameEngine::new(&mut next).execute(env, player, intent)?;
    Ok((next, events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{
        CharacterId, CharacterStats, Direction, PlayerSession, Prompt, RoomId, TurnState,
    };

    fn table() -> GameState {
        let mut state = GameState::default();
        for id in 1..=3 {
            state.players.push(PlayerSession::new(
                PlayerId(id),
                CharacterId::new("c"),
                RoomId::new("entrance-hall"),
                CharacterStats::new(3, 3, 3, 3),
            ));
        }
        state.turn = TurnState::new(vec![PlayerId(1), PlayerId(2), PlayerId(3)]);
        state.turn.set_moves(PlayerId(1), 4);
        state
    }

    #[test]
    fn only_the_awaited_player_may_act() {
        let state = table();
        let error = apply_intent(
            &state,
            &GameEnv::empty(),
            PlayerId(2),
            &Intent::Move {
                direction: Direction::North,
            },
        )
        .unwrap_err();
        assert!(matches!(
            error,
            ExecuteError::NotYourTurn {
                actor: PlayerId(2),
                awaited: PlayerId(1),
                ..
            }
        ));
    }

    #[test]
    fn open_prompt_rejects_other_intents() {
        let mut state = table();
        state.prompt = Some(Prompt::SecretPassage {
            player: PlayerId(1),
            destinations: vec![RoomId::new("crypt")],
        });
        let error = apply_intent(&state, &GameEnv::empty(), PlayerId(1), &Intent::EndTurn)
            .unwrap_err();
        assert!(matches!(
            error,
            ExecuteError::PromptPending {
                expected: "secret_passage",
                ..
            }
        ));
    }

    #[test]
    fn dead_and_unknown_players_are_rejected() {
        let mut state = table();
        state.players[0].dead = true;
        let env = GameEnv::empty();
        assert!(matches!(
            apply_intent(&state, &env, PlayerId(1), &Intent::EndTurn),
            Err(ExecuteError::PlayerDead { .. })
        ));
        assert!(matches!(
            apply_intent(&state, &env, PlayerId(9), &Intent::EndTurn),
            Err(ExecuteError::UnknownPlayer { .. })
        ));
    }

    #[test]
    fn rejection_leaves_the_snapshot_alone() {
        let state = table();
        let before = state.clone();
        let _ = apply_intent(&state, &GameEnv::empty(), PlayerId(3), &Intent::EndTurn);
        assert_eq!(state, before);
    }
}
