//! Drains the agenda until the session waits on a player again.
//!
//! After each transition the resolver runs queued steps in order. A step may
//! open a prompt or a fight, which stops the loop until the next intent. When
//! nothing is queued and the turn holder is out of moves, the turn passes.

use crate::action::card::deck_has;
use crate::action::movement::step_through_door;
use crate::action::travel::climb_stairs;
use crate::env::GameEnv;
use crate::error::ErrorContext;
use crate::event::{apply_outcome, apply_trap, begin_card};
use crate::state::{GameState, Prompt, Step};

use super::effects::{open_prompt, push_front};
use super::errors::ExecuteError;
use super::events::{FizzleReason, SessionEvent};
use super::turns::advance_turn;

/// Upper bound on steps run for one intent.
const MAX_STEPS: usize = 512;

/// Runs queued work until a prompt, a fight, or a turn with moves left.
pub(super) fn settle(
    state: &mut GameState,
    env: &GameEnv<'_>,
    events: &mut Vec<SessionEvent>,
) -> Result<(), ExecuteError> {
    let max_advances = state.turn.order.len() * 4 + 8;
    let mut advances = 0;
    let mut steps = 0;

    loop {
        if state.is_game_over() {
            state.prompt = None;
            state.agenda.clear();
            state.combat = None;
            return Ok(());
        }
        if state.prompt.is_some() || state.combat.is_some() {
            return Ok(());
        }

        if let Some(step) = state.agenda.pop_front() {
            steps += 1;
            if steps > MAX_STEPS {
                return Err(unsettled(state, steps));
            }
            run_step(state, env, step, events);
            continue;
        }

        let Some(current) = state.current_player() else {
            return Ok(());
        };
        let done = state.turn.moves(current) == 0
            || state.player(current).is_none_or(|p| !p.is_alive());
        if !done {
            return Ok(());
        }

        advances += 1;
        if advances > max_advances {
            return Err(unsettled(state, steps));
        }
        advance_turn(state, env, events);
    }
}

fn unsettled(state: &GameState, steps: usize) -> ExecuteError {
    ExecuteError::Unsettled {
        steps,
        context: ErrorContext::new(state.nonce).with_message("agenda did not drain"),
    }
}

fn run_step(state: &mut GameState, env: &GameEnv<'_>, step: Step, events: &mut Vec<SessionEvent>) {
    match step {
        Step::Open(Prompt::DrawCard { player, kind, .. }) if !deck_has(state, env, kind) => {
            events.push(SessionEvent::fizzled(player, FizzleReason::DeckExhausted(kind)));
        }
        Step::Open(prompt) => open_prompt(state, prompt, events),
        Step::ResolveCard { player, card } => {
            let steps = begin_card(state, env, player, &card, events);
            push_front(state, steps);
        }
        Step::ApplyOutcome {
            player,
            card,
            outcome,
            rolled,
        } => {
            let steps = apply_outcome(state, env, player, &card, &outcome, rolled, events);
            push_front(state, steps);
        }
        Step::Trap { player, card, spec } => apply_trap(state, env, player, &card, &spec, events),
        Step::RetryMove { player, direction } => {
            if let Err(error) = step_through_door(state, env, player, direction, events) {
                events.push(SessionEvent::fizzled(
                    player,
                    FizzleReason::Blocked(error.to_string()),
                ));
            }
        }
        Step::RetryStairs { player } => {
            if let Err(error) = climb_stairs(state, env, player, events) {
                events.push(SessionEvent::fizzled(
                    player,
                    FizzleReason::Blocked(error.to_string()),
                ));
            }
        }
    }
}
