//! Turn hand-over: end-of-turn hooks, seat rotation and turn-start effects.

use crate::env::{GameEnv, RemoveCondition};
use crate::event::stat_pool;
use crate::state::{
    GameState, PlayerId, Prompt, RollPool, SpecialToken, Stat, StatChoiceReason, Step,
};

use super::effects::{open_prompt, push_front, relocate};
use super::events::{SessionEvent, TravelKind};

/// Moves for `player`'s turn: the speed value, capped by any movement
/// restriction, or nothing while trapped.
pub fn turn_budget(state: &GameState, env: &GameEnv<'_>, player: PlayerId) -> u8 {
    if state.is_trapped(player) {
        return 0;
    }
    let speed = stat_pool(state, env, player, Stat::Speed).unwrap_or(0);
    match state.effects(player).and_then(|effects| effects.movement_cap()) {
        Some(cap) => speed.min(cap),
        None => speed,
    }
}

/// Passes the turn to the next living player.
///
/// The secret-passage hook may run first: with a single destination it
/// moves the player and the turn still passes; with several it opens a
/// prompt and the turn stays put until that is answered.
pub(super) fn advance_turn(state: &mut GameState, env: &GameEnv<'_>, events: &mut Vec<SessionEvent>) {
    let Some(current) = state.current_player() else {
        return;
    };

    if !secret_passage_hook(state, current, events) {
        return;
    }
    release_persistent(state, env, current, events);

    let len = state.turn.order.len();
    for _ in 0..len {
        state.turn.index = (state.turn.index + 1) % len;
        if state.turn.index == 0 {
            state.turn.round += 1;
        }
        let candidate = state.turn.order[state.turn.index];
        if state.player(candidate).is_some_and(|p| p.is_alive()) {
            break;
        }
    }
    state.turn.reset_turn_flags();

    if let Some(next) = state.current_player() {
        start_turn(state, env, next, events);
    }
}

/// Returns false when a prompt now holds the turn.
fn secret_passage_hook(state: &mut GameState, player: PlayerId, events: &mut Vec<SessionEvent>) -> bool {
    if state.turn.prompts_shown.secret_passage || state.turn.moves(player) > 0 {
        return true;
    }
    let Some(room) = state
        .player(player)
        .filter(|p| p.is_alive())
        .map(|p| p.room.clone())
    else {
        return true;
    };
    if !state
        .map
        .room(&room)
        .is_some_and(|tile| tile.has_special(SpecialToken::SecretPassage))
    {
        return true;
    }
    let destinations: Vec<_> = state
        .map
        .rooms_with(SpecialToken::SecretPassage)
        .filter(|tile| tile.id != room)
        .map(|tile| tile.id.clone())
        .collect();

    state.turn.prompts_shown.secret_passage = true;
    match destinations.as_slice() {
        [] => true,
        [only] => {
            let only = only.clone();
            relocate(state, player, &only, TravelKind::SecretPassage, events);
            true
        }
        _ => {
            open_prompt(
                state,
                Prompt::SecretPassage {
                    player,
                    destinations,
                },
                events,
            );
            false
        }
    }
}

/// Ending a turn in a release room clears plain persistent records.
fn release_persistent(
    state: &mut GameState,
    env: &GameEnv<'_>,
    player: PlayerId,
    events: &mut Vec<SessionEvent>,
) {
    let Ok(config) = env.config() else {
        return;
    };
    let Some(room) = state.player(player).map(|p| p.room.clone()) else {
        return;
    };
    if !config.is_release_room(room.as_str()) {
        return;
    }
    let effects = state.effects_mut(player);
    let before = effects.persistent.len();
    effects.persistent.retain(|record| !record.is_plain());
    let count = before - effects.persistent.len();
    if count > 0 {
        events.push(SessionEvent::PersistentEffectsCleared {
            player,
            room,
            count,
        });
    }
}

/// Restriction conditions that currently hold for `player`.
fn restriction_lifted(
    state: &GameState,
    env: &GameEnv<'_>,
    player: PlayerId,
    condition: RemoveCondition,
) -> bool {
    let Some(session) = state.player(player) else {
        return false;
    };
    match condition {
        RemoveCondition::SameRoomWithPlayer => state
            .players_in(&session.room)
            .any(|other| other.id != player),
        RemoveCondition::HasCandle => env.config().is_ok_and(|config| {
            session
                .cards
                .items
                .iter()
                .any(|item| item.as_str() == config.candle_item_id)
        }),
        RemoveCondition::InFurnaceRoom => env
            .config()
            .is_ok_and(|config| session.room.as_str() == config.furnace_room),
    }
}

fn lift_restrictions(state: &mut GameState, env: &GameEnv<'_>, player: PlayerId) {
    let Some(records) = state.effects(player).map(|e| e.persistent.clone()) else {
        return;
    };
    let kept: Vec<_> = records
        .into_iter()
        .filter(|record| {
            record.movement_restriction.as_ref().is_none_or(|restriction| {
                !restriction
                    .remove_conditions
                    .iter()
                    .any(|condition| restriction_lifted(state, env, player, *condition))
            })
        })
        .collect();
    state.effects_mut(player).persistent = kept;
}

/// Sets up `player`'s turn: budget, escape roll, penalties and deferred work.
pub(super) fn start_turn(
    state: &mut GameState,
    env: &GameEnv<'_>,
    player: PlayerId,
    events: &mut Vec<SessionEvent>,
) {
    lift_restrictions(state, env, player);
    let moves = turn_budget(state, env, player);
    state.turn.set_moves(player, moves);
    events.push(SessionEvent::TurnAdvanced {
        player,
        moves,
        round: state.turn.round,
    });

    let mut steps = Vec::new();
    if let Some(trap) = state.effects(player).and_then(|e| e.trapped.clone()) {
        let dice = stat_pool(state, env, player, trap.escape_stat).unwrap_or(0);
        state.turn.prompts_shown.trapped_escape = true;
        steps.push(Step::Open(Prompt::TrappedEscape {
            player,
            stat: trap.escape_stat,
            threshold: trap.threshold,
            pool: RollPool::stat(trap.escape_stat, dice),
        }));
    }

    let effects = state.effects_mut(player);
    for penalty in effects
        .persistent
        .iter()
        .filter_map(|record| record.on_turn_start.as_ref())
    {
        steps.push(Step::Open(Prompt::StatChoice {
            player,
            options: penalty.group.stats().to_vec(),
            amount: penalty.amount,
            reason: StatChoiceReason::PersistentPenalty,
        }));
    }
    for choice in std::mem::take(&mut effects.stat_choices) {
        steps.push(Step::Open(Prompt::StatChoice {
            player,
            options: choice.options,
            amount: choice.amount,
            reason: choice.reason,
        }));
    }
    for queued in std::mem::take(&mut effects.queued_events) {
        steps.push(Step::ResolveCard {
            player,
            card: queued.card,
        });
    }
    push_front(state, steps);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{MovementRestriction, TurnStartPenalty};
    use crate::state::{
        CardId, CharacterId, CharacterStats, PendingStatChoice, PersistentRecord, PlayerSession,
        QueuedEvent, RoomId, StatGroup, TurnState,
    };

    fn table(players: u32) -> GameState {
        let mut state = GameState::default();
        for id in 1..=players {
            state.players.push(PlayerSession::new(
                PlayerId(id),
                CharacterId::new("c"),
                RoomId::new("entrance-hall"),
                CharacterStats::new(3, 3, 3, 3),
            ));
        }
        state.turn = TurnState::new((1..=players).map(PlayerId).collect());
        state
    }

    #[test]
    fn rotation_skips_the_dead_and_counts_rounds() {
        let mut state = table(3);
        state.players[1].dead = true;
        let env = GameEnv::empty();
        let mut events = Vec::new();

        advance_turn(&mut state, &env, &mut events);
        assert_eq!(state.current_player(), Some(PlayerId(3)));
        advance_turn(&mut state, &env, &mut events);
        assert_eq!(state.current_player(), Some(PlayerId(1)));
        assert_eq!(state.turn.round, 1);
    }

    #[test]
    fn turn_start_queues_deferred_work() {
        let mut state = table(3);
        let effects = state.effects_mut(PlayerId(2));
        effects.persistent.push(PersistentRecord {
            card: CardId::new("chill"),
            on_turn_start: Some(TurnStartPenalty {
                group: StatGroup::Mental,
                amount: 1,
            }),
            movement_restriction: None,
        });
        effects.stat_choices.push(PendingStatChoice {
            options: vec![Stat::Might, Stat::Speed],
            amount: 1,
            reason: StatChoiceReason::AllPlayersLoseStat,
        });
        effects.queued_events.push(QueuedEvent {
            card: CardId::new("whispers"),
            source: PlayerId(1),
        });

        let mut events = Vec::new();
        start_turn(&mut state, &GameEnv::empty(), PlayerId(2), &mut events);

        assert_eq!(state.agenda.len(), 3);
        assert!(matches!(
            state.agenda.back(),
            Some(Step::ResolveCard { card, .. }) if card.as_str() == "whispers"
        ));
        let effects = state.effects(PlayerId(2)).unwrap();
        assert!(effects.stat_choices.is_empty());
        assert!(effects.queued_events.is_empty());
    }

    #[test]
    fn company_lifts_a_restriction() {
        let mut state = table(2);
        state.effects_mut(PlayerId(1)).persistent.push(PersistentRecord {
            card: CardId::new("cold"),
            on_turn_start: None,
            movement_restriction: Some(MovementRestriction {
                moves_per_turn: 1,
                remove_conditions: vec![RemoveCondition::SameRoomWithPlayer],
            }),
        });
        lift_restrictions(&mut state, &GameEnv::empty(), PlayerId(1));
        assert!(state.effects(PlayerId(1)).unwrap().persistent.is_empty());
    }

    #[test]
    fn one_secret_passage_moves_the_player() {
        use crate::map::{build_tile, place_tile, tests::def};
        use crate::state::{Direction, Floor, GridPos, Rotation};

        let mut state = table(3);
        for (name, x) in [("entrance-hall", 0), ("crypt", 4)] {
            let tile = build_tile(
                &def(name, &[Floor::Ground], &[Direction::North]),
                Floor::Ground,
                GridPos::new(x, 0),
                Rotation::default(),
            );
            let id = place_tile(&mut state.map, tile);
            crate::map::place_special_token(&mut state.map, &id, SpecialToken::SecretPassage).unwrap();
        }
        let mut events = Vec::new();
        advance_turn(&mut state, &GameEnv::empty(), &mut events);

        assert_eq!(state.player(PlayerId(1)).unwrap().room.as_str(), "crypt");
        assert_eq!(state.current_player(), Some(PlayerId(2)));
    }
}
