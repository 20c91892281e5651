//! Applies one outcome, producing follow-up steps.

use crate::engine::effects::{adjust_stat, lower_to_zero, relocate, start_combat};
use crate::engine::{FizzleReason, SessionEvent, TravelKind};
use crate::env::{
    ForcedTarget, GameEnv, Outcome, PersistentSpec, QueueTarget, StatRef, TrappedSpec,
    rng_context,
};
use crate::map::distances_from;
use crate::state::{
    CardId, CardKind, CombatKind, CombatPhase, CombatSession, Combatant, GameState,
    PendingStatChoice, PersistentRecord, PlayerId, Prompt, QueuedEvent, RollPool, RoomId, Stat,
    StatChoiceReason, StatGroup, Step, TrappedRecord,
};

use super::pool::stat_pool;

fn resolve_stat(
    stat: StatRef,
    rolled: Option<Stat>,
    player: PlayerId,
    events: &mut Vec<SessionEvent>,
) -> Option<Stat> {
    match (stat, rolled) {
        (StatRef::Fixed(stat), _) => Some(stat),
        (StatRef::Rolled, Some(stat)) => Some(stat),
        (StatRef::Rolled, None) => {
            events.push(SessionEvent::fizzled(
                player,
                FizzleReason::Blocked("outcome refers to a rolled stat but none was rolled".into()),
            ));
            None
        }
    }
}

fn damage_roll(player: PlayerId, group: StatGroup, dice: u8, then_trapped: Option<(CardId, TrappedSpec)>) -> Step {
    Step::Open(Prompt::DamageRoll {
        player,
        group,
        pool: RollPool::fixed(dice),
        then_trapped,
    })
}

fn teleport(
    state: &mut GameState,
    player: PlayerId,
    to: &RoomId,
    events: &mut Vec<SessionEvent>,
) {
    if state.map.is_revealed(to) {
        relocate(state, player, to, TravelKind::Teleport, events);
    } else {
        events.push(SessionEvent::fizzled(
            player,
            FizzleReason::RoomNotRevealed(to.clone()),
        ));
    }
}

/// Nearest other living player by door distance; ties go to turn order.
fn nearest_player(state: &GameState, player: PlayerId) -> Option<PlayerId> {
    let origin = &state.player(player)?.room;
    let distances = distances_from(&state.map, origin);
    state
        .turn
        .order
        .iter()
        .filter(|id| **id != player)
        .filter_map(|id| state.player(*id))
        .filter(|other| other.is_alive())
        .filter_map(|other| distances.get(&other.room).map(|distance| (*distance, other.id)))
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, id)| id)
}

/// Next living player after `from`, walking the turn order.
fn living_neighbour(state: &GameState, from: PlayerId, backwards: bool) -> Option<PlayerId> {
    let mut cursor = from;
    for _ in 0..state.turn.order.len() {
        cursor = if backwards {
            state.turn.left_of(cursor)?
        } else {
            state.turn.right_of(cursor)?
        };
        if cursor == from {
            return None;
        }
        if state.player(cursor).is_some_and(|p| p.is_alive()) {
            return Some(cursor);
        }
    }
    None
}

fn queue_target(
    state: &mut GameState,
    env: &GameEnv<'_>,
    player: PlayerId,
    target: QueueTarget,
) -> Option<PlayerId> {
    match target {
        QueueTarget::RightPlayer => living_neighbour(state, player, false),
        QueueTarget::LeftPlayer => living_neighbour(state, player, true),
        QueueTarget::Random => {
            let others: Vec<PlayerId> = state
                .living_players()
                .filter(|other| other.id != player)
                .map(|other| other.id)
                .collect();
            let rng = env.rng().ok()?;
            let seed = state.next_seed(player, rng_context::QUEUE);
            rng.pick(seed, others.len()).map(|index| others[index])
        }
    }
}

/// Living player in a room adjacent to the roller with the lowest might.
fn adjacent_lowest_might(
    state: &GameState,
    env: &GameEnv<'_>,
    player: PlayerId,
) -> Option<(PlayerId, RoomId, u8)> {
    let room = &state.player(player)?.room;
    let mut best: Option<(u8, usize, PlayerId, RoomId)> = None;
    for (_, neighbour) in state.map.neighbors(room) {
        for other in state.players_in(neighbour) {
            if other.id == player {
                continue;
            }
            let Ok(might) = stat_pool(state, env, other.id, Stat::Might) else {
                continue;
            };
            let seat = state
                .turn
                .order
                .iter()
                .position(|id| *id == other.id)
                .unwrap_or(usize::MAX);
            let candidate = (might, seat, other.id, neighbour.clone());
            if best
                .as_ref()
                .is_none_or(|current| (candidate.0, candidate.1) < (current.0, current.1))
            {
                best = Some(candidate);
            }
        }
    }
    best.map(|(might, _, id, room)| (id, room, might))
}

/// Puts `player` into a trapped state.
pub fn apply_trap(
    state: &mut GameState,
    env: &GameEnv<'_>,
    player: PlayerId,
    card: &CardId,
    spec: &TrappedSpec,
    events: &mut Vec<SessionEvent>,
) {
    if state.player(player).is_none_or(|p| !p.is_alive()) {
        return;
    }
    let default_release = env
        .config()
        .map(|config| config.default_auto_escape_after)
        .unwrap_or(crate::config::GameConfig::DEFAULT_AUTO_ESCAPE_AFTER);
    state.effects_mut(player).trapped = Some(TrappedRecord::from_spec(card.clone(), spec, default_release));
    state.turn.set_moves(player, 0);
    events.push(SessionEvent::PlayerTrapped {
        player,
        card: card.clone(),
    });
}

/// Applies `outcome` of `card` to `player` and returns the steps it spawns.
///
/// Data faults fizzle with a notice; nothing here fails the intent.
pub fn apply_outcome(
    state: &mut GameState,
    env: &GameEnv<'_>,
    player: PlayerId,
    card: &CardId,
    outcome: &Outcome,
    rolled: Option<Stat>,
    events: &mut Vec<SessionEvent>,
) -> Vec<Step> {
    if state.player(player).is_none_or(|p| !p.is_alive()) {
        return Vec::new();
    }
    events.push(SessionEvent::OutcomeApplied {
        player,
        card: card.clone(),
        outcome: outcome.clone(),
    });

    match outcome {
        Outcome::Nothing => Vec::new(),
        Outcome::GainStat {
            stat,
            amount,
            nearest_player: side_effect,
        } => {
            let Some(stat) = resolve_stat(*stat, rolled, player, events) else {
                return Vec::new();
            };
            adjust_stat(state, player, stat, i16::from(*amount), events);
            if let Some(effect) = side_effect {
                match nearest_player(state, player) {
                    Some(other) => adjust_stat(state, other, effect.stat, effect.delta(), events),
                    None => events.push(SessionEvent::fizzled(player, FizzleReason::NoTarget)),
                }
            }
            Vec::new()
        }
        Outcome::LoseStat { stat, amount } => {
            if let Some(stat) = resolve_stat(*stat, rolled, player, events) {
                adjust_stat(state, player, stat, -i16::from(*amount), events);
            }
            Vec::new()
        }
        Outcome::LoseStats {
            changes,
            then_teleport,
        } => {
            for (stat, amount) in changes {
                adjust_stat(state, player, *stat, -i16::from(*amount), events);
            }
            if !then_teleport.is_empty() && state.player(player).is_some_and(|p| p.is_alive()) {
                let revealed: Vec<RoomId> = then_teleport
                    .iter()
                    .filter(|room| state.map.is_revealed(room))
                    .cloned()
                    .collect();
                let picked = env.rng().ok().and_then(|rng| {
                    let seed = state.next_seed(player, rng_context::TELEPORT);
                    rng.pick(seed, revealed.len())
                });
                match picked {
                    Some(index) => teleport(state, player, &revealed[index], events),
                    None => events.push(SessionEvent::fizzled(player, FizzleReason::NoDestination)),
                }
            }
            Vec::new()
        }
        Outcome::PhysicalDamage { dice, then_trapped } => vec![damage_roll(
            player,
            StatGroup::Physical,
            *dice,
            then_trapped.clone().map(|spec| (card.clone(), spec)),
        )],
        Outcome::MentalDamage { dice } => vec![damage_roll(player, StatGroup::Mental, *dice, None)],
        Outcome::Damage { physical, mental } => vec![
            damage_roll(player, StatGroup::Physical, *physical, None),
            damage_roll(player, StatGroup::Mental, *mental, None),
        ],
        Outcome::Teleport { to } => {
            teleport(state, player, to, events);
            Vec::new()
        }
        Outcome::TeleportToRoom { room } => {
            teleport(state, player, room, events);
            Vec::new()
        }
        Outcome::DrawItem { count } => draw_steps(state, player, CardKind::Item, *count),
        Outcome::DrawEvent { count } => draw_steps(state, player, CardKind::Event, *count),
        Outcome::SecondRoll { dice, results } => vec![Step::Open(Prompt::SecondRoll {
            player,
            card: card.clone(),
            pool: RollPool::fixed(*dice),
            results: results.clone(),
        })],
        Outcome::Attack {
            attacker_dice,
            defender_stat,
        } => {
            let Some(attacker) = living_neighbour(state, player, false) else {
                events.push(SessionEvent::fizzled(player, FizzleReason::NoTarget));
                return Vec::new();
            };
            let defence = match stat_pool(state, env, player, *defender_stat) {
                Ok(dice) => dice,
                Err(reason) => {
                    events.push(SessionEvent::fizzled(player, reason));
                    return Vec::new();
                }
            };
            let room = state.player(player).map(|p| p.room.clone()).unwrap_or_default();
            start_combat(
                state,
                CombatSession {
                    room,
                    attacker: Combatant::new(attacker, Stat::Might, *attacker_dice),
                    defender: Combatant::new(player, *defender_stat, defence),
                    kind: CombatKind::Forced { controller: player },
                    phase: CombatPhase::AttackerRoll,
                },
                events,
            );
            Vec::new()
        }
        Outcome::ForcedAttack {
            target: ForcedTarget::AdjacentLowestMight,
        } => {
            let Some((target, room, defence)) = adjacent_lowest_might(state, env, player) else {
                events.push(SessionEvent::fizzled(player, FizzleReason::NoTarget));
                return Vec::new();
            };
            let attack = match stat_pool(state, env, player, Stat::Might) {
                Ok(dice) => dice,
                Err(reason) => {
                    events.push(SessionEvent::fizzled(player, reason));
                    return Vec::new();
                }
            };
            relocate(state, player, &room, TravelKind::Forced, events);
            start_combat(
                state,
                CombatSession {
                    room,
                    attacker: Combatant::new(player, Stat::Might, attack),
                    defender: Combatant::new(target, Stat::Might, defence),
                    kind: CombatKind::Forced { controller: player },
                    phase: CombatPhase::AttackerRoll,
                },
                events,
            );
            Vec::new()
        }
        Outcome::Trapped(spec) => vec![Step::Trap {
            player,
            card: card.clone(),
            spec: spec.clone(),
        }],
        Outcome::Persistent(spec) => {
            add_persistent(state, player, card, spec, events);
            Vec::new()
        }
        Outcome::AllPlayersLoseStat { amount } => {
            let others: Vec<PlayerId> = state
                .living_players()
                .filter(|other| other.id != player)
                .map(|other| other.id)
                .collect();
            for other in others {
                state.effects_mut(other).stat_choices.push(PendingStatChoice {
                    options: Stat::ALL.to_vec(),
                    amount: *amount,
                    reason: StatChoiceReason::AllPlayersLoseStat,
                });
            }
            vec![Step::Open(Prompt::StatChoice {
                player,
                options: Stat::ALL.to_vec(),
                amount: *amount,
                reason: StatChoiceReason::AllPlayersLoseStat,
            })]
        }
        Outcome::SetStatToLowest { stat } => {
            if let Some(stat) = resolve_stat(*stat, rolled, player, events) {
                lower_to_zero(state, player, stat, events);
            }
            Vec::new()
        }
        Outcome::QueueEvent {
            card: queued,
            target,
        } => {
            match queue_target(state, env, player, *target) {
                Some(recipient) => {
                    state.effects_mut(recipient).queued_events.push(QueuedEvent {
                        card: queued.clone(),
                        source: player,
                    });
                    events.push(SessionEvent::EventQueued {
                        card: queued.clone(),
                        source: player,
                        target: recipient,
                    });
                }
                None => events.push(SessionEvent::fizzled(player, FizzleReason::NoTarget)),
            }
            Vec::new()
        }
        Outcome::DrawRoomTile => {
            state.effects_mut(player).free_discovery = true;
            Vec::new()
        }
    }
}

fn draw_steps(state: &GameState, player: PlayerId, kind: CardKind, count: u8) -> Vec<Step> {
    let room = state.player(player).map(|p| p.room.clone()).unwrap_or_default();
    (0..count)
        .map(|_| {
            Step::Open(Prompt::DrawCard {
                player,
                kind,
                room: room.clone(),
            })
        })
        .collect()
}

fn add_persistent(
    state: &mut GameState,
    player: PlayerId,
    card: &CardId,
    spec: &PersistentSpec,
    events: &mut Vec<SessionEvent>,
) {
    let effects = state.effects_mut(player);
    if effects.persistent.iter().any(|record| record.card == *card) {
        return;
    }
    effects.persistent.push(PersistentRecord {
        card: card.clone(),
        on_turn_start: spec.on_turn_start.clone(),
        movement_restriction: spec.movement_restriction.clone(),
    });
    if let Some(cap) = effects.movement_cap() {
        let moves = state.turn.moves(player).min(cap);
        state.turn.set_moves(player, moves);
    }
    events.push(SessionEvent::PersistentEffectAdded {
        player,
        card: card.clone(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::NearestPlayerEffect;
    use crate::state::{CharacterId, CharacterStats, PlayerSession, TurnState};

    fn seated(ids: &[u32]) -> GameState {
        let mut state = GameState::default();
        for id in ids {
            state.players.push(PlayerSession::new(
                PlayerId(*id),
                CharacterId::new("c"),
                RoomId::new("entrance-hall"),
                CharacterStats::new(3, 3, 3, 3),
            ));
        }
        state.turn = TurnState::new(ids.iter().copied().map(PlayerId).collect());
        state
    }

    #[test]
    fn neighbour_skips_the_dead() {
        let mut state = seated(&[1, 2, 3]);
        state.player_mut(PlayerId(2)).unwrap().dead = true;
        assert_eq!(living_neighbour(&state, PlayerId(1), false), Some(PlayerId(3)));
        assert_eq!(living_neighbour(&state, PlayerId(1), true), Some(PlayerId(3)));
    }

    #[test]
    fn persistent_cards_do_not_stack() {
        let mut state = seated(&[1, 2, 3]);
        let mut events = Vec::new();
        let spec = PersistentSpec {
            on_turn_start: None,
            movement_restriction: None,
        };
        let card = CardId::new("creeping-doubt");
        add_persistent(&mut state, PlayerId(1), &card, &spec, &mut events);
        add_persistent(&mut state, PlayerId(1), &card, &spec, &mut events);
        assert_eq!(state.effects(PlayerId(1)).unwrap().persistent.len(), 1);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn nearest_player_takes_its_own_stat_change() {
        let mut state = seated(&[1, 2, 3]);
        state.player_mut(PlayerId(2)).unwrap().room = RoomId::new("attic");
        let outcome = Outcome::GainStat {
            stat: StatRef::Fixed(Stat::Knowledge),
            amount: 1,
            nearest_player: Some(NearestPlayerEffect {
                gain: false,
                stat: Stat::Sanity,
                amount: 2,
            }),
        };
        let mut events = Vec::new();
        let steps = apply_outcome(
            &mut state,
            &GameEnv::empty(),
            PlayerId(1),
            &CardId::new("grave-dirt"),
            &outcome,
            None,
            &mut events,
        );
        assert!(steps.is_empty());

        let stats = |id| state.player(PlayerId(id)).unwrap().stats;
        assert_eq!(stats(1).index(Stat::Knowledge), 4);
        assert_eq!(stats(1).index(Stat::Sanity), 3);
        // Player 3 shares the roller's room; player 2 cannot be reached.
        assert_eq!(stats(3).index(Stat::Sanity), 1);
        assert_eq!(stats(3).index(Stat::Knowledge), 3);
        assert_eq!(stats(2), CharacterStats::new(3, 3, 3, 3));
    }
}
