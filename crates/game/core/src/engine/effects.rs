//! Small state mutations shared by transitions and the resolver.
//!
//! Each helper keeps its own bookkeeping consistent (death checks, combat
//! keys, zones) and reports what it did through `events`.

use crate::combat::release_keys;
use crate::haunt::check_death;
use crate::map::spawn_zone;
use crate::state::{CombatKind, CombatSession, GameState, PlayerId, Prompt, RoomId, Stat, Step};
use crate::stats::{StatChange, apply_stat_delta, set_to_lowest};

use super::events::{SessionEvent, TravelKind};

fn report_change(player: PlayerId, change: StatChange, events: &mut Vec<SessionEvent>) {
    if change.before != change.after {
        events.push(SessionEvent::StatChanged {
            player,
            stat: change.stat,
            before: change.before,
            after: change.after,
        });
    }
}

/// Moves `stat` by `delta` and runs the death check.
pub(crate) fn adjust_stat(
    state: &mut GameState,
    player: PlayerId,
    stat: Stat,
    delta: i16,
    events: &mut Vec<SessionEvent>,
) {
    let Some(session) = state.player_mut(player) else {
        return;
    };
    let change = apply_stat_delta(&mut session.stats, stat, delta);
    report_change(player, change, events);
    check_death(state, player, events);
}

/// Drops `stat` to index 0 and runs the death check.
pub(crate) fn lower_to_zero(
    state: &mut GameState,
    player: PlayerId,
    stat: Stat,
    events: &mut Vec<SessionEvent>,
) {
    let Some(session) = state.player_mut(player) else {
        return;
    };
    let change = set_to_lowest(&mut session.stats, stat);
    report_change(player, change, events);
    check_death(state, player, events);
}

/// Records an already-applied set of changes and runs the death check.
pub(crate) fn report_changes(
    state: &mut GameState,
    player: PlayerId,
    changes: Vec<StatChange>,
    events: &mut Vec<SessionEvent>,
) {
    for change in changes {
        report_change(player, change, events);
    }
    check_death(state, player, events);
}

/// Puts `player` into `to` without any entry checks.
///
/// Leaving a room forgets the fights the player had there.
pub(crate) fn relocate(
    state: &mut GameState,
    player: PlayerId,
    to: &RoomId,
    via: TravelKind,
    events: &mut Vec<SessionEvent>,
) {
    let zone = state
        .map
        .room(to)
        .and_then(|tile| tile.layout.as_ref())
        .map(spawn_zone);
    let Some(session) = state.player_mut(player) else {
        return;
    };
    let from = std::mem::replace(&mut session.room, to.clone());
    session.zone = zone;
    if !matches!(via, TravelKind::Door) {
        session.entry_direction = None;
    }
    if from != *to {
        release_keys(&mut state.completed_combats, &from, player);
    }
    events.push(SessionEvent::PlayerMoved {
        player,
        from,
        to: to.clone(),
        via,
    });
}

/// Makes `prompt` the awaited decision.
pub(crate) fn open_prompt(state: &mut GameState, prompt: Prompt, events: &mut Vec<SessionEvent>) {
    events.push(SessionEvent::PromptOpened {
        player: prompt.player(),
        prompt: prompt.name().to_string(),
    });
    state.prompt = Some(prompt);
}

/// Queues `steps` ahead of everything already waiting, keeping their order.
pub(crate) fn push_front(state: &mut GameState, steps: Vec<Step>) {
    for step in steps.into_iter().rev() {
        state.agenda.push_front(step);
    }
}

/// Opens a fight.
pub(crate) fn start_combat(state: &mut GameState, session: CombatSession, events: &mut Vec<SessionEvent>) {
    events.push(SessionEvent::CombatStarted {
        room: session.room.clone(),
        attacker: session.attacker.player,
        defender: session.defender.player,
        forced: matches!(session.kind, CombatKind::Forced { .. }),
    });
    state.combat = Some(session);
}
