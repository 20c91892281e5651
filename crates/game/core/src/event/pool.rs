//! Dice pools and target selection for event rolls.

use crate::engine::FizzleReason;
use crate::env::{EventCard, GameEnv, MultiPlayerSpec, RollSpec};
use crate::state::{GameState, PlayerId, RollPool, Stat};
use crate::stats::current_value;

/// Dice for `stat`: the trait's current track value.
pub fn stat_pool(
    state: &GameState,
    env: &GameEnv<'_>,
    player: PlayerId,
    stat: Stat,
) -> Result<u8, FizzleReason> {
    let session = state
        .player(player)
        .ok_or(FizzleReason::UnknownPlayer(player))?;
    let character = env
        .characters()
        .ok()
        .and_then(|roster| roster.character(&session.character))
        .ok_or_else(|| FizzleReason::UnknownCharacter(session.character.to_string()))?;
    Ok(current_value(session, character, stat))
}

/// Another living player stands in the chapel.
pub fn chapel_occupied(state: &GameState, env: &GameEnv<'_>, player: PlayerId) -> bool {
    let Ok(config) = env.config() else {
        return false;
    };
    state
        .living_players()
        .any(|other| other.id != player && other.room == config.chapel_room.as_str())
}

/// Pool for an event card's roll, with chapel and room modifiers applied.
pub fn event_pool(
    state: &GameState,
    env: &GameEnv<'_>,
    player: PlayerId,
    card: &EventCard,
) -> Result<RollPool, FizzleReason> {
    let bonus = card
        .chapel_bonus
        .as_ref()
        .filter(|_| chapel_occupied(state, env, player))
        .map_or(0, |bonus| bonus.add_dice);
    let reduction = card
        .room_modifier
        .as_ref()
        .filter(|modifier| state.player(player).is_some_and(|p| p.room == modifier.room))
        .map_or(0, |modifier| modifier.dice_reduction);
    let adjust = |dice: u8| -> u8 {
        let dice = dice.saturating_add(bonus);
        if reduction == 0 {
            dice
        } else {
            dice.saturating_sub(reduction).max(1)
        }
    };

    match &card.roll {
        Some(RollSpec::Stat(stat)) => Ok(RollPool::stat(*stat, adjust(stat_pool(state, env, player, *stat)?))),
        Some(RollSpec::ChooseStat(options)) => {
            let mut choices = Vec::with_capacity(options.len());
            for stat in options {
                choices.push((*stat, adjust(stat_pool(state, env, player, *stat)?)));
            }
            Ok(RollPool::Choose(choices))
        }
        Some(RollSpec::Fixed(dice)) => Ok(RollPool::fixed(adjust(*dice))),
        None => Ok(RollPool::fixed(0)),
    }
}

/// Living players other than `roller` a multi-player card reaches, in turn
/// order.
///
/// A player qualifies when every filter the card sets holds: the floor
/// matches, and the room is listed or has an outdoor window when either room
/// filter is present.
pub fn multi_player_targets(
    state: &GameState,
    env: &GameEnv<'_>,
    roller: PlayerId,
    spec: &MultiPlayerSpec,
) -> Vec<PlayerId> {
    let rooms = env.rooms().ok();
    let room_filter = !spec.affected_rooms.is_empty() || spec.outdoor_window;

    state
        .turn
        .order
        .iter()
        .filter(|id| **id != roller)
        .filter_map(|id| state.player(*id))
        .filter(|player| player.is_alive())
        .filter(|player| {
            let Some(tile) = state.map.room(&player.room) else {
                return false;
            };
            if spec.affected_floor.is_some_and(|floor| floor != tile.floor) {
                return false;
            }
            if !room_filter {
                return true;
            }
            let listed = spec.affected_rooms.contains(&player.room);
            let window = spec.outdoor_window
                && rooms
                    .and_then(|rooms| rooms.room(&player.room))
                    .is_some_and(|def| def.outdoor_window);
            listed || window
        })
        .map(|player| player.id)
        .collect()
}
