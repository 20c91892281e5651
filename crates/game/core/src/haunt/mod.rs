//! Factions, deaths and the win condition.
//!
//! The Haunt is triggered from outside the rules (an omen or scenario
//! decision reaches the engine as an intent). Once factions are assigned
//! they never change, and a recorded game over is terminal.

use crate::engine::SessionEvent;
use crate::state::{Faction, GameOver, GameState, HauntRecord, PlayerId, Winner};

/// Starts the Haunt: `traitor` turns, everyone else survives.
///
/// Returns `false` if a Haunt is already recorded.
pub fn begin_haunt(state: &mut GameState, record: HauntRecord) -> bool {
    if state.haunt.is_some() {
        return false;
    }
    for player in &mut state.players {
        player.faction = if player.id == record.traitor {
            Faction::Traitor
        } else {
            Faction::Survivor
        };
    }
    state.haunt = Some(record);
    true
}

/// Flags `player` dead if any track reached 0 and runs the win check.
///
/// Idempotent: a player already flagged dead produces nothing.
pub fn check_death(state: &mut GameState, player: PlayerId, events: &mut Vec<SessionEvent>) {
    let Some(session) = state.player_mut(player) else {
        return;
    };
    if session.dead || !session.stats.any_at_zero() {
        return;
    }
    session.dead = true;
    events.push(SessionEvent::PlayerDied { player });

    state.turn.moves_by_player.insert(player, 0);
    if let Some(effects) = state.pending_effects_by_player.get_mut(&player) {
        effects.trapped = None;
    }
    state.agenda.retain(|step| step.player() != player);
    if state.prompt.as_ref().is_some_and(|prompt| prompt.player() == player) {
        state.prompt = None;
    }
    if state.combat.as_ref().is_some_and(|combat| combat.involves(player)) {
        state.combat = None;
    }

    if let Some(over) = check_win(state) {
        events.push(SessionEvent::GameOver {
            winner: over.winner,
            dead_players: over.dead_players,
        });
    }
}

/// Evaluates the win condition and records a result the first time one holds.
///
/// Survivors win once the traitor is dead; the traitor wins once every
/// survivor is dead. Returns the newly recorded result only.
pub fn check_win(state: &mut GameState) -> Option<GameOver> {
    let haunt = state.haunt.as_ref()?;
    if haunt.game_over.is_some() {
        return None;
    }

    let traitor_dead = state
        .player(haunt.traitor)
        .is_none_or(|traitor| traitor.dead);
    let survivors_dead = state
        .players
        .iter()
        .filter(|player| player.faction == Faction::Survivor)
        .all(|player| player.dead);

    let winner = if traitor_dead {
        Winner::Survivors
    } else if survivors_dead {
        Winner::Traitor
    } else {
        return None;
    };

    let over = GameOver {
        winner,
        dead_players: state
            .players
            .iter()
            .filter(|player| player.dead)
            .map(|player| player.id)
            .collect(),
    };
    if let Some(haunt) = state.haunt.as_mut() {
        haunt.game_over = Some(over.clone());
    }
    Some(over)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CharacterId, CharacterStats, PlayerSession, RoomId};

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
        begin_haunt(
            &mut state,
            HauntRecord {
                scenario: 7,
                traitor: PlayerId(2),
                triggered_by: PlayerId(1),
                omen: None,
                room: None,
                game_over: None,
            },
        );
        state
    }

    fn kill(state: &mut GameState, id: u32, events: &mut Vec<SessionEvent>) {
        state.player_mut(PlayerId(id)).unwrap().stats.might = 0;
        check_death(state, PlayerId(id), events);
    }

    #[test]
    fn factions_are_permanent() {
        let mut state = table();
        assert_eq!(state.player(PlayerId(2)).unwrap().faction, Faction::Traitor);
        assert_eq!(state.player(PlayerId(3)).unwrap().faction, Faction::Survivor);

        let again = HauntRecord {
            scenario: 1,
            traitor: PlayerId(3),
            triggered_by: PlayerId(3),
            omen: None,
            room: None,
            game_over: None,
        };
        assert!(!begin_haunt(&mut state, again));
        assert_eq!(state.player(PlayerId(2)).unwrap().faction, Faction::Traitor);
    }

    #[test]
    fn death_fires_once() {
        let mut state = table();
        let mut events = Vec::new();
        kill(&mut state, 1, &mut events);
        check_death(&mut state, PlayerId(1), &mut events);
        let deaths = events
            .iter()
            .filter(|event| matches!(event, SessionEvent::PlayerDied { .. }))
            .count();
        assert_eq!(deaths, 1);
        assert!(!state.is_game_over());
    }

    #[test]
    fn traitor_death_ends_for_survivors() {
        let mut state = table();
        let mut events = Vec::new();
        kill(&mut state, 2, &mut events);
        let over = state.haunt.as_ref().and_then(|h| h.game_over.clone()).unwrap();
        assert_eq!(over.winner, Winner::Survivors);
        assert_eq!(over.dead_players, vec![PlayerId(2)]);
    }

    #[test]
    fn all_survivors_dead_and_result_is_terminal() {
        let mut state = table();
        let mut events = Vec::new();
        kill(&mut state, 1, &mut events);
        kill(&mut state, 3, &mut events);
        assert!(state.is_game_over());

        kill(&mut state, 2, &mut events);
        let over = state.haunt.as_ref().and_then(|h| h.game_over.clone()).unwrap();
        assert_eq!(over.winner, Winner::Traitor);
        let finals = events
            .iter()
            .filter(|event| matches!(event, SessionEvent::GameOver { .. }))
            .count();
        assert_eq!(finals, 1);
    }

    #[test]
    fn no_winner_before_haunt() {
        let mut state = GameState::default();
        assert_eq!(check_win(&mut state), None);
    }
}
