//! Laws that must hold for every session, checked on concrete tables.

mod common;

use common::{OX, Table, VIVIAN, ZOE};
use game_core::combat::resolve;
use game_core::haunt::{begin_haunt, check_death, check_win};
use game_core::map::discover_room;
use game_core::state::{CharacterStats, HauntRecord, Winner};
use game_core::stats::{apply_stat_delta, is_dead};
use game_core::{
    Direction, GameState, Intent, PlayerId, RoomId, RoomOracle, Rotation, SessionEvent, Stat,
};

fn reveal(table: &Table, state: &mut GameState, room: &str, from: &str, direction: Direction) {
    let def = table
        .rooms
        .room(&RoomId::new(room))
        .expect("room is in the catalog");
    discover_room(
        &mut state.map,
        def,
        &RoomId::new(from),
        direction,
        Rotation::Deg0,
        false,
    )
    .expect("tile fits");
}

#[test]
fn connections_are_reciprocal_and_backed_by_doors() {
    let table = Table::builtin();
    let mut state = table.start();
    reveal(&table, &mut state, "creaky-hallway", "foyer", Direction::East);
    // Lands south of the creaky hallway and links to it without a move.
    reveal(&table, &mut state, "dusty-hallway", "entrance-hall", Direction::East);
    reveal(&table, &mut state, "gallery", "upper-landing", Direction::North);

    assert_eq!(
        state.map.connection(&RoomId::new("dusty-hallway"), Direction::North),
        Some(&RoomId::new("creaky-hallway"))
    );

    let mut checked = 0;
    for tile in state.map.rooms.values() {
        for (direction, neighbour) in state.map.neighbors(&tile.id) {
            let other = state.map.room(neighbour).expect("neighbour is revealed");
            assert_eq!(
                state.map.connection(neighbour, direction.opposite()),
                Some(&tile.id),
                "{} -> {direction}",
                tile.id
            );
            assert!(tile.doors.has(direction));
            assert!(other.doors.has(direction.opposite()));
            checked += 1;
        }
    }
    assert!(checked >= 10, "only {checked} links walked");
}

#[test]
fn stat_indices_stay_on_the_track() {
    for delta in [i16::MIN, -100, -8, -1, 0, 1, 7, 100, i16::MAX] {
        for stat in Stat::ALL {
            let mut stats = CharacterStats::new(3, 4, 5, 6);
            let change = apply_stat_delta(&mut stats, stat, delta);
            assert!(change.after <= 7, "{stat} {delta}");
            assert_eq!(stats.index(stat), change.after);
        }
    }
}

#[test]
fn death_is_recorded_once() {
    let table = Table::builtin();
    let mut state = table.start();
    let mut events = Vec::new();

    let zoe = state.player_mut(ZOE).expect("seated");
    assert!(apply_stat_delta(&mut zoe.stats, Stat::Sanity, -20).reached_zero());
    assert!(is_dead(&zoe.stats));
    check_death(&mut state, ZOE, &mut events);
    check_death(&mut state, ZOE, &mut events);

    // A second track hitting the skull does not kill twice.
    let zoe = state.player_mut(ZOE).expect("seated");
    assert!(apply_stat_delta(&mut zoe.stats, Stat::Might, -20).reached_zero());
    check_death(&mut state, ZOE, &mut events);

    let deaths = events
        .iter()
        .filter(|event| matches!(event, SessionEvent::PlayerDied { player: ZOE }))
        .count();
    assert_eq!(deaths, 1);
    assert_eq!(state.turn.moves(ZOE), 0);
}

#[test]
fn damage_is_the_difference_and_ties_have_no_loser() {
    for attacker in 0..=8u8 {
        for defender in 0..=8u8 {
            let result = resolve(OX, attacker, ZOE, defender);
            assert_eq!(result.damage, attacker.abs_diff(defender));
            match attacker.cmp(&defender) {
                std::cmp::Ordering::Greater => {
                    assert_eq!((result.winner, result.loser), (Some(OX), Some(ZOE)))
                }
                std::cmp::Ordering::Less => {
                    assert_eq!((result.winner, result.loser), (Some(ZOE), Some(OX)))
                }
                std::cmp::Ordering::Equal => {
                    assert_eq!((result.winner, result.loser, result.damage), (None, None, 0))
                }
            }
        }
    }
}

fn haunted(traitor: PlayerId) -> GameState {
    let mut state = Table::builtin().start();
    assert!(begin_haunt(
        &mut state,
        HauntRecord {
            scenario: 1,
            traitor,
            triggered_by: OX,
            omen: None,
            room: None,
            game_over: None,
        },
    ));
    state
}

fn kill(state: &mut GameState, players: &[PlayerId]) {
    for id in players {
        if let Some(player) = state.player_mut(*id) {
            player.dead = true;
        }
    }
}

#[test]
fn win_condition_follows_the_factions() {
    let mut state = haunted(VIVIAN);
    assert_eq!(check_win(&mut state), None);
    kill(&mut state, &[OX]);
    assert_eq!(check_win(&mut state), None);

    kill(&mut state, &[ZOE]);
    let over = check_win(&mut state).expect("every survivor is dead");
    assert_eq!(over.winner, Winner::Traitor);
    assert_eq!(over.dead_players, vec![OX, ZOE]);
    assert!(state.is_game_over());
    assert_eq!(check_win(&mut state), None);

    let mut state = haunted(VIVIAN);
    kill(&mut state, &[ZOE, VIVIAN]);
    assert_eq!(
        check_win(&mut state).map(|over| over.winner),
        Some(Winner::Survivors)
    );
}

#[test]
fn traitor_death_ends_the_game_through_the_death_check() {
    let mut state = haunted(ZOE);
    let mut events = Vec::new();
    if let Some(zoe) = state.player_mut(ZOE) {
        apply_stat_delta(&mut zoe.stats, Stat::Knowledge, -7);
    }
    check_death(&mut state, ZOE, &mut events);
    assert!(events.iter().any(|event| matches!(
        event,
        SessionEvent::GameOver {
            winner: Winner::Survivors,
            ..
        }
    )));
}

#[test]
fn turn_budget_only_shrinks_until_the_turn_passes() {
    let table = Table::builtin();
    let mut state = table.start();
    let mut budget = state.turn.moves(OX);
    assert_eq!(budget, 4);

    let walk = [Direction::North, Direction::South, Direction::North];
    for direction in walk {
        let events = table.act(&mut state, OX, Intent::Move { direction });
        assert!(!events.iter().any(SessionEvent::is_turn_event));
        let moves = state.turn.moves(OX);
        assert!(moves < budget);
        budget = moves;
    }
    assert_eq!(budget, 1);

    let events = table.act(
        &mut state,
        OX,
        Intent::Move {
            direction: Direction::South,
        },
    );
    assert_eq!(state.turn.moves(OX), 0);
    assert!(events.iter().any(|event| matches!(
        event,
        SessionEvent::TurnAdvanced {
            player: ZOE,
            moves: 4,
            ..
        }
    )));
    assert_eq!(state.awaited_player(), Some(ZOE));
}
