//! End-to-end rule scenarios driven through `apply_intent` against the
//! builtin catalogs.

mod common;

use common::{OX, Table, VIVIAN, ZOE, roll};
use game_content::{CardDeck, RoomCatalog, builtin_rooms};
use game_core::env::{
    AllyFailure, EventCard, Outcome, OutcomeEntry, OutcomeTable, RollRange, RollSpec, RoomEffect,
    RoomFailure, RoomTrigger, StatRef, TrappedSpec,
};
use game_core::map::{build_tile, place_tile};
use game_core::state::{DoorSet, GridPos, Passage, RollPool, TrappedRecord};
use game_core::{
    CardDefinition, CardId, CardKind, Direction, Floor, GameState, Intent, Prompt, ReleaseReason,
    RoomId, RoomOracle, Rotation, SessionEvent, Stat,
};

const LAB: &str = "operating-laboratory";

/// Ox walks west out of the Entrance Hall and reveals the Operating
/// Laboratory turned a quarter anticlockwise: its doors face north and east.
fn reveal_lab(table: &Table, state: &mut GameState) -> Vec<SessionEvent> {
    table.act(
        state,
        OX,
        Intent::Move {
            direction: Direction::West,
        },
    );
    assert!(matches!(
        state.prompt,
        Some(Prompt::RoomDiscovery {
            player: OX,
            direction: Direction::West,
            free_choice: false,
            ..
        })
    ));
    table.act(
        state,
        OX,
        Intent::SelectRoomTile {
            room: RoomId::new(LAB),
            rotation: Rotation::Deg270,
        },
    )
}

#[test]
fn wall_facing_door_is_pruned_on_placement() {
    let table = Table::builtin();
    let mut state = table.start();
    let chute = table
        .rooms
        .room(&RoomId::new("coal-chute"))
        .expect("coal chute is in the catalog");
    place_tile(
        &mut state.map,
        build_tile(chute, Floor::Ground, GridPos::new(-1, 1), Rotation::Deg0),
    );
    assert_eq!(state.turn.moves(OX), 4);

    let events = reveal_lab(&table, &mut state);

    let lab = RoomId::new(LAB);
    let tile = state.map.room(&lab).expect("lab is placed");
    assert_eq!(tile.position, GridPos::new(-1, 0));
    assert_eq!(tile.doors, DoorSet::of(Direction::East));
    assert_eq!(state.map.connection(&lab, Direction::North), None);
    assert_eq!(
        state.map.connection(&RoomId::new("entrance-hall"), Direction::West),
        Some(&lab)
    );

    assert!(events.iter().any(|event| matches!(
        event,
        SessionEvent::RoomDiscovered { room, rotation: Rotation::Deg270, .. } if *room == lab
    )));
    assert_eq!(state.player(OX).map(|p| p.room.clone()), Some(lab.clone()));
    assert_eq!(state.turn.moves(OX), 3);
    assert!(matches!(
        state.prompt,
        Some(Prompt::DrawCard {
            player: OX,
            kind: CardKind::Event,
            ..
        })
    ));
}

fn ranged_card() -> CardDefinition {
    let entries = vec![
        OutcomeEntry::new(
            RollRange::Between(0, 3),
            Outcome::LoseStat {
                stat: StatRef::Fixed(Stat::Sanity),
                amount: 1,
            },
        ),
        OutcomeEntry::new(RollRange::Between(4, 5), Outcome::Nothing),
        OutcomeEntry::new(RollRange::AtLeast(6), Outcome::DrawItem { count: 1 }),
    ];
    CardDefinition {
        id: CardId::new("measured-silence"),
        name: "Measured Silence".into(),
        kind: CardKind::Event,
        event: Some(EventCard {
            roll: Some(RollSpec::Fixed(3)),
            table: OutcomeTable::Ranges(entries),
            ..EventCard::default()
        }),
    }
}

#[test]
fn roll_of_four_selects_the_first_matching_range() {
    let table = Table::with_cards(CardDeck::new(vec![ranged_card()]));
    let mut state = table.start();
    reveal_lab(&table, &mut state);

    table.act(
        &mut state,
        OX,
        Intent::SelectCard {
            card: CardId::new("measured-silence"),
        },
    );
    assert!(matches!(
        state.prompt,
        Some(Prompt::EventRoll { player: OX, .. })
    ));

    let stats_before = state.player(OX).map(|p| p.stats);
    let events = table.act(&mut state, OX, roll(&[2, 2, 0]));

    let applied: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            SessionEvent::OutcomeApplied { outcome, .. } => Some(outcome.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(applied, vec![Outcome::Nothing]);
    assert!(events.iter().any(|event| matches!(
        event,
        SessionEvent::DiceRolled { total: 4, .. }
    )));
    assert_eq!(state.player(OX).map(|p| p.stats), stats_before);
    assert_eq!(state.prompt, None);
}

#[test]
fn tied_fight_deals_no_damage() {
    let table = Table::builtin();
    let mut state = table.start();
    table.act(
        &mut state,
        OX,
        Intent::TriggerHaunt {
            scenario: 4,
            traitor: ZOE,
            omen: None,
            room: None,
        },
    );
    if let Some(zoe) = state.player_mut(ZOE) {
        zoe.room = RoomId::new("foyer");
    }
    let stats_before: Vec<_> = state.players.iter().map(|p| p.stats).collect();

    let events = table.act(
        &mut state,
        OX,
        Intent::Move {
            direction: Direction::North,
        },
    );
    assert!(events.iter().any(|event| matches!(
        event,
        SessionEvent::CombatStarted { attacker: OX, defender: ZOE, .. }
    )));
    let combat = state.combat.as_ref().expect("entering the traitor's room starts a fight");
    assert_eq!(combat.attacker.dice, 5);
    assert_eq!(combat.defender.dice, 3);

    table.act(&mut state, OX, Intent::ConfirmCombat { engage: true });
    table.act(
        &mut state,
        OX,
        Intent::ConfirmCombatRoll {
            dice: vec![1, 1, 0, 0, 0],
        },
    );
    assert_eq!(state.awaited_player(), Some(ZOE));
    let events = table.act(
        &mut state,
        ZOE,
        Intent::ConfirmCombatRoll {
            dice: vec![2, 0, 0],
        },
    );

    let result = events
        .iter()
        .find_map(|event| match event {
            SessionEvent::CombatResolved { result, .. } => Some(*result),
            _ => None,
        })
        .expect("the fight resolves on the defender's roll");
    assert_eq!((result.attacker_total, result.defender_total), (2, 2));
    assert_eq!(result.damage, 0);
    assert_eq!(result.winner, None);
    assert_eq!(result.loser, None);

    assert!(state.combat.is_none());
    assert_eq!(state.prompt, None);
    assert_eq!(
        state.players.iter().map(|p| p.stats).collect::<Vec<_>>(),
        stats_before
    );
    assert!(!events
        .iter()
        .any(|event| matches!(event, SessionEvent::StatChanged { .. })));
    assert_eq!(state.awaited_player(), Some(OX));
}

#[test]
fn third_failed_escape_releases_the_player() {
    let table = Table::builtin();
    let mut state = table.start();
    let spec = TrappedSpec {
        escape_stat: Stat::Might,
        threshold: 6,
        auto_escape_after: Some(3),
        ally_can_help: false,
        ally_failure: AllyFailure::Nothing,
    };
    state.effects_mut(ZOE).trapped = Some(TrappedRecord::from_spec(
        CardId::new("webs"),
        &spec,
        table.config.default_auto_escape_after,
    ));

    table.act(&mut state, OX, Intent::EndTurn);
    for attempt in 1..=3u8 {
        assert!(matches!(
            state.prompt,
            Some(Prompt::TrappedEscape { player: ZOE, threshold: 6, .. })
        ));
        assert_eq!(state.turn.moves(ZOE), 0);

        let events = table.act(&mut state, ZOE, roll(&[0, 0, 0]));
        let released = events.iter().any(|event| {
            matches!(
                event,
                SessionEvent::PlayerReleased {
                    player: ZOE,
                    reason: ReleaseReason::AutoReleased
                }
            )
        });
        assert_eq!(released, attempt == 3, "attempt {attempt}");
        assert_eq!(state.awaited_player(), Some(VIVIAN));

        if attempt < 3 {
            assert_eq!(
                state.effects(ZOE).and_then(|e| e.trapped.as_ref()).map(|t| t.turns_trapped),
                Some(attempt)
            );
            table.act(&mut state, VIVIAN, Intent::EndTurn);
            table.act(&mut state, OX, Intent::EndTurn);
        }
    }
    assert!(!state.is_trapped(ZOE));
}

/// Ox stands at the foot of the stairs; the Upper Landing demands a Speed
/// roll of 8 from anyone coming up.
fn guarded_landing() -> (Table, GameState) {
    let mut rooms = builtin_rooms();
    let landing = rooms
        .iter_mut()
        .find(|room| room.id == RoomId::new("upper-landing"))
        .expect("upper landing is a starting tile");
    landing.effect = Some(RoomEffect {
        trigger: RoomTrigger::Enter,
        stat: Stat::Speed,
        target: 8,
        failure: RoomFailure::StopMoving,
        continue_on_failure: false,
    });
    let table = Table {
        rooms: RoomCatalog::new(rooms),
        ..Table::builtin()
    };
    let mut state = table.start();
    if let Some(ox) = state.player_mut(OX) {
        ox.room = RoomId::new("grand-staircase");
    }
    (table, state)
}

fn landing_roll_dice(state: &GameState) -> usize {
    match &state.prompt {
        Some(Prompt::RoomEffectRoll {
            player: OX,
            room,
            trigger: RoomTrigger::Enter,
            via: Passage::Stairs,
            target: 8,
            pool: RollPool::Single { dice, .. },
        }) if *room == RoomId::new("upper-landing") => usize::from(*dice),
        other => panic!("expected the landing roll, got {other:?}"),
    }
}

#[test]
fn stairs_stop_for_the_landing_roll_and_climb_once_it_passes() {
    let (table, mut state) = guarded_landing();
    let staircase = RoomId::new("grand-staircase");

    let events = table.act(&mut state, OX, Intent::UseStairs);
    let dice = landing_roll_dice(&state);
    assert_eq!(dice, 4);
    assert_eq!(state.player(OX).map(|p| p.room.clone()), Some(staircase));
    assert_eq!(state.turn.moves(OX), 4);
    assert!(!events
        .iter()
        .any(|event| matches!(event, SessionEvent::PlayerMoved { .. })));

    let events = table.act(&mut state, OX, roll(&vec![2; dice]));
    assert!(events.iter().any(|event| matches!(
        event,
        SessionEvent::RoomEffectResolved { player: OX, passed: true, .. }
    )));
    assert_eq!(
        state.player(OX).map(|p| p.room.clone()),
        Some(RoomId::new("upper-landing"))
    );
    assert_eq!(state.turn.moves(OX), 3);
    assert_eq!(state.prompt, None);
}

#[test]
fn failed_landing_roll_leaves_the_climber_below() {
    let (table, mut state) = guarded_landing();
    table.act(&mut state, OX, Intent::UseStairs);
    let dice = landing_roll_dice(&state);

    let events = table.act(&mut state, OX, roll(&vec![0; dice]));
    assert!(events.iter().any(|event| matches!(
        event,
        SessionEvent::RoomEffectResolved { player: OX, passed: false, .. }
    )));
    assert_eq!(
        state.player(OX).map(|p| p.room.clone()),
        Some(RoomId::new("grand-staircase"))
    );
    assert_eq!(state.turn.moves(OX), 0);
    assert_eq!(state.awaited_player(), Some(ZOE));
}

#[test]
fn rejected_intent_leaves_the_snapshot_untouched() {
    let table = Table::builtin();
    let state = table.start();
    let error = game_core::apply_intent(
        &state,
        &table.env(),
        ZOE,
        &Intent::Move {
            direction: Direction::North,
        },
    )
    .unwrap_err();
    assert_eq!(game_core::GameError::error_code(&error), "NOT_YOUR_TURN");
    assert_eq!(state, table.start());
}
