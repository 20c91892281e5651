use game_content::Content;
use game_core::engine::FOYER;
use game_core::{Direction, Intent, PlayerId, RoomId, Seat, SessionEvent};
use runtime::{
    Event, Runtime, RuntimeConfig, RuntimeError, ScriptedProvider, SessionNotice, Topic,
};

fn seats() -> Vec<Seat> {
    vec![
        Seat::new(PlayerId(1), "ox-bellows"),
        Seat::new(PlayerId(2), "zoe-ingstrom"),
        Seat::new(PlayerId(3), "vivian-lopez"),
    ]
}

async fn start() -> Runtime {
    Runtime::builder()
        .config(RuntimeConfig {
            game_seed: 7,
            ..RuntimeConfig::default()
        })
        .content(Content::builtin())
        .players(seats())
        .build()
        .await
        .expect("runtime should start")
}

#[tokio::test]
async fn move_then_end_turn_hands_off() {
    let runtime = start().await;
    let handle = runtime.handle();
    let mut session = handle.subscribe(Topic::Session);
    let mut turns = handle.subscribe(Topic::Turn);

    assert_eq!(handle.awaiting().await.unwrap(), Some(PlayerId(1)));

    let events = handle
        .submit_intent(
            PlayerId(1),
            Intent::Move {
                direction: Direction::North,
            },
        )
        .await
        .unwrap();
    assert!(events.iter().any(|event| matches!(
        event,
        SessionEvent::PlayerMoved { player: PlayerId(1), to, .. } if *to == RoomId::new(FOYER)
    )));

    let Event::Session(SessionNotice::IntentApplied {
        nonce, state_root, ..
    }) = session.recv().await.unwrap()
    else {
        panic!("expected an applied intent");
    };
    assert_eq!(nonce, 1);
    assert_eq!(state_root.len(), 64);

    handle.submit_intent(PlayerId(1), Intent::EndTurn).await.unwrap();

    let Event::Turn(turn) = turns.recv().await.unwrap() else {
        panic!("expected a turn event");
    };
    assert!(matches!(
        turn.event,
        SessionEvent::TurnAdvanced {
            player: PlayerId(2),
            ..
        }
    ));
    assert_eq!(turn.nonce, 2);
    assert_eq!(handle.awaiting().await.unwrap(), Some(PlayerId(2)));

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.player(PlayerId(1)).unwrap().room, RoomId::new(FOYER));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn out_of_turn_intent_is_rejected_and_broadcast() {
    let runtime = start().await;
    let handle = runtime.handle();
    let mut session = handle.subscribe(Topic::Session);

    let error = handle
        .submit_intent(PlayerId(2), Intent::EndTurn)
        .await
        .unwrap_err();
    assert_eq!(error.rejection_code(), Some("NOT_YOUR_TURN"));

    let Event::Session(SessionNotice::IntentRejected { player, code, nonce, .. }) =
        session.recv().await.unwrap()
    else {
        panic!("expected a rejection");
    };
    assert_eq!(player, PlayerId(2));
    assert_eq!(code, "NOT_YOUR_TURN");
    assert_eq!(nonce, 0);
    assert_eq!(handle.query_state().await.unwrap().nonce, 0);
}

#[tokio::test]
async fn scripted_providers_drive_the_table() {
    let mut runtime = start().await;
    for seat in seats() {
        runtime.set_provider(seat.player, ScriptedProvider::new([Intent::EndTurn]));
    }

    for _ in 0..3 {
        runtime.step().await.unwrap();
    }
    let handle = runtime.handle();
    assert_eq!(handle.awaiting().await.unwrap(), Some(PlayerId(1)));
    assert_eq!(handle.query_state().await.unwrap().turn.round, 1);

    assert!(matches!(
        runtime.step().await,
        Err(RuntimeError::ScriptExhausted {
            player: PlayerId(1)
        })
    ));
}

#[tokio::test]
async fn haunt_reaches_its_topic() {
    let runtime = start().await;
    let handle = runtime.handle();
    let mut haunt = handle.subscribe(Topic::Haunt);

    handle
        .submit_intent(
            PlayerId(1),
            Intent::TriggerHaunt {
                scenario: 12,
                traitor: PlayerId(3),
                omen: None,
                room: None,
            },
        )
        .await
        .unwrap();

    let Event::Haunt(event) = haunt.recv().await.unwrap() else {
        panic!("expected a haunt event");
    };
    assert!(matches!(
        event.event,
        SessionEvent::HauntBegan {
            scenario: 12,
            traitor: PlayerId(3)
        }
    ));
}

#[tokio::test]
async fn builder_requires_content_and_seats() {
    assert!(matches!(
        Runtime::builder().players(seats()).build().await,
        Err(RuntimeError::MissingContent)
    ));
    assert!(matches!(
        Runtime::builder().content(Content::builtin()).build().await,
        Err(RuntimeError::SessionNotStarted)
    ));
    assert!(matches!(
        Runtime::builder()
            .content(Content::builtin())
            .players(seats().into_iter().take(2))
            .build()
            .await,
        Err(RuntimeError::Setup(_))
    ));
}
