//! Table fixtures shared by the scenario and property tests.
#![allow(dead_code)]

use game_content::{CardDeck, CharacterRoster, Content, RoomCatalog};
use game_core::{
    Env, GameConfig, GameEnv, GameState, Intent, PcgRng, PlayerId, Seat, SessionEvent,
    apply_intent, new_session,
};

pub const OX: PlayerId = PlayerId(1);
pub const ZOE: PlayerId = PlayerId(2);
pub const VIVIAN: PlayerId = PlayerId(3);

pub fn seats() -> Vec<Seat> {
    vec![
        Seat::new(OX, "ox-bellows"),
        Seat::new(ZOE, "zoe-ingstrom"),
        Seat::new(VIVIAN, "vivian-lopez"),
    ]
}

/// Reference data plus the stateless rng, borrowed by every env.
pub struct Table {
    pub rooms: RoomCatalog,
    pub characters: CharacterRoster,
    pub cards: CardDeck,
    pub config: GameConfig,
    pub rng: PcgRng,
}

impl Table {
    pub fn builtin() -> Self {
        let content = Content::builtin();
        Self {
            rooms: content.rooms,
            characters: content.characters,
            cards: content.cards,
            config: content.config,
            rng: PcgRng,
        }
    }

    pub fn with_cards(cards: CardDeck) -> Self {
        Self {
            cards,
            ..Self::builtin()
        }
    }

    pub fn env(&self) -> GameEnv<'_> {
        Env::with_all(
            &self.rooms,
            &self.characters,
            &self.cards,
            &self.rng,
            &self.config,
        )
        .into_game_env()
    }

    pub fn start(&self) -> GameState {
        new_session(&self.env(), &seats(), 11).expect("three seats are a valid table")
    }

    /// Applies `intent` and commits the new snapshot, panicking on rejection.
    pub fn act(&self, state: &mut GameState, player: PlayerId, intent: Intent) -> Vec<SessionEvent> {
        let (next, events) = apply_intent(state, &self.env(), player, &intent)
            .unwrap_or_else(|error| panic!("{} rejected: {error}", intent.as_snake_case()));
        *state = next;
        events
    }
}

pub fn roll(dice: &[u8]) -> Intent {
    Intent::SubmitRoll {
        dice: dice.to_vec(),
        stat: None,
    }
}
