//! Traits describing read-only reference data.
//!
//! Oracles expose the room catalog, character trait tracks and card decks.
//! The [`Env`] aggregate bundles them with the RNG and the session config so
//! the engine can reach everything it needs without depending on a concrete
//! content crate.
mod cards;
mod characters;
mod error;
mod rng;
mod rooms;

pub use cards::{
    AllyFailure, CardDefinition, CardOracle, ChapelBonus, EventCard, ForcedTarget,
    MovementRestriction, MultiPlayerSpec, NearestPlayerEffect, OmenComparison, Outcome,
    OutcomeEntry, OutcomeTable, PersistentSpec, QueueTarget, RemoveCondition, RollRange,
    RollRangeParseError, RollSpec, RoomModifier, StatRef, TrappedSpec, TurnStartPenalty,
};
pub use characters::{CharacterDefinition, CharacterOracle, TraitTrack};
pub use error::OracleError;
pub use rng::{PcgRng, RngOracle, compute_seed, context as rng_context};
pub use rooms::{RoomDefinition, RoomEffect, RoomFailure, RoomOracle, RoomTrigger};

use crate::config::GameConfig;

/// Aggregates read-only oracles required by the engine.
pub struct Env<'a, R, C, K, G>
where
    R: RoomOracle + ?Sized,
    C: CharacterOracle + ?Sized,
    K: CardOracle + ?Sized,
    G: RngOracle + ?Sized,
{
    rooms: Option<&'a R>,
    characters: Option<&'a C>,
    cards: Option<&'a K>,
    rng: Option<&'a G>,
    config: Option<&'a GameConfig>,
}

pub type GameEnv<'a> = Env<
    'a,
    dyn RoomOracle + 'a,
    dyn CharacterOracle + 'a,
    dyn CardOracle + 'a,
    dyn RngOracle + 'a,
>;

// References are always copyable, whatever the oracle types are.
impl<R, C, K, G> Clone for Env<'_, R, C, K, G>
where
    R: RoomOracle + ?Sized,
    C: CharacterOracle + ?Sized,
    K: CardOracle + ?Sized,
    G: RngOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, C, K, G> Copy for Env<'_, R, C, K, G>
where
    R: RoomOracle + ?Sized,
    C: CharacterOracle + ?Sized,
    K: CardOracle + ?Sized,
    G: RngOracle + ?Sized,
{
}

impl<'a, R, C, K, G> Env<'a, R, C, K, G>
where
    R: RoomOracle + ?Sized,
    C: CharacterOracle + ?Sized,
    K: CardOracle + ?Sized,
    G: RngOracle + ?Sized,
{
    pub fn new(
        rooms: Option<&'a R>,
        characters: Option<&'a C>,
        cards: Option<&'a K>,
        rng: Option<&'a G>,
        config: Option<&'a GameConfig>,
    ) -> Self {
        Self {
            rooms,
            characters,
            cards,
            rng,
            config,
        }
    }

    pub fn with_all(
        rooms: &'a R,
        characters: &'a C,
        cards: &'a K,
        rng: &'a G,
        config: &'a GameConfig,
    ) -> Self {
        Self::new(
            Some(rooms),
            Some(characters),
            Some(cards),
            Some(rng),
            Some(config),
        )
    }

    pub fn empty() -> Self {
        Self {
            rooms: None,
            characters: None,
            cards: None,
            rng: None,
            config: None,
        }
    }

    /// Returns the RoomOracle, or an error if not available.
    pub fn rooms(&self) -> Result<&'a R, OracleError> {
        self.rooms.ok_or(OracleError::RoomsNotAvailable)
    }

    /// Returns the CharacterOracle, or an error if not available.
    pub fn characters(&self) -> Result<&'a C, OracleError> {
        self.characters.ok_or(OracleError::CharactersNotAvailable)
    }

    /// Returns the CardOracle, or an error if not available.
    pub fn cards(&self) -> Result<&'a K, OracleError> {
        self.cards.ok_or(OracleError::CardsNotAvailable)
    }

    /// Returns the RngOracle, or an error if not available.
    pub fn rng(&self) -> Result<&'a G, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }

    /// Returns the session config, or an error if not available.
    pub fn config(&self) -> Result<&'a GameConfig, OracleError> {
        self.config.ok_or(OracleError::ConfigNotAvailable)
    }
}

impl<'a, R, C, K, G> Env<'a, R, C, K, G>
where
    R: RoomOracle + 'a,
    C: CharacterOracle + 'a,
    K: CardOracle + 'a,
    G: RngOracle + 'a,
{
    /// Converts this environment into a trait-object based `GameEnv`.
    pub fn into_game_env(self) -> GameEnv<'a> {
        let rooms: Option<&'a dyn RoomOracle> = self.rooms.map(|rooms| rooms as _);
        let characters: Option<&'a dyn CharacterOracle> =
            self.characters.map(|characters| characters as _);
        let cards: Option<&'a dyn CardOracle> = self.cards.map(|cards| cards as _);
        let rng: Option<&'a dyn RngOracle> = self.rng.map(|rng| rng as _);
        Env::new(rooms, characters, cards, rng, self.config)
    }
}
