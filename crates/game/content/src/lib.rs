//! Read-only reference data for the haunted house.
//!
//! This crate ships the builtin tables and, behind the `loaders` feature,
//! readers for RON/TOML data files:
//! - Room catalog (tiles, doors, tokens, room effects)
//! - Character roster (trait tracks)
//! - Omen, item and event decks
//! - Game configuration (TOML)
//!
//! Content is consumed through the oracle traits of `game-core` and never
//! appears in game state.

pub mod cards;
pub mod characters;
pub mod rooms;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use cards::{CANDLE, CardDeck, builtin_cards};
pub use characters::{CharacterRoster, builtin_characters};
pub use rooms::{RoomCatalog, builtin_rooms};

#[cfg(feature = "loaders")]
pub use loaders::{CardLoader, CharacterLoader, ConfigLoader, ContentFactory, RoomLoader};

use game_core::GameConfig;

/// Everything a session reads but never writes.
#[derive(Clone, Debug, Default)]
pub struct Content {
    pub rooms: RoomCatalog,
    pub characters: CharacterRoster,
    pub cards: CardDeck,
    pub config: GameConfig,
}

impl Content {
    pub fn builtin() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }
}
