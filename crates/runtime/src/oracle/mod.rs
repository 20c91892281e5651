//! Runtime wrapper around static game content.
//!
//! The [`OracleManager`] shares the room catalog, character roster and card
//! decks behind `Arc`s so the runtime can build [`game_core::Env`] snapshots
//! on demand. The data is immutable at runtime; dynamic state lives in
//! [`game_core::GameState`].
use std::sync::Arc;

use game_content::{CardDeck, CharacterRoster, Content, RoomCatalog};
use game_core::{Env, GameConfig, GameEnv, PcgRng};

/// Manages all oracle implementations and provides unified access
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) rooms: Arc<RoomCatalog>,
    pub(crate) characters: Arc<CharacterRoster>,
    pub(crate) cards: Arc<CardDeck>,
    pub(crate) config: Arc<GameConfig>,
    pub(crate) rng: PcgRng,
}

impl OracleManager {
    pub fn new(content: Content) -> Self {
        Self {
            rooms: Arc::new(content.rooms),
            characters: Arc::new(content.characters),
            cards: Arc::new(content.cards),
            config: Arc::new(content.config),
            rng: PcgRng, // PcgRng is stateless
        }
    }

    /// Converts oracle manager into GameEnv for game-core
    pub fn as_game_env(&self) -> GameEnv<'_> {
        Env::with_all(
            self.rooms.as_ref(),
            self.characters.as_ref(),
            self.cards.as_ref(),
            &self.rng,
            self.config.as_ref(),
        )
        .into_game_env()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::RoomId;

    #[test]
    fn env_exposes_every_oracle() {
        let oracles = OracleManager::new(Content::builtin());
        let env = oracles.as_game_env();
        assert!(
            env.rooms()
                .unwrap()
                .room(&RoomId::new("entrance-hall"))
                .is_some()
        );
        assert!(!env.characters().unwrap().roster().is_empty());
        assert!(!env.cards().unwrap().deck().is_empty());
        assert!(env.rng().is_ok());
        assert_eq!(env.config().unwrap(), oracles.config());
    }
}
