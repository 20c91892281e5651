//! Content factory for building oracles from data files.

use std::path::{Path, PathBuf};

use game_core::GameConfig;

use crate::loaders::{CardLoader, CharacterLoader, ConfigLoader, LoadResult, RoomLoader};
use crate::{CardDeck, CharacterRoster, Content, RoomCatalog};

/// Content factory that loads all game content from a data directory.
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── rooms.ron
/// ├── characters.ron
/// └── cards.ron
/// ```
///
/// Any file that is absent falls back to the builtin table.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn existing(&self, name: &str) -> Option<PathBuf> {
        let path = self.data_dir.join(name);
        path.is_file().then_some(path)
    }

    pub fn load_config(&self) -> LoadResult<GameConfig> {
        self.existing("config.toml")
            .map_or_else(|| Ok(GameConfig::default()), |path| ConfigLoader::load(&path))
    }

    pub fn load_rooms(&self) -> LoadResult<RoomCatalog> {
        match self.existing("rooms.ron") {
            Some(path) => RoomLoader::load(&path).map(RoomCatalog::new),
            None => Ok(RoomCatalog::builtin()),
        }
    }

    pub fn load_characters(&self) -> LoadResult<CharacterRoster> {
        match self.existing("characters.ron") {
            Some(path) => CharacterLoader::load(&path).map(CharacterRoster::new),
            None => Ok(CharacterRoster::builtin()),
        }
    }

    pub fn load_cards(&self) -> LoadResult<CardDeck> {
        match self.existing("cards.ron") {
            Some(path) => CardLoader::load(&path).map(CardDeck::new),
            None => Ok(CardDeck::builtin()),
        }
    }

    pub fn load_content(&self) -> LoadResult<Content> {
        Ok(Content {
            rooms: self.load_rooms()?,
            characters: self.load_characters()?,
            cards: self.load_cards()?,
            config: self.load_config()?,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{CardOracle, CharacterOracle, RoomOracle};

    #[test]
    fn empty_dir_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let content = ContentFactory::new(dir.path()).load_content().unwrap();
        assert_eq!(content.rooms.len(), RoomCatalog::builtin().len());
        assert_eq!(content.characters.roster().len(), 12);
        assert!(!content.cards.deck().is_empty());
        assert_eq!(content.config, GameConfig::default());
    }

    #[test]
    fn files_override_builtin_tables() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "chapel_room = \"tower\"\n").unwrap();
        let roster = vec![crate::builtin_characters().remove(0)];
        std::fs::write(
            dir.path().join("characters.ron"),
            ron::ser::to_string(&roster).unwrap(),
        )
        .unwrap();

        let factory = ContentFactory::new(dir.path());
        let content = factory.load_content().unwrap();
        assert_eq!(content.config.chapel_room, "tower");
        assert_eq!(content.characters.roster().len(), 1);
        assert!(content.rooms.room(&game_core::RoomId::new("chapel")).is_some());
        assert_eq!(factory.data_dir(), dir.path());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cards.ron"), "[(id: ").unwrap();
        assert!(ContentFactory::new(dir.path()).load_cards().is_err());
    }
}
