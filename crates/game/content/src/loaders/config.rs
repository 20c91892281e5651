//! Game configuration loader.

use std::path::Path;

use anyhow::Context;
use game_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
///
/// Missing keys keep their [`GameConfig::default`] values.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        toml::from_str(content).context("failed to parse config TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::DiceMode;
    use std::io::Write;

    #[test]
    fn partial_config_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dice_mode = \"engine_rolled\"").unwrap();
        writeln!(file, "default_auto_escape_after = 2").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.dice_mode, DiceMode::EngineRolled);
        assert_eq!(config.default_auto_escape_after, 2);
        assert_eq!(config.candle_item_id, GameConfig::DEFAULT_CANDLE_ITEM);
        assert_eq!(config.persistent_release_rooms.len(), 7);
    }

    #[test]
    fn bad_toml_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dice_mode = [").unwrap();
        let error = ConfigLoader::load(file.path()).unwrap_err();
        assert!(format!("{error:#}").contains(&file.path().display().to_string()));
    }
}
