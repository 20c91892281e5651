//! Content loaders for reading game data from files.
//!
//! RON files hold catalogs of `game-core` definitions; the session config is
//! TOML. Every loader returns an [`anyhow::Result`] with the offending path
//! in its context.

pub mod catalog;
pub mod config;
pub mod factory;

pub use catalog::{CardLoader, CharacterLoader, RoomLoader};
pub use config::ConfigLoader;
pub use factory::ContentFactory;

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
