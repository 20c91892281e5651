//! RON catalogs: rooms, characters and cards.

use std::path::Path;

use anyhow::{Context, bail};
use game_core::{CardDefinition, CharacterDefinition, RoomDefinition};
use serde::de::DeserializeOwned;

use crate::loaders::{LoadResult, read_file};

fn load_list<T: DeserializeOwned>(path: &Path, what: &str) -> LoadResult<Vec<T>> {
    let content = read_file(path)?;
    ron::from_str(&content).with_context(|| format!("failed to parse {what} from {}", path.display()))
}

fn ensure_unique<'a>(ids: impl Iterator<Item = &'a str>, what: &str) -> LoadResult<()> {
    let mut seen = std::collections::BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            bail!("duplicate {what} id '{id}'");
        }
    }
    Ok(())
}

/// Reads `Vec<RoomDefinition>` and checks stair partners resolve.
pub struct RoomLoader;

impl RoomLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<RoomDefinition>> {
        let rooms: Vec<RoomDefinition> = load_list(path, "rooms")?;
        ensure_unique(rooms.iter().map(|room| room.id.as_str()), "room")?;
        for room in &rooms {
            if let Some(partner) = &room.stairs_to
                && !rooms.iter().any(|other| &other.id == partner)
            {
                bail!("room '{}' has stairs to unknown room '{partner}'", room.id);
            }
        }
        Ok(rooms)
    }
}

/// Reads `Vec<CharacterDefinition>`.
pub struct CharacterLoader;

impl CharacterLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<CharacterDefinition>> {
        let characters: Vec<CharacterDefinition> = load_list(path, "characters")?;
        ensure_unique(characters.iter().map(|c| c.id.as_str()), "character")?;
        Ok(characters)
    }
}

/// Reads `Vec<CardDefinition>`; only event cards may carry an event body.
pub struct CardLoader;

impl CardLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<CardDefinition>> {
        let cards: Vec<CardDefinition> = load_list(path, "cards")?;
        ensure_unique(cards.iter().map(|card| card.id.as_str()), "card")?;
        for card in &cards {
            if card.event.is_some() != (card.kind == game_core::CardKind::Event) {
                bail!("card '{}' of kind {:?} has a mismatched event body", card.id, card.kind);
            }
        }
        Ok(cards)
    }
}
