//! Character roster with the eight-slot trait tracks.

use game_core::CharacterId;
use game_core::env::{CharacterDefinition, CharacterOracle, TraitTrack};

type Track = ([u8; 8], u8);

fn character(id: &str, name: &str, speed: Track, might: Track, sanity: Track, knowledge: Track) -> CharacterDefinition {
    let track = |(values, start): Track| TraitTrack::new(values, start);
    CharacterDefinition {
        id: CharacterId::new(id),
        name: name.to_string(),
        speed: track(speed),
        might: track(might),
        sanity: track(sanity),
        knowledge: track(knowledge),
    }
}

/// The twelve explorers. Start indices mark the clip position on each track.
pub fn builtin_characters() -> Vec<CharacterDefinition> {
    vec![
        character(
            "professor-longfellow",
            "Professor Longfellow",
            ([2, 2, 4, 4, 5, 5, 6, 6], 3),
            ([1, 2, 3, 4, 5, 5, 6, 6], 2),
            ([1, 3, 3, 4, 5, 5, 6, 7], 2),
            ([4, 5, 5, 5, 5, 6, 7, 8], 3),
        ),
        character(
            "heather-granville",
            "Heather Granville",
            ([3, 3, 4, 5, 6, 6, 7, 8], 2),
            ([3, 3, 3, 4, 5, 6, 7, 8], 2),
            ([3, 3, 3, 4, 5, 6, 6, 6], 2),
            ([2, 3, 3, 4, 5, 6, 7, 8], 4),
        ),
        character(
            "father-rhinehardt",
            "Father Rhinehardt",
            ([2, 3, 3, 4, 5, 6, 7, 7], 2),
            ([1, 2, 2, 4, 4, 5, 5, 7], 2),
            ([3, 4, 5, 5, 6, 7, 7, 8], 4),
            ([1, 3, 3, 4, 5, 6, 6, 8], 3),
        ),
        character(
            "jenny-leclerc",
            "Jenny LeClerc",
            ([2, 3, 4, 4, 4, 5, 6, 8], 3),
            ([3, 4, 4, 4, 4, 5, 6, 8], 2),
            ([1, 1, 2, 4, 4, 4, 5, 6], 4),
            ([2, 3, 3, 4, 4, 5, 6, 8], 2),
        ),
        character(
            "darrin-flash-williams",
            "Darrin \"Flash\" Williams",
            ([4, 4, 4, 5, 6, 7, 7, 8], 4),
            ([2, 3, 3, 4, 5, 6, 6, 7], 2),
            ([1, 2, 3, 4, 5, 5, 5, 7], 2),
            ([2, 3, 3, 4, 5, 5, 5, 7], 2),
        ),
        character(
            "vivian-lopez",
            "Vivian Lopez",
            ([3, 4, 4, 4, 4, 6, 7, 8], 3),
            ([2, 2, 2, 4, 4, 5, 6, 6], 2),
            ([4, 4, 4, 5, 6, 7, 8, 8], 2),
            ([4, 5, 5, 5, 5, 6, 6, 7], 3),
        ),
        character(
            "ox-bellows",
            "Ox Bellows",
            ([2, 2, 2, 3, 4, 5, 5, 6], 4),
            ([4, 5, 5, 6, 6, 7, 8, 8], 2),
            ([2, 2, 3, 4, 5, 5, 6, 7], 2),
            ([2, 2, 3, 3, 5, 5, 6, 6], 2),
        ),
        character(
            "madame-zostra",
            "Madame Zostra",
            ([2, 3, 3, 5, 5, 6, 6, 7], 2),
            ([2, 3, 3, 4, 5, 5, 5, 6], 3),
            ([4, 4, 4, 5, 6, 7, 8, 8], 2),
            ([1, 3, 4, 4, 4, 5, 6, 6], 3),
        ),
        character(
            "peter-akimoto",
            "Peter Akimoto",
            ([3, 3, 3, 4, 6, 6, 7, 7], 3),
            ([2, 3, 3, 4, 5, 5, 6, 8], 2),
            ([3, 4, 4, 4, 5, 6, 6, 7], 3),
            ([3, 4, 4, 5, 6, 6, 7, 8], 2),
        ),
        character(
            "missy-dubourde",
            "Missy Dubourde",
            ([3, 4, 5, 6, 6, 6, 7, 7], 2),
            ([2, 3, 3, 3, 4, 5, 6, 7], 3),
            ([1, 2, 3, 4, 5, 5, 6, 7], 2),
            ([2, 3, 4, 4, 5, 6, 6, 6], 3),
        ),
        character(
            "brandon-jaspers",
            "Brandon Jaspers",
            ([3, 4, 4, 4, 5, 6, 7, 8], 3),
            ([2, 3, 3, 4, 5, 6, 6, 7], 3),
            ([3, 3, 3, 4, 5, 6, 7, 8], 3),
            ([1, 3, 3, 5, 5, 6, 6, 7], 2),
        ),
        character(
            "zoe-ingstrom",
            "Zoe Ingstrom",
            ([4, 4, 4, 4, 5, 6, 8, 8], 3),
            ([2, 2, 3, 3, 4, 4, 6, 7], 3),
            ([3, 4, 5, 5, 6, 6, 7, 8], 2),
            ([1, 2, 3, 4, 4, 5, 5, 5], 2),
        ),
    ]
}

/// [`CharacterOracle`] over an in-memory roster.
#[derive(Clone, Debug)]
pub struct CharacterRoster {
    characters: Vec<CharacterDefinition>,
}

impl CharacterRoster {
    pub fn new(characters: Vec<CharacterDefinition>) -> Self {
        Self { characters }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_characters())
    }
}

impl Default for CharacterRoster {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CharacterOracle for CharacterRoster {
    fn character(&self, id: &CharacterId) -> Option<&CharacterDefinition> {
        self.characters.iter().find(|character| &character.id == id)
    }

    fn roster(&self) -> &[CharacterDefinition] {
        &self.characters
    }
}
