/// How dice faces enter the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DiceMode {
    /// The acting client rolls and reports the faces; the engine only checks
    /// that every face is a legal die value and recomputes the total.
    #[default]
    ClientReported,
    /// The engine rolls every die itself through the session RNG. Submitted
    /// faces are rejected.
    EngineRolled,
}

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub dice_mode: DiceMode,

    /// Failed escape attempts after which a trapped player is released when
    /// the card does not say otherwise.
    pub default_auto_escape_after: u8,

    /// Rooms that clear plain persistent effects when a turn ends inside them.
    pub persistent_release_rooms: Vec<String>,

    /// Item that lifts a `has_candle` movement restriction.
    pub candle_item_id: String,

    /// Room that lifts an `in_furnace_room` movement restriction.
    pub furnace_room: String,

    /// Room whose occupants grant a chapel bonus.
    pub chapel_room: String,
}

impl GameConfig {
    // ===== compile-time constants =====
    pub const MIN_PLAYERS: usize = 3;
    pub const MAX_PLAYERS: usize = 6;
    /// Slots on every trait track.
    pub const TRACK_LEN: usize = 8;
    pub const MAX_STAT_INDEX: u8 = 7;
    /// Largest dice pool any roll may use.
    pub const MAX_DICE: usize = 16;
    /// Faces of the house die.
    pub const DIE_FACES: [u8; 6] = [0, 0, 1, 1, 2, 2];
    pub const MAX_DIE_FACE: u8 = 2;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_AUTO_ESCAPE_AFTER: u8 = 3;
    pub const DEFAULT_CANDLE_ITEM: &'static str = "ngon_nen";
    pub const DEFAULT_FURNACE_ROOM: &'static str = "furnace-room";
    pub const DEFAULT_CHAPEL_ROOM: &'static str = "chapel";
    pub const DEFAULT_RELEASE_ROOMS: [&'static str; 7] = [
        "balcony",
        "gardens",
        "graveyard",
        "gymnasium",
        "larder",
        "patio",
        "tower",
    ];

    pub fn new() -> Self {
        Self {
            dice_mode: DiceMode::default(),
            default_auto_escape_after: Self::DEFAULT_AUTO_ESCAPE_AFTER,
            persistent_release_rooms: Self::DEFAULT_RELEASE_ROOMS
                .iter()
                .map(|room| room.to_string())
                .collect(),
            candle_item_id: Self::DEFAULT_CANDLE_ITEM.to_string(),
            furnace_room: Self::DEFAULT_FURNACE_ROOM.to_string(),
            chapel_room: Self::DEFAULT_CHAPEL_ROOM.to_string(),
        }
    }

    pub fn with_dice_mode(mut self, dice_mode: DiceMode) -> Self {
        self.dice_mode = dice_mode;
        self
    }

    pub fn is_release_room(&self, room: &str) -> bool {
        self.persistent_release_rooms.iter().any(|r| r == room)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
