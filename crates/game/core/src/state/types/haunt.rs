use super::common::{CardId, PlayerId, RoomId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Winner {
    Survivors,
    Traitor,
}

/// Terminal summary. Never overwritten once set.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameOver {
    pub winner: Winner,
    pub dead_players: Vec<PlayerId>,
}

/// Created once when the Haunt begins.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HauntRecord {
    pub scenario: u32,
    pub traitor: PlayerId,
    pub triggered_by: PlayerId,
    pub omen: Option<CardId>,
    pub room: Option<RoomId>,
    pub game_over: Option<GameOver>,
}
