//! Room catalog oracle.

use crate::state::{CardKind, DoorSet, Floor, RoomId, Stat};

/// Whether a room effect fires when entering or when leaving the room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RoomTrigger {
    Enter,
    Exit,
}

/// Consequence of failing a room-effect roll.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RoomFailure {
    /// Budget drops to zero and the turn ends.
    StopMoving,
    LoseStat { stat: Stat, amount: u8 },
    /// Drop into a random revealed basement room, then roll physical damage.
    FallToBasement { dice: u8 },
}

/// Uniform enter/exit roll requirement attached to a room.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomEffect {
    pub trigger: RoomTrigger,
    pub stat: Stat,
    /// Pass when the rolled total is at or above this value.
    pub target: u8,
    pub failure: RoomFailure,
    pub continue_on_failure: bool,
}

/// Static definition of a room tile.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomDefinition {
    pub id: RoomId,
    pub name: String,
    /// Floors the tile may be placed on.
    pub floors: Vec<Floor>,
    /// Door sides before rotation.
    pub doors: DoorSet,
    /// Doors that exist on the tile but can never be walked through.
    #[cfg_attr(feature = "serde", serde(default))]
    pub front_doors: DoorSet,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tokens: Vec<CardKind>,
    /// Room on another floor joined to this one by stairs.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stairs_to: Option<RoomId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect: Option<RoomEffect>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub outdoor_window: bool,
    /// Interior split into near-door and far-door zones.
    #[cfg_attr(feature = "serde", serde(default))]
    pub divided: bool,
    /// Tile that relocates between floors (the elevator).
    #[cfg_attr(feature = "serde", serde(default))]
    pub mobile: bool,
    /// Placed by the starting layout rather than discovered.
    #[cfg_attr(feature = "serde", serde(default))]
    pub starting: bool,
}

impl RoomDefinition {
    pub fn allows_floor(&self, floor: Floor) -> bool {
        self.floors.contains(&floor)
    }
}

/// Read-only access to the room catalog.
pub trait RoomOracle: Send + Sync {
    fn room(&self, id: &RoomId) -> Option<&RoomDefinition>;

    /// Every room in catalog order.
    fn catalog(&self) -> &[RoomDefinition];

    /// Looks up a room by display name or slug.
    fn room_by_name(&self, name: &str) -> Option<&RoomDefinition> {
        let slug = RoomId::from_name(name);
        self.catalog()
            .iter()
            .find(|room| room.name.eq_ignore_ascii_case(name) || room.id == slug)
    }
}
