use std::collections::BTreeMap;

use bitflags::bitflags;

use super::common::{CardKind, Direction, Floor, GridPos, RoomId, Rotation, SpecialToken};

bitflags! {
    /// Door sides of a tile. Bits follow [`Direction`] declaration order.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct DoorSet: u8 {
        const NORTH = 1 << 0;
        const EAST  = 1 << 1;
        const SOUTH = 1 << 2;
        const WEST  = 1 << 3;
    }
}

impl DoorSet {
    pub fn of(direction: Direction) -> Self {
        match direction {
            Direction::North => DoorSet::NORTH,
            Direction::East => DoorSet::EAST,
            Direction::South => DoorSet::SOUTH,
            Direction::West => DoorSet::WEST,
        }
    }

    pub fn from_directions(directions: &[Direction]) -> Self {
        directions
            .iter()
            .fold(DoorSet::empty(), |acc, dir| acc | DoorSet::of(*dir))
    }

    pub fn has(self, direction: Direction) -> bool {
        self.contains(DoorSet::of(direction))
    }

    /// Directions in clockwise order starting at north.
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |dir| self.has(*dir))
    }

    pub fn rotated(self, rotation: Rotation) -> Self {
        self.directions()
            .fold(DoorSet::empty(), |acc, dir| acc | DoorSet::of(dir.rotated(rotation)))
    }
}

/// Half of a divided room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Zone {
    Near,
    Far,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Divider {
    /// Splits the room into a north and a south half.
    Horizontal,
    /// Splits the room into an east and a west half.
    Vertical,
}

/// Near/far split of a divided room after rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DividedLayout {
    pub door_side: Direction,
    pub divider: Divider,
    /// Side of the room the near half sits against.
    pub near_side: Direction,
    pub far_side: Direction,
}

/// A revealed room on the board.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomTile {
    pub id: RoomId,
    pub name: String,
    pub floor: Floor,
    pub position: GridPos,
    pub rotation: Rotation,
    /// Rotated and pruned door set.
    pub doors: DoorSet,
    /// Rotated doors that can never be exited.
    pub front_doors: DoorSet,
    pub tokens: Vec<CardKind>,
    /// Set once the first visitor has drawn the tokens.
    pub tokens_drawn: bool,
    pub special_tokens: Vec<SpecialToken>,
    pub layout: Option<DividedLayout>,
    /// The tile moves between floors.
    pub mobile: bool,
}

impl RoomTile {
    pub fn has_special(&self, token: SpecialToken) -> bool {
        self.special_tokens.contains(&token)
    }

    /// A door that can be walked through.
    pub fn has_open_door(&self, direction: Direction) -> bool {
        self.doors.has(direction) && !self.front_doors.has(direction)
    }

    /// Tokens that still need drawing.
    pub fn undrawn_tokens(&self) -> &[CardKind] {
        if self.tokens_drawn { &[] } else { &self.tokens }
    }
}

/// A grid cell claimed by the mobile room on some floor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElevatorReservation {
    pub floor: Floor,
    pub position: GridPos,
    pub room: RoomId,
}

/// Revealed rooms plus their symmetric adjacency table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapGraph {
    pub rooms: BTreeMap<RoomId, RoomTile>,
    pub connections: BTreeMap<RoomId, BTreeMap<Direction, RoomId>>,
    /// Stair links between floors; always stored in both directions.
    pub stairs: BTreeMap<RoomId, RoomId>,
    pub elevator_reservations: Vec<ElevatorReservation>,
}

impl MapGraph {
    pub fn room(&self, id: &RoomId) -> Option<&RoomTile> {
        self.rooms.get(id)
    }

    pub fn room_mut(&mut self, id: &RoomId) -> Option<&mut RoomTile> {
        self.rooms.get_mut(id)
    }

    pub fn is_revealed(&self, id: &RoomId) -> bool {
        self.rooms.contains_key(id)
    }

    /// Room occupying `position` on `floor`.
    pub fn room_at(&self, floor: Floor, position: GridPos) -> Option<&RoomTile> {
        self.rooms
            .values()
            .find(|room| room.floor == floor && room.position == position)
    }

    pub fn rooms_on(&self, floor: Floor) -> impl Iterator<Item = &RoomTile> {
        self.rooms.values().filter(move |room| room.floor == floor)
    }

    pub fn connection(&self, from: &RoomId, direction: Direction) -> Option<&RoomId> {
        self.connections.get(from)?.get(&direction)
    }

    /// Records the pair of reciprocal connections.
    pub fn connect(&mut self, a: &RoomId, direction: Direction, b: &RoomId) {
        self.connections
            .entry(a.clone())
            .or_default()
            .insert(direction, b.clone());
        self.connections
            .entry(b.clone())
            .or_default()
            .insert(direction.opposite(), a.clone());
    }

    /// Removes `from`'s link in `direction` and its reciprocal, if any.
    pub fn disconnect(&mut self, from: &RoomId, direction: Direction) -> Option<RoomId> {
        let target = self.connections.get_mut(from)?.remove(&direction)?;
        if let Some(back) = self.connections.get_mut(&target) {
            if back.get(&direction.opposite()) == Some(from) {
                back.remove(&direction.opposite());
            }
        }
        Some(target)
    }

    /// Removes every connection touching `room`.
    pub fn isolate(&mut self, room: &RoomId) {
        let directions: Vec<Direction> = self
            .connections
            .get(room)
            .map(|links| links.keys().copied().collect())
            .unwrap_or_default();
        for direction in directions {
            self.disconnect(room, direction);
        }
    }

    /// Rooms reachable in one step through a door.
    pub fn neighbors(&self, room: &RoomId) -> impl Iterator<Item = (Direction, &RoomId)> {
        self.connections
            .get(room)
            .into_iter()
            .flat_map(|links| links.iter().map(|(dir, id)| (*dir, id)))
    }

    pub fn link_stairs(&mut self, a: &RoomId, b: &RoomId) {
        self.stairs.insert(a.clone(), b.clone());
        self.stairs.insert(b.clone(), a.clone());
    }

    pub fn stairs_from(&self, room: &RoomId) -> Option<&RoomId> {
        self.stairs.get(room)
    }

    /// Mobile room holding a reservation on `position`, if any.
    pub fn reservation_at(&self, floor: Floor, position: GridPos) -> Option<&ElevatorReservation> {
        self.elevator_reservations
            .iter()
            .find(|slot| slot.floor == floor && slot.position == position)
    }

    /// Rooms carrying a special token.
    pub fn rooms_with(&self, token: SpecialToken) -> impl Iterator<Item = &RoomTile> {
        self.rooms.values().filter(move |room| room.has_special(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn door_rotation_keeps_count() {
        let doors = DoorSet::NORTH | DoorSet::EAST;
        assert_eq!(doors.rotated(Rotation::Deg90), DoorSet::EAST | DoorSet::SOUTH);
        assert_eq!(doors.rotated(Rotation::Deg270), DoorSet::WEST | DoorSet::NORTH);
        assert_eq!(doors.rotated(Rotation::Deg0), doors);
    }

    #[test]
    fn connect_is_reciprocal_and_disconnect_clears_both() {
        let mut graph = MapGraph::default();
        let a = RoomId::new("a");
        let b = RoomId::new("b");
        graph.connect(&a, Direction::North, &b);
        assert_eq!(graph.connection(&b, Direction::South), Some(&a));

        assert_eq!(graph.disconnect(&a, Direction::North), Some(b.clone()));
        assert_eq!(graph.connection(&b, Direction::South), None);
    }
}
