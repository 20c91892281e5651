//! Map graph operations: tile placement, pruning, relocation and healing.
//!
//! Everything here is a pure function over [`MapGraph`] and the room catalog.
//! Connections are created only when both facing doors exist, so the
//! adjacency table stays reciprocal.
mod elevator;
mod layout;

pub use elevator::{Relocation, relocate_mobile};
pub use layout::{divided_layout, spawn_zone, token_zone};

use std::collections::{BTreeMap, VecDeque};

use crate::env::RoomDefinition;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{
    Direction, DoorSet, Floor, GridPos, MapGraph, RoomId, RoomTile, Rotation, SpecialToken,
};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MapError {
    #[error("room '{room}' cannot be placed on the {floor} floor")]
    NoSuchTileOnFloor { room: RoomId, floor: Floor },

    #[error("room '{0}' is already revealed")]
    AlreadyRevealed(RoomId),

    #[error("room '{0}' is not revealed")]
    NotRevealed(RoomId),

    #[error("cell {position} on the {floor} floor is occupied")]
    CellOccupied { floor: Floor, position: GridPos },

    #[error("room '{room}' has no door facing {side} after rotation")]
    TileDoesNotConnect { room: RoomId, side: Direction },

    #[error("no free cell for room '{room}' on the {floor} floor")]
    NoPlacement { room: RoomId, floor: Floor },
}

impl GameError for MapError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            MapError::CellOccupied { .. } | MapError::NoPlacement { .. } => {
                ErrorSeverity::Recoverable
            }
            MapError::NotRevealed(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            MapError::NoSuchTileOnFloor { .. } => "MAP_NO_SUCH_TILE_ON_FLOOR",
            MapError::AlreadyRevealed(_) => "MAP_ALREADY_REVEALED",
            MapError::NotRevealed(_) => "MAP_NOT_REVEALED",
            MapError::CellOccupied { .. } => "MAP_CELL_OCCUPIED",
            MapError::TileDoesNotConnect { .. } => "MAP_TILE_DOES_NOT_CONNECT",
            MapError::NoPlacement { .. } => "MAP_NO_PLACEMENT",
        }
    }
}

/// Builds the tile for `def` at a fixed cell, without touching the graph.
pub fn build_tile(def: &RoomDefinition, floor: Floor, position: GridPos, rotation: Rotation) -> RoomTile {
    let doors = def.doors.rotated(rotation);
    RoomTile {
        id: def.id.clone(),
        name: def.name.clone(),
        floor,
        position,
        rotation,
        doors,
        front_doors: def.front_doors.rotated(rotation),
        tokens: def.tokens.clone(),
        tokens_drawn: false,
        special_tokens: Vec::new(),
        layout: if def.divided {
            doors.directions().next().map(divided_layout)
        } else {
            None
        },
        mobile: def.mobile,
    }
}

/// Whether a tile may be placed at `position` on `floor`.
pub fn cell_is_free(map: &MapGraph, floor: Floor, position: GridPos) -> bool {
    map.room_at(floor, position).is_none() && map.reservation_at(floor, position).is_none()
}

/// Places `tile` and links every door that faces a reciprocal door.
///
/// Doors that face a revealed room without the matching door are pruned.
/// Doors facing unrevealed space stay open.
pub fn place_tile(map: &mut MapGraph, mut tile: RoomTile) -> RoomId {
    let mut links = Vec::new();
    for door in tile.doors.directions().collect::<Vec<_>>() {
        let cell = tile.position.step(door);
        let Some(neighbor) = map.room_at(tile.floor, cell) else {
            continue;
        };
        if neighbor.doors.has(door.opposite()) {
            links.push((door, neighbor.id.clone()));
        } else {
            tile.doors.remove(DoorSet::of(door));
        }
    }
    let id = tile.id.clone();
    map.rooms.insert(id.clone(), tile);
    for (door, neighbor) in links {
        map.connect(&id, door, &neighbor);
    }
    id
}

/// Reveals `def` through the door at `direction` of `from`.
///
/// With `free_choice` the rotation need not put a door against the entry
/// side; the tile is still placed and connected wherever doors line up.
pub fn discover_room(
    map: &mut MapGraph,
    def: &RoomDefinition,
    from: &RoomId,
    direction: Direction,
    rotation: Rotation,
    free_choice: bool,
) -> Result<RoomId, MapError> {
    let origin = map
        .room(from)
        .ok_or_else(|| MapError::NotRevealed(from.clone()))?;
    if map.is_revealed(&def.id) {
        return Err(MapError::AlreadyRevealed(def.id.clone()));
    }
    let floor = origin.floor;
    if !def.allows_floor(floor) || def.starting {
        return Err(MapError::NoSuchTileOnFloor {
            room: def.id.clone(),
            floor,
        });
    }
    let position = origin.position.step(direction);
    if !cell_is_free(map, floor, position) {
        return Err(MapError::CellOccupied { floor, position });
    }

    let tile = build_tile(def, floor, position, rotation);
    let entry_side = direction.opposite();
    if !free_choice && !tile.doors.has(entry_side) {
        return Err(MapError::TileDoesNotConnect {
            room: def.id.clone(),
            side: entry_side,
        });
    }

    let id = place_tile(map, tile);
    if def.mobile {
        elevator::reserve(map, &id, floor, position);
    }
    if let Some(partner) = &def.stairs_to {
        if map.is_revealed(partner) {
            map.link_stairs(&id, partner);
        }
    }
    Ok(id)
}

/// Catalog rooms that may be revealed on `floor` right now.
///
/// Without `free_choice` a room qualifies only if some rotation gives it an
/// open door against `entry_side`, which every room with a door satisfies.
pub fn discovery_candidates<'a>(
    map: &MapGraph,
    catalog: &'a [RoomDefinition],
    floor: Floor,
    free_choice: bool,
) -> Vec<&'a RoomDefinition> {
    catalog
        .iter()
        .filter(|def| !def.starting && def.allows_floor(floor) && !map.is_revealed(&def.id))
        .filter(|def| free_choice || !(def.doors - def.front_doors).is_empty())
        .collect()
}

/// Drops a connection whose target vanished or sits on another floor.
///
/// Returns the stale target when a connection was cleared.
pub fn heal_connection(map: &mut MapGraph, from: &RoomId, direction: Direction) -> Option<RoomId> {
    let target = map.connection(from, direction)?.clone();
    let origin_floor = map.room(from).map(|room| room.floor);
    let healthy = match (map.room(&target), origin_floor) {
        (Some(room), Some(floor)) => room.floor == floor,
        _ => false,
    };
    if healthy {
        return None;
    }
    map.disconnect(from, direction)
}

/// Adds a special token to a room. Returns false if already present.
pub fn place_special_token(map: &mut MapGraph, room: &RoomId, token: SpecialToken) -> Result<bool, MapError> {
    let tile = map
        .room_mut(room)
        .ok_or_else(|| MapError::NotRevealed(room.clone()))?;
    if tile.has_special(token) {
        return Ok(false);
    }
    tile.special_tokens.push(token);
    Ok(true)
}

/// Door-walk distance from `start` to every reachable room, counting stairs.
pub fn distances_from(map: &MapGraph, start: &RoomId) -> BTreeMap<RoomId, u32> {
    let mut distances = BTreeMap::new();
    let mut queue = VecDeque::new();
    distances.insert(start.clone(), 0);
    queue.push_back(start.clone());
    while let Some(room) = queue.pop_front() {
        let distance = distances.get(&room).copied().unwrap_or(0);
        let stairs = map.stairs_from(&room).into_iter();
        let next: Vec<RoomId> = map
            .neighbors(&room)
            .map(|(_, id)| id)
            .chain(stairs)
            .cloned()
            .collect();
        for neighbor in next {
            if !distances.contains_key(&neighbor) {
                distances.insert(neighbor.clone(), distance + 1);
                queue.push_back(neighbor);
            }
        }
    }
    distances
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::state::CardKind;

    pub(crate) fn def(name: &str, floors: &[Floor], doors: &[Direction]) -> RoomDefinition {
        RoomDefinition {
            id: RoomId::from_name(name),
            name: name.to_string(),
            floors: floors.to_vec(),
            doors: DoorSet::from_directions(doors),
            front_doors: DoorSet::empty(),
            tokens: Vec::new(),
            stairs_to: None,
            effect: None,
            outdoor_window: false,
            divided: false,
            mobile: false,
            starting: false,
        }
    }

    fn seeded() -> MapGraph {
        let mut map = MapGraph::default();
        let hall = def(
            "Hall",
            &[Floor::Ground],
            &[Direction::North, Direction::East, Direction::West],
        );
        place_tile(&mut map, build_tile(&hall, Floor::Ground, GridPos::ORIGIN, Rotation::Deg0));
        map
    }

    #[test]
    fn discovery_connects_through_entry_side() {
        let mut map = seeded();
        let room = def("Den", &[Floor::Ground], &[Direction::South, Direction::North]);
        let id = discover_room(&mut map, &room, &RoomId::new("hall"), Direction::North, Rotation::Deg0, false)
            .unwrap();
        assert_eq!(map.connection(&id, Direction::South), Some(&RoomId::new("hall")));
        assert_eq!(map.connection(&RoomId::new("hall"), Direction::North), Some(&id));
        assert_eq!(map.room(&id).unwrap().position, GridPos::new(0, 1));
    }

    #[test]
    fn wrong_floor_is_rejected() {
        let mut map = seeded();
        let room = def("Attic", &[Floor::Upper], &[Direction::South]);
        let err = discover_room(&mut map, &room, &RoomId::new("hall"), Direction::North, Rotation::Deg0, false)
            .unwrap_err();
        assert!(matches!(err, MapError::NoSuchTileOnFloor { .. }));
    }

    #[test]
    fn rotation_must_face_entry() {
        let mut map = seeded();
        let room = def("Den", &[Floor::Ground], &[Direction::North]);
        let err = discover_room(&mut map, &room, &RoomId::new("hall"), Direction::North, Rotation::Deg0, false)
            .unwrap_err();
        assert_eq!(
            err,
            MapError::TileDoesNotConnect {
                room: RoomId::new("den"),
                side: Direction::South
            }
        );
    }

    #[test]
    fn healing_clears_cross_floor_links() {
        let mut map = seeded();
        let attic = def("Attic", &[Floor::Upper], &[Direction::South]);
        map.rooms.insert(
            attic.id.clone(),
            build_tile(&attic, Floor::Upper, GridPos::new(0, 1), Rotation::Deg0),
        );
        let hall = RoomId::new("hall");
        map.connect(&hall, Direction::North, &attic.id);

        assert_eq!(heal_connection(&mut map, &hall, Direction::North), Some(attic.id.clone()));
        assert_eq!(map.connection(&hall, Direction::North), None);
        assert_eq!(map.connection(&attic.id, Direction::South), None);
    }

    #[test]
    fn special_tokens_never_duplicate() {
        let mut map = seeded();
        let hall = RoomId::new("hall");
        assert_eq!(place_special_token(&mut map, &hall, SpecialToken::SecretPassage), Ok(true));
        assert_eq!(place_special_token(&mut map, &hall, SpecialToken::SecretPassage), Ok(false));
        assert_eq!(map.room(&hall).unwrap().special_tokens.len(), 1);
    }

    #[test]
    fn candidates_skip_revealed_and_wrong_floor() {
        let map = seeded();
        let mut vault = def("Vault", &[Floor::Ground], &[Direction::North]);
        vault.tokens = vec![CardKind::Event];
        let catalog = vec![
            def("Hall", &[Floor::Ground], &[Direction::North]),
            def("Attic", &[Floor::Upper], &[Direction::South]),
            vault,
        ];
        let names: Vec<_> = discovery_candidates(&map, &catalog, Floor::Ground, false)
            .into_iter()
            .map(|def| def.id.as_str())
            .collect();
        assert_eq!(names, vec!["vault"]);
    }
}
