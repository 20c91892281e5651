//! Relocation of the mobile room between floors.

use crate::env::RoomDefinition;
use crate::state::{Direction, ElevatorReservation, Floor, GridPos, MapGraph, RoomId, Rotation};

use super::{MapError, build_tile, place_tile};

/// Where the mobile room ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Relocation {
    pub floor: Floor,
    pub position: GridPos,
    pub rotation: Rotation,
    /// Room and door side the elevator docked against, if any.
    pub docked_at: Option<(RoomId, Direction)>,
}

/// Moves the mobile room `def` to `floor`.
///
/// All current links are cleared first. The first revealed room on the floor
/// (catalog id order) with an open, unconnected door facing an empty cell
/// becomes the dock; the elevator's door is turned to meet it. Without a dock
/// the tile goes to the first empty neighbor cell of any room on the floor.
pub fn relocate_mobile(
    map: &mut MapGraph,
    def: &RoomDefinition,
    floor: Floor,
) -> Result<Relocation, MapError> {
    let id = def.id.clone();
    if !map.is_revealed(&id) {
        return Err(MapError::NotRevealed(id));
    }

    let (position, rotation, docked_at) = match find_dock(map, &id, floor) {
        Some((anchor, side, position)) => {
            let rotation = def
                .doors
                .directions()
                .next()
                .map(|door| Rotation::between(door, side.opposite()))
                .unwrap_or_default();
            (position, rotation, Some((anchor, side)))
        }
        None => {
            let position = find_free_cell(map, &id, floor).ok_or_else(|| MapError::NoPlacement {
                room: id.clone(),
                floor,
            })?;
            let rotation = map.room(&id).map(|tile| tile.rotation).unwrap_or_default();
            (position, rotation, None)
        }
    };

    map.isolate(&id);
    let previous = map.rooms.remove(&id);
    let mut tile = build_tile(def, floor, position, rotation);
    if let Some(previous) = previous {
        tile.tokens_drawn = previous.tokens_drawn;
        tile.special_tokens = previous.special_tokens;
    }
    place_tile(map, tile);
    reserve(map, &id, floor, position);

    Ok(Relocation {
        floor,
        position,
        rotation,
        docked_at,
    })
}

/// Records the cell the mobile room holds on `floor`, replacing any older
/// claim it had on that floor.
pub(crate) fn reserve(map: &mut MapGraph, room: &RoomId, floor: Floor, position: GridPos) {
    map.elevator_reservations
        .retain(|slot| !(slot.room == *room && slot.floor == floor));
    map.elevator_reservations.push(ElevatorReservation {
        floor,
        position,
        room: room.clone(),
    });
}

fn usable_cell(map: &MapGraph, elevator: &RoomId, floor: Floor, position: GridPos) -> bool {
    map.room_at(floor, position).is_none()
        && map
            .reservation_at(floor, position)
            .is_none_or(|slot| slot.room == *elevator)
}

fn find_dock(map: &MapGraph, elevator: &RoomId, floor: Floor) -> Option<(RoomId, Direction, GridPos)> {
    map.rooms_on(floor)
        .filter(|tile| tile.id != *elevator)
        .find_map(|tile| {
            tile.doors
                .directions()
                .filter(|side| tile.has_open_door(*side))
                .filter(|side| map.connection(&tile.id, *side).is_none())
                .map(|side| (side, tile.position.step(side)))
                .find(|(_, cell)| usable_cell(map, elevator, floor, *cell))
                .map(|(side, cell)| (tile.id.clone(), side, cell))
        })
}

fn find_free_cell(map: &MapGraph, elevator: &RoomId, floor: Floor) -> Option<GridPos> {
    map.rooms_on(floor)
        .filter(|tile| tile.id != *elevator)
        .flat_map(|tile| Direction::ALL.map(|side| tile.position.step(side)))
        .find(|cell| usable_cell(map, elevator, floor, *cell))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::tests::def;

    fn house() -> (MapGraph, RoomDefinition) {
        let mut map = MapGraph::default();
        let landing = def("Landing", &[Floor::Upper], &[Direction::East]);
        let foyer = def("Foyer", &[Floor::Ground], &[Direction::North]);
        place_tile(&mut map, build_tile(&landing, Floor::Upper, GridPos::ORIGIN, Rotation::Deg0));
        place_tile(&mut map, build_tile(&foyer, Floor::Ground, GridPos::ORIGIN, Rotation::Deg0));

        let mut lift = def(
            "Mystic Elevator",
            &[Floor::Basement, Floor::Ground, Floor::Upper],
            &[Direction::South],
        );
        lift.mobile = true;
        place_tile(&mut map, build_tile(&lift, Floor::Ground, GridPos::new(0, 1), Rotation::Deg0));
        reserve(&mut map, &lift.id, Floor::Ground, GridPos::new(0, 1));
        (map, lift)
    }

    #[test]
    fn docks_against_open_door() {
        let (mut map, lift) = house();
        assert!(map.connection(&lift.id, Direction::South).is_some());

        let moved = relocate_mobile(&mut map, &lift, Floor::Upper).unwrap();
        assert_eq!(moved.position, GridPos::new(1, 0));
        assert_eq!(moved.docked_at, Some((RoomId::new("landing"), Direction::East)));

        let tile = map.room(&lift.id).unwrap();
        assert_eq!(tile.floor, Floor::Upper);
        assert!(tile.doors.has(Direction::West));
        assert_eq!(map.connection(&lift.id, Direction::West), Some(&RoomId::new("landing")));
        assert_eq!(map.connection(&RoomId::new("foyer"), Direction::North), None);
    }

    #[test]
    fn old_cell_stays_reserved() {
        let (mut map, lift) = house();
        relocate_mobile(&mut map, &lift, Floor::Upper).unwrap();

        let slot = map.reservation_at(Floor::Ground, GridPos::new(0, 1)).unwrap();
        assert_eq!(slot.room, lift.id);
        assert!(map.room_at(Floor::Ground, GridPos::new(0, 1)).is_none());
    }

    #[test]
    fn falls_back_to_free_cell_without_dock() {
        let (mut map, lift) = house();
        let cellar = def("Cellar", &[Floor::Basement], &[]);
        place_tile(&mut map, build_tile(&cellar, Floor::Basement, GridPos::ORIGIN, Rotation::Deg0));

        let moved = relocate_mobile(&mut map, &lift, Floor::Basement).unwrap();
        assert_eq!(moved.docked_at, None);
        assert_eq!(moved.position, GridPos::new(0, 1));
        assert!(map.neighbors(&lift.id).next().is_none());
    }
}
