//! Room catalog: every tile of the house, its doors, tokens and effects.

use game_core::env::{RoomDefinition, RoomEffect, RoomFailure, RoomOracle, RoomTrigger};
use game_core::state::DoorSet;
use game_core::{CardKind, Direction, Floor, RoomId, Stat};

const N: Direction = Direction::North;
const E: Direction = Direction::East;
const S: Direction = Direction::South;
const W: Direction = Direction::West;

const BASEMENT: &[Floor] = &[Floor::Basement];
const GROUND: &[Floor] = &[Floor::Ground];
const UPPER: &[Floor] = &[Floor::Upper];
const GROUND_UPPER: &[Floor] = &[Floor::Ground, Floor::Upper];
const ANY_FLOOR: &[Floor] = &[Floor::Basement, Floor::Ground, Floor::Upper];

const OMEN: CardKind = CardKind::Omen;
const EVENT: CardKind = CardKind::Event;
const ITEM: CardKind = CardKind::Item;

/// Builder for one catalog entry.
struct Tile(RoomDefinition);

impl Tile {
    fn new(name: &str, floors: &[Floor], doors: &[Direction], tokens: &[CardKind]) -> Self {
        Self(RoomDefinition {
            id: RoomId::from_name(name),
            name: name.to_string(),
            floors: floors.to_vec(),
            doors: DoorSet::from_directions(doors),
            front_doors: DoorSet::empty(),
            tokens: tokens.to_vec(),
            stairs_to: None,
            effect: None,
            outdoor_window: false,
            divided: false,
            mobile: false,
            starting: false,
        })
    }

    fn starting(mut self) -> Self {
        self.0.starting = true;
        self
    }

    fn front_door(mut self, side: Direction) -> Self {
        self.0.doors |= DoorSet::of(side);
        self.0.front_doors |= DoorSet::of(side);
        self
    }

    fn stairs_to(mut self, room: &str) -> Self {
        self.0.stairs_to = Some(RoomId::new(room));
        self
    }

    fn window(mut self) -> Self {
        self.0.outdoor_window = true;
        self
    }

    fn divided(mut self) -> Self {
        self.0.divided = true;
        self
    }

    fn mobile(mut self) -> Self {
        self.0.mobile = true;
        self
    }

    fn on_enter(mut self, stat: Stat, target: u8, failure: RoomFailure) -> Self {
        self.0.effect = Some(RoomEffect {
            trigger: RoomTrigger::Enter,
            stat,
            target,
            failure,
            continue_on_failure: false,
        });
        self
    }

    /// Exit rolls cost a stat on failure and let the move go on.
    fn on_exit(mut self, stat: Stat, target: u8, lose: Stat) -> Self {
        self.0.effect = Some(RoomEffect {
            trigger: RoomTrigger::Exit,
            stat,
            target,
            failure: RoomFailure::LoseStat {
                stat: lose,
                amount: 1,
            },
            continue_on_failure: true,
        });
        self
    }
}

/// The house as printed: starting tiles first, then the discoverable rooms.
pub fn builtin_rooms() -> Vec<RoomDefinition> {
    let stop = || RoomFailure::StopMoving;
    vec![
        Tile::new("Entrance Hall", GROUND, &[N, W, E], &[])
            .starting()
            .front_door(S),
        Tile::new("Foyer", GROUND, &[N, S, W, E], &[]).starting(),
        Tile::new("Grand Staircase", GROUND, &[S], &[])
            .starting()
            .stairs_to("upper-landing"),
        Tile::new("Upper Landing", UPPER, &[N, W, E, S], &[])
            .starting()
            .stairs_to("grand-staircase"),
        Tile::new("Basement Landing", BASEMENT, &[N, W, E, S], &[]).starting(),
        // basement
        Tile::new("Stairs From Basement", BASEMENT, &[N], &[]).stairs_to("foyer"),
        Tile::new("Catacombs", BASEMENT, &[N, S], &[OMEN]).on_enter(Stat::Sanity, 6, stop()),
        Tile::new("Furnace Room", BASEMENT, &[N, S, W], &[OMEN]),
        Tile::new("Chasm", BASEMENT, &[W, E], &[]).on_enter(Stat::Speed, 3, stop()),
        Tile::new("Pentagram Chamber", BASEMENT, &[N, E], &[OMEN]).on_exit(
            Stat::Knowledge,
            4,
            Stat::Sanity,
        ),
        Tile::new("Underground Lake", BASEMENT, &[N, E], &[EVENT]),
        Tile::new("Crypt", BASEMENT, &[N], &[EVENT]),
        Tile::new("Wine Cellar", BASEMENT, &[N, S], &[ITEM]),
        Tile::new("Larder", BASEMENT, &[N], &[ITEM]),
        // ground
        Tile::new("Patio", GROUND, &[N, S, W], &[EVENT]).window(),
        Tile::new("Gardens", GROUND, &[N, S], &[EVENT]).window(),
        Tile::new("Coal Chute", GROUND, &[N], &[]),
        Tile::new("Dining Room", GROUND, &[N, E], &[OMEN]).window(),
        Tile::new("Graveyard", GROUND, &[S], &[EVENT])
            .window()
            .on_exit(Stat::Sanity, 4, Stat::Knowledge),
        Tile::new("Ballroom", GROUND, &[N, S, W, E], &[EVENT]),
        Tile::new("Kitchen", GROUND, &[N, E], &[OMEN]),
        // any floor
        Tile::new("Vault", ANY_FLOOR, &[N], &[EVENT, ITEM, ITEM]).divided(),
        Tile::new("Research Laboratory", ANY_FLOOR, &[N, S], &[EVENT]),
        Tile::new("Operating Laboratory", ANY_FLOOR, &[E, S], &[EVENT]),
        Tile::new("Mystic Elevator", ANY_FLOOR, &[N], &[]).mobile(),
        Tile::new("Creaky Hallway", ANY_FLOOR, &[N, W, E, S], &[]),
        Tile::new("Dusty Hallway", ANY_FLOOR, &[N, W, E, S], &[]),
        Tile::new("Junk Room", ANY_FLOOR, &[N, W, E, S], &[OMEN]).on_exit(
            Stat::Might,
            3,
            Stat::Speed,
        ),
        Tile::new("Statuary Corridor", ANY_FLOOR, &[N, S], &[EVENT]),
        Tile::new("Game Room", ANY_FLOOR, &[N, E, S, W], &[EVENT]),
        Tile::new("Organ Room", ANY_FLOOR, &[W, S], &[EVENT]),
        // ground or upper
        Tile::new("Chapel", GROUND_UPPER, &[N], &[EVENT]).window(),
        Tile::new("Charred Room", GROUND_UPPER, &[N, W, E, S], &[OMEN]),
        Tile::new("Collapsed Room", GROUND_UPPER, &[N, W, E, S], &[]).on_enter(
            Stat::Speed,
            5,
            RoomFailure::FallToBasement { dice: 1 },
        ),
        Tile::new("Conservatory", GROUND_UPPER, &[N], &[EVENT]).window(),
        Tile::new("Abandoned Room", GROUND_UPPER, &[N, W, E, S], &[OMEN]).window(),
        Tile::new("Bloody Room", GROUND_UPPER, &[N, W, E, S], &[ITEM]),
        // upper
        Tile::new("Gymnasium", UPPER, &[E, S], &[OMEN]),
        Tile::new("Storeroom", UPPER, &[N], &[ITEM]),
        Tile::new("Bedroom", UPPER, &[W, E, S], &[EVENT]).window(),
        Tile::new("Master Bedroom", UPPER, &[N, W, S], &[OMEN]).window(),
        Tile::new("Gallery", UPPER, &[N, S], &[OMEN]),
        Tile::new("Tower", UPPER, &[W, E], &[EVENT])
            .window()
            .on_enter(Stat::Might, 3, stop()),
        Tile::new("Attic", UPPER, &[S], &[EVENT]).on_exit(Stat::Speed, 3, Stat::Might),
        Tile::new("Balcony", UPPER, &[N, S], &[OMEN]).window(),
    ]
    .into_iter()
    .map(|tile| tile.0)
    .collect()
}

/// [`RoomOracle`] over an in-memory catalog.
#[derive(Clone, Debug)]
pub struct RoomCatalog {
    rooms: Vec<RoomDefinition>,
}

impl RoomCatalog {
    pub fn new(rooms: Vec<RoomDefinition>) -> Self {
        Self { rooms }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_rooms())
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

impl Default for RoomCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RoomOracle for RoomCatalog {
    fn room(&self, id: &RoomId) -> Option<&RoomDefinition> {
        self.rooms.iter().find(|room| &room.id == id)
    }

    fn catalog(&self) -> &[RoomDefinition] {
        &self.rooms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn ids_are_unique() {
        let rooms = builtin_rooms();
        let ids: BTreeSet<_> = rooms.iter().map(|room| room.id.clone()).collect();
        assert_eq!(ids.len(), rooms.len());
    }

    #[test]
    fn stairs_point_at_known_rooms() {
        let catalog = RoomCatalog::builtin();
        for room in catalog.catalog() {
            if let Some(partner) = &room.stairs_to {
                assert!(catalog.room(partner).is_some(), "{} -> {partner}", room.id);
            }
        }
    }

    #[test]
    fn starting_layout_is_present() {
        let catalog = RoomCatalog::builtin();
        for id in [
            game_core::engine::ENTRANCE_HALL,
            game_core::engine::FOYER,
            game_core::engine::GRAND_STAIRCASE,
            game_core::engine::UPPER_LANDING,
            game_core::engine::BASEMENT_LANDING,
        ] {
            let room = catalog.room(&RoomId::new(id)).unwrap();
            assert!(room.starting, "{id}");
        }
        let hall = catalog.room(&RoomId::new("entrance-hall")).unwrap();
        assert!(hall.front_doors.has(Direction::South));
    }

    #[test]
    fn every_effect_room_is_reachable() {
        let catalog = RoomCatalog::builtin();
        let with_effects: Vec<_> = catalog
            .catalog()
            .iter()
            .filter(|room| room.effect.is_some())
            .map(|room| room.id.as_str().to_string())
            .collect();
        assert_eq!(with_effects.len(), 8);
        assert!(with_effects.contains(&"collapsed-room".to_string()));
    }
}
