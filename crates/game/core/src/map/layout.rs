//! Near/far zones of a divided room.

use crate::state::{CardKind, Direction, DividedLayout, Divider, Zone};

/// Layout of a divided room whose door faces `door_side`.
///
/// The near half sits against the door. North/south doors split the room
/// with a horizontal divider, east/west doors with a vertical one.
pub fn divided_layout(door_side: Direction) -> DividedLayout {
    DividedLayout {
        door_side,
        divider: if door_side.is_vertical() {
            Divider::Horizontal
        } else {
            Divider::Vertical
        },
        near_side: door_side,
        far_side: door_side.opposite(),
    }
}

/// Event tokens lie by the door, everything else behind the divider.
pub fn token_zone(kind: CardKind) -> Zone {
    match kind {
        CardKind::Event => Zone::Near,
        CardKind::Item | CardKind::Omen => Zone::Far,
    }
}

/// Players always arrive in the near half.
pub fn spawn_zone(_layout: &DividedLayout) -> Zone {
    Zone::Near
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::RoomDefinition;
    use crate::map::build_tile;
    use crate::state::{DoorSet, Floor, GridPos, RoomId, Rotation};

    #[test]
    fn layout_follows_rotated_door() {
        let vault = RoomDefinition {
            id: RoomId::new("vault"),
            name: "Vault".into(),
            floors: vec![Floor::Ground],
            doors: DoorSet::NORTH,
            front_doors: DoorSet::empty(),
            tokens: vec![CardKind::Event, CardKind::Item, CardKind::Item],
            stairs_to: None,
            effect: None,
            outdoor_window: false,
            divided: true,
            mobile: false,
            starting: false,
        };

        let upright = build_tile(&vault, Floor::Ground, GridPos::ORIGIN, Rotation::Deg0);
        let layout = upright.layout.unwrap();
        assert_eq!(layout.divider, Divider::Horizontal);
        assert_eq!(layout.near_side, Direction::North);
        assert_eq!(layout.far_side, Direction::South);

        let turned = build_tile(&vault, Floor::Ground, GridPos::ORIGIN, Rotation::Deg90);
        let layout = turned.layout.unwrap();
        assert_eq!(layout.divider, Divider::Vertical);
        assert_eq!(layout.near_side, Direction::East);
    }

    #[test]
    fn tokens_split_by_kind() {
        assert_eq!(token_zone(CardKind::Event), Zone::Near);
        assert_eq!(token_zone(CardKind::Item), Zone::Far);
    }
}
