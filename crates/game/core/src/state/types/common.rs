use std::fmt;

/// Stable identifier of a seated player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

string_id!(
    /// Identifier of a room tile, the slug of its display name.
    RoomId
);
string_id!(
    /// Identifier of an omen, event or item card.
    CardId
);
string_id!(
    /// Identifier of a playable character.
    CharacterId
);

impl RoomId {
    /// Derives the slug used as a room id: `"Servants' Quarters"` becomes
    /// `"servants-quarters"`.
    pub fn from_name(name: &str) -> Self {
        let mut slug = String::with_capacity(name.len());
        for ch in name.chars() {
            if ch.is_ascii_alphanumeric() {
                slug.push(ch.to_ascii_lowercase());
            } else if ch == '\'' {
                continue;
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        while slug.ends_with('-') {
            slug.pop();
        }
        Self(slug)
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Floor {
    Basement,
    Ground,
    Upper,
}

/// Door and travel direction. Variants are declared clockwise from north.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn opposite(self) -> Self {
        self.rotated(Rotation::Deg180)
    }

    /// Turns the direction clockwise by the given rotation.
    pub fn rotated(self, rotation: Rotation) -> Self {
        let index = (self as usize + rotation.quarter_turns() as usize) % 4;
        Self::ALL[index]
    }

    /// Grid offset of one step in this direction. North is +y.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::North | Direction::South)
    }
}

/// Integer coordinate on a floor's grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Clockwise tile rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    #[default]
    #[strum(serialize = "0")]
    Deg0,
    #[strum(serialize = "90")]
    Deg90,
    #[strum(serialize = "180")]
    Deg180,
    #[strum(serialize = "270")]
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    pub fn quarter_turns(self) -> u8 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 1,
            Rotation::Deg180 => 2,
            Rotation::Deg270 => 3,
        }
    }

    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees % 360 {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    /// Smallest rotation that turns `from` into `to`.
    pub fn between(from: Direction, to: Direction) -> Self {
        let turns = (to as usize + 4 - from as usize) % 4;
        Self::ALL[turns]
    }
}

/// The four traits every character tracks.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Stat {
    Speed,
    Might,
    Sanity,
    Knowledge,
}

impl Stat {
    pub const ALL: [Stat; 4] = [Stat::Speed, Stat::Might, Stat::Sanity, Stat::Knowledge];

    pub fn group(self) -> StatGroup {
        match self {
            Stat::Speed | Stat::Might => StatGroup::Physical,
            Stat::Sanity | Stat::Knowledge => StatGroup::Mental,
        }
    }
}

/// Physical traits take physical damage, mental traits take mental damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatGroup {
    Physical,
    Mental,
}

impl StatGroup {
    pub fn stats(self) -> [Stat; 2] {
        match self {
            StatGroup::Physical => [Stat::Speed, Stat::Might],
            StatGroup::Mental => [Stat::Sanity, Stat::Knowledge],
        }
    }
}

/// Card category. Room tokens name the category of card they draw.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CardKind {
    Omen,
    Event,
    Item,
}

/// Persistent world marker placed on a revealed room.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SpecialToken {
    SecretPassage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_slug_drops_apostrophes_and_spaces() {
        assert_eq!(
            RoomId::from_name("Servants' Quarters"),
            RoomId::new("servants-quarters")
        );
        assert_eq!(RoomId::from_name("Mystic Elevator"), "mystic-elevator");
    }

    #[test]
    fn rotation_turns_clockwise() {
        assert_eq!(Direction::North.rotated(Rotation::Deg90), Direction::East);
        assert_eq!(Direction::West.rotated(Rotation::Deg90), Direction::North);
        assert_eq!(Direction::East.opposite(), Direction::West);
        assert_eq!(
            Rotation::between(Direction::South, Direction::East),
            Rotation::Deg270
        );
    }

    #[test]
    fn stat_parses_case_insensitively() {
        assert_eq!("Might".parse::<Stat>(), Ok(Stat::Might));
        assert_eq!(Stat::Knowledge.group(), StatGroup::Mental);
    }
}
