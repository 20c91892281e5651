//! Session bootstrap: seats, starting layout and the first turn.

use crate::config::GameConfig;
use crate::env::{GameEnv, OracleError, RoomDefinition};
use crate::error::{ErrorSeverity, GameError};
use crate::map::{build_tile, place_tile};
use crate::state::{
    CharacterId, Direction, Floor, GameState, GridPos, PlayerId, PlayerSession, RoomId, Rotation,
    Stat, TurnState,
};
use crate::stats::{current_value, starting_stats};

pub const ENTRANCE_HALL: &str = "entrance-hall";
pub const FOYER: &str = "foyer";
pub const GRAND_STAIRCASE: &str = "grand-staircase";
pub const UPPER_LANDING: &str = "upper-landing";
pub const BASEMENT_LANDING: &str = "basement-landing";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SetupError {
    #[error("a session needs {min}-{max} players, got {count}", min = GameConfig::MIN_PLAYERS, max = GameConfig::MAX_PLAYERS)]
    PlayerCount { count: usize },

    #[error("player {0} is seated twice")]
    DuplicateSeat(PlayerId),

    #[error("character '{0}' is already taken")]
    CharacterTaken(CharacterId),

    #[error("starting room '{0}' is missing from the catalog")]
    MissingStartingRoom(RoomId),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            SetupError::MissingStartingRoom(_) => ErrorSeverity::Fatal,
            SetupError::Oracle(error) => error.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SetupError::PlayerCount { .. } => "SETUP_PLAYER_COUNT",
            SetupError::DuplicateSeat(_) => "SETUP_DUPLICATE_SEAT",
            SetupError::CharacterTaken(_) => "SETUP_CHARACTER_TAKEN",
            SetupError::MissingStartingRoom(_) => "SETUP_MISSING_STARTING_ROOM",
            SetupError::Oracle(error) => error.error_code(),
        }
    }
}

/// One seat at the table, in join order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Seat {
    pub player: PlayerId,
    pub character: CharacterId,
}

impl Seat {
    pub fn new(player: PlayerId, character: impl Into<CharacterId>) -> Self {
        Self {
            player,
            character: character.into(),
        }
    }
}

fn starting_room<'a>(env: &GameEnv<'a>, id: &str) -> Result<&'a RoomDefinition, SetupError> {
    let id = RoomId::new(id);
    env.rooms()?
        .room(&id)
        .ok_or(SetupError::MissingStartingRoom(id))
}

fn check_seats(seats: &[Seat]) -> Result<(), SetupError> {
    if !(GameConfig::MIN_PLAYERS..=GameConfig::MAX_PLAYERS).contains(&seats.len()) {
        return Err(SetupError::PlayerCount { count: seats.len() });
    }
    for (index, seat) in seats.iter().enumerate() {
        let earlier = &seats[..index];
        if earlier.iter().any(|other| other.player == seat.player) {
            return Err(SetupError::DuplicateSeat(seat.player));
        }
        if earlier.iter().any(|other| other.character == seat.character) {
            return Err(SetupError::CharacterTaken(seat.character.clone()));
        }
    }
    Ok(())
}

/// Builds the opening snapshot: the five starting rooms, every player in
/// the Entrance Hall, and the first seat's turn ready to move.
pub fn new_session(env: &GameEnv<'_>, seats: &[Seat], game_seed: u64) -> Result<GameState, SetupError> {
    check_seats(seats)?;

    let mut state = GameState {
        game_seed,
        ..GameState::default()
    };

    let layout = [
        (ENTRANCE_HALL, Floor::Ground, GridPos::ORIGIN),
        (FOYER, Floor::Ground, GridPos::new(0, 1)),
        (GRAND_STAIRCASE, Floor::Ground, GridPos::new(0, 2)),
        (UPPER_LANDING, Floor::Upper, GridPos::ORIGIN),
        (BASEMENT_LANDING, Floor::Basement, GridPos::ORIGIN),
    ];
    for (id, floor, position) in layout {
        let def = starting_room(env, id)?;
        place_tile(&mut state.map, build_tile(def, floor, position, Rotation::Deg0));
    }
    let hall = RoomId::new(ENTRANCE_HALL);
    let foyer = RoomId::new(FOYER);
    let staircase = RoomId::new(GRAND_STAIRCASE);
    state.map.connect(&hall, Direction::North, &foyer);
    state.map.connect(&foyer, Direction::North, &staircase);
    state.map.link_stairs(&staircase, &RoomId::new(UPPER_LANDING));

    let characters = env.characters()?;
    for seat in seats {
        let character = characters
            .character(&seat.character)
            .ok_or_else(|| OracleError::CharacterNotFound(seat.character.clone()))?;
        state.players.push(PlayerSession::new(
            seat.player,
            seat.character.clone(),
            hall.clone(),
            starting_stats(character),
        ));
    }

    state.turn = TurnState::new(seats.iter().map(|seat| seat.player).collect());
    if let Some(first) = state.players.first() {
        let speed = characters
            .character(&first.character)
            .map(|character| current_value(first, character, Stat::Speed))
            .unwrap_or(0);
        let first = first.id;
        state.turn.set_moves(first, speed);
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seats(count: u32) -> Vec<Seat> {
        (1..=count)
            .map(|id| Seat::new(PlayerId(id), format!("character-{id}").as_str()))
            .collect()
    }

    #[test]
    fn table_size_is_bounded() {
        assert_eq!(
            check_seats(&seats(2)),
            Err(SetupError::PlayerCount { count: 2 })
        );
        assert_eq!(
            check_seats(&seats(7)),
            Err(SetupError::PlayerCount { count: 7 })
        );
        assert_eq!(check_seats(&seats(6)), Ok(()));
    }

    #[test]
    fn seats_and_characters_are_unique() {
        let mut table = seats(3);
        table[2].character = table[0].character.clone();
        assert!(matches!(check_seats(&table), Err(SetupError::CharacterTaken(_))));

        let mut table = seats(3);
        table[1].player = PlayerId(1);
        assert_eq!(check_seats(&table), Err(SetupError::DuplicateSeat(PlayerId(1))));
    }

    #[test]
    fn missing_catalog_is_reported() {
        let error = new_session(&GameEnv::empty(), &seats(3), 7).unwrap_err();
        assert_eq!(error, SetupError::Oracle(OracleError::RoomsNotAvailable));
    }
}
