//! Travel that does not go through a door, and the prompts it raises.

use crate::engine::effects::relocate;
use crate::engine::{SessionEvent, TravelKind};
use crate::env::{GameEnv, OracleError, RoomTrigger};
use crate::error::{ErrorSeverity, GameError};
use crate::map::{MapError, relocate_mobile};
use crate::state::{Floor, GameState, Passage, PlayerId, Prompt, RoomId};

use super::movement::{MoveError, arrive, ensure_can_move, open_room_roll, pending_room_effect};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TravelError {
    #[error(transparent)]
    Move(#[from] MoveError),

    #[error("room '{0}' has no stairs")]
    NoStairs(RoomId),

    #[error("player {0} is not inside the elevator")]
    NotInElevator(PlayerId),

    #[error("the elevator was already used this turn")]
    ElevatorUsed,

    #[error("the elevator is already on the {0} floor")]
    SameFloor(Floor),

    #[error("the elevator does not serve the {0} floor")]
    FloorNotServed(Floor),

    #[error("no secret passage choice is awaited from player {0}")]
    NoPassagePending(PlayerId),

    #[error("'{0}' is not a secret passage destination")]
    NotADestination(RoomId),

    #[error("no rescue is awaited from player {0}")]
    NoRescuePending(PlayerId),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for TravelError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            TravelError::Move(error) => error.severity(),
            TravelError::Map(error) => error.severity(),
            TravelError::Oracle(error) => error.severity(),
            TravelError::NotADestination(_) | TravelError::FloorNotServed(_) => {
                ErrorSeverity::Validation
            }
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            TravelError::Move(error) => error.error_code(),
            TravelError::NoStairs(_) => "TRAVEL_NO_STAIRS",
            TravelError::NotInElevator(_) => "TRAVEL_NOT_IN_ELEVATOR",
            TravelError::ElevatorUsed => "TRAVEL_ELEVATOR_USED",
            TravelError::SameFloor(_) => "TRAVEL_SAME_FLOOR",
            TravelError::FloorNotServed(_) => "TRAVEL_FLOOR_NOT_SERVED",
            TravelError::NoPassagePending(_) => "TRAVEL_NO_PASSAGE_PROMPT",
            TravelError::NotADestination(_) => "TRAVEL_NOT_A_DESTINATION",
            TravelError::NoRescuePending(_) => "TRAVEL_NO_RESCUE_PROMPT",
            TravelError::Map(error) => error.error_code(),
            TravelError::Oracle(error) => error.error_code(),
        }
    }
}

fn current_room(state: &GameState, player: PlayerId) -> Result<RoomId, TravelError> {
    state
        .player(player)
        .map(|session| session.room.clone())
        .ok_or(TravelError::Move(MoveError::UnknownPlayer(player)))
}

/// Climbs or descends the stairs linked to the current room. Costs a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UseStairsAction {
    pub actor: PlayerId,
}

impl super::ActionTransition for UseStairsAction {
    type Error = TravelError;

    fn actor(&self) -> PlayerId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        ensure_can_move(state, self.actor)?;
        let room = current_room(state, self.actor)?;
        if state.map.stairs_from(&room).is_none() {
            return Err(TravelError::NoStairs(room));
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        events: &mut Vec<SessionEvent>,
    ) -> Result<(), Self::Error> {
        climb_stairs(state, env, self.actor, events)
    }
}

/// Stairs counterpart of the door move: the same exit and enter rolls
/// interrupt the climb, which is retried once they settle.
pub(crate) fn climb_stairs(
    state: &mut GameState,
    env: &GameEnv<'_>,
    player: PlayerId,
    events: &mut Vec<SessionEvent>,
) -> Result<(), TravelError> {
    let room = current_room(state, player)?;
    let target = state
        .map
        .stairs_from(&room)
        .cloned()
        .ok_or_else(|| TravelError::NoStairs(room.clone()))?;

    if let Some(effect) = pending_room_effect(state, env, player, &room, RoomTrigger::Exit) {
        open_room_roll(state, env, player, room, Passage::Stairs, effect, events);
        return Ok(());
    }
    if let Some(effect) = pending_room_effect(state, env, player, &target, RoomTrigger::Enter) {
        open_room_roll(state, env, player, target, Passage::Stairs, effect, events);
        return Ok(());
    }

    if !state.turn.spend_move(player) {
        return Err(MoveError::NoMovesLeft.into());
    }
    relocate(state, player, &target, TravelKind::Stairs, events);
    arrive(state, env, player, events);
    Ok(())
}

/// Sends the elevator, and everyone inside it, to another floor.
///
/// Needs movement left but does not spend any; usable once per turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UseElevatorAction {
    pub actor: PlayerId,
    pub floor: Floor,
}

impl super::ActionTransition for UseElevatorAction {
    type Error = TravelError;

    fn actor(&self) -> PlayerId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        ensure_can_move(state, self.actor)?;
        if state.turn.elevator_used {
            return Err(TravelError::ElevatorUsed);
        }
        let room = current_room(state, self.actor)?;
        let tile = state
            .map
            .room(&room)
            .filter(|tile| tile.mobile)
            .ok_or(TravelError::NotInElevator(self.actor))?;
        if tile.floor == self.floor {
            return Err(TravelError::SameFloor(self.floor));
        }
        let def = env
            .rooms()?
            .room(&room)
            .ok_or(OracleError::RoomNotFound(room))?;
        if !def.allows_floor(self.floor) {
            return Err(TravelError::FloorNotServed(self.floor));
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        events: &mut Vec<SessionEvent>,
    ) -> Result<(), Self::Error> {
        let room = current_room(state, self.actor)?;
        let def = env
            .rooms()?
            .room(&room)
            .ok_or_else(|| OracleError::RoomNotFound(room.clone()))?;
        let relocation = relocate_mobile(&mut state.map, def, self.floor)?;
        state.turn.elevator_used = true;
        events.push(SessionEvent::ElevatorMoved {
            room: room.clone(),
            floor: relocation.floor,
            position: relocation.position,
        });

        // Riders stay inside; the room itself moved.
        let riders: Vec<PlayerId> = state.players_in(&room).map(|p| p.id).collect();
        for rider in riders {
            if let Some(session) = state.player_mut(rider) {
                session.entry_direction = None;
            }
        }
        Ok(())
    }
}

/// Takes one of the offered secret passages.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UseSecretPassageAction {
    pub actor: PlayerId,
    pub room: RoomId,
}

impl super::ActionTransition for UseSecretPassageAction {
    type Error = TravelError;

    fn actor(&self) -> PlayerId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        match &state.prompt {
            Some(Prompt::SecretPassage {
                player,
                destinations,
            }) if *player == self.actor => {
                if destinations.contains(&self.room) {
                    Ok(())
                } else {
                    Err(TravelError::NotADestination(self.room.clone()))
                }
            }
            _ => Err(TravelError::NoPassagePending(self.actor)),
        }
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
        events: &mut Vec<SessionEvent>,
    ) -> Result<(), Self::Error> {
        state.prompt = None;
        relocate(state, self.actor, &self.room, TravelKind::SecretPassage, events);
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeclineSecretPassageAction {
    pub actor: PlayerId,
}

impl super::ActionTransition for DeclineSecretPassageAction {
    type Error = TravelError;

    fn actor(&self) -> PlayerId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        match &state.prompt {
            Some(Prompt::SecretPassage { player, .. }) if *player == self.actor => Ok(()),
            _ => Err(TravelError::NoPassagePending(self.actor)),
        }
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
        _events: &mut Vec<SessionEvent>,
    ) -> Result<(), Self::Error> {
        state.prompt = None;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeclineRescueAction {
    pub actor: PlayerId,
}

impl super::ActionTransition for DeclineRescueAction {
    type Error = TravelError;

    fn actor(&self) -> PlayerId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        match &state.prompt {
            Some(Prompt::Rescue { player, .. }) if *player == self.actor => Ok(()),
            _ => Err(TravelError::NoRescuePending(self.actor)),
        }
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
        _events: &mut Vec<SessionEvent>,
    ) -> Result<(), Self::Error> {
        state.prompt = None;
        Ok(())
    }
}
