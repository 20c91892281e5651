use crate::engine::effects::{push_front, relocate};
use crate::engine::{SessionEvent, TravelKind};
use crate::env::{GameEnv, OracleError};
use crate::error::{ErrorSeverity, GameError};
use crate::map::{MapError, discover_room};
use crate::state::{GameState, PlayerId, Prompt, RoomId, Rotation, Step};

use super::movement::arrive;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiscoveryError {
    #[error("no room discovery is awaited from player {0}")]
    NoDiscoveryPending(PlayerId),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for DiscoveryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            DiscoveryError::NoDiscoveryPending(_) => ErrorSeverity::Recoverable,
            DiscoveryError::Map(error) => error.severity(),
            DiscoveryError::Oracle(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            DiscoveryError::NoDiscoveryPending(_) => "DISCOVERY_NOT_PENDING",
            DiscoveryError::Map(error) => error.error_code(),
            DiscoveryError::Oracle(error) => error.error_code(),
        }
    }
}

/// Places the chosen tile against the door that opened the discovery.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectRoomTileAction {
    pub actor: PlayerId,
    pub room: RoomId,
    pub rotation: Rotation,
}

impl SelectRoomTileAction {
    pub fn new(actor: PlayerId, room: RoomId, rotation: Rotation) -> Self {
        Self {
            actor,
            room,
            rotation,
        }
    }
}

impl super::ActionTransition for SelectRoomTileAction {
    type Error = DiscoveryError;

    fn actor(&self) -> PlayerId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        match &state.prompt {
            Some(Prompt::RoomDiscovery { player, .. }) if *player == self.actor => {}
            _ => return Err(DiscoveryError::NoDiscoveryPending(self.actor)),
        }
        env.rooms()?
            .room(&self.room)
            .ok_or_else(|| OracleError::RoomNotFound(self.room.clone()))?;
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        events: &mut Vec<SessionEvent>,
    ) -> Result<(), Self::Error> {
        let Some(Prompt::RoomDiscovery {
            player,
            from,
            direction,
            free_choice,
        }) = state.prompt.clone()
        else {
            return Err(DiscoveryError::NoDiscoveryPending(self.actor));
        };
        let rooms = env.rooms()?;
        let def = rooms
            .room(&self.room)
            .ok_or_else(|| OracleError::RoomNotFound(self.room.clone()))?;

        let id = discover_room(&mut state.map, def, &from, direction, self.rotation, free_choice)?;
        state.prompt = None;

        // Stairs declared on the other end of the link.
        let partners: Vec<RoomId> = rooms
            .catalog()
            .iter()
            .filter(|other| other.stairs_to.as_ref() == Some(&id))
            .filter(|other| state.map.is_revealed(&other.id))
            .map(|other| other.id.clone())
            .collect();
        for partner in partners {
            state.map.link_stairs(&id, &partner);
        }

        if let Some(tile) = state.map.room(&id) {
            events.push(SessionEvent::RoomDiscovered {
                player,
                room: id.clone(),
                floor: tile.floor,
                position: tile.position,
                rotation: tile.rotation,
            });
        }
        if free_choice {
            state.effects_mut(player).free_discovery = false;
        }

        if state.map.connection(&from, direction) == Some(&id) {
            push_front(state, vec![Step::RetryMove { player, direction }]);
            return Ok(());
        }

        // A freely chosen tile that does not meet the door is still entered.
        if state.turn.spend_move(player) {
            relocate(state, player, &id, TravelKind::Placed, events);
            arrive(state, env, player, events);
        }
        Ok(())
    }

    fn post_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        if !state.map.is_revealed(&self.room) {
            return Err(MapError::NotRevealed(self.room.clone()).into());
        }
        Ok(())
    }
}
