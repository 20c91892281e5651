use crate::engine::SessionEvent;
use crate::env::GameEnv;
use crate::error::{ErrorSeverity, GameError};
use crate::haunt::begin_haunt;
use crate::state::{CardId, GameState, HauntRecord, PlayerId, RoomId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HauntError {
    #[error("the haunt has already begun")]
    AlreadyStarted,

    #[error("traitor {0} is not a living seated player")]
    UnknownTraitor(PlayerId),
}

impl GameError for HauntError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            HauntError::AlreadyStarted => ErrorSeverity::Recoverable,
            HauntError::UnknownTraitor(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            HauntError::AlreadyStarted => "HAUNT_ALREADY_STARTED",
            HauntError::UnknownTraitor(_) => "HAUNT_UNKNOWN_TRAITOR",
        }
    }
}

/// Starts the haunt on behalf of the session layer.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerHauntAction {
    pub actor: PlayerId,
    pub scenario: u32,
    pub traitor: PlayerId,
    pub omen: Option<CardId>,
    pub room: Option<RoomId>,
}

impl super::ActionTransition for TriggerHauntAction {
    type Error = HauntError;

    fn actor(&self) -> PlayerId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        if state.haunt_started() {
            return Err(HauntError::AlreadyStarted);
        }
        if state.player(self.traitor).is_none_or(|p| !p.is_alive()) {
            return Err(HauntError::UnknownTraitor(self.traitor));
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
        events: &mut Vec<SessionEvent>,
    ) -> Result<(), Self::Error> {
        let record = HauntRecord {
            scenario: self.scenario,
            traitor: self.traitor,
            triggered_by: self.actor,
            omen: self.omen.clone(),
            room: self.room.clone(),
            game_over: None,
        };
        if !begin_haunt(state, record) {
            return Err(HauntError::AlreadyStarted);
        }
        events.push(SessionEvent::HauntBegan {
            scenario: self.scenario,
            traitor: self.traitor,
        });
        Ok(())
    }
}
