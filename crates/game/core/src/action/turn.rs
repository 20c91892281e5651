use crate::engine::SessionEvent;
use crate::env::GameEnv;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{GameState, PlayerId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnError {
    #[error("it is not player {0}'s turn")]
    NotYourTurn(PlayerId),
}

impl GameError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            TurnError::NotYourTurn(_) => "TURN_NOT_YOUR_TURN",
        }
    }
}

/// Gives up the remaining movement; the turn then passes on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndTurnAction {
    pub actor: PlayerId,
}

impl EndTurnAction {
    pub fn new(actor: PlayerId) -> Self {
        Self { actor }
    }
}

impl super::ActionTransition for EndTurnAction {
    type Error = TurnError;

    fn actor(&self) -> PlayerId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        if state.current_player() != Some(self.actor) {
            return Err(TurnError::NotYourTurn(self.actor));
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
        _events: &mut Vec<SessionEvent>,
    ) -> Result<(), Self::Error> {
        state.turn.set_moves(self.actor, 0);
        Ok(())
    }
}
