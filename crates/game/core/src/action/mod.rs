//! Player intents and the transitions that apply them.
//!
//! Every [`Intent`] maps onto one transition type implementing
//! [`ActionTransition`]. Transitions are grouped by intent family, and each
//! family owns its error enum:
//!
//! | Module      | Intents                                              | Error           |
//! |-------------|------------------------------------------------------|-----------------|
//! | `movement`  | `Move`                                               | `MoveError`     |
//! | `discovery` | `SelectRoomTile`                                     | `DiscoveryError`|
//! | `roll`      | `SubmitRoll`                                         | `RollError`     |
//! | `card`      | `SelectCard`                                         | `CardError`     |
//! | `combat`    | `ConfirmCombat`, `ConfirmCombatRoll`                 | `CombatError`   |
//! | `choice`    | `DistributeDamage`, `ChooseStat`                     | `ChoiceError`   |
//! | `travel`    | stairs, elevator, secret passage, declined prompts   | `TravelError`   |
//! | `turn`      | `EndTurn`                                            | `TurnError`     |
//! | `haunt`     | `TriggerHaunt`                                       | `HauntError`    |
pub mod card;
pub mod choice;
pub mod combat;
pub mod discovery;
mod intent;
pub mod haunt;
pub mod movement;
pub mod roll;
pub mod travel;
pub mod turn;

pub use card::{CardError, SelectCardAction};
pub use choice::{ChoiceError, ChooseStatAction, DistributeDamageAction};
pub use combat::{CombatError, CombatRollAction, ConfirmCombatAction};
pub use discovery::{DiscoveryError, SelectRoomTileAction};
pub use haunt::{HauntError, TriggerHauntAction};
pub use intent::Intent;
pub use movement::{MoveAction, MoveError};
pub use roll::{RollError, SubmitRollAction};
pub use travel::{
    DeclineRescueAction, DeclineSecretPassageAction, TravelError, UseElevatorAction,
    UseSecretPassageAction, UseStairsAction,
};
pub use turn::{EndTurnAction, TurnError};

use crate::engine::SessionEvent;
use crate::env::GameEnv;
use crate::state::{GameState, PlayerId};

/// Defines how a concrete intent mutates game state.
///
/// The engine stages every transition on a copy of the state, so a failing
/// phase never leaks a partial mutation.
pub trait ActionTransition {
    type Error;

    /// Returns the player submitting this intent.
    fn actor(&self) -> PlayerId;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(&self, _state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies the intent by mutating the game state directly, reporting what
    /// happened through `events`.
    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        events: &mut Vec<SessionEvent>,
    ) -> Result<(), Self::Error>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(&self, _state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        Ok(())
    }
}
