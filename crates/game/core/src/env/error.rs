//! Oracle access errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{CardId, CharacterId, RoomId};

/// Errors that occur when accessing oracle data.
///
/// A missing oracle means the session was wired incorrectly and cannot
/// proceed. A missing definition is a bad reference in the submitted intent.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("RoomOracle not available")]
    RoomsNotAvailable,

    #[error("CharacterOracle not available")]
    CharactersNotAvailable,

    #[error("CardOracle not available")]
    CardsNotAvailable,

    #[error("RngOracle not available")]
    RngNotAvailable,

    #[error("GameConfig not available")]
    ConfigNotAvailable,

    #[error("room definition '{0}' not found")]
    RoomNotFound(RoomId),

    #[error("character '{0}' not found")]
    CharacterNotFound(CharacterId),

    #[error("card '{0}' not found")]
    CardNotFound(CardId),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            RoomsNotAvailable | CharactersNotAvailable | CardsNotAvailable | RngNotAvailable
            | ConfigNotAvailable => ErrorSeverity::Fatal,

            RoomNotFound(_) | CharacterNotFound(_) | CardNotFound(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            RoomsNotAvailable => "ORACLE_ROOMS_NOT_AVAILABLE",
            CharactersNotAvailable => "ORACLE_CHARACTERS_NOT_AVAILABLE",
            CardsNotAvailable => "ORACLE_CARDS_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
            ConfigNotAvailable => "ORACLE_CONFIG_NOT_AVAILABLE",
            RoomNotFound(_) => "ORACLE_ROOM_NOT_FOUND",
            CharacterNotFound(_) => "ORACLE_CHARACTER_NOT_FOUND",
            CardNotFound(_) => "ORACLE_CARD_NOT_FOUND",
        }
    }
}
