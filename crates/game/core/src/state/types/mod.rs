pub mod combat;
pub mod common;
pub mod effects;
pub mod haunt;
pub mod map;
pub mod player;
pub mod prompt;
pub mod turn;

pub use combat::{CombatKey, CombatKind, CombatPhase, CombatResult, CombatSession, Combatant};
pub use common::{
    CardId, CardKind, CharacterId, Direction, Floor, GridPos, PlayerId, RoomId, Rotation,
    SpecialToken, Stat, StatGroup,
};
pub use effects::{
    PendingEffects, PendingStatChoice, PersistentRecord, QueuedEvent, StatChoiceReason,
    TrappedRecord,
};
pub use haunt::{GameOver, HauntRecord, Winner};
pub use map::{
    Divider, DividedLayout, DoorSet, ElevatorReservation, MapGraph, RoomTile, Zone,
};
pub use player::{CharacterStats, Faction, HeldCards, PlayerSession};
pub use prompt::{Passage, Prompt, RollPool, Step};
pub use turn::{TurnPrompts, TurnState};
