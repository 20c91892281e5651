//! Directional movement through doors.
//!
//! A move may stop short of entering the next room: an unsatisfied exit or
//! enter roll opens a room-effect prompt, and a door into unexplored space
//! opens a discovery prompt. The move is retried once that decision settles.

use crate::engine::effects::{open_prompt, push_front, relocate, start_combat};
use crate::engine::{SessionEvent, TravelKind};
use crate::env::{GameEnv, OracleError, RoomEffect, RoomTrigger};
use crate::error::{ErrorSeverity, GameError};
use crate::event::stat_pool;
use crate::map::{MapError, discovery_candidates, heal_connection};
use crate::state::{
    CombatKind, CombatPhase, CombatSession, Combatant, Direction, Floor, GameState, Passage,
    PlayerId, Prompt, RollPool, RoomId, Stat, Step,
};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveError {
    #[error("player {0} is not seated")]
    UnknownPlayer(PlayerId),

    #[error("it is not player {0}'s turn")]
    NotYourTurn(PlayerId),

    #[error("no movement points left")]
    NoMovesLeft,

    #[error("player {0} is trapped")]
    Trapped(PlayerId),

    #[error("room '{room}' has no door to the {direction}")]
    NoDoor { room: RoomId, direction: Direction },

    #[error("door to the {direction} of '{room}' is blocked")]
    DoorBlocked { room: RoomId, direction: Direction },

    #[error("no undiscovered room fits the {floor} floor")]
    NoTilesLeft { floor: Floor },

    #[error("player {player} stands in unrevealed room '{room}'")]
    Misplaced { player: PlayerId, room: RoomId },

    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            MoveError::NotYourTurn(_)
            | MoveError::NoMovesLeft
            | MoveError::Trapped(_)
            | MoveError::DoorBlocked { .. }
            | MoveError::NoTilesLeft { .. } => ErrorSeverity::Recoverable,
            MoveError::UnknownPlayer(_) | MoveError::NoDoor { .. } => ErrorSeverity::Validation,
            MoveError::Misplaced { .. } => ErrorSeverity::Internal,
            MoveError::Map(error) => error.severity(),
            MoveError::Oracle(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            MoveError::UnknownPlayer(_) => "MOVE_UNKNOWN_PLAYER",
            MoveError::NotYourTurn(_) => "MOVE_NOT_YOUR_TURN",
            MoveError::NoMovesLeft => "MOVE_NO_MOVES_LEFT",
            MoveError::Trapped(_) => "MOVE_TRAPPED",
            MoveError::NoDoor { .. } => "MOVE_NO_DOOR",
            MoveError::DoorBlocked { .. } => "MOVE_DOOR_BLOCKED",
            MoveError::NoTilesLeft { .. } => "MOVE_NO_TILES_LEFT",
            MoveError::Misplaced { .. } => "MOVE_MISPLACED",
            MoveError::Map(error) => error.error_code(),
            MoveError::Oracle(error) => error.error_code(),
        }
    }
}

/// Walk through the door on one side of the current room.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveAction {
    pub actor: PlayerId,
    pub direction: Direction,
}

impl MoveAction {
    pub fn new(actor: PlayerId, direction: Direction) -> Self {
        Self { actor, direction }
    }
}

/// Checks shared by every self-propelled move: the turn holder, with
/// budget, not trapped.
pub(crate) fn ensure_can_move(state: &GameState, player: PlayerId) -> Result<(), MoveError> {
    state
        .player(player)
        .filter(|session| session.is_alive())
        .ok_or(MoveError::UnknownPlayer(player))?;
    if state.current_player() != Some(player) {
        return Err(MoveError::NotYourTurn(player));
    }
    if state.is_trapped(player) {
        return Err(MoveError::Trapped(player));
    }
    if state.turn.moves(player) == 0 {
        return Err(MoveError::NoMovesLeft);
    }
    Ok(())
}

impl super::ActionTransition for MoveAction {
    type Error = MoveError;

    fn actor(&self) -> PlayerId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        ensure_can_move(state, self.actor)?;
        let room = state
            .player(self.actor)
            .map(|session| session.room.clone())
            .ok_or(MoveError::UnknownPlayer(self.actor))?;
        let tile = state.map.room(&room).ok_or_else(|| MoveError::Misplaced {
            player: self.actor,
            room: room.clone(),
        })?;
        if !tile.doors.has(self.direction) {
            return Err(MoveError::NoDoor {
                room,
                direction: self.direction,
            });
        }
        if !tile.has_open_door(self.direction) {
            return Err(MoveError::DoorBlocked {
                room,
                direction: self.direction,
            });
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        events: &mut Vec<SessionEvent>,
    ) -> Result<(), Self::Error> {
        step_through_door(state, env, self.actor, self.direction, events)
    }

    fn post_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let session = state
            .player(self.actor)
            .ok_or(MoveError::UnknownPlayer(self.actor))?;
        if !state.map.is_revealed(&session.room) {
            return Err(MoveError::Misplaced {
                player: self.actor,
                room: session.room.clone(),
            });
        }
        Ok(())
    }
}

/// Key recording that `player` made the roll for `room`/`trigger`.
pub(crate) fn room_roll_key(room: &RoomId, trigger: RoomTrigger) -> String {
    format!("{room}:{trigger}")
}

/// The room's effect for `trigger` if `player` has not rolled for it yet.
pub(crate) fn pending_room_effect(
    state: &GameState,
    env: &GameEnv<'_>,
    player: PlayerId,
    room: &RoomId,
    trigger: RoomTrigger,
) -> Option<RoomEffect> {
    let effect = env.rooms().ok()?.room(room)?.effect.clone()?;
    if effect.trigger != trigger {
        return None;
    }
    let key = room_roll_key(room, trigger);
    let rolled = state
        .player(player)
        .is_some_and(|session| session.room_rolls.contains(&key));
    (!rolled).then_some(effect)
}

pub(crate) fn open_room_roll(
    state: &mut GameState,
    env: &GameEnv<'_>,
    player: PlayerId,
    room: RoomId,
    via: Passage,
    effect: RoomEffect,
    events: &mut Vec<SessionEvent>,
) {
    let dice = stat_pool(state, env, player, effect.stat).unwrap_or(0);
    open_prompt(
        state,
        Prompt::RoomEffectRoll {
            player,
            room,
            trigger: effect.trigger,
            via,
            target: effect.target,
            pool: RollPool::stat(effect.stat, dice),
        },
        events,
    );
}

/// Core move algorithm, shared by [`MoveAction`] and retried moves.
pub(crate) fn step_through_door(
    state: &mut GameState,
    env: &GameEnv<'_>,
    player: PlayerId,
    direction: Direction,
    events: &mut Vec<SessionEvent>,
) -> Result<(), MoveError> {
    let origin = state
        .player(player)
        .map(|session| session.room.clone())
        .ok_or(MoveError::UnknownPlayer(player))?;

    if let Some(effect) = pending_room_effect(state, env, player, &origin, RoomTrigger::Exit) {
        open_room_roll(state, env, player, origin, Passage::Door(direction), effect, events);
        return Ok(());
    }

    let mut target = state.map.connection(&origin, direction).cloned();
    if target.is_some() {
        if let Some(stale) = heal_connection(&mut state.map, &origin, direction) {
            events.push(SessionEvent::ConnectionHealed {
                from: origin.clone(),
                direction,
                stale,
            });
            target = None;
        }
    }

    let target = match target {
        Some(target) => target,
        None => match resolve_unlinked(state, env, player, &origin, direction, events)? {
            Some(target) => target,
            None => return Ok(()),
        },
    };

    if let Some(effect) = pending_room_effect(state, env, player, &target, RoomTrigger::Enter) {
        open_room_roll(state, env, player, target, Passage::Door(direction), effect, events);
        return Ok(());
    }

    if !state.turn.spend_move(player) {
        return Err(MoveError::NoMovesLeft);
    }
    relocate(state, player, &target, TravelKind::Door, events);
    if let Some(session) = state.player_mut(player) {
        session.entry_direction = Some(direction.opposite());
    }
    arrive(state, env, player, events);
    Ok(())
}

/// Links an existing neighbour or opens discovery. `None` means a prompt
/// was opened and the move waits for it.
fn resolve_unlinked(
    state: &mut GameState,
    env: &GameEnv<'_>,
    player: PlayerId,
    origin: &RoomId,
    direction: Direction,
    events: &mut Vec<SessionEvent>,
) -> Result<Option<RoomId>, MoveError> {
    let tile = state.map.room(origin).ok_or_else(|| MoveError::Misplaced {
        player,
        room: origin.clone(),
    })?;
    let floor = tile.floor;
    let cell = tile.position.step(direction);
    let blocked = || MoveError::DoorBlocked {
        room: origin.clone(),
        direction,
    };

    if let Some(neighbour) = state.map.room_at(floor, cell) {
        if !neighbour.has_open_door(direction.opposite()) {
            return Err(blocked());
        }
        let neighbour = neighbour.id.clone();
        state.map.connect(origin, direction, &neighbour);
        return Ok(Some(neighbour));
    }
    if state.map.reservation_at(floor, cell).is_some() {
        return Err(blocked());
    }

    let free_choice = state
        .effects(player)
        .is_some_and(|effects| effects.free_discovery);
    let catalog = env.rooms()?.catalog();
    if discovery_candidates(&state.map, catalog, floor, free_choice).is_empty() {
        return Err(MoveError::NoTilesLeft { floor });
    }
    open_prompt(
        state,
        Prompt::RoomDiscovery {
            player,
            from: origin.clone(),
            direction,
            free_choice,
        },
        events,
    );
    Ok(None)
}

/// Entry checks after walking into a room: a hostile occupant takes over
/// with combat, otherwise a trapped ally is offered rescue; undrawn tokens
/// are queued either way.
pub(crate) fn arrive(
    state: &mut GameState,
    env: &GameEnv<'_>,
    player: PlayerId,
    events: &mut Vec<SessionEvent>,
) {
    let Some(room) = state.player(player).map(|session| session.room.clone()) else {
        return;
    };
    let draws = claim_tokens(state, player, &room);

    if let Some(enemy) = engageable_enemy(state, player, &room) {
        push_front(state, draws);
        let attack = stat_pool(state, env, player, Stat::Might).unwrap_or(0);
        let defence = stat_pool(state, env, enemy, Stat::Might).unwrap_or(0);
        start_combat(
            state,
            CombatSession {
                room,
                attacker: Combatant::new(player, Stat::Might, attack),
                defender: Combatant::new(enemy, Stat::Might, defence),
                kind: CombatKind::Ordinary,
                phase: CombatPhase::Confirm,
            },
            events,
        );
        return;
    }

    let mut steps = Vec::new();
    if let Some((ally, stat, threshold)) = trapped_ally(state, player, &room) {
        let dice = stat_pool(state, env, player, stat).unwrap_or(0);
        steps.push(Step::Open(Prompt::Rescue {
            player,
            trapped: ally,
            threshold,
            pool: RollPool::stat(stat, dice),
        }));
    }
    steps.extend(draws);
    push_front(state, steps);
}

/// Marks the room's tokens drawn and returns the draw steps for them.
fn claim_tokens(state: &mut GameState, player: PlayerId, room: &RoomId) -> Vec<Step> {
    let Some(tile) = state.map.room_mut(room) else {
        return Vec::new();
    };
    let kinds = tile.undrawn_tokens().to_vec();
    tile.tokens_drawn = true;
    kinds
        .into_iter()
        .map(|kind| {
            Step::Open(Prompt::DrawCard {
                player,
                kind,
                room: room.clone(),
            })
        })
        .collect()
}

/// First living enemy in `room`, in turn order, the mover may still fight.
pub(crate) fn engageable_enemy(state: &GameState, player: PlayerId, room: &RoomId) -> Option<PlayerId> {
    if state.turn.attacked_this_turn || !state.haunt_started() {
        return None;
    }
    let mover = state.player(player)?;
    state
        .turn
        .order
        .iter()
        .filter_map(|id| state.player(*id))
        .filter(|other| other.room == *room && mover.is_enemy_of(other))
        .find(|other| !crate::combat::is_blocked(&state.completed_combats, room, player, other.id))
        .map(|other| other.id)
}

/// Trapped ally in `room` whose card allows help: `(ally, stat, threshold)`.
fn trapped_ally(state: &GameState, player: PlayerId, room: &RoomId) -> Option<(PlayerId, Stat, u8)> {
    let mover = state.player(player)?;
    state
        .players_in(room)
        .filter(|other| other.id != player && !mover.is_enemy_of(other))
        .find_map(|other| {
            let trap = state.effects(other.id)?.trapped.as_ref()?;
            trap.ally_can_help
                .then_some((other.id, trap.escape_stat, trap.threshold))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CharacterId, CharacterStats, PlayerSession, TurnState};

    fn one_player() -> GameState {
        let mut state = GameState::default();
        state.players.push(PlayerSession::new(
            PlayerId(1),
            CharacterId::new("c"),
            RoomId::new("hall"),
            CharacterStats::new(3, 3, 3, 3),
        ));
        state.turn = TurnState::new(vec![PlayerId(1)]);
        state
    }

    #[test]
    fn budget_and_trap_gate_movement() {
        let mut state = one_player();
        assert_eq!(ensure_can_move(&state, PlayerId(1)), Err(MoveError::NoMovesLeft));

        state.turn.set_moves(PlayerId(1), 2);
        assert_eq!(ensure_can_move(&state, PlayerId(1)), Ok(()));

        state.effects_mut(PlayerId(1)).trapped = Some(crate::state::TrappedRecord {
            card: crate::state::CardId::new("webs"),
            escape_stat: Stat::Might,
            threshold: 4,
            auto_escape_after: 3,
            ally_can_help: false,
            ally_failure: crate::env::AllyFailure::Nothing,
            turns_trapped: 0,
        });
        assert_eq!(ensure_can_move(&state, PlayerId(1)), Err(MoveError::Trapped(PlayerId(1))));
        assert_eq!(ensure_can_move(&state, PlayerId(7)), Err(MoveError::UnknownPlayer(PlayerId(7))));
    }

    #[test]
    fn roll_keys_name_room_and_trigger() {
        assert_eq!(room_roll_key(&RoomId::new("attic"), RoomTrigger::Exit), "attic:exit");
    }
}
