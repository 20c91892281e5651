//! Answers to every roll prompt.
//!
//! The submitted faces (or an engine roll) are settled through
//! [`crate::dice::settle_roll`] first; the total is always recomputed here.
//! What the total means depends on the prompt that asked for it.

use crate::dice::{DiceError, DiceRoll, settle_roll};
use crate::engine::effects::{adjust_stat, push_front, relocate};
use crate::engine::{FizzleReason, ReleaseReason, SessionEvent, TravelKind, turn_budget};
use crate::env::{AllyFailure, GameEnv, OracleError, RoomFailure, RoomTrigger, rng_context};
use crate::error::{ErrorSeverity, GameError};
use crate::event::{resolve_roll, resolve_second_roll};
use crate::state::{
    CardId, Floor, GameState, PlayerId, Prompt, RollPool, RoomId, Stat, StatGroup, Step,
};

use super::movement::room_roll_key;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RollError {
    #[error("no roll is awaited from player {0}")]
    NoRollPending(PlayerId),

    #[error("this roll needs a stat choice")]
    StatRequired,

    #[error("{0} is not one of the offered stats")]
    StatNotOffered(Stat),

    #[error(transparent)]
    Dice(#[from] DiceError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for RollError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RollError::NoRollPending(_) => ErrorSeverity::Recoverable,
            RollError::StatRequired | RollError::StatNotOffered(_) | RollError::Dice(_) => {
                ErrorSeverity::Validation
            }
            RollError::Oracle(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RollError::NoRollPending(_) => "ROLL_NOT_PENDING",
            RollError::StatRequired => "ROLL_STAT_REQUIRED",
            RollError::StatNotOffered(_) => "ROLL_STAT_NOT_OFFERED",
            RollError::Dice(DiceError::WrongCount { .. }) => "ROLL_WRONG_DICE_COUNT",
            RollError::Dice(DiceError::InvalidFace { .. }) => "ROLL_INVALID_FACE",
            RollError::Dice(DiceError::PoolTooLarge(_)) => "ROLL_POOL_TOO_LARGE",
            RollError::Dice(DiceError::EngineRolls) => "ROLL_ENGINE_ROLLS",
            RollError::Oracle(error) => error.error_code(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubmitRollAction {
    pub actor: PlayerId,
    pub dice: Vec<u8>,
    pub stat: Option<Stat>,
}

impl SubmitRollAction {
    pub fn new(actor: PlayerId, dice: Vec<u8>, stat: Option<Stat>) -> Self {
        Self { actor, dice, stat }
    }

    fn pool_size(&self, pool: &RollPool) -> Result<(Option<Stat>, u8), RollError> {
        pool.select(self.stat).ok_or(match self.stat {
            None => RollError::StatRequired,
            Some(stat) => RollError::StatNotOffered(stat),
        })
    }
}

impl super::ActionTransition for SubmitRollAction {
    type Error = RollError;

    fn actor(&self) -> PlayerId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let pool = state
            .prompt
            .as_ref()
            .filter(|prompt| prompt.player() == self.actor)
            .and_then(Prompt::roll_pool)
            .ok_or(RollError::NoRollPending(self.actor))?;
        self.pool_size(pool).map(|_| ())
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        events: &mut Vec<SessionEvent>,
    ) -> Result<(), Self::Error> {
        let prompt = state
            .prompt
            .take()
            .ok_or(RollError::NoRollPending(self.actor))?;
        let pool = prompt
            .roll_pool()
            .ok_or(RollError::NoRollPending(self.actor))?;
        let (stat, count) = self.pool_size(pool)?;

        let config = env.config()?;
        let rng = env.rng()?;
        let seed = state.roll_seed(self.actor);
        let roll = settle_roll(config.dice_mode, &self.dice, count, rng, seed)?;
        let total = roll.total();
        report_roll(self.actor, &prompt, &roll, events);

        let steps = match prompt {
            Prompt::RoomEffectRoll {
                player,
                room,
                trigger,
                via,
                target,
                ..
            } => room_effect(
                state,
                env,
                player,
                &room,
                trigger,
                total >= target,
                via.retry(player),
                events,
            ),
            Prompt::EventRoll { player, card, .. }
            | Prompt::MultiPlayerRoll { player, card, .. } => {
                resolve_roll(state, env, player, &card, total, stat, events)
            }
            Prompt::SecondRoll {
                player,
                card,
                results,
                ..
            } => resolve_second_roll(player, &card, &results, total, events),
            Prompt::DamageRoll {
                player,
                group,
                then_trapped,
                ..
            } => damage_steps(player, group, total, then_trapped),
            Prompt::TrappedEscape {
                player, threshold, ..
            } => {
                escape(state, env, player, total >= threshold, events);
                Vec::new()
            }
            Prompt::Rescue {
                player,
                trapped,
                threshold,
                ..
            } => {
                rescue(state, player, trapped, total >= threshold, events);
                Vec::new()
            }
            other => {
                state.prompt = Some(other);
                return Err(RollError::NoRollPending(self.actor));
            }
        };
        push_front(state, steps);
        Ok(())
    }
}

fn report_roll(player: PlayerId, prompt: &Prompt, roll: &DiceRoll, events: &mut Vec<SessionEvent>) {
    events.push(SessionEvent::DiceRolled {
        player,
        prompt: prompt.name().to_string(),
        faces: roll.faces.to_vec(),
        total: roll.total(),
    });
}

/// Steps after a damage roll: distribution of the rolled amount, then the
/// trap that rode along with the damage.
fn damage_steps(
    player: PlayerId,
    group: StatGroup,
    total: u8,
    then_trapped: Option<(CardId, crate::env::TrappedSpec)>,
) -> Vec<Step> {
    let mut steps = Vec::new();
    if total > 0 {
        steps.push(Step::Open(Prompt::DamageDistribution {
            player,
            group,
            amount: total,
        }));
    }
    if let Some((card, spec)) = then_trapped {
        steps.push(Step::Trap { player, card, spec });
    }
    steps
}

#[allow(clippy::too_many_arguments)]
fn room_effect(
    state: &mut GameState,
    env: &GameEnv<'_>,
    player: PlayerId,
    room: &RoomId,
    trigger: RoomTrigger,
    passed: bool,
    retry: Step,
    events: &mut Vec<SessionEvent>,
) -> Vec<Step> {
    if let Some(session) = state.player_mut(player) {
        session.room_rolls.insert(room_roll_key(room, trigger));
    }
    events.push(SessionEvent::RoomEffectResolved {
        player,
        room: room.clone(),
        trigger,
        passed,
    });
    if passed {
        return vec![retry];
    }

    let effect = env
        .rooms()
        .ok()
        .and_then(|rooms| rooms.room(room))
        .and_then(|def| def.effect.clone());
    let Some(effect) = effect else {
        events.push(SessionEvent::fizzled(player, FizzleReason::UnknownRoom(room.clone())));
        state.turn.set_moves(player, 0);
        return Vec::new();
    };

    match effect.failure {
        RoomFailure::StopMoving => {
            state.turn.set_moves(player, 0);
            Vec::new()
        }
        RoomFailure::LoseStat { stat, amount } => {
            adjust_stat(state, player, stat, -i16::from(amount), events);
            if effect.continue_on_failure {
                vec![retry]
            } else {
                state.turn.set_moves(player, 0);
                Vec::new()
            }
        }
        RoomFailure::FallToBasement { dice } => {
            state.turn.set_moves(player, 0);
            fall_to_basement(state, env, player, room, events);
            vec![Step::Open(Prompt::DamageRoll {
                player,
                group: StatGroup::Physical,
                pool: RollPool::fixed(dice),
                then_trapped: None,
            })]
        }
    }
}

/// Drops `player` into a random revealed basement room other than `from`.
fn fall_to_basement(
    state: &mut GameState,
    env: &GameEnv<'_>,
    player: PlayerId,
    from: &RoomId,
    events: &mut Vec<SessionEvent>,
) {
    let landings: Vec<RoomId> = state
        .map
        .rooms_on(Floor::Basement)
        .filter(|tile| tile.id != *from)
        .map(|tile| tile.id.clone())
        .collect();
    let Ok(rng) = env.rng() else {
        events.push(SessionEvent::fizzled(player, FizzleReason::NoDestination));
        return;
    };
    let seed = state.next_seed(player, rng_context::FALL);
    match rng.pick(seed, landings.len()) {
        Some(index) => relocate(state, player, &landings[index], TravelKind::Fall, events),
        None => events.push(SessionEvent::fizzled(player, FizzleReason::NoDestination)),
    }
}

fn escape(
    state: &mut GameState,
    env: &GameEnv<'_>,
    player: PlayerId,
    passed: bool,
    events: &mut Vec<SessionEvent>,
) {
    if passed {
        state.effects_mut(player).trapped = None;
        let moves = turn_budget(state, env, player);
        state.turn.set_moves(player, moves);
        events.push(SessionEvent::PlayerReleased {
            player,
            reason: ReleaseReason::Escaped,
        });
        return;
    }

    state.turn.set_moves(player, 0);
    let effects = state.effects_mut(player);
    let Some(trap) = effects.trapped.as_mut() else {
        return;
    };
    trap.turns_trapped = trap.turns_trapped.saturating_add(1);
    if trap.turns_trapped >= trap.auto_escape_after {
        effects.trapped = None;
        events.push(SessionEvent::PlayerReleased {
            player,
            reason: ReleaseReason::AutoReleased,
        });
    }
}

fn rescue(
    state: &mut GameState,
    rescuer: PlayerId,
    ally: PlayerId,
    passed: bool,
    events: &mut Vec<SessionEvent>,
) {
    let Some(trap) = state.effects(ally).and_then(|e| e.trapped.clone()) else {
        return;
    };
    if passed {
        state.effects_mut(ally).trapped = None;
        events.push(SessionEvent::PlayerReleased {
            player: ally,
            reason: ReleaseReason::Rescued,
        });
        return;
    }
    if trap.ally_failure == AllyFailure::AlsoTrapped {
        let mut copy = trap;
        copy.turns_trapped = 0;
        copy.auto_escape_after = 1;
        copy.ally_can_help = false;
        let card = copy.card.clone();
        state.effects_mut(rescuer).trapped = Some(copy);
        state.turn.set_moves(rescuer, 0);
        events.push(SessionEvent::PlayerTrapped {
            player: rescuer,
            card,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CharacterId, CharacterStats, PlayerSession, TrappedRecord, TurnState};

    fn trapped_table() -> GameState {
        let mut state = GameState::default();
        for id in 1..=2 {
            state.players.push(PlayerSession::new(
                PlayerId(id),
                CharacterId::new("c"),
                RoomId::new("hall"),
                CharacterStats::new(3, 3, 3, 3),
            ));
        }
        state.turn = TurnState::new(vec![PlayerId(1), PlayerId(2)]);
        state.effects_mut(PlayerId(1)).trapped = Some(TrappedRecord {
            card: CardId::new("webs"),
            escape_stat: Stat::Might,
            threshold: 4,
            auto_escape_after: 3,
            ally_can_help: true,
            ally_failure: AllyFailure::AlsoTrapped,
            turns_trapped: 0,
        });
        state
    }

    #[test]
    fn third_failed_escape_releases() {
        let mut state = trapped_table();
        let env = GameEnv::empty();
        let mut events = Vec::new();

        escape(&mut state, &env, PlayerId(1), false, &mut events);
        escape(&mut state, &env, PlayerId(1), false, &mut events);
        assert!(state.is_trapped(PlayerId(1)));
        assert!(events.is_empty());

        escape(&mut state, &env, PlayerId(1), false, &mut events);
        assert!(!state.is_trapped(PlayerId(1)));
        assert_eq!(state.turn.moves(PlayerId(1)), 0);
        assert_eq!(
            events,
            vec![SessionEvent::PlayerReleased {
                player: PlayerId(1),
                reason: ReleaseReason::AutoReleased,
            }]
        );
    }

    #[test]
    fn failed_rescue_copies_the_trap() {
        let mut state = trapped_table();
        state.turn.set_moves(PlayerId(2), 3);
        let mut events = Vec::new();

        rescue(&mut state, PlayerId(2), PlayerId(1), false, &mut events);

        assert!(state.is_trapped(PlayerId(1)));
        let copy = state.effects(PlayerId(2)).and_then(|e| e.trapped.clone()).unwrap();
        assert_eq!(copy.auto_escape_after, 1);
        assert_eq!(state.turn.moves(PlayerId(2)), 0);
    }

    #[test]
    fn successful_rescue_frees_the_ally() {
        let mut state = trapped_table();
        let mut events = Vec::new();
        rescue(&mut state, PlayerId(2), PlayerId(1), true, &mut events);
        assert!(!state.is_trapped(PlayerId(1)));
        assert!(!state.is_trapped(PlayerId(2)));
    }

    #[test]
    fn zero_damage_skips_distribution() {
        assert!(damage_steps(PlayerId(1), StatGroup::Mental, 0, None).is_empty());
        let steps = damage_steps(PlayerId(1), StatGroup::Mental, 2, None);
        assert!(matches!(
            steps.as_slice(),
            [Step::Open(Prompt::DamageDistribution { amount: 2, .. })]
        ));
    }
}
