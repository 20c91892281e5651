use crate::engine::SessionEvent;
use crate::engine::effects::{adjust_stat, report_changes};
use crate::env::GameEnv;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{GameState, PlayerId, Prompt, Stat};
use crate::stats::{StatError, apply_allocation, validate_allocation};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChoiceError {
    #[error("no damage distribution is awaited from player {0}")]
    NoDistributionPending(PlayerId),

    #[error("no stat choice is awaited from player {0}")]
    NoStatChoicePending(PlayerId),

    #[error("{0} is not one of the offered stats")]
    StatNotOffered(Stat),

    #[error("player {0} is not seated")]
    UnknownPlayer(PlayerId),

    #[error(transparent)]
    Stat(#[from] StatError),
}

impl GameError for ChoiceError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ChoiceError::NoDistributionPending(_) | ChoiceError::NoStatChoicePending(_) => {
                ErrorSeverity::Recoverable
            }
            ChoiceError::StatNotOffered(_) | ChoiceError::UnknownPlayer(_) => {
                ErrorSeverity::Validation
            }
            ChoiceError::Stat(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ChoiceError::NoDistributionPending(_) => "CHOICE_NO_DISTRIBUTION",
            ChoiceError::NoStatChoicePending(_) => "CHOICE_NO_STAT_CHOICE",
            ChoiceError::StatNotOffered(_) => "CHOICE_STAT_NOT_OFFERED",
            ChoiceError::UnknownPlayer(_) => "CHOICE_UNKNOWN_PLAYER",
            ChoiceError::Stat(error) => error.error_code(),
        }
    }
}

/// Splits rolled damage across the two traits of the damaged group.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistributeDamageAction {
    pub actor: PlayerId,
    pub allocations: Vec<(Stat, u8)>,
}

impl DistributeDamageAction {
    pub fn new(actor: PlayerId, allocations: Vec<(Stat, u8)>) -> Self {
        Self { actor, allocations }
    }
}

impl super::ActionTransition for DistributeDamageAction {
    type Error = ChoiceError;

    fn actor(&self) -> PlayerId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let Some(Prompt::DamageDistribution {
            player,
            group,
            amount,
        }) = &state.prompt
        else {
            return Err(ChoiceError::NoDistributionPending(self.actor));
        };
        if *player != self.actor {
            return Err(ChoiceError::NoDistributionPending(self.actor));
        }
        let session = state
            .player(self.actor)
            .ok_or(ChoiceError::UnknownPlayer(self.actor))?;
        validate_allocation(&session.stats, *group, *amount, &self.allocations)?;
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
        events: &mut Vec<SessionEvent>,
    ) -> Result<(), Self::Error> {
        state.prompt = None;
        let session = state
            .player_mut(self.actor)
            .ok_or(ChoiceError::UnknownPlayer(self.actor))?;
        let changes = apply_allocation(&mut session.stats, &self.allocations);
        report_changes(state, self.actor, changes, events);
        Ok(())
    }
}

/// Picks which trait absorbs a stat loss.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChooseStatAction {
    pub actor: PlayerId,
    pub stat: Stat,
}

impl ChooseStatAction {
    pub fn new(actor: PlayerId, stat: Stat) -> Self {
        Self { actor, stat }
    }
}

impl super::ActionTransition for ChooseStatAction {
    type Error = ChoiceError;

    fn actor(&self) -> PlayerId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        match &state.prompt {
            Some(Prompt::StatChoice {
                player, options, ..
            }) if *player == self.actor => {
                if options.contains(&self.stat) {
                    Ok(())
                } else {
                    Err(ChoiceError::StatNotOffered(self.stat))
                }
            }
            _ => Err(ChoiceError::NoStatChoicePending(self.actor)),
        }
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
        events: &mut Vec<SessionEvent>,
    ) -> Result<(), Self::Error> {
        let Some(Prompt::StatChoice { amount, .. }) = state.prompt.take() else {
            return Err(ChoiceError::NoStatChoicePending(self.actor));
        };
        adjust_stat(state, self.actor, self.stat, -i16::from(amount), events);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionTransition;
    use crate::state::{CharacterId, CharacterStats, PlayerSession, RoomId, StatGroup};

    fn damaged(amount: u8) -> GameState {
        let mut state = GameState::default();
        state.players.push(PlayerSession::new(
            PlayerId(1),
            CharacterId::new("c"),
            RoomId::new("hall"),
            CharacterStats::new(2, 4, 3, 3),
        ));
        state.prompt = Some(Prompt::DamageDistribution {
            player: PlayerId(1),
            group: StatGroup::Physical,
            amount,
        });
        state
    }

    #[test]
    fn distribution_lowers_both_tracks() {
        let mut state = damaged(3);
        let env = GameEnv::empty();
        let action = DistributeDamageAction::new(PlayerId(1), vec![(Stat::Speed, 1), (Stat::Might, 2)]);
        let mut events = Vec::new();

        action.pre_validate(&state, &env).unwrap();
        action.apply(&mut state, &env, &mut events).unwrap();

        let stats = state.player(PlayerId(1)).unwrap().stats;
        assert_eq!((stats.speed, stats.might), (1, 2));
        assert!(state.prompt.is_none());
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn distribution_must_cover_the_damage() {
        let state = damaged(3);
        let action = DistributeDamageAction::new(PlayerId(1), vec![(Stat::Might, 2)]);
        assert_eq!(
            action.pre_validate(&state, &GameEnv::empty()),
            Err(ChoiceError::Stat(StatError::WrongTotal {
                allocated: 2,
                expected: 3
            }))
        );
    }

    #[test]
    fn overflowing_damage_lands_on_the_skull() {
        let mut state = damaged(9);
        let env = GameEnv::empty();
        let action = DistributeDamageAction::new(PlayerId(1), vec![(Stat::Speed, 2), (Stat::Might, 4)]);
        let mut events = Vec::new();
        action.pre_validate(&state, &env).unwrap();
        action.apply(&mut state, &env, &mut events).unwrap();
        assert!(state.player(PlayerId(1)).unwrap().dead);
    }
}
