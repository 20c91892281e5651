use crate::engine::SessionEvent;
use crate::engine::effects::push_front;
use crate::env::{GameEnv, OracleError};
use crate::error::{ErrorSeverity, GameError};
use crate::event::begin_card;
use crate::state::{CardId, CardKind, GameState, PlayerId, Prompt};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardError {
    #[error("no card draw is awaited from player {0}")]
    NoDrawPending(PlayerId),

    #[error("card '{card}' is a {actual} card, expected {expected}")]
    WrongKind {
        card: CardId,
        expected: CardKind,
        actual: CardKind,
    },

    #[error("card '{0}' was already drawn this session")]
    AlreadyDrawn(CardId),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for CardError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CardError::NoDrawPending(_) => ErrorSeverity::Recoverable,
            CardError::WrongKind { .. } | CardError::AlreadyDrawn(_) => ErrorSeverity::Validation,
            CardError::Oracle(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CardError::NoDrawPending(_) => "CARD_NOT_PENDING",
            CardError::WrongKind { .. } => "CARD_WRONG_KIND",
            CardError::AlreadyDrawn(_) => "CARD_ALREADY_DRAWN",
            CardError::Oracle(error) => error.error_code(),
        }
    }
}

/// Names the card drawn for the open token.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectCardAction {
    pub actor: PlayerId,
    pub card: CardId,
}

impl SelectCardAction {
    pub fn new(actor: PlayerId, card: CardId) -> Self {
        Self { actor, card }
    }
}

impl super::ActionTransition for SelectCardAction {
    type Error = CardError;

    fn actor(&self) -> PlayerId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let expected = match &state.prompt {
            Some(Prompt::DrawCard { player, kind, .. }) if *player == self.actor => *kind,
            _ => return Err(CardError::NoDrawPending(self.actor)),
        };
        let definition = env
            .cards()?
            .card(&self.card)
            .ok_or_else(|| OracleError::CardNotFound(self.card.clone()))?;
        if definition.kind != expected {
            return Err(CardError::WrongKind {
                card: self.card.clone(),
                expected,
                actual: definition.kind,
            });
        }
        if state.drawn_cards.contains(&self.card) {
            return Err(CardError::AlreadyDrawn(self.card.clone()));
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        events: &mut Vec<SessionEvent>,
    ) -> Result<(), Self::Error> {
        let Some(Prompt::DrawCard { player, kind, .. }) = state.prompt.take() else {
            return Err(CardError::NoDrawPending(self.actor));
        };
        state.drawn_cards.insert(self.card.clone());
        events.push(SessionEvent::CardDrawn {
            player,
            card: self.card.clone(),
            kind,
        });

        match kind {
            CardKind::Omen | CardKind::Item => {
                if let Some(session) = state.player_mut(player) {
                    session.cards.add(kind, self.card.clone());
                }
            }
            CardKind::Event => {
                let steps = begin_card(state, env, player, &self.card, events);
                push_front(state, steps);
            }
        }
        Ok(())
    }
}

/// Whether any card of `kind` is still undrawn.
pub(crate) fn deck_has(state: &GameState, env: &GameEnv<'_>, kind: CardKind) -> bool {
    env.cards().is_ok_and(|deck| {
        deck.deck()
            .iter()
            .any(|card| card.kind == kind && !state.drawn_cards.contains(&card.id))
    })
}
