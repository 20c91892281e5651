//! Event resolution engine.
//!
//! Cards are data ([`EventCard`]); this module turns a drawn card into a
//! sequence of [`Step`]s: immediate outcomes, a roll prompt, and the
//! outcomes its table selects. Tables use first-match semantics in
//! declaration order and gaps match nothing.
mod apply;
mod pool;

pub use apply::{apply_outcome, apply_trap};
pub use pool::{chapel_occupied, event_pool, multi_player_targets, stat_pool};

use crate::engine::{FizzleReason, SessionEvent};
use crate::env::{CardDefinition, EventCard, GameEnv, OmenComparison, Outcome, OutcomeEntry, OutcomeTable};
use crate::state::{CardId, CardKind, GameState, PlayerId, Prompt, Stat, Step};

/// First entry whose range contains `total`.
pub fn find_matching_outcome(entries: &[OutcomeEntry], total: u8) -> Option<&Outcome> {
    entries
        .iter()
        .find(|entry| entry.range.contains(total))
        .map(|entry| &entry.outcome)
}

/// Outcomes of an omen-comparison card: at or above the omen count uses
/// `at_least`, below uses `less_than`.
pub fn compare_to_omens(comparison: &OmenComparison, total: u8, omen_count: usize) -> &[Outcome] {
    if usize::from(total) >= omen_count {
        &comparison.at_least
    } else {
        &comparison.less_than
    }
}

/// Outcomes a table yields for a roll. `None` when no range matches.
pub fn select_outcomes(table: &OutcomeTable, total: u8, omen_count: usize) -> Option<Vec<Outcome>> {
    match table {
        OutcomeTable::Ranges(entries) => find_matching_outcome(entries, total).map(|o| vec![o.clone()]),
        OutcomeTable::OmenComparison(comparison) => {
            Some(compare_to_omens(comparison, total, omen_count).to_vec())
        }
    }
}

fn outcome_steps(player: PlayerId, card: &CardId, outcomes: Vec<Outcome>, rolled: Option<Stat>) -> Vec<Step> {
    outcomes
        .into_iter()
        .map(|outcome| Step::ApplyOutcome {
            player,
            card: card.clone(),
            outcome,
            rolled,
        })
        .collect()
}

fn event_card<'e>(env: &GameEnv<'e>, card: &CardId) -> Result<(&'e CardDefinition, &'e EventCard), FizzleReason> {
    let deck = env
        .cards()
        .map_err(|_| FizzleReason::UnknownCard(card.clone()))?;
    let definition = deck
        .card(card)
        .ok_or_else(|| FizzleReason::UnknownCard(card.clone()))?;
    match (&definition.kind, &definition.event) {
        (CardKind::Event, Some(event)) => Ok((definition, event)),
        _ => Err(FizzleReason::UnknownCard(card.clone())),
    }
}

/// Steps that resolve event `card` for `player`.
///
/// Multi-player cards address every eligible other player in turn order,
/// one roll prompt each. Otherwise immediate outcomes come first, then the
/// roll prompt if the card has one.
pub fn begin_card(
    state: &mut GameState,
    env: &GameEnv<'_>,
    player: PlayerId,
    card: &CardId,
    events: &mut Vec<SessionEvent>,
) -> Vec<Step> {
    let event = match event_card(env, card) {
        Ok((_, event)) => event,
        Err(reason) => {
            events.push(SessionEvent::fizzled(player, reason));
            return Vec::new();
        }
    };

    if let Some(spec) = &event.multi_player {
        let targets = multi_player_targets(state, env, player, spec);
        if targets.is_empty() {
            events.push(SessionEvent::fizzled(player, FizzleReason::NoTarget));
            return Vec::new();
        }
        let mut steps = Vec::with_capacity(targets.len());
        for (position, target) in targets.iter().enumerate() {
            let pool = match event_pool(state, env, *target, event) {
                Ok(pool) => pool,
                Err(reason) => {
                    events.push(SessionEvent::fizzled(*target, reason));
                    continue;
                }
            };
            steps.push(Step::Open(Prompt::MultiPlayerRoll {
                player: *target,
                card: card.clone(),
                pool,
                remaining: targets[position + 1..].to_vec(),
            }));
        }
        return steps;
    }

    let mut steps = outcome_steps(player, card, event.immediate.clone(), None);
    if event.roll.is_some() {
        match event_pool(state, env, player, event) {
            Ok(pool) => steps.push(Step::Open(Prompt::EventRoll {
                player,
                card: card.clone(),
                pool,
            })),
            Err(reason) => events.push(SessionEvent::fizzled(player, reason)),
        }
    }
    steps
}

/// Steps selected by an event roll of `total`.
pub fn resolve_roll(
    state: &GameState,
    env: &GameEnv<'_>,
    player: PlayerId,
    card: &CardId,
    total: u8,
    rolled: Option<Stat>,
    events: &mut Vec<SessionEvent>,
) -> Vec<Step> {
    let event = match event_card(env, card) {
        Ok((_, event)) => event,
        Err(reason) => {
            events.push(SessionEvent::fizzled(player, reason));
            return Vec::new();
        }
    };
    match select_outcomes(&event.table, total, state.omen_count()) {
        Some(outcomes) => outcome_steps(player, card, outcomes, rolled),
        None => {
            events.push(SessionEvent::fizzled(
                player,
                FizzleReason::NoMatchingOutcome {
                    card: card.clone(),
                    total,
                },
            ));
            Vec::new()
        }
    }
}

/// Steps selected by a chained second roll.
pub fn resolve_second_roll(
    player: PlayerId,
    card: &CardId,
    results: &[OutcomeEntry],
    total: u8,
    events: &mut Vec<SessionEvent>,
) -> Vec<Step> {
    match find_matching_outcome(results, total) {
        Some(outcome) => outcome_steps(player, card, vec![outcome.clone()], None),
        None => {
            events.push(SessionEvent::fizzled(
                player,
                FizzleReason::NoMatchingOutcome {
                    card: card.clone(),
                    total,
                },
            ));
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{RollRange, StatRef};

    fn table() -> Vec<OutcomeEntry> {
        vec![
            OutcomeEntry::new(
                RollRange::Between(0, 3),
                Outcome::LoseStat {
                    stat: StatRef::Fixed(Stat::Sanity),
                    amount: 1,
                },
            ),
            OutcomeEntry::new(RollRange::Between(4, 5), Outcome::Nothing),
            OutcomeEntry::new(RollRange::AtLeast(6), Outcome::DrawItem { count: 1 }),
        ]
    }

    #[test]
    fn first_matching_range_wins() {
        assert_eq!(find_matching_outcome(&table(), 4), Some(&Outcome::Nothing));
        assert_eq!(
            find_matching_outcome(&table(), 7),
            Some(&Outcome::DrawItem { count: 1 })
        );
    }

    #[test]
    fn overlap_prefers_declaration_order() {
        let entries = vec![
            OutcomeEntry::new(RollRange::AtLeast(2), Outcome::Nothing),
            OutcomeEntry::new(RollRange::Exact(3), Outcome::DrawEvent { count: 1 }),
        ];
        assert_eq!(find_matching_outcome(&entries, 3), Some(&Outcome::Nothing));
    }

    #[test]
    fn gaps_match_nothing() {
        let entries = vec![OutcomeEntry::new(RollRange::Exact(0), Outcome::Nothing)];
        assert_eq!(find_matching_outcome(&entries, 1), None);
        assert_eq!(select_outcomes(&OutcomeTable::Ranges(entries), 1, 0), None);
    }

    #[test]
    fn omen_comparison_splits_on_count() {
        let comparison = OmenComparison {
            at_least: vec![Outcome::Nothing],
            less_than: vec![Outcome::DrawItem { count: 1 }],
        };
        assert_eq!(compare_to_omens(&comparison, 3, 3), &[Outcome::Nothing]);
        assert_eq!(
            compare_to_omens(&comparison, 2, 3),
            &[Outcome::DrawItem { count: 1 }]
        );
    }
}
