//! Omen, item and event decks.
//!
//! Omens and items are plain cards that land in a player's hand. Event cards
//! carry an [`EventCard`] body that the engine interprets.

use game_core::env::{
    AllyFailure, CardDefinition, CardOracle, ChapelBonus, EventCard, ForcedTarget,
    MovementRestriction, MultiPlayerSpec, NearestPlayerEffect, OmenComparison, Outcome,
    OutcomeEntry, OutcomeTable, PersistentSpec, QueueTarget, RemoveCondition, RollRange, RollSpec,
    RoomModifier, StatRef, TrappedSpec, TurnStartPenalty,
};
use game_core::state::StatGroup;
use game_core::{CardId, CardKind, Floor, RoomId, Stat};

/// Item id of the candle that lifts candle-bound restrictions.
pub const CANDLE: &str = "ngon_nen";

/// Event id queued onto another player by the whispering card.
pub const ECHOING_WHISPER: &str = "echoing-whisper";

fn plain(id: &str, name: &str, kind: CardKind) -> CardDefinition {
    CardDefinition {
        id: CardId::new(id),
        name: name.to_string(),
        kind,
        event: None,
    }
}

fn event(id: &str, name: &str, body: EventCard) -> CardDefinition {
    CardDefinition {
        id: CardId::new(id),
        name: name.to_string(),
        kind: CardKind::Event,
        event: Some(body),
    }
}

fn ranges(entries: Vec<(RollRange, Outcome)>) -> OutcomeTable {
    OutcomeTable::Ranges(
        entries
            .into_iter()
            .map(|(range, outcome)| OutcomeEntry::new(range, outcome))
            .collect(),
    )
}

fn at_least(min: u8) -> RollRange {
    RollRange::AtLeast(min)
}

fn between(min: u8, max: u8) -> RollRange {
    RollRange::Between(min, max)
}

fn gain(stat: Stat, amount: u8) -> Outcome {
    Outcome::GainStat {
        stat: StatRef::Fixed(stat),
        amount,
        nearest_player: None,
    }
}

fn lose(stat: Stat, amount: u8) -> Outcome {
    Outcome::LoseStat {
        stat: StatRef::Fixed(stat),
        amount,
    }
}

pub fn builtin_omens() -> Vec<CardDefinition> {
    [
        ("bite", "Bite"),
        ("book", "Book"),
        ("crystal-ball", "Crystal Ball"),
        ("dog", "Dog"),
        ("holy-symbol", "Holy Symbol"),
        ("madman", "Madman"),
        ("mask", "Mask"),
        ("medallion", "Medallion"),
        ("ring", "Ring"),
        ("skull", "Skull"),
        ("spear", "Spear"),
        ("spirit-board", "Spirit Board"),
        ("girl", "Girl"),
    ]
    .into_iter()
    .map(|(id, name)| plain(id, name, CardKind::Omen))
    .collect()
}

pub fn builtin_items() -> Vec<CardDefinition> {
    [
        ("long_vu_thien_than", "Angel Feather"),
        ("hop_nhac_ma_quai", "Music Box"),
        ("hop_lac_ghep", "Puzzle Box"),
        ("kim_tiem_an_than", "Adrenaline Shot"),
        ("ao_giap", "Armor"),
        ("cai_chai", "Bottle"),
        ("xuc_xac_bong_toi", "Dark Dice"),
        ("chiec_chuong", "Bell"),
        ("muoi_amoniac", "Smelling Salts"),
        ("hon_da_may_man", "Lucky Stone"),
        ("dao_gam_hut_mau", "Blood Dagger"),
        ("gang_tay_cua_ke_moc_tui", "Pickpocket's Gloves"),
        (CANDLE, "Candle"),
    ]
    .into_iter()
    .map(|(id, name)| plain(id, name, CardKind::Item))
    .collect()
}

pub fn builtin_events() -> Vec<CardDefinition> {
    vec![
        event(
            "angry-being",
            "Angry Being",
            EventCard {
                roll: Some(RollSpec::Stat(Stat::Speed)),
                table: ranges(vec![
                    (at_least(5), gain(Stat::Speed, 1)),
                    (between(2, 4), Outcome::MentalDamage { dice: 1 }),
                    (
                        between(0, 1),
                        Outcome::Damage {
                            physical: 1,
                            mental: 1,
                        },
                    ),
                ]),
                ..EventCard::default()
            },
        ),
        event(
            "creepy-crawlies",
            "Creepy Crawlies",
            EventCard {
                roll: Some(RollSpec::Stat(Stat::Sanity)),
                table: ranges(vec![
                    (at_least(5), gain(Stat::Sanity, 1)),
                    (between(1, 4), lose(Stat::Sanity, 1)),
                    (RollRange::Exact(0), lose(Stat::Sanity, 2)),
                ]),
                chapel_bonus: Some(ChapelBonus { add_dice: 1 }),
                ..EventCard::default()
            },
        ),
        event(
            "funeral",
            "Funeral",
            EventCard {
                roll: Some(RollSpec::Stat(Stat::Sanity)),
                table: ranges(vec![
                    (at_least(4), gain(Stat::Sanity, 1)),
                    (
                        between(2, 3),
                        Outcome::LoseStats {
                            changes: vec![(Stat::Sanity, 1)],
                            then_teleport: Vec::new(),
                        },
                    ),
                    (
                        between(0, 1),
                        Outcome::LoseStats {
                            changes: vec![(Stat::Sanity, 1), (Stat::Might, 1)],
                            then_teleport: vec![RoomId::new("graveyard"), RoomId::new("crypt")],
                        },
                    ),
                ]),
                ..EventCard::default()
            },
        ),
        event(
            "mystic-slide",
            "Mystic Slide",
            EventCard {
                roll: Some(RollSpec::Stat(Stat::Might)),
                table: ranges(vec![
                    (at_least(5), Outcome::DrawRoomTile),
                    (
                        between(0, 4),
                        Outcome::PhysicalDamage {
                            dice: 1,
                            then_trapped: None,
                        },
                    ),
                ]),
                room_modifier: Some(RoomModifier {
                    room: RoomId::new("collapsed-room"),
                    dice_reduction: 1,
                }),
                ..EventCard::default()
            },
        ),
        event(
            "closet-door",
            "Closet Door",
            EventCard {
                roll: Some(RollSpec::Fixed(2)),
                table: ranges(vec![
                    (at_least(3), Outcome::DrawItem { count: 1 }),
                    (between(1, 2), Outcome::DrawEvent { count: 1 }),
                    (RollRange::Exact(0), Outcome::Nothing),
                ]),
                ..EventCard::default()
            },
        ),
        event(
            "grave-dirt",
            "Grave Dirt",
            EventCard {
                roll: Some(RollSpec::ChooseStat(vec![Stat::Might, Stat::Knowledge])),
                table: ranges(vec![
                    (
                        at_least(4),
                        Outcome::GainStat {
                            stat: StatRef::Rolled,
                            amount: 1,
                            nearest_player: Some(NearestPlayerEffect {
                                gain: false,
                                stat: Stat::Sanity,
                                amount: 1,
                            }),
                        },
                    ),
                    (
                        between(0, 3),
                        Outcome::LoseStat {
                            stat: StatRef::Rolled,
                            amount: 1,
                        },
                    ),
                ]),
                ..EventCard::default()
            },
        ),
        event(
            "hanged-men",
            "Hanged Men",
            EventCard {
                roll: Some(RollSpec::Stat(Stat::Knowledge)),
                table: ranges(vec![
                    (at_least(4), Outcome::Nothing),
                    (
                        between(0, 3),
                        Outcome::SecondRoll {
                            dice: 2,
                            results: vec![
                                OutcomeEntry::new(at_least(3), Outcome::Nothing),
                                OutcomeEntry::new(
                                    between(0, 2),
                                    Outcome::SetStatToLowest {
                                        stat: StatRef::Fixed(Stat::Knowledge),
                                    },
                                ),
                            ],
                        },
                    ),
                ]),
                ..EventCard::default()
            },
        ),
        event(
            "something-hidden",
            "Something Hidden",
            EventCard {
                roll: Some(RollSpec::Stat(Stat::Knowledge)),
                table: OutcomeTable::OmenComparison(OmenComparison {
                    at_least: vec![Outcome::DrawItem { count: 1 }],
                    less_than: vec![Outcome::MentalDamage { dice: 1 }],
                }),
                ..EventCard::default()
            },
        ),
        event(
            "shrieking-wind",
            "Shrieking Wind",
            EventCard {
                roll: Some(RollSpec::Stat(Stat::Might)),
                table: ranges(vec![
                    (at_least(5), Outcome::Nothing),
                    (between(0, 4), Outcome::AllPlayersLoseStat { amount: 1 }),
                ]),
                multi_player: Some(MultiPlayerSpec {
                    affected_floor: Some(Floor::Ground),
                    affected_rooms: Vec::new(),
                    outdoor_window: true,
                }),
                ..EventCard::default()
            },
        ),
        event(
            "the-lost-one",
            "The Lost One",
            EventCard {
                roll: Some(RollSpec::Stat(Stat::Knowledge)),
                table: ranges(vec![
                    (at_least(5), gain(Stat::Knowledge, 1)),
                    (
                        between(2, 4),
                        Outcome::Teleport {
                            to: RoomId::new("entrance-hall"),
                        },
                    ),
                    (
                        between(0, 1),
                        Outcome::TeleportToRoom {
                            room: RoomId::new("basement-landing"),
                        },
                    ),
                ]),
                ..EventCard::default()
            },
        ),
        event(
            "webs",
            "Webs",
            EventCard {
                roll: Some(RollSpec::Stat(Stat::Might)),
                table: ranges(vec![
                    (at_least(4), gain(Stat::Might, 1)),
                    (
                        between(0, 3),
                        Outcome::Trapped(TrappedSpec {
                            escape_stat: Stat::Might,
                            threshold: 4,
                            auto_escape_after: None,
                            ally_can_help: true,
                            ally_failure: AllyFailure::Nothing,
                        }),
                    ),
                ]),
                ..EventCard::default()
            },
        ),
        event(
            "rotten-floor",
            "Rotten Floor",
            EventCard {
                roll: Some(RollSpec::Stat(Stat::Speed)),
                table: ranges(vec![
                    (at_least(4), Outcome::Nothing),
                    (
                        between(0, 3),
                        Outcome::PhysicalDamage {
                            dice: 1,
                            then_trapped: Some(TrappedSpec {
                                escape_stat: Stat::Speed,
                                threshold: 4,
                                auto_escape_after: Some(2),
                                ally_can_help: true,
                                ally_failure: AllyFailure::AlsoTrapped,
                            }),
                        },
                    ),
                ]),
                ..EventCard::default()
            },
        ),
        event(
            "possession",
            "Possession",
            EventCard {
                roll: Some(RollSpec::Stat(Stat::Sanity)),
                table: ranges(vec![
                    (at_least(4), Outcome::Nothing),
                    (
                        between(2, 3),
                        Outcome::Attack {
                            attacker_dice: 4,
                            defender_stat: Stat::Might,
                        },
                    ),
                    (
                        between(0, 1),
                        Outcome::ForcedAttack {
                            target: ForcedTarget::AdjacentLowestMight,
                        },
                    ),
                ]),
                ..EventCard::default()
            },
        ),
        event(
            "icy-chill",
            "Icy Chill",
            EventCard {
                immediate: vec![Outcome::Persistent(PersistentSpec {
                    on_turn_start: Some(TurnStartPenalty {
                        group: StatGroup::Physical,
                        amount: 1,
                    }),
                    movement_restriction: None,
                })],
                ..EventCard::default()
            },
        ),
        event(
            "shadow-drag",
            "Shadow Drag",
            EventCard {
                immediate: vec![Outcome::Persistent(PersistentSpec {
                    on_turn_start: None,
                    movement_restriction: Some(MovementRestriction {
                        moves_per_turn: 1,
                        remove_conditions: vec![
                            RemoveCondition::SameRoomWithPlayer,
                            RemoveCondition::HasCandle,
                            RemoveCondition::InFurnaceRoom,
                        ],
                    }),
                })],
                ..EventCard::default()
            },
        ),
        event(
            "whispers",
            "Whispers",
            EventCard {
                roll: Some(RollSpec::Stat(Stat::Sanity)),
                table: ranges(vec![
                    (at_least(4), Outcome::Nothing),
                    (
                        between(2, 3),
                        Outcome::QueueEvent {
                            card: CardId::new(ECHOING_WHISPER),
                            target: QueueTarget::RightPlayer,
                        },
                    ),
                    (
                        between(0, 1),
                        Outcome::QueueEvent {
                            card: CardId::new(ECHOING_WHISPER),
                            target: QueueTarget::Random,
                        },
                    ),
                ]),
                ..EventCard::default()
            },
        ),
        event(
            ECHOING_WHISPER,
            "Echoing Whisper",
            EventCard {
                roll: Some(RollSpec::Stat(Stat::Knowledge)),
                table: ranges(vec![
                    (at_least(3), Outcome::Nothing),
                    (
                        between(0, 2),
                        Outcome::QueueEvent {
                            card: CardId::new("creepy-crawlies"),
                            target: QueueTarget::LeftPlayer,
                        },
                    ),
                ]),
                ..EventCard::default()
            },
        ),
    ]
}

/// Every builtin card: omens, then items, then events.
pub fn builtin_cards() -> Vec<CardDefinition> {
    let mut cards = builtin_omens();
    cards.extend(builtin_items());
    cards.extend(builtin_events());
    cards
}

/// [`CardOracle`] over an in-memory deck.
#[derive(Clone, Debug)]
pub struct CardDeck {
    cards: Vec<CardDefinition>,
}

impl CardDeck {
    pub fn new(cards: Vec<CardDefinition>) -> Self {
        Self { cards }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_cards())
    }

    pub fn count(&self, kind: CardKind) -> usize {
        self.cards.iter().filter(|card| card.kind == kind).count()
    }
}

impl Default for CardDeck {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CardOracle for CardDeck {
    fn card(&self, id: &CardId) -> Option<&CardDefinition> {
        self.cards.iter().find(|card| &card.id == id)
    }

    fn deck(&self) -> &[CardDefinition] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn queued(outcome: &Outcome) -> Vec<CardId> {
        match outcome {
            Outcome::QueueEvent { card, .. } => vec![card.clone()],
            Outcome::SecondRoll { results, .. } => {
                results.iter().flat_map(|entry| queued(&entry.outcome)).collect()
            }
            _ => Vec::new(),
        }
    }

    #[test]
    fn ids_are_unique() {
        let cards = builtin_cards();
        let ids: BTreeSet<_> = cards.iter().map(|card| card.id.clone()).collect();
        assert_eq!(ids.len(), cards.len());
    }

    #[test]
    fn only_events_carry_a_body() {
        for card in builtin_cards() {
            assert_eq!(card.event.is_some(), card.kind == CardKind::Event, "{}", card.id);
        }
    }

    #[test]
    fn queued_events_exist() {
        let deck = CardDeck::builtin();
        for card in deck.deck() {
            let Some(body) = &card.event else { continue };
            let mut outcomes = body.immediate.clone();
            if let OutcomeTable::Ranges(entries) = &body.table {
                outcomes.extend(entries.iter().map(|entry| entry.outcome.clone()));
            }
            for id in outcomes.iter().flat_map(queued) {
                let target = deck.card(&id).unwrap();
                assert_eq!(target.kind, CardKind::Event);
            }
        }
    }

    #[test]
    fn candle_is_an_item() {
        let deck = CardDeck::builtin();
        assert_eq!(deck.card(&CardId::new(CANDLE)).unwrap().kind, CardKind::Item);
        assert_eq!(deck.count(CardKind::Item), 13);
    }
}
