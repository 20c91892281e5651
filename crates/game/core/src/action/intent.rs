use crate::state::{CardId, Direction, Floor, PlayerId, Prompt, RoomId, Rotation, Stat};

/// Decision message a player sends to the session.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Intent {
    Move {
        direction: Direction,
    },
    SelectRoomTile {
        room: RoomId,
        rotation: Rotation,
    },
    /// Faces of the dice rolled for the open roll prompt. Empty when the
    /// engine rolls. `stat` picks the trait of a choose-stat pool.
    SubmitRoll {
        dice: Vec<u8>,
        #[cfg_attr(feature = "serde", serde(default))]
        stat: Option<Stat>,
    },
    SelectCard {
        card: CardId,
    },
    ConfirmCombat {
        engage: bool,
    },
    ConfirmCombatRoll {
        dice: Vec<u8>,
    },
    DistributeDamage {
        allocations: Vec<(Stat, u8)>,
    },
    ChooseStat {
        stat: Stat,
    },
    UseStairs,
    UseElevator {
        floor: Floor,
    },
    UseSecretPassage {
        room: RoomId,
    },
    DeclineSecretPassage,
    DeclineRescue,
    EndTurn,
    TriggerHaunt {
        scenario: u32,
        traitor: PlayerId,
        #[cfg_attr(feature = "serde", serde(default))]
        omen: Option<CardId>,
        #[cfg_attr(feature = "serde", serde(default))]
        room: Option<RoomId>,
    },
}

impl Intent {
    /// Returns the snake_case name used in logs and rejections.
    pub fn as_snake_case(&self) -> &'static str {
        match self {
            Intent::Move { .. } => "move",
            Intent::SelectRoomTile { .. } => "select_room_tile",
            Intent::SubmitRoll { .. } => "submit_roll",
            Intent::SelectCard { .. } => "select_card",
            Intent::ConfirmCombat { .. } => "confirm_combat",
            Intent::ConfirmCombatRoll { .. } => "confirm_combat_roll",
            Intent::DistributeDamage { .. } => "distribute_damage",
            Intent::ChooseStat { .. } => "choose_stat",
            Intent::UseStairs => "use_stairs",
            Intent::UseElevator { .. } => "use_elevator",
            Intent::UseSecretPassage { .. } => "use_secret_passage",
            Intent::DeclineSecretPassage => "decline_secret_passage",
            Intent::DeclineRescue => "decline_rescue",
            Intent::EndTurn => "end_turn",
            Intent::TriggerHaunt { .. } => "trigger_haunt",
        }
    }

    /// Whether this intent is a valid answer to `prompt`.
    pub fn answers(&self, prompt: &Prompt) -> bool {
        match (self, prompt) {
            (Intent::SelectRoomTile { .. }, Prompt::RoomDiscovery { .. }) => true,
            (Intent::SelectCard { .. }, Prompt::DrawCard { .. }) => true,
            (Intent::DistributeDamage { .. }, Prompt::DamageDistribution { .. }) => true,
            (Intent::ChooseStat { .. }, Prompt::StatChoice { .. }) => true,
            (Intent::DeclineRescue, Prompt::Rescue { .. }) => true,
            (
                Intent::UseSecretPassage { .. } | Intent::DeclineSecretPassage,
                Prompt::SecretPassage { .. },
            ) => true,
            (Intent::SubmitRoll { .. }, prompt) => prompt.roll_pool().is_some(),
            _ => false,
        }
    }

    /// Combat-phase intents.
    pub fn is_combat(&self) -> bool {
        matches!(
            self,
            Intent::ConfirmCombat { .. } | Intent::ConfirmCombatRoll { .. }
        )
    }

    /// Intents the session layer may issue between any two decisions.
    pub fn is_external(&self) -> bool {
        matches!(self, Intent::TriggerHaunt { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{RollPool, StatGroup};

    #[test]
    fn roll_answers_every_roll_prompt() {
        let roll = Intent::SubmitRoll {
            dice: vec![],
            stat: None,
        };
        let damage = Prompt::DamageRoll {
            player: PlayerId(1),
            group: StatGroup::Physical,
            pool: RollPool::fixed(2),
            then_trapped: None,
        };
        let distribution = Prompt::DamageDistribution {
            player: PlayerId(1),
            group: StatGroup::Physical,
            amount: 2,
        };
        assert!(roll.answers(&damage));
        assert!(!roll.answers(&distribution));
        assert!(Intent::DistributeDamage { allocations: vec![] }.answers(&distribution));
    }

    #[test]
    fn rescue_may_be_declined_or_rolled() {
        let rescue = Prompt::Rescue {
            player: PlayerId(2),
            trapped: PlayerId(1),
            threshold: 4,
            pool: RollPool::fixed(3),
        };
        assert!(Intent::DeclineRescue.answers(&rescue));
        assert!(
            Intent::SubmitRoll {
                dice: vec![1, 1, 1],
                stat: None
            }
            .answers(&rescue)
        );
        assert!(!Intent::EndTurn.answers(&rescue));
    }
}
