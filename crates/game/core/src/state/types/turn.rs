use std::collections::BTreeMap;

use super::common::PlayerId;

/// Prompts that may be shown at most once per turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnPrompts {
    pub secret_passage: bool,
    pub trapped_escape: bool,
}

/// Turn order and per-turn bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    pub order: Vec<PlayerId>,
    pub index: usize,
    pub moves_by_player: BTreeMap<PlayerId, u8>,
    /// At most one combat initiation per turn.
    pub attacked_this_turn: bool,
    pub prompts_shown: TurnPrompts,
    pub elevator_used: bool,
    /// Completed rounds of the turn order.
    pub round: u32,
}

impl TurnState {
    pub fn new(order: Vec<PlayerId>) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    pub fn current(&self) -> Option<PlayerId> {
        self.order.get(self.index).copied()
    }

    pub fn moves(&self, player: PlayerId) -> u8 {
        self.moves_by_player.get(&player).copied().unwrap_or(0)
    }

    pub fn set_moves(&mut self, player: PlayerId, moves: u8) {
        self.moves_by_player.insert(player, moves);
    }

    /// Spends one movement point. Returns false when none are left.
    pub fn spend_move(&mut self, player: PlayerId) -> bool {
        match self.moves_by_player.get_mut(&player) {
            Some(moves) if *moves > 0 => {
                *moves -= 1;
                true
            }
            _ => false,
        }
    }

    /// Player after `player` in turn order, wrapping around.
    pub fn right_of(&self, player: PlayerId) -> Option<PlayerId> {
        let position = self.order.iter().position(|id| *id == player)?;
        self.order.get((position + 1) % self.order.len()).copied()
    }

    /// Player before `player` in turn order, wrapping around.
    pub fn left_of(&self, player: PlayerId) -> Option<PlayerId> {
        let position = self.order.iter().position(|id| *id == player)?;
        let len = self.order.len();
        self.order.get((position + len - 1) % len).copied()
    }

    /// Clears the ephemeral per-turn flags.
    pub fn reset_turn_flags(&mut self) {
        self.attacked_this_turn = false;
        self.prompts_shown = TurnPrompts::default();
        self.elevator_used = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbours_wrap_around() {
        let turn = TurnState::new(vec![PlayerId(1), PlayerId(2), PlayerId(3)]);
        assert_eq!(turn.right_of(PlayerId(3)), Some(PlayerId(1)));
        assert_eq!(turn.left_of(PlayerId(1)), Some(PlayerId(3)));
        assert_eq!(turn.right_of(PlayerId(9)), None);
    }

    #[test]
    fn spending_stops_at_zero() {
        let mut turn = TurnState::new(vec![PlayerId(1)]);
        turn.set_moves(PlayerId(1), 1);
        assert!(turn.spend_move(PlayerId(1)));
        assert!(!turn.spend_move(PlayerId(1)));
        assert_eq!(turn.moves(PlayerId(1)), 0);
    }
}
