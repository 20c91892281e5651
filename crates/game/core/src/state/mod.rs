//! Authoritative session state.
//!
//! [`GameState`] is the serializable snapshot handed to every participant and
//! to reconnecting clients. Its layout mirrors the session data model one to
//! one: map, players, turn, combat, haunt and per-player pending effects, plus
//! the explicit prompt the engine is waiting on. Runtime layers clone or query
//! it but mutate it exclusively through the engine.
pub mod types;

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::dice::RollSeed;
use crate::env::compute_seed;

pub use types::{
    CardId, CardKind, CharacterId, CharacterStats, CombatKey, CombatKind, CombatPhase,
    CombatResult, CombatSession, Combatant, Direction, DividedLayout, Divider, DoorSet,
    ElevatorReservation, Faction, Floor, GameOver, GridPos, HauntRecord, HeldCards, MapGraph,
    Passage, PendingEffects, PendingStatChoice, PersistentRecord, PlayerId, PlayerSession,
    Prompt, QueuedEvent, RollPool, RoomId, RoomTile, Rotation, SpecialToken, Stat,
    StatChoiceReason, StatGroup, Step, TrappedRecord, TurnPrompts, TurnState, Winner, Zone,
};

/// Canonical snapshot of one game session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// Set once at session start; mixed with `nonce` for every random draw.
    pub game_seed: u64,
    /// Number of intents applied so far.
    pub nonce: u64,
    pub map: MapGraph,
    /// Seats in join order.
    pub players: Vec<PlayerSession>,
    pub turn: TurnState,
    pub combat: Option<CombatSession>,
    /// Fights that block re-engagement until a participant leaves the room.
    pub completed_combats: BTreeSet<CombatKey>,
    pub haunt: Option<HauntRecord>,
    pub pending_effects_by_player: BTreeMap<PlayerId, PendingEffects>,
    pub prompt: Option<Prompt>,
    /// Follow-up work waiting behind the current prompt or combat.
    pub agenda: VecDeque<Step>,
    /// Cards drawn so far this session.
    pub drawn_cards: BTreeSet<CardId>,
    /// Random draws made so far; salts every seed so draws never repeat.
    pub rng_draws: u32,
}

impl GameState {
    pub fn player(&self, id: PlayerId) -> Option<&PlayerSession> {
        self.players.iter().find(|player| player.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut PlayerSession> {
        self.players.iter_mut().find(|player| player.id == id)
    }

    pub fn living_players(&self) -> impl Iterator<Item = &PlayerSession> {
        self.players.iter().filter(|player| player.is_alive())
    }

    pub fn players_in(&self, room: &RoomId) -> impl Iterator<Item = &PlayerSession> {
        self.players
            .iter()
            .filter(move |player| player.is_alive() && &player.room == room)
    }

    pub fn effects(&self, player: PlayerId) -> Option<&PendingEffects> {
        self.pending_effects_by_player.get(&player)
    }

    pub fn effects_mut(&mut self, player: PlayerId) -> &mut PendingEffects {
        self.pending_effects_by_player.entry(player).or_default()
    }

    pub fn is_trapped(&self, player: PlayerId) -> bool {
        self.effects(player).is_some_and(PendingEffects::is_trapped)
    }

    pub fn current_player(&self) -> Option<PlayerId> {
        self.turn.current()
    }

    pub fn is_game_over(&self) -> bool {
        self.haunt
            .as_ref()
            .is_some_and(|haunt| haunt.game_over.is_some())
    }

    pub fn haunt_started(&self) -> bool {
        self.haunt.is_some()
    }

    /// Omen cards held across all players.
    pub fn omen_count(&self) -> usize {
        self.players.iter().map(|player| player.cards.omens.len()).sum()
    }

    /// Player the session is blocked on: the open prompt's addressee, then
    /// the combat participant the current phase needs, then the turn holder.
    pub fn awaited_player(&self) -> Option<PlayerId> {
        if let Some(prompt) = &self.prompt {
            return Some(prompt.player());
        }
        if let Some(combat) = &self.combat {
            return Some(combat.awaited());
        }
        self.current_player()
    }

    /// Seed for the next random draw made on behalf of `player`.
    pub fn next_seed(&mut self, player: PlayerId, context: u32) -> u64 {
        self.rng_draws = self.rng_draws.wrapping_add(1);
        compute_seed(
            self.game_seed,
            self.nonce,
            player.0,
            context.wrapping_add(self.rng_draws.wrapping_mul(0x1000)),
        )
    }

    /// Seed material for an engine dice roll.
    pub fn roll_seed(&mut self, player: PlayerId) -> RollSeed {
        self.rng_draws = self.rng_draws.wrapping_add(1);
        RollSeed {
            game_seed: self.game_seed,
            nonce: self.nonce,
            player,
            salt: self.rng_draws,
        }
    }

    /// SHA-256 over the bincode encoding of the whole snapshot.
    #[cfg(feature = "serde")]
    pub fn state_root(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};

        let bytes = bincode::serialize(self).expect("GameState serialization should not fail");
        Sha256::digest(&bytes).into()
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn state_root_tracks_content() {
        let state = GameState::default();
        let mut other = state.clone();
        assert_eq!(state.state_root(), other.state_root());

        other.nonce += 1;
        assert_ne!(state.state_root(), other.state_root());
        assert_eq!(hex::encode(state.state_root()).len(), 64);
    }

    #[test]
    fn state_root_covers_prompts_and_agenda() {
        let mut state = GameState::default();
        state.players.push(PlayerSession::new(
            PlayerId(1),
            CharacterId::new("ox-bellows"),
            RoomId::new("grand-staircase"),
            CharacterStats::new(4, 2, 3, 3),
        ));
        state.prompt = Some(Prompt::RoomEffectRoll {
            player: PlayerId(1),
            room: RoomId::new("upper-landing"),
            trigger: crate::env::RoomTrigger::Enter,
            via: Passage::Stairs,
            target: 8,
            pool: RollPool::stat(Stat::Speed, 4),
        });
        state.agenda.push_back(Step::RetryStairs { player: PlayerId(1) });

        let root = state.state_root();
        assert_ne!(root, GameState::default().state_root());
        assert_eq!(root, state.clone().state_root());

        state.agenda.clear();
        assert_ne!(root, state.state_root());
    }
}
