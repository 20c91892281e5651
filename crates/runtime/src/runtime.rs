//! High-level runtime orchestrator.
//!
//! The runtime owns the session worker, wires up command/event channels, and
//! exposes a builder-based API for clients to drive a session.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use game_content::Content;
use game_core::{DiceMode, GameConfig, GameState, PlayerId, Seat, SessionEvent, new_session};
use tracing::{debug, info};

use crate::api::{IntentProvider, Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::oracle::OracleManager;
use crate::workers::{Command, SessionWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Mixed into every random draw of the session.
    pub game_seed: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            game_seed: 0,
        }
    }
}

impl RuntimeConfig {
    pub const EVENT_BUFFER_VAR: &'static str = "HAUNT_EVENT_BUFFER";
    pub const COMMAND_BUFFER_VAR: &'static str = "HAUNT_COMMAND_BUFFER";
    pub const GAME_SEED_VAR: &'static str = "HAUNT_GAME_SEED";
    pub const DICE_MODE_VAR: &'static str = "HAUNT_DICE_MODE";

    /// Defaults overridden by `HAUNT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Applies any `HAUNT_*` environment variable that is set.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&'static str) -> Option<String>) -> Result<Self> {
        fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T> {
            value
                .trim()
                .parse()
                .map_err(|_| RuntimeError::InvalidConfig { key, value })
        }

        if let Some(value) = lookup(Self::EVENT_BUFFER_VAR) {
            self.event_buffer_size = parse(Self::EVENT_BUFFER_VAR, value)?;
        }
        if let Some(value) = lookup(Self::COMMAND_BUFFER_VAR) {
            self.command_buffer_size = parse(Self::COMMAND_BUFFER_VAR, value)?;
        }
        if let Some(value) = lookup(Self::GAME_SEED_VAR) {
            self.game_seed = parse(Self::GAME_SEED_VAR, value)?;
        }
        if let Some(value) = lookup(Self::DICE_MODE_VAR) {
            self.game_config.dice_mode = parse::<DiceMode>(Self::DICE_MODE_VAR, value)?;
        }
        Ok(self)
    }
}

/// Main runtime that orchestrates one game session
///
/// Design: Runtime owns the worker and coordinates execution.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    providers: HashMap<PlayerId, Box<dyn IntentProvider>>,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Pull one intent from the provider of the awaited player and submit it.
    pub async fn step(&mut self) -> Result<Vec<SessionEvent>> {
        let player = self
            .handle
            .awaiting()
            .await?
            .ok_or(RuntimeError::NothingAwaited)?;
        let provider = self
            .providers
            .get(&player)
            .ok_or(RuntimeError::ProviderNotSet { player })?;

        let snapshot = self.handle.query_state().await?;
        let intent = provider.provide_intent(player, &snapshot).await?;
        debug!(target: "runtime::session", %player, intent = intent.as_snake_case(), "Stepping");

        self.handle.submit_intent(player, intent).await
    }

    /// Step until the game is over or a provider fails.
    pub async fn run(&mut self) -> Result<()> {
        while self.handle.awaiting().await?.is_some() {
            self.step().await?;
        }
        info!(target: "runtime::session", "Session finished");
        Ok(())
    }

    /// Set the intent provider for one seat
    pub fn set_provider(&mut self, player: PlayerId, provider: impl IntentProvider + 'static) {
        self.providers.insert(player, Box::new(provider));
    }

    /// Shutdown the runtime gracefully
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)?;
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    content: Option<Content>,
    seats: Vec<Seat>,
    state: Option<GameState>,
    providers: HashMap<PlayerId, Box<dyn IntentProvider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            content: None,
            seats: Vec::new(),
            state: None,
            providers: HashMap::new(),
        }
    }

    /// Override runtime configuration. Its `game_config` replaces the one
    /// carried by the content.
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set required reference content
    pub fn content(mut self, content: Content) -> Self {
        self.content = Some(content);
        self
    }

    /// Seat players in turn order
    pub fn players(mut self, seats: impl IntoIterator<Item = Seat>) -> Self {
        self.seats = seats.into_iter().collect();
        self
    }

    /// Resume from an existing snapshot instead of seating players
    pub fn initial_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn provider(mut self, player: PlayerId, provider: impl IntentProvider + 'static) -> Self {
        self.providers.insert(player, Box::new(provider));
        self
    }

    /// Build the runtime
    pub async fn build(self) -> Result<Runtime> {
        let content = self.content.ok_or(RuntimeError::MissingContent)?;
        let oracles = OracleManager::new(content.with_config(self.config.game_config.clone()));

        let initial_state = match self.state {
            Some(state) => state,
            None if self.seats.is_empty() => return Err(RuntimeError::SessionNotStarted),
            None => new_session(&oracles.as_game_env(), &self.seats, self.config.game_seed)?,
        };
        info!(
            target: "runtime::session",
            players = initial_state.players.len(),
            nonce = initial_state.nonce,
            dice_mode = %self.config.game_config.dice_mode,
            "Session started"
        );

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let worker = SessionWorker::new(initial_state, oracles, command_rx, event_bus);
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            providers: self.providers,
            worker_handle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'static str, &'a str)]) -> impl Fn(&'static str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn env_overrides_apply() {
        let config = RuntimeConfig::default()
            .with_overrides(lookup(&[
                (RuntimeConfig::GAME_SEED_VAR, "42"),
                (RuntimeConfig::DICE_MODE_VAR, "engine_rolled"),
                (RuntimeConfig::COMMAND_BUFFER_VAR, " 8 "),
            ]))
            .unwrap();
        assert_eq!(config.game_seed, 42);
        assert_eq!(config.command_buffer_size, 8);
        assert_eq!(config.event_buffer_size, 100);
        assert_eq!(config.game_config.dice_mode, DiceMode::EngineRolled);
    }

    #[test]
    fn bad_override_names_the_variable() {
        let error = RuntimeConfig::default()
            .with_overrides(lookup(&[(RuntimeConfig::EVENT_BUFFER_VAR, "lots")]))
            .unwrap_err();
        assert!(matches!(
            error,
            RuntimeError::InvalidConfig { key: "HAUNT_EVENT_BUFFER", .. }
        ));
    }
}
