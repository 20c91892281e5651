//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! submitting intents, querying the session, or streaming events from
//! specific topics. Every remote connection holds its own clone.
use tokio::sync::{broadcast, mpsc, oneshot};

use game_core::{GameState, Intent, PlayerId, SessionEvent};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Submit `intent` on behalf of `player`.
    ///
    /// Intents from every connection are applied one at a time in arrival
    /// order. A rejection comes back as [`RuntimeError::Rejected`] carrying
    /// the engine's error code; the session is left untouched.
    pub async fn submit_intent(&self, player: PlayerId, intent: Intent) -> Result<Vec<SessionEvent>> {
        self.request(|reply| Command::SubmitIntent {
            player,
            intent,
            reply,
        })
        .await?
    }

    /// Query the current game state (read-only snapshot)
    pub async fn query_state(&self) -> Result<GameState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// The player whose decision the session is waiting on. `None` once the
    /// game is over.
    pub async fn awaiting(&self) -> Result<Option<PlayerId>> {
        self.request(|reply| Command::Awaiting { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Session` - Intent applied or rejected
    /// - `Topic::Turn` - Turn advanced
    /// - `Topic::Haunt` - Haunt began, player died, game over
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut turns = handle.subscribe(Topic::Turn);
    /// while let Ok(event) = turns.recv().await {
    ///     // Handle turn events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
