//! Asynchronous abstraction for sourcing player intent.
//!
//! Runtime users plug in [`IntentProvider`] implementations so a session can
//! be driven by remote clients, scripted fixtures, or bots.
use std::collections::VecDeque;

use async_trait::async_trait;
use game_core::{GameState, Intent, PlayerId};
use tokio::sync::Mutex;

use super::errors::{Result, RuntimeError};

/// Trait for providing intents based on the current game state.
#[async_trait]
pub trait IntentProvider: Send + Sync {
    /// Provide the next intent for `player`, who the session is waiting on.
    async fn provide_intent(&self, player: PlayerId, state: &GameState) -> Result<Intent>;
}

/// Replays a fixed queue of intents in order.
#[derive(Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Intent>>,
}

impl ScriptedProvider {
    pub fn new(script: impl IntoIterator<Item = Intent>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }

    pub async fn push(&self, intent: Intent) {
        self.script.lock().await.push_back(intent);
    }

    pub async fn remaining(&self) -> usize {
        self.script.lock().await.len()
    }
}

#[async_trait]
impl IntentProvider for ScriptedProvider {
    async fn provide_intent(&self, player: PlayerId, _state: &GameState) -> Result<Intent> {
        self.script
            .lock()
            .await
            .pop_front()
            .ok_or(RuntimeError::ScriptExhausted { player })
    }
}
