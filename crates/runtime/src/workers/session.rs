//! Session worker that owns the authoritative [`game_core::GameState`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), applies
//! intents via [`game_core::apply_intent`], and publishes the results on the
//! [`EventBus`].

use tokio::sync::{mpsc, oneshot};

use game_core::engine::TransitionPhase;
use game_core::{ExecuteError, GameError, GameState, Intent, PlayerId, SessionEvent, apply_intent};
use tracing::{debug, error, info};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, HauntEvent, SessionNotice, TurnEvent};
use crate::oracle::OracleManager;

/// Commands that can be sent to the session worker
pub enum Command {
    /// Apply an intent from one player.
    SubmitIntent {
        player: PlayerId,
        intent: Intent,
        reply: oneshot::Sender<Result<Vec<SessionEvent>>>,
    },
    /// Query the current game state (read-only).
    QueryState { reply: oneshot::Sender<GameState> },
    /// Who the session is waiting on.
    Awaiting {
        reply: oneshot::Sender<Option<PlayerId>>,
    },
}

/// Background task that serializes intents against one session.
pub struct SessionWorker {
    state: GameState,
    oracles: OracleManager,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl SessionWorker {
    pub fn new(
        state: GameState,
        oracles: OracleManager,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            state,
            oracles,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop. Ends when every handle is dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }
        debug!(target: "runtime::worker", nonce = self.state.nonce, "session worker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::SubmitIntent {
                player,
                intent,
                reply,
            } => {
                let result = self.submit_intent(player, intent);
                let _ = reply.send(result);
            }
            Command::QueryState { reply } => {
                let _ = reply.send(self.state.clone());
            }
            Command::Awaiting { reply } => {
                let _ = reply.send(self.state.awaited_player());
            }
        }
    }

    fn submit_intent(&mut self, player: PlayerId, intent: Intent) -> Result<Vec<SessionEvent>> {
        let env = self.oracles.as_game_env();
        match apply_intent(&self.state, &env, player, &intent) {
            Ok((next, events)) => {
                self.state = next;
                debug!(
                    target: "runtime::worker",
                    %player,
                    intent = intent.as_snake_case(),
                    nonce = self.state.nonce,
                    events = events.len(),
                    "Intent applied"
                );
                self.publish_applied(player, intent, &events);
                Ok(events)
            }
            Err(error) => {
                self.handle_execute_error(player, intent, &error);
                Err(RuntimeError::rejected(error))
            }
        }
    }

    fn publish_applied(&self, player: PlayerId, intent: Intent, events: &[SessionEvent]) {
        let nonce = self.state.nonce;
        self.event_bus.publish(Event::Session(SessionNotice::applied(
            player,
            intent,
            events.to_vec(),
            &self.state,
        )));

        for event in events {
            if event.is_turn_event() {
                info!(target: "runtime::worker", ?event, nonce, "Turn advanced");
                self.event_bus.publish(Event::Turn(TurnEvent {
                    event: event.clone(),
                    nonce,
                }));
            } else if event.is_haunt_event() {
                info!(target: "runtime::worker", ?event, nonce, "Haunt event");
                self.event_bus.publish(Event::Haunt(HauntEvent {
                    event: event.clone(),
                    nonce,
                }));
            }
        }
    }

    fn handle_execute_error(&self, player: PlayerId, intent: Intent, error: &ExecuteError) {
        let phase = error.phase();
        let message = error.to_string();

        let early = matches!(phase, None | Some(TransitionPhase::PreValidate));
        if early && !error.severity().is_internal() {
            debug!(
                target: "runtime::worker",
                %player,
                intent = intent.as_snake_case(),
                code = error.error_code(),
                error = %message,
                "Intent rejected during pre-validate"
            );
        } else {
            error!(
                target: "runtime::worker",
                %player,
                intent = intent.as_snake_case(),
                phase = phase.map(|phase| phase.as_str()),
                severity = error.severity().as_str(),
                code = error.error_code(),
                error = %message,
                "Intent execution failed"
            );
        }

        self.event_bus
            .publish(Event::Session(SessionNotice::IntentRejected {
                player,
                intent,
                code: error.error_code().to_string(),
                phase,
                error: message,
                nonce: self.state.nonce,
            }));
    }
}
