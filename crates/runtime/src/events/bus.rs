//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::broadcast;

use super::types::{HauntEvent, SessionNotice, TurnEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Intents applied or rejected
    Session,
    /// Turn hand-offs
    Turn,
    /// Haunt, deaths and game over
    Haunt,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Session, Topic::Turn, Topic::Haunt];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Session(SessionNotice),
    Turn(TurnEvent),
    Haunt(HauntEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Session(_) => Topic::Session,
            Event::Turn(_) => Topic::Turn,
            Event::Haunt(_) => Topic::Haunt,
        }
    }

    /// JSON form sent to remote clients.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Topic-based event bus
///
/// Every topic has its own broadcast channel, created up front; publishing
/// never blocks and events without subscribers are dropped.
#[derive(Clone)]
pub struct EventBus {
    session: broadcast::Sender<Event>,
    turn: broadcast::Sender<Event>,
    haunt: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            session: broadcast::channel(capacity).0,
            turn: broadcast::channel(capacity).0,
            haunt: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Session => &self.session,
            Topic::Turn => &self.turn,
            Topic::Haunt => &self.haunt,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!(target: "runtime::bus", ?topic, "no subscribers");
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{PlayerId, SessionEvent};

    fn turn(nonce: u64) -> Event {
        Event::Turn(TurnEvent {
            event: SessionEvent::TurnAdvanced {
                player: PlayerId(2),
                moves: 4,
                round: 1,
            },
            nonce,
        })
    }

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut turns = bus.subscribe(Topic::Turn);
        let mut haunt = bus.subscribe(Topic::Haunt);

        bus.publish(turn(3));

        let Event::Turn(received) = turns.recv().await.unwrap() else {
            panic!("expected a turn event");
        };
        assert_eq!(received.nonce, 3);
        assert!(haunt.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        EventBus::new().publish(turn(1));
    }

    #[test]
    fn events_serialize_to_json() {
        let json = turn(5).to_json().unwrap();
        assert!(json.contains("\"turn_advanced\""), "{json}");
    }
}
