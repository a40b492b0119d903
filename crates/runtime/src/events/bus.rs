//! Topic-based event bus implementation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{CombatFeed, EncounterEvent, ProgressionEvent};
use combat_core::LogEntry;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Combat log lines, as written by the rules
    Log,
    /// Hits, effect changes and vitals
    Combat,
    /// Spawns, kills, flee and travel
    Encounter,
    /// Level-ups, deaths and return to character select
    Progression,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Log, Topic::Combat, Topic::Encounter, Topic::Progression];

    const fn index(self) -> usize {
        match self {
            Topic::Log => 0,
            Topic::Combat => 1,
            Topic::Encounter => 2,
            Topic::Progression => 3,
        }
    }
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Log(LogEntry),
    Combat(CombatFeed),
    Encounter(EncounterEvent),
    Progression(ProgressionEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Log(_) => Topic::Log,
            Event::Combat(_) => Topic::Combat,
            Event::Encounter(_) => Topic::Encounter,
            Event::Progression(_) => Topic::Progression,
        }
    }

    /// One-line JSON rendering for export.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Topic-based event bus
///
/// Consumers subscribe to the topics they care about. Publishing never
/// blocks; events sent while a topic has no subscribers are dropped.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<[broadcast::Sender<Event>; 4]>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(std::array::from_fn(|_| broadcast::channel(capacity).0)),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels[topic.index()].send(event).is_err() {
            tracing::trace!(target: "runtime::bus", ?topic, "no subscribers for topic");
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels[topic.index()].subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
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
