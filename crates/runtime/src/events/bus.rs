//! Broadcast channels carrying session output, one per topic.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;

use super::types::{EffectEvent, RejectionEvent, SessionEvent};

/// Kind of session output a subscriber can follow.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize)]
pub enum Topic {
    /// Tool, targeting, casting and form changes
    Effects,
    /// Declined operations
    Rejections,
    /// Spawns, placements and tick summaries
    Session,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Effects, Topic::Rejections, Topic::Session];
}

/// One published item; its variant decides the [`Topic`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Event {
    Effect(EffectEvent),
    Rejected(RejectionEvent),
    Session(SessionEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Effect(_) => Topic::Effects,
            Event::Rejected(_) => Topic::Rejections,
            Event::Session(_) => Topic::Session,
        }
    }
}

struct Channels {
    effects: broadcast::Sender<Event>,
    rejections: broadcast::Sender<Event>,
    session: broadcast::Sender<Event>,
}

impl Channels {
    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Effects => &self.effects,
            Topic::Rejections => &self.rejections,
            Topic::Session => &self.session,
        }
    }
}

/// Fan-out of effects, rejections and session notices to any number of
/// listeners. Output published while a topic has no listener is dropped.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Bus holding the default backlog per topic.
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Bus holding `capacity` unread events per topic before listeners lag.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(Channels {
                effects: broadcast::channel(capacity).0,
                rejections: broadcast::channel(capacity).0,
                session: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Sends `event` to everyone following its topic.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels.sender(topic).send(event).is_err() {
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Follows a single topic from now on.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.sender(topic).subscribe()
    }

    /// One receiver per requested topic.
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
    use hunt_core::{EntityId, Timestamp};

    use super::*;

    #[tokio::test]
    async fn events_reach_only_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut session = bus.subscribe(Topic::Session);
        let mut rejections = bus.subscribe(Topic::Rejections);

        bus.publish(Event::Session(SessionEvent::PlayerDespawned {
            player: EntityId(3),
        }));

        let event = session.recv().await.unwrap();
        assert_eq!(event.topic(), Topic::Session);
        assert!(rejections.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish(Event::Session(SessionEvent::TickCompleted {
            now: Timestamp(16),
            effects: 0,
            rejections: 0,
        }));
        assert_eq!(bus.subscribe_multiple(&Topic::ALL).len(), 3);
    }
}
