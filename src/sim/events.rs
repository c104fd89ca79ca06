//! Gameplay events and the publish-subscribe bus
//!
//! The simulation only ever publishes. Presentation code subscribes with a
//! closure and gets every event synchronously, in the same tick as the state
//! change that produced it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Typed gameplay event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "value", rename_all = "kebab-case")]
pub enum GameEvent {
    /// Player health, 0..=5
    HealthChanged(u8),
    /// Treats collected this session
    TreatsChanged(u32),
    /// Power meter, 0..=5
    PowerChanged(u8),
    /// Super-power mode toggled
    PowerActive(bool),
    /// Player health reached zero
    Died,
    /// Boss entered or left the camera view
    BossActive(bool),
    /// Boss health after a hit (may be negative)
    BossHealth(i32),
    /// A session (re)started on this level
    LevelStarted { level: u8, name: String },
    /// Goal reached; `next` is `None` on the final level
    LevelCompleted { level: u8, next: Option<u8> },
    /// Final level finished
    GameCompleted,
}

impl GameEvent {
    /// Topic name as used by the presentation layer
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::HealthChanged(_) => "health-changed",
            GameEvent::TreatsChanged(_) => "treats-changed",
            GameEvent::PowerChanged(_) => "power-changed",
            GameEvent::PowerActive(_) => "power-active",
            GameEvent::Died => "died",
            GameEvent::BossActive(_) => "boss-active",
            GameEvent::BossHealth(_) => "boss-health",
            GameEvent::LevelStarted { .. } => "level-started",
            GameEvent::LevelCompleted { .. } => "level-completed",
            GameEvent::GameCompleted => "game-completed",
        }
    }
}

/// Subscription handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u32);

type Handler = Box<dyn FnMut(&GameEvent)>;

/// Explicit publish-subscribe registry
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(SubscriberId, Handler)>,
    next_id: u32,
    published: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("published", &self.published)
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&GameEvent) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.subscribers.push((id, Box::new(handler)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Deliver to every subscriber in subscription order. No subscribers is fine.
    pub fn publish(&mut self, event: GameEvent) {
        self.published += 1;
        log::trace!("event {}: {:?}", event.name(), event);
        for (_, handler) in self.subscribers.iter_mut() {
            handler(&event);
        }
    }

    /// Subscribe a recorder that keeps every event it sees
    pub fn record(&mut self) -> Rc<RefCell<Vec<GameEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        self.subscribe(move |e| sink.borrow_mut().push(e.clone()));
        log
    }

    /// Total events published over the bus lifetime
    pub fn published(&self) -> u64 {
        self.published
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers_is_noop() {
        let mut bus = EventBus::new();
        bus.publish(GameEvent::Died);
        assert_eq!(bus.published(), 1);
    }

    #[test]
    fn test_subscribers_receive_in_order_until_unsubscribed() {
        let mut bus = EventBus::new();
        let log = bus.record();
        let count = Rc::new(RefCell::new(0));
        let c = Rc::clone(&count);
        let id = bus.subscribe(move |_| *c.borrow_mut() += 1);

        bus.publish(GameEvent::HealthChanged(4));
        bus.publish(GameEvent::TreatsChanged(1));
        assert!(bus.unsubscribe(id));
        bus.publish(GameEvent::PowerActive(true));

        assert_eq!(
            *log.borrow(),
            vec![
                GameEvent::HealthChanged(4),
                GameEvent::TreatsChanged(1),
                GameEvent::PowerActive(true)
            ]
        );
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_event_serializes_with_topic_name() {
        let json = serde_json::to_string(&GameEvent::BossHealth(5)).unwrap();
        assert_eq!(json, r#"{"event":"boss-health","value":5}"#);
        let json = serde_json::to_string(&GameEvent::Died).unwrap();
        assert_eq!(json, r#"{"event":"died"}"#);
    }
}
