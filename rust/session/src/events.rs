use crate::session::SessionId;
use sabacc_engine::dealer::DealerAction;
use sabacc_engine::game::{GameState, Resolution};
use sabacc_engine::player::{PlayerAction, Side};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

// Bounded. A subscriber whose queue is full misses the event; one whose
// receiver is gone is removed.
const EVENT_CHANNEL_BUFFER: usize = 256;

pub type EventSender = mpsc::Sender<GameEvent>;
pub type EventReceiver = mpsc::Receiver<GameEvent>;

pub struct EventSubscription {
    bus: EventBus,
    session_id: SessionId,
    subscriber_id: usize,
    pub receiver: EventReceiver,
}

impl EventSubscription {
    pub fn receiver(&mut self) -> &mut EventReceiver {
        &mut self.receiver
    }

    /// Everything queued so far, without waiting.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(&self.session_id, self.subscriber_id);
    }
}

/// Fans game events out to every renderer watching a session.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

#[derive(Debug, Default)]
struct EventBusInner {
    subscribers: RwLock<HashMap<SessionId, Vec<(usize, EventSender)>>>,
    next_id: AtomicUsize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, session_id: SessionId) -> EventSubscription {
        let (subscriber_id, receiver) = self.subscribe_raw(session_id.clone());
        EventSubscription {
            bus: self.clone(),
            session_id,
            subscriber_id,
            receiver,
        }
    }

    fn subscribe_raw(&self, session_id: SessionId) -> (usize, EventReceiver) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let id = self.inner.next_id.fetch_add(1, Ordering::AcqRel);
        let mut guard = self
            .inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard.entry(session_id.clone()).or_default().push((id, tx));

        tracing::info!(
            session_id = %session_id,
            subscriber_id = id,
            "renderer subscribed to game events"
        );

        (id, rx)
    }

    pub fn broadcast(&self, session_id: &SessionId, event: GameEvent) {
        tracing::debug!(
            session_id = %session_id,
            event_type = event.kind(),
            "broadcasting game event"
        );

        let subscribers = {
            let guard = self
                .inner
                .subscribers
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            guard.get(session_id).cloned()
        };

        let Some(list) = subscribers else {
            tracing::trace!(session_id = %session_id, "no subscribers for session");
            return;
        };

        let mut failed = Vec::new();
        for (id, sender) in list {
            match sender.try_send(event.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(
                        session_id = %session_id,
                        subscriber_id = id,
                        event_type = event.kind(),
                        "subscriber queue full, event dropped"
                    );
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(
                        session_id = %session_id,
                        subscriber_id = id,
                        "subscriber closed, removing"
                    );
                    failed.push(id);
                }
            }
        }
        if !failed.is_empty() {
            self.remove_subscribers(session_id, &failed);
        }
    }

    pub fn unsubscribe(&self, session_id: &SessionId, subscriber_id: usize) {
        self.remove_subscribers(session_id, &[subscriber_id]);
    }

    pub fn drop_session(&self, session_id: &SessionId) {
        let mut guard = self
            .inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard.remove(session_id);
    }

    pub fn subscriber_count(&self) -> usize {
        let guard = self
            .inner
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        guard.values().map(|list| list.len()).sum()
    }

    fn remove_subscribers(&self, session_id: &SessionId, ids: &[usize]) {
        let mut guard = self
            .inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(list) = guard.get_mut(session_id) {
            list.retain(|(id, _)| !ids.contains(id));
            if list.is_empty() {
                guard.remove(session_id);
            }
        }
    }
}

/// Everything a renderer needs to redraw, in the order it happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    GameStarted {
        session_id: SessionId,
        generation: u64,
        state: GameState,
    },
    PlayerActed {
        session_id: SessionId,
        action: PlayerAction,
        state: GameState,
    },
    ActionIgnored {
        session_id: SessionId,
        action: PlayerAction,
        reason: String,
    },
    DealerActed {
        session_id: SessionId,
        steps: Vec<DealerAction>,
        state: GameState,
    },
    ShiftResolved {
        session_id: SessionId,
        applied: bool,
        state: GameState,
    },
    CoinTossed {
        session_id: SessionId,
        winner: Side,
    },
    GameFinished {
        session_id: SessionId,
        winner: Side,
        resolution: Resolution,
        state: GameState,
    },
    GameReset {
        session_id: SessionId,
        generation: u64,
        state: GameState,
    },
    Error {
        session_id: SessionId,
        message: String,
    },
}

impl GameEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::GameStarted { .. } => "game_started",
            GameEvent::PlayerActed { .. } => "player_acted",
            GameEvent::ActionIgnored { .. } => "action_ignored",
            GameEvent::DealerActed { .. } => "dealer_acted",
            GameEvent::ShiftResolved { .. } => "shift_resolved",
            GameEvent::CoinTossed { .. } => "coin_tossed",
            GameEvent::GameFinished { .. } => "game_finished",
            GameEvent::GameReset { .. } => "game_reset",
            GameEvent::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_event(session: &SessionId, message: &str) -> GameEvent {
        GameEvent::Error {
            session_id: session.clone(),
            message: message.into(),
        }
    }

    #[test]
    fn subscription_drop_unsubscribes() {
        let bus = EventBus::new();
        let session = "s".to_string();
        {
            let _sub = bus.subscribe(session.clone());
            assert_eq!(bus.subscriber_count(), 1);
        }
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn broadcast_reaches_all_subscribers() {
        let bus = EventBus::new();
        let session = "s".to_string();
        let mut sub1 = bus.subscribe(session.clone());
        let mut sub2 = bus.subscribe(session.clone());

        bus.broadcast(&session, error_event(&session, "ping"));

        let ev1 = sub1.receiver.try_recv().expect("sub1 event");
        let ev2 = sub2.receiver.try_recv().expect("sub2 event");
        assert!(matches!(ev1, GameEvent::Error { .. }));
        assert!(matches!(ev2, GameEvent::Error { .. }));
    }

    #[test]
    fn other_sessions_are_not_notified() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe("a".to_string());
        bus.broadcast(&"b".to_string(), error_event(&"b".to_string(), "x"));
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn stale_receiver_is_pruned() {
        let bus = EventBus::new();
        let session = "s".to_string();
        let (id, rx) = bus.subscribe_raw(session.clone());
        drop(rx);
        bus.broadcast(&session, error_event(&session, "gone"));
        assert_eq!(bus.subscriber_count(), 0);
        bus.unsubscribe(&session, id);
    }

    #[test]
    fn full_subscriber_misses_events_but_stays() {
        let bus = EventBus::new();
        let session = "s".to_string();
        let mut sub = bus.subscribe(session.clone());
        for i in 0..EVENT_CHANNEL_BUFFER + 3 {
            bus.broadcast(&session, error_event(&session, &i.to_string()));
        }
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(sub.drain().len(), EVENT_CHANNEL_BUFFER);

        bus.broadcast(&session, error_event(&session, "after"));
        let events = sub.drain();
        assert!(matches!(&events[..], [GameEvent::Error { message, .. }] if message == "after"));
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_value(error_event(&"s".to_string(), "boom")).expect("json");
        assert_eq!(json["type"], "error");
        assert_eq!(json["message"], "boom");
    }
}
