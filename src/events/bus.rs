//! # Event bus for broadcasting progress events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from every lane.
//!
//! ## Architecture
//! ```text
//! Publishers (many):                 Receivers:
//!   caller      ──┐
//!   interactive ──┤
//!   serial      ──┼──────► Bus ───────► runner listener ────► SubscriberSet
//!   concurrent  ──┤  (broadcast chan)
//!   runner      ──┘                 ──► tests / UI (Bus::subscribe)
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks; it calls `broadcast::Sender::send`.
//! - **Bounded capacity**: a single ring buffer stores recent events for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: events are lost if there are no active receivers at send time.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for progress events.
///
/// ### Properties
/// - **Non-blocking**: `publish()` returns immediately (send clones internally).
/// - **Fire-and-forget**: no delivery or durability guarantees.
/// - **Cloneable**: cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (clamped to at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    ///
    /// If there are no receivers, the event is dropped.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that will observe subsequent events.
    ///
    /// - Each call creates an **independent** receiver.
    /// - A receiver only gets events **sent after** it subscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_receiver_sees_events_after_subscribe() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::StrategyChanged)); // nobody listening

        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::ShutdownRequested).with_reason("test"));

        let ev = rx.recv().await.expect("event");
        assert_eq!(ev.kind, EventKind::ShutdownRequested);
        assert_eq!(ev.reason.as_deref(), Some("test"));
    }

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::TaskStarting);
        let b = Event::new(EventKind::TaskFinished);
        assert!(b.seq > a.seq);
    }
}
