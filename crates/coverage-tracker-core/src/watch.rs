//! Change notifications.
//!
//! Mutations publish coarse events on a channel instead of running callbacks
//! inline; subscribers react by re-reading and re-running the pure
//! aggregation over the fresh snapshot. Aggregation logic never lives inside
//! the notification path.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;

/// What changed. Coarse by design: consumers recompute from the full
/// current snapshot rather than patching prior results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    VisitsChanged,
    ClinicsChanged,
}

/// Fan-out hub for change events.
#[derive(Default)]
pub struct ChangeHub {
    subscribers: Mutex<Vec<Sender<ChangeEvent>>>,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber. Dropping the receiver unsubscribes it on the
    /// next publish.
    pub fn subscribe(&self) -> Receiver<ChangeEvent> {
        let (tx, rx) = channel();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(tx);
        }
        rx
    }

    /// Deliver an event to every live subscriber, pruning closed ones.
    pub fn publish(&self, event: ChangeEvent) {
        let Ok(mut subscribers) = self.subscribers.lock() else {
            return;
        };
        subscribers.retain(|tx| tx.send(event).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribers_receive_events() {
        let hub = ChangeHub::new();
        let rx1 = hub.subscribe();
        let rx2 = hub.subscribe();

        hub.publish(ChangeEvent::VisitsChanged);
        hub.publish(ChangeEvent::ClinicsChanged);

        assert_eq!(rx1.try_recv().unwrap(), ChangeEvent::VisitsChanged);
        assert_eq!(rx1.try_recv().unwrap(), ChangeEvent::ClinicsChanged);
        assert_eq!(rx2.try_recv().unwrap(), ChangeEvent::VisitsChanged);
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let hub = ChangeHub::new();
        let rx = hub.subscribe();
        drop(rx);

        hub.publish(ChangeEvent::VisitsChanged);
        assert!(hub.subscribers.lock().unwrap().is_empty());
    }

    #[test]
    fn test_publish_without_subscribers() {
        let hub = ChangeHub::new();
        hub.publish(ChangeEvent::ClinicsChanged);
    }
}
