//! Change notification for presentation adapters
//!
//! Views never hold references to each other. They observe the session
//! either by polling (`CursorState::revision`) or by subscribing to the
//! session's event bus, which fans each change out over an unbounded
//! channel per subscriber. Publishing never blocks; receivers that have been
//! dropped are pruned on the next publish.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::trace;
use serde::{Deserialize, Serialize};

use crate::cursor::Orientation;

/// Changes published by an exploration session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExplorerEvent {
    /// A new sample (and field) became the selection
    SelectionChanged { sample_index: usize },

    /// The cutline moved
    CursorMoved { orientation: Orientation, position: f64 },

    /// The cutline changed orientation
    CursorRotated { orientation: Orientation, position: f64 },
}

/// Fan-out of `ExplorerEvent`s to any number of subscribers
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Sender<ExplorerEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber.
    pub fn subscribe(&mut self) -> Receiver<ExplorerEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver `event` to every live subscriber.
    pub fn publish(&mut self, event: ExplorerEvent) {
        trace!("Publishing {:?} to {} subscribers", event, self.subscribers.len());
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subscriber_receives_event() {
        let mut bus = EventBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();

        bus.publish(ExplorerEvent::SelectionChanged { sample_index: 3 });

        assert_eq!(a.try_recv().unwrap(), ExplorerEvent::SelectionChanged { sample_index: 3 });
        assert_eq!(b.try_recv().unwrap(), ExplorerEvent::SelectionChanged { sample_index: 3 });
        assert!(a.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let mut bus = EventBus::new();
        let keep = bus.subscribe();
        drop(bus.subscribe());
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(ExplorerEvent::CursorMoved { orientation: Orientation::Horizontal, position: 1.0 });
        assert_eq!(bus.subscriber_count(), 1);
        assert!(keep.try_recv().is_ok());
    }
}
