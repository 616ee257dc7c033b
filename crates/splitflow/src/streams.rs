//! Subscriber-facing streams
//!
//! Status is fanned out through `watch` channels: every registry
//! mutation publishes the freshly projected value, and a slow consumer
//! only ever observes the latest one. Terminal values are final, so
//! latest-wins can supersede stale progress but never lose a terminal
//! status. Events use one unbounded channel per subscriber so each
//! event is consumed exactly once per subscriber; there is no shared
//! "handled" flag.

use std::sync::Mutex;

use tokio::sync::{mpsc, watch};

use splitflow_core::events::Event;
use splitflow_core::types::{ModuleStatus, UpdateStatus};

/// A restartable stream of projected values for one key.
///
/// The first `next()` resolves immediately with the current value;
/// subsequent calls resolve on change. Returns `None` once the
/// coordinator is torn down.
#[derive(Debug)]
pub struct ValueStream<T: Clone> {
    rx: watch::Receiver<T>,
    deliver_current: bool,
}

/// Projected module/language status stream
pub type StatusStream = ValueStream<ModuleStatus>;

/// Projected app-update status stream
pub type UpdateStream = ValueStream<UpdateStatus>;

impl<T: Clone> ValueStream<T> {
    pub(crate) fn new(rx: watch::Receiver<T>) -> Self {
        Self {
            rx,
            deliver_current: true,
        }
    }

    /// The latest value without waiting
    pub fn current(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Wait for the next value.
    ///
    /// Values published while the subscriber was busy are superseded;
    /// only the latest is returned.
    pub async fn next(&mut self) -> Option<T> {
        if self.deliver_current {
            self.deliver_current = false;
            return Some(self.rx.borrow_and_update().clone());
        }
        match self.rx.changed().await {
            Ok(()) => Some(self.rx.borrow_and_update().clone()),
            Err(_) => None,
        }
    }
}

/// A per-subscriber queue of one-shot events
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventStream {
    /// Wait for the next event; `None` once the coordinator is torn down
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Non-blocking poll for an already-delivered event
    pub fn try_next(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }
}

/// Fans events out to every live subscriber
#[derive(Debug, Default)]
pub struct EventHub {
    subscribers: Mutex<Vec<mpsc::UnboundedSender<Event>>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber; it receives events emitted from now on
    pub fn subscribe(&self) -> EventStream {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().unwrap().push(tx);
        EventStream { rx }
    }

    /// Deliver an event to every live subscriber, pruning dead ones
    pub fn emit(&self, event: Event) {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Drop all subscriber channels, ending their streams
    pub fn close(&self) {
        self.subscribers.lock().unwrap().clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitflow_core::types::ModuleStatus;

    #[tokio::test]
    async fn test_value_stream_delivers_current_first() {
        let (_tx, rx) = watch::channel(ModuleStatus::Available);
        let mut stream = ValueStream::new(rx);

        assert_eq!(stream.next().await, Some(ModuleStatus::Available));
    }

    #[tokio::test]
    async fn test_value_stream_sees_changes() {
        let (tx, rx) = watch::channel(ModuleStatus::Available);
        let mut stream = ValueStream::new(rx);

        assert_eq!(stream.next().await, Some(ModuleStatus::Available));

        tx.send_replace(ModuleStatus::Installing(0.5));
        assert_eq!(stream.next().await, Some(ModuleStatus::Installing(0.5)));
    }

    #[tokio::test]
    async fn test_value_stream_latest_wins_for_slow_consumer() {
        let (tx, rx) = watch::channel(ModuleStatus::Available);
        let mut stream = ValueStream::new(rx);
        assert_eq!(stream.next().await, Some(ModuleStatus::Available));

        // Three rapid updates while the consumer is away; only the
        // latest (terminal) one is observed.
        tx.send_replace(ModuleStatus::Installing(0.2));
        tx.send_replace(ModuleStatus::Installing(0.9));
        tx.send_replace(ModuleStatus::Installed);

        assert_eq!(stream.next().await, Some(ModuleStatus::Installed));
    }

    #[tokio::test]
    async fn test_value_stream_ends_when_sender_dropped() {
        let (tx, rx) = watch::channel(ModuleStatus::Available);
        let mut stream = ValueStream::new(rx);
        assert_eq!(stream.next().await, Some(ModuleStatus::Available));

        drop(tx);
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test]
    async fn test_event_hub_delivers_to_all_subscribers() {
        let hub = EventHub::new();
        let mut a = hub.subscribe();
        let mut b = hub.subscribe();

        hub.emit(Event::Toast("hello".into()));

        assert_eq!(a.next().await, Some(Event::Toast("hello".into())));
        assert_eq!(b.next().await, Some(Event::Toast("hello".into())));
    }

    #[tokio::test]
    async fn test_event_hub_each_subscriber_drains_independently() {
        let hub = EventHub::new();
        let mut a = hub.subscribe();

        hub.emit(Event::Toast("one".into()));
        hub.emit(Event::Toast("two".into()));

        // Consuming from one subscriber does not affect another
        // registered later for subsequent events.
        assert_eq!(a.try_next(), Some(Event::Toast("one".into())));
        assert_eq!(a.try_next(), Some(Event::Toast("two".into())));
        assert_eq!(a.try_next(), None);
    }

    #[tokio::test]
    async fn test_event_hub_prunes_dropped_subscribers() {
        let hub = EventHub::new();
        let a = hub.subscribe();
        let _b = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 2);

        drop(a);
        hub.emit(Event::Toast("x".into()));
        assert_eq!(hub.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_event_hub_close_ends_streams() {
        let hub = EventHub::new();
        let mut a = hub.subscribe();

        hub.close();
        assert_eq!(a.next().await, None);
    }
}
