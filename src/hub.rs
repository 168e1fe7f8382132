//! Broadcast hub for fanning chat messages out to connected viewers.

use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Handle returned by [`Hub::subscribe`], used for exactly one later
/// [`Hub::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionHandle(u64);

/// One registered viewer: a sender for its private message channel.
struct Subscriber {
    id: u64,
    tx: mpsc::UnboundedSender<String>,
}

/// In-memory publish/subscribe registry.
///
/// The hub is responsible for:
/// - Tracking the currently connected stream sessions
/// - Delivering every published message to every current subscriber
///
/// Messages are never buffered or replayed; a subscriber only sees messages
/// published while it is registered. Constructed once at startup and shared
/// through `AppState`.
pub struct Hub {
    /// Subscribers in registration order. The mutex makes subscribe,
    /// unsubscribe and publish atomic with respect to each other; sends are
    /// non-blocking, so fan-out never waits on a slow consumer while the
    /// lock is held.
    subscribers: Mutex<Vec<Subscriber>>,
    next_id: std::sync::atomic::AtomicU64,
}

impl Hub {
    /// Create a new hub with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            next_id: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Register a new subscriber.
    ///
    /// Returns the receiving end of the subscriber's message channel and a
    /// handle for deregistration. Never fails; the registry is unbounded.
    pub fn subscribe(&self) -> (mpsc::UnboundedReceiver<String>, SubscriptionHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self
            .next_id
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        self.subscribers
            .lock()
            .expect("hub registry poisoned")
            .push(Subscriber { id, tx });
        debug!("registered subscriber {}", id);
        (rx, SubscriptionHandle(id))
    }

    /// Remove a subscriber. No-op if the handle was already unsubscribed.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) {
        let mut subs = self.subscribers.lock().expect("hub registry poisoned");
        if let Some(pos) = subs.iter().position(|s| s.id == handle.0) {
            subs.remove(pos);
            debug!("unregistered subscriber {}", handle.0);
        }
    }

    /// Deliver `message` to every current subscriber, in registration order.
    ///
    /// A send to a subscriber whose receiver is already gone is logged and
    /// skipped; the fan-out pass always completes for the remaining
    /// subscribers.
    pub fn publish(&self, message: &str) {
        let subs = self.subscribers.lock().expect("hub registry poisoned");
        for sub in subs.iter() {
            if sub.tx.send(message.to_string()).is_err() {
                warn!("dropping message for closed subscriber {}", sub.id);
            }
        }
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().expect("hub registry poisoned").len()
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_reaches_every_subscriber() {
        let hub = Hub::new();
        let (mut rx1, _h1) = hub.subscribe();
        let (mut rx2, _h2) = hub.subscribe();

        hub.publish("hello");

        assert_eq!(rx1.recv().await.as_deref(), Some("hello"));
        assert_eq!(rx2.recv().await.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn publish_with_no_subscribers_is_fine() {
        let hub = Hub::new();
        hub.publish("into the void");
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn late_subscriber_sees_no_replay() {
        let hub = Hub::new();
        hub.publish("early");

        let (mut rx, _h) = hub.subscribe();
        hub.publish("late");

        assert_eq!(rx.recv().await.as_deref(), Some("late"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unsubscribed_receiver_gets_nothing_further() {
        let hub = Hub::new();
        let (mut rx, handle) = hub.subscribe();

        hub.publish("before");
        hub.unsubscribe(handle);
        hub.publish("after");

        assert_eq!(rx.recv().await.as_deref(), Some("before"));
        assert!(rx.try_recv().is_err());
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn unsubscribe_twice_is_a_noop() {
        let hub = Hub::new();
        let (_rx, handle) = hub.subscribe();
        let (_rx2, _h2) = hub.subscribe();

        hub.unsubscribe(handle);
        hub.unsubscribe(handle);

        assert_eq!(hub.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn dead_subscriber_does_not_block_others() {
        let hub = Hub::new();
        let (rx_dead, _h_dead) = hub.subscribe();
        let (mut rx_live, _h_live) = hub.subscribe();

        // Simulate a torn-down session that never unsubscribed yet.
        drop(rx_dead);
        hub.publish("still delivered");

        assert_eq!(rx_live.recv().await.as_deref(), Some("still delivered"));
    }

    #[tokio::test]
    async fn messages_arrive_in_publish_order() {
        let hub = Hub::new();
        let (mut rx, _h) = hub.subscribe();

        hub.publish("first");
        hub.publish("second");

        assert_eq!(rx.recv().await.as_deref(), Some("first"));
        assert_eq!(rx.recv().await.as_deref(), Some("second"));
    }
}
