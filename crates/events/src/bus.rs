//! In-process activity bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` and handed to the workflow as
//! its [`ActivitySink`].

use epic_core::activity::{Activity, ActivitySink};
use tokio::sync::broadcast;

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out bus.
///
/// Any number of subscribers independently receive every published
/// [`Activity`].
///
/// ```rust
/// use epic_core::activity::{Activity, ActivitySink};
/// use epic_events::EventBus;
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(Activity::new("client.created", "client", 1, 7));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<Activity>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to all activity published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<Activity> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ActivitySink for EventBus {
    /// Publish to all current subscribers. Dropped silently when nobody listens.
    fn publish(&self, activity: Activity) {
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(activity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(
            Activity::new("contract.signed", "contract", 42, 7)
                .with_payload(serde_json::json!({"event_id": 3})),
        );

        let received = rx.recv().await.expect("should receive the activity");
        assert_eq!(received.kind, "contract.signed");
        assert_eq!(received.entity_type, "contract");
        assert_eq!(received.entity_id, 42);
        assert_eq!(received.actor_user_id, 7);
        assert_eq!(received.payload["event_id"], 3);
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_activity() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(Activity::new("client.created", "client", 1, 1));

        let a1 = rx1.recv().await.expect("subscriber 1 should receive");
        let a2 = rx2.recv().await.expect("subscriber 2 should receive");
        assert_eq!(a1.kind, "client.created");
        assert_eq!(a2.kind, "client.created");
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(Activity::new("client.deleted", "client", 1, 1));
    }
}
