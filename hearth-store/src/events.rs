use tokio::sync::broadcast;
use tracing::{debug, info};

use hearth_core::TransitionEvent;

/// Fan-out channel for transition events.
///
/// The workflow core publishes `{offer_id, from_state, to_state, timestamp}`
/// on every successful transition; notification collaborators subscribe and
/// handle dispatch themselves. Slow subscribers lag and drop, they never
/// block a commit.
#[derive(Clone)]
pub struct TransitionBroadcaster {
    tx: broadcast::Sender<TransitionEvent>,
}

impl TransitionBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, event: TransitionEvent) {
        info!(
            offer_id = %event.offer_id,
            from = %event.from_state,
            to = %event.to_state,
            "publishing transition event"
        );
        // Zero subscribers is fine; the event is simply unobserved
        if self.tx.send(event).is_err() {
            debug!("no transition event subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TransitionEvent> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::OfferStatus;

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let broadcaster = TransitionBroadcaster::new(16);
        let mut rx = broadcaster.subscribe();

        broadcaster.publish(TransitionEvent::new(
            "OFF-1700000000000-EVENTTST1".to_string(),
            OfferStatus::Submitted,
            OfferStatus::Cancelled,
        ));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.offer_id, "OFF-1700000000000-EVENTTST1");
        assert_eq!(event.from_state, OfferStatus::Submitted);
        assert_eq!(event.to_state, OfferStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_fine() {
        let broadcaster = TransitionBroadcaster::new(16);
        broadcaster.publish(TransitionEvent::new(
            "OFF-1700000000000-EVENTTST2".to_string(),
            OfferStatus::Submitted,
            OfferStatus::Cancelled,
        ));
    }
}
