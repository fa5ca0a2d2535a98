//! In-process change feed for the notes collection.

use tokio::sync::broadcast;

use crate::models::NoteChange;

/// Changes buffered per subscriber before it is reported as lagging.
pub const FEED_CAPACITY: usize = 256;

/// Publishing side of the change feed.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<NoteChange>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(FEED_CAPACITY);
        Self { tx }
    }

    /// Push a change to every live subscription. Having none is fine.
    pub fn publish(&self, change: NoteChange) {
        let delivered = self.tx.send(change).unwrap_or(0);
        tracing::debug!(subscribers = delivered, "Published note change");
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// What a subscription yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    Change(NoteChange),
    /// The subscriber fell behind and this many changes were dropped.
    Lagged(u64),
}

/// A live subscription. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    rx: broadcast::Receiver<NoteChange>,
}

impl Subscription {
    /// Wait for the next event. `None` once the feed is closed.
    pub async fn next(&mut self) -> Option<FeedEvent> {
        match self.rx.recv().await {
            Ok(change) => Some(FeedEvent::Change(change)),
            Err(broadcast::error::RecvError::Lagged(n)) => Some(FeedEvent::Lagged(n)),
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }

    /// Non-blocking variant of [`Subscription::next`].
    pub fn try_next(&mut self) -> Option<FeedEvent> {
        match self.rx.try_recv() {
            Ok(change) => Some(FeedEvent::Change(change)),
            Err(broadcast::error::TryRecvError::Lagged(n)) => Some(FeedEvent::Lagged(n)),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn every_subscriber_receives_each_change() {
        let feed = ChangeFeed::new();
        let mut a = feed.subscribe();
        let mut b = feed.subscribe();
        let id = Uuid::new_v4();

        feed.publish(NoteChange::Delete { id });

        assert_eq!(a.next().await, Some(FeedEvent::Change(NoteChange::Delete { id })));
        assert_eq!(b.next().await, Some(FeedEvent::Change(NoteChange::Delete { id })));
    }

    #[test]
    fn dropping_a_subscription_releases_it() {
        let feed = ChangeFeed::new();
        let sub = feed.subscribe();
        assert_eq!(feed.subscriber_count(), 1);
        drop(sub);
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let feed = ChangeFeed::new();
        feed.publish(NoteChange::Delete { id: Uuid::new_v4() });
    }

    #[tokio::test]
    async fn slow_subscriber_observes_lag() {
        let feed = ChangeFeed::new();
        let mut sub = feed.subscribe();
        for _ in 0..FEED_CAPACITY + 3 {
            feed.publish(NoteChange::Delete { id: Uuid::new_v4() });
        }
        assert_eq!(sub.next().await, Some(FeedEvent::Lagged(3)));
    }
}
