use tokio::task::JoinHandle;

use super::{FeedEvent, NoteStore};

/// Owns the store's change-feed subscription.
///
/// The subscription lives exactly as long as this handle: dropping it stops
/// the reconciliation task and unsubscribes from the feed.
#[derive(Debug)]
pub struct RealtimeHandle {
    task: JoinHandle<()>,
}

impl RealtimeHandle {
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for RealtimeHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl NoteStore {
    /// Subscribe to the change feed, load, then reconcile changes until the
    /// returned handle is dropped.
    ///
    /// The subscription is opened before the initial load so that no change
    /// committed during the load is missed. Must be called within a tokio
    /// runtime.
    pub fn start(&self) -> RealtimeHandle {
        let mut subscription = self.backend.subscribe();
        let store = self.clone();

        let task = tokio::spawn(async move {
            store.load().await;
            while let Some(event) = subscription.next().await {
                match event {
                    FeedEvent::Change(change) => {
                        store.apply_change(change);
                    }
                    FeedEvent::Lagged(missed) => {
                        tracing::warn!(missed, "Note feed lagged, reloading");
                        store.load().await;
                    }
                }
            }
            tracing::info!("Note change feed closed");
        });

        RealtimeHandle { task }
    }
}
