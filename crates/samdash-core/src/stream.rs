// ── List subscriptions ──
//
// What the store hands out to views that redraw when a list is refetched.

use std::sync::Arc;

use tokio::sync::watch;

/// One published version of an entity list.
pub type Snapshot<T> = Arc<Vec<Arc<T>>>;

/// Subscription to one entity list in the [`DataStore`](crate::DataStore).
pub struct EntityStream<T: Send + Sync + 'static> {
    seen: Snapshot<T>,
    receiver: watch::Receiver<Snapshot<T>>,
}

impl<T: Send + Sync + 'static> EntityStream<T> {
    pub(crate) fn new(receiver: watch::Receiver<Snapshot<T>>) -> Self {
        let seen = receiver.borrow().clone();
        Self { seen, receiver }
    }

    /// The snapshot as of subscription or the last [`changed`](Self::changed).
    pub fn current(&self) -> &Snapshot<T> {
        &self.seen
    }

    /// Resolves on the next publish. `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Snapshot<T>> {
        self.receiver.changed().await.ok()?;
        self.seen = self.receiver.borrow_and_update().clone();
        Some(Arc::clone(&self.seen))
    }
}
