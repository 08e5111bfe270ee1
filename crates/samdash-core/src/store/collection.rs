// ── Generic reactive entity collection ──
//
// Ordered snapshot of one entity list plus an id index, with push-based
// change notification via a `watch` channel.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

use crate::list::Listable;

/// A reactive collection for a single entity type.
///
/// The backend's list order is preserved in the snapshot; `DashMap` gives
/// O(1) lookups by numeric id. Every replacement republishes the snapshot
/// to subscribers.
pub(crate) struct EntityCollection<T: Listable + Send + Sync + 'static> {
    /// Secondary index: record id -> entity.
    by_id: DashMap<i64, Arc<T>>,

    /// Full ordered snapshot, as last returned by the backend.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Listable + Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            by_id: DashMap::new(),
            snapshot,
        }
    }

    /// Replace the whole collection with a freshly fetched list.
    pub(crate) fn replace_all(&self, items: Vec<T>) {
        let values: Vec<Arc<T>> = items.into_iter().map(Arc::new).collect();

        self.by_id.clear();
        for item in &values {
            self.by_id.insert(item.id(), Arc::clone(item));
        }

        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }

    /// Look up an entity by its numeric id.
    pub(crate) fn get(&self, id: i64) -> Option<Arc<T>> {
        self.by_id.get(&id).map(|r| Arc::clone(r.value()))
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    /// Remove all entities.
    pub(crate) fn clear(&self) {
        self.replace_all(Vec::new());
    }

    /// Rows in the snapshot. Duplicate ids from the backend each count.
    pub(crate) fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }
}
