// ── Generic reactive entity collection ──
//
// Insertion-ordered keyed storage with push-based change notification
// via `watch` channels. Ordering matters: the camera rotation scheduler
// indexes into the online subset of this collection, so iteration order
// must be deterministic across snapshots.

use std::sync::{Arc, RwLock};

use indexmap::IndexMap;
use tokio::sync::watch;

use crate::model::Keyed;

/// A reactive, insertion-ordered collection for a single entity type.
///
/// Every mutation happens under the write lock, rebuilds the snapshot
/// subscribers receive, and bumps a version counter. A reader always
/// observes either the pre- or post-mutation snapshot -- never a torn
/// entity.
pub(crate) struct EntityCollection<T: Keyed + Clone + Send + Sync + 'static> {
    entries: RwLock<IndexMap<String, Arc<T>>>,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,

    /// Full snapshot in insertion order, rebuilt on mutation.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Keyed + Clone + Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            entries: RwLock::new(IndexMap::new()),
            version,
            snapshot,
        }
    }

    /// Insert or replace an entity by its key. Returns `true` if the key
    /// was new. A replaced entity keeps its position in the order; a new
    /// one appends.
    pub(crate) fn upsert(&self, entity: T) -> bool {
        let mut entries = self.write();
        let is_new = entries
            .insert(entity.key().to_owned(), Arc::new(entity))
            .is_none();
        self.publish(&entries);
        is_new
    }

    /// Replace an existing entity by key. Returns `false` (and mutates
    /// nothing) if the key is unknown.
    pub(crate) fn replace(&self, entity: T) -> bool {
        let mut entries = self.write();
        if !entries.contains_key(entity.key()) {
            return false;
        }
        entries.insert(entity.key().to_owned(), Arc::new(entity));
        self.publish(&entries);
        true
    }

    /// Replace the whole collection, preserving the order of `items`.
    pub(crate) fn replace_all(&self, items: Vec<T>) {
        let mut entries = self.write();
        entries.clear();
        for item in items {
            entries.insert(item.key().to_owned(), Arc::new(item));
        }
        self.publish(&entries);
    }

    /// Remove an entity by key. Returns the removed entity if present.
    pub(crate) fn remove(&self, key: &str) -> Option<Arc<T>> {
        let mut entries = self.write();
        // shift_remove keeps the remaining insertion order intact
        let removed = entries.shift_remove(key);
        if removed.is_some() {
            self.publish(&entries);
        }
        removed
    }

    /// Drop every entity failing the predicate. Returns how many were
    /// evicted.
    pub(crate) fn retain(&self, keep: impl Fn(&T) -> bool) -> usize {
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|_, v| keep(v.as_ref()));
        let evicted = before - entries.len();
        if evicted > 0 {
            self.publish(&entries);
        }
        evicted
    }

    pub(crate) fn get(&self, key: &str) -> Option<Arc<T>> {
        self.read().get(key).map(Arc::clone)
    }

    /// Current snapshot (cheap `Arc` clone), in insertion order.
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn clear(&self) {
        let mut entries = self.write();
        entries.clear();
        self.publish(&entries);
    }

    pub(crate) fn len(&self) -> usize {
        self.read().len()
    }

    #[allow(dead_code)]
    pub(crate) fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn read(&self) -> std::sync::RwLockReadGuard<'_, IndexMap<String, Arc<T>>> {
        self.entries.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, IndexMap<String, Arc<T>>> {
        self.entries.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Rebuild the broadcast snapshot from the (still locked) map and
    /// bump the version. Publishing under the lock keeps snapshot and
    /// map in lockstep.
    fn publish(&self, entries: &IndexMap<String, Arc<T>>) {
        let values: Vec<Arc<T>> = entries.values().map(Arc::clone).collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
        self.version.send_modify(|v| *v += 1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
        payload: u32,
    }

    impl Keyed for Item {
        fn key(&self) -> &str {
            &self.id
        }
    }

    fn item(id: &str, payload: u32) -> Item {
        Item {
            id: id.into(),
            payload,
        }
    }

    #[test]
    fn upsert_returns_true_for_new_key() {
        let col: EntityCollection<Item> = EntityCollection::new();
        assert!(col.upsert(item("a", 1)));
        assert!(!col.upsert(item("a", 2)));
        assert_eq!(col.get("a").unwrap().payload, 2);
    }

    #[test]
    fn snapshot_preserves_insertion_order() {
        let col: EntityCollection<Item> = EntityCollection::new();
        col.upsert(item("b", 1));
        col.upsert(item("a", 2));
        col.upsert(item("c", 3));
        // replacing does not reorder
        col.upsert(item("a", 9));

        let snap = col.snapshot();
        let ids: Vec<&str> = snap.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn replace_is_a_noop_for_unknown_key() {
        let col: EntityCollection<Item> = EntityCollection::new();
        col.upsert(item("a", 1));
        assert!(!col.replace(item("ghost", 5)));
        assert_eq!(col.len(), 1);
        assert!(col.replace(item("a", 7)));
        assert_eq!(col.get("a").unwrap().payload, 7);
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let col: EntityCollection<Item> = EntityCollection::new();
        col.upsert(item("a", 1));
        col.upsert(item("b", 2));
        col.upsert(item("c", 3));

        assert_eq!(col.remove("b").unwrap().payload, 2);
        assert!(col.remove("b").is_none());

        let ids: Vec<String> = col.snapshot().iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn retain_reports_eviction_count() {
        let col: EntityCollection<Item> = EntityCollection::new();
        for i in 0..5 {
            col.upsert(item(&format!("i{i}"), i));
        }
        let evicted = col.retain(|i| i.payload % 2 == 0);
        assert_eq!(evicted, 2);
        assert_eq!(col.len(), 3);
    }

    #[test]
    fn subscribers_observe_mutations() {
        let col: EntityCollection<Item> = EntityCollection::new();
        let rx = col.subscribe();
        assert!(rx.borrow().is_empty());

        col.upsert(item("a", 1));
        assert_eq!(rx.borrow().len(), 1);

        col.clear();
        assert!(rx.borrow().is_empty());
    }
}
