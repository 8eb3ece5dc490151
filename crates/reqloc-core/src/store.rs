//! Concurrent counter store.
//!
//! `key -> Slot` where a slot is either a live record or `Cleared`. Keys are
//! never removed once created: a flush turns a slot into `Cleared` instead, so
//! an iteration in progress only ever observes a value transition, never a
//! structural removal.
//!
//! Locking is per DashMap shard. `update` and `take` run their whole
//! read-modify-write under the shard's write lock, which is what makes an
//! increment atomic per key without serializing unrelated keys.

use dashmap::DashMap;

use crate::model::CountRecord;

/// Stored value for a key.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Live(CountRecord),
    /// Tombstone left behind by a flush.
    Cleared,
}

/// Result of a lookup: present, cleared, or never seen.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryState {
    Present(CountRecord),
    Cleared,
    Absent,
}

#[derive(Debug, Default)]
pub struct CounterStore {
    slots: DashMap<String, Slot>,
}

impl CounterStore {
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> EntryState {
        match self.slots.get(key) {
            Some(slot) => match slot.value() {
                Slot::Live(r) => EntryState::Present(r.clone()),
                Slot::Cleared => EntryState::Cleared,
            },
            None => EntryState::Absent,
        }
    }

    /// Atomic replace.
    pub fn set(&self, key: impl Into<String>, slot: Slot) {
        self.slots.insert(key.into(), slot);
    }

    /// Atomic read-modify-write of one key.
    ///
    /// `f` receives the live record, or `None` when the key is absent or
    /// cleared, and returns the replacement. No other writer can touch the key
    /// between the read and the write.
    pub fn update<F>(&self, key: &str, f: F) -> CountRecord
    where
        F: FnOnce(Option<&CountRecord>) -> CountRecord,
    {
        let mut entry = self.slots.entry(key.to_string()).or_insert(Slot::Cleared);
        let next = match entry.value() {
            Slot::Live(r) => f(Some(r)),
            Slot::Cleared => f(None),
        };
        *entry.value_mut() = Slot::Live(next.clone());
        next
    }

    /// Snapshot-and-clear: if `key` holds a live record with `count > 0`,
    /// replace it with `Cleared` and return it, in one critical section.
    pub fn take(&self, key: &str) -> Option<CountRecord> {
        let mut slot = self.slots.get_mut(key)?;
        match slot.value() {
            Slot::Live(r) if r.count > 0 => {}
            _ => return None,
        }
        match std::mem::replace(slot.value_mut(), Slot::Cleared) {
            Slot::Live(r) => {
                tracing::trace!(key, count = r.count, "slot cleared");
                Some(r)
            }
            Slot::Cleared => None,
        }
    }

    /// Per-entry snapshot of the store.
    ///
    /// Each entry is copied out under its shard's read lock and the lock is
    /// released before the iterator is handed back, so callers may `set` or
    /// `update` while walking it. The result is consistent per entry, not for
    /// the map as a whole.
    pub fn iter(&self) -> std::vec::IntoIter<(String, Slot)> {
        self.slots
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect::<Vec<_>>()
            .into_iter()
    }

    pub fn keys(&self) -> Vec<String> {
        self.slots.iter().map(|e| e.key().clone()).collect()
    }

    /// Number of keys ever created (cleared slots included).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
