//! Insertion-ordered set with staged mutation.
//!
//! While locked (lock count > 0) adds and removes are staged rather than
//! applied, so code iterating the live members can safely re-enter. The final
//! `unlock` flushes removals first, then additions.

use indexmap::IndexMap;
use std::fmt;
use std::hash::Hash;

pub trait SetMember: Clone {
    type Key: Copy + Eq + Hash + fmt::Debug;
    fn member_key(&self) -> Self::Key;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Inserted into the live set now.
    Inserted,
    /// Staged until the outermost unlock.
    Staged,
    AlreadyPresent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome<T> {
    /// Erased from the live set now.
    Removed(T),
    /// Staged until the outermost unlock.
    Staged,
    /// A staged add for the same member was dropped instead.
    Cancelled(T),
    NotPresent,
}

/// Structural changes applied by the outermost unlock.
#[derive(Debug)]
pub struct Flush<T> {
    pub removed: Vec<T>,
    pub added: Vec<T>,
}

impl<T> Default for Flush<T> {
    fn default() -> Self {
        Self {
            removed: Vec::new(),
            added: Vec::new(),
        }
    }
}

impl<T> Flush<T> {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

pub struct ActiveSet<T: SetMember> {
    live: IndexMap<T::Key, T>,
    pending_add: IndexMap<T::Key, T>,
    pending_remove: IndexMap<T::Key, T>,
    lock_count: usize,
}

impl<T: SetMember> Default for ActiveSet<T> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<T: SetMember> ActiveSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            live: IndexMap::with_capacity(capacity),
            pending_add: IndexMap::new(),
            pending_remove: IndexMap::new(),
            lock_count: 0,
        }
    }

    /// Physically present members, including ones staged for removal.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn is_locked(&self) -> bool {
        self.lock_count > 0
    }

    pub fn pending_len(&self) -> (usize, usize) {
        (self.pending_add.len(), self.pending_remove.len())
    }

    /// Live member at `index` in insertion order.
    pub fn get_index(&self, index: usize) -> Option<&T> {
        self.live.get_index(index).map(|(_, item)| item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.live.values()
    }

    /// Membership as it will look after the pending flush.
    pub fn contains(&self, key: &T::Key) -> bool {
        if self.pending_add.contains_key(key) {
            return true;
        }
        self.live.contains_key(key) && !self.pending_remove.contains_key(key)
    }

    /// Members that [`contains`](Self::contains) reports, live first.
    pub fn members(&self) -> Vec<T> {
        self.live
            .iter()
            .filter(|(key, _)| !self.pending_remove.contains_key(*key))
            .map(|(_, item)| item.clone())
            .chain(self.pending_add.values().cloned())
            .collect()
    }

    pub fn add(&mut self, item: T) -> AddOutcome {
        let key = item.member_key();
        if self.is_locked() {
            if self.pending_remove.shift_remove(&key).is_some() {
                // re-added in the same window: the removal no longer applies
                return AddOutcome::Staged;
            }
            if self.live.contains_key(&key) || self.pending_add.contains_key(&key) {
                return AddOutcome::AlreadyPresent;
            }
            self.pending_add.insert(key, item);
            return AddOutcome::Staged;
        }
        if self.live.contains_key(&key) {
            return AddOutcome::AlreadyPresent;
        }
        self.live.insert(key, item);
        AddOutcome::Inserted
    }

    pub fn remove(&mut self, key: &T::Key) -> RemoveOutcome<T> {
        if self.is_locked() {
            if let Some(item) = self.pending_add.shift_remove(key) {
                return RemoveOutcome::Cancelled(item);
            }
            return match self.live.get(key) {
                Some(item) => {
                    if !self.pending_remove.contains_key(key) {
                        self.pending_remove.insert(*key, item.clone());
                    }
                    RemoveOutcome::Staged
                }
                None => RemoveOutcome::NotPresent,
            };
        }
        match self.live.shift_remove(key) {
            Some(item) => RemoveOutcome::Removed(item),
            None => RemoveOutcome::NotPresent,
        }
    }

    pub fn lock(&mut self) {
        self.lock_count += 1;
    }

    /// Drop one lock level. The outermost unlock applies staged changes.
    pub fn unlock(&mut self) -> Flush<T> {
        self.lock_count = self.lock_count.saturating_sub(1);
        if self.lock_count > 0 {
            return Flush::default();
        }

        let mut flush = Flush {
            removed: Vec::with_capacity(self.pending_remove.len()),
            added: Vec::with_capacity(self.pending_add.len()),
        };
        for (key, _) in self.pending_remove.drain(..) {
            if let Some(item) = self.live.shift_remove(&key) {
                flush.removed.push(item);
            }
        }
        for (key, item) in self.pending_add.drain(..) {
            if !self.live.contains_key(&key) {
                self.live.insert(key, item.clone());
                flush.added.push(item);
            }
        }
        flush
    }

    /// Remove everything. Unlocked: returns the erased members. Locked:
    /// stages every live member for removal and returns cancelled adds.
    pub fn clear(&mut self) -> Vec<T> {
        if self.is_locked() {
            for (key, item) in &self.live {
                if !self.pending_remove.contains_key(key) {
                    self.pending_remove.insert(*key, item.clone());
                }
            }
            return self.pending_add.drain(..).map(|(_, item)| item).collect();
        }
        self.pending_add.clear();
        self.pending_remove.clear();
        self.live.drain(..).map(|(_, item)| item).collect()
    }
}

impl<T: SetMember + fmt::Debug> fmt::Debug for ActiveSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveSet")
            .field("live", &self.live.len())
            .field("pending_add", &self.pending_add.len())
            .field("pending_remove", &self.pending_remove.len())
            .field("lock_count", &self.lock_count)
            .finish()
    }
}
