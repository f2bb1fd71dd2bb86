//! Auto-kill index: at most one owner per (identity, token) slot.

use hashbrown::HashMap;

use crate::active_set::SetMember;
use crate::key::AutoKillKey;

pub struct AutoKillIndex<T: SetMember> {
    slots: HashMap<AutoKillKey, T>,
}

impl<T: SetMember> Default for AutoKillIndex<T> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<T: SetMember> AutoKillIndex<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: HashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn owner(&self, key: &AutoKillKey) -> Option<&T> {
        self.slots.get(key)
    }

    pub fn is_active(&self, key: &AutoKillKey) -> bool {
        self.slots.contains_key(key)
    }

    /// Make `item` the slot's owner, returning whoever held it before.
    pub fn install(&mut self, key: AutoKillKey, item: T) -> Option<T> {
        self.slots.insert(key, item)
    }

    /// Clear the slot only if `item` still owns it.
    pub fn release(&mut self, key: &AutoKillKey, item: &T) -> bool {
        let owned = self
            .slots
            .get(key)
            .is_some_and(|owner| owner.member_key() == item.member_key());
        if owned {
            self.slots.remove(key);
        }
        owned
    }

    pub fn take(&mut self, key: &AutoKillKey) -> Option<T> {
        self.slots.remove(key)
    }
}
