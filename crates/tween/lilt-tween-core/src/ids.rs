//! Tween identifiers and their allocator.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TweenId(pub u64);

impl fmt::Display for TweenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tween#{}", self.0)
    }
}

/// Monotonic allocator for TweenId. Ids are never reused within one scheduler.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_tween: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_tween(&mut self) -> TweenId {
        let id = TweenId(self.next_tween);
        self.next_tween = self.next_tween.wrapping_add(1);
        id
    }
}
