//! Host objects that tweens animate.
//!
//! Targets are held weakly: a tween never keeps its target alive, and a
//! target that is dropped (or reports `is_alive() == false`) is pruned on the
//! next tick without running completion callbacks.

use lilt_api_core::{PropertyPath, Value};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::key::TargetKey;

/// Host-side property surface. Implementations use interior mutability since
/// the scheduler only ever holds shared references.
pub trait Tweenable: 'static {
    /// Current value of the property at `path`, or None if it does not exist.
    fn get_property(&self, path: &PropertyPath) -> Option<Value>;

    /// Write `value` to `path`. Returns false if the property rejected it.
    fn set_property(&self, path: &PropertyPath, value: Value) -> bool;

    /// Hosts with an explicit destroy step report it here.
    fn is_alive(&self) -> bool {
        true
    }
}

/// Weak handle to a target plus its stable identity.
#[derive(Clone)]
pub struct TargetRef {
    target: Weak<dyn Tweenable>,
    key: TargetKey,
}

impl TargetRef {
    /// Keyed by allocation address. An address can be reused once the
    /// target drops; hosts that recycle objects should use [`Self::with_key`].
    pub fn new<T: Tweenable>(target: &Rc<T>) -> Self {
        Self::with_key(target, TargetKey(Rc::as_ptr(target) as *const () as usize))
    }

    /// Keyed by a host-assigned id that stays unique for the host's lifetime.
    pub fn with_key<T: Tweenable>(target: &Rc<T>, key: TargetKey) -> Self {
        let weak: Weak<T> = Rc::downgrade(target);
        let weak: Weak<dyn Tweenable> = weak;
        Self { target: weak, key }
    }

    pub fn from_dyn(target: &Rc<dyn Tweenable>) -> Self {
        Self {
            target: Rc::downgrade(target),
            key: TargetKey(Rc::as_ptr(target) as *const () as usize),
        }
    }

    #[inline]
    pub fn key(&self) -> TargetKey {
        self.key
    }

    /// Strong reference if the target is still alive.
    pub fn upgrade(&self) -> Option<Rc<dyn Tweenable>> {
        self.target.upgrade().filter(|t| t.is_alive())
    }

    pub fn is_alive(&self) -> bool {
        self.upgrade().is_some()
    }
}

impl fmt::Debug for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetRef")
            .field("key", &self.key)
            .field("alive", &self.is_alive())
            .finish()
    }
}
