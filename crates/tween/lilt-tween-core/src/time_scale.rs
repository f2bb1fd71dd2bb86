//! Named time scales multiplied into the delta of scaled tweens.
//!
//! Each scale is addressable as a tween target through the path
//! `scale(<id>)`; `scale` alone refers to [`DEFAULT_TIME_SCALE_ID`]. That lets
//! a slow-motion ramp be played like any other float tween.

use hashbrown::HashMap;
use lilt_api_core::{PropertyPath, Value};
use std::cell::RefCell;

use crate::target::Tweenable;

pub const DEFAULT_TIME_SCALE_ID: &str = "lilt.time_scale";

const SCALE_MEMBER: &str = "scale";

#[derive(Debug, Default)]
pub struct TimeScales {
    scales: RefCell<HashMap<String, f32>>,
}

impl TimeScales {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unset scales read as 1.
    pub fn get(&self, id: &str) -> f32 {
        self.scales.borrow().get(id).copied().unwrap_or(1.0)
    }

    pub fn set(&self, id: impl Into<String>, scale: f32) {
        self.scales.borrow_mut().insert(id.into(), scale.max(0.0));
    }

    pub fn remove(&self, id: &str) -> Option<f32> {
        self.scales.borrow_mut().remove(id)
    }

    pub fn has(&self, id: &str) -> bool {
        self.scales.borrow().contains_key(id)
    }

    /// Combined factor applied to scaled deltas.
    pub fn product(&self) -> f32 {
        self.scales.borrow().values().product()
    }

    fn scale_id(path: &PropertyPath) -> Option<&str> {
        (path.depth() == 1 && path.root() == SCALE_MEMBER)
            .then(|| path.args().unwrap_or(DEFAULT_TIME_SCALE_ID))
    }
}

impl Tweenable for TimeScales {
    fn get_property(&self, path: &PropertyPath) -> Option<Value> {
        Self::scale_id(path).map(|id| Value::Float(self.get(id)))
    }

    fn set_property(&self, path: &PropertyPath, value: Value) -> bool {
        match (Self::scale_id(path), value) {
            (Some(id), Value::Float(v)) => {
                self.set(id, v);
                true
            }
            _ => false,
        }
    }
}
