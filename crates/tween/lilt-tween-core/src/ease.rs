//! Easing functions mapping normalized time to normalized progress.

use std::fmt;
use std::rc::Rc;

#[derive(Clone)]
pub struct Ease(Rc<dyn Fn(f32) -> f32>);

impl Ease {
    pub fn new(f: impl Fn(f32) -> f32 + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn linear() -> Self {
        Self::new(|t| t)
    }

    pub fn smooth_step() -> Self {
        Self::new(|t| t * t * (3.0 - 2.0 * t))
    }

    pub fn quad_in() -> Self {
        Self::new(|t| t * t)
    }

    pub fn quad_out() -> Self {
        Self::new(|t| t * (2.0 - t))
    }

    #[inline]
    pub fn evaluate(&self, t: f32) -> f32 {
        (self.0)(t)
    }
}

impl Default for Ease {
    fn default() -> Self {
        Self::linear()
    }
}

impl fmt::Debug for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Ease(..)")
    }
}
