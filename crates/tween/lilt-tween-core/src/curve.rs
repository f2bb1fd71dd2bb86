//! Curves: what a tween does at a given normalized time.
//!
//! Member curves are bound once at construction. The accessor is resolved and
//! both endpoints are captured and coerced into the member's kind, so any type
//! mismatch surfaces as a construction error rather than mid-flight.

use lilt_api_core::blend::{add, distance, lerp};
use lilt_api_core::coercion::coerce;
use lilt_api_core::Value;
use std::rc::Rc;

use crate::accessor::MemberAccessor;
use crate::ease::Ease;
use crate::error::TweenError;
use crate::target::Tweenable;

/// Distances below this are treated as "already at the destination".
const REDIRECT_EPSILON: f32 = 1e-6;

pub trait TweenCurve {
    /// Seconds in one cycle.
    fn duration(&self) -> f32;

    /// Apply the curve at normalized time `t` in `0..=1`.
    fn evaluate(&mut self, target: Option<&dyn Tweenable>, t: f32) -> Result<(), TweenError>;
}

/// Interpolates one bound member between two captured endpoints.
pub struct MemberCurve {
    accessor: Rc<dyn MemberAccessor>,
    ease: Ease,
    start: Value,
    end: Value,
    duration: f32,
}

fn coerce_for(accessor: &dyn MemberAccessor, value: Value) -> Result<Value, TweenError> {
    coerce(&value, accessor.kind()).ok_or_else(|| TweenError::TypeMismatch {
        path: accessor.describe(),
        expected: accessor.kind(),
        actual: value.kind(),
    })
}

impl MemberCurve {
    /// From the member's current value to `end`.
    pub fn to(
        target: &dyn Tweenable,
        accessor: Rc<dyn MemberAccessor>,
        ease: Ease,
        end: Value,
        duration: f32,
    ) -> Result<Self, TweenError> {
        let start = accessor.get(target)?;
        let end = coerce_for(accessor.as_ref(), end)?;
        Ok(Self::bound(accessor, ease, start, end, duration))
    }

    /// From `start` back to the member's current value.
    pub fn from(
        target: &dyn Tweenable,
        accessor: Rc<dyn MemberAccessor>,
        ease: Ease,
        start: Value,
        duration: f32,
    ) -> Result<Self, TweenError> {
        let end = accessor.get(target)?;
        let start = coerce_for(accessor.as_ref(), start)?;
        Ok(Self::bound(accessor, ease, start, end, duration))
    }

    /// From the current value to current + `amount`.
    pub fn by(
        target: &dyn Tweenable,
        accessor: Rc<dyn MemberAccessor>,
        ease: Ease,
        amount: Value,
        duration: f32,
    ) -> Result<Self, TweenError> {
        let start = accessor.get(target)?;
        let amount = coerce_for(accessor.as_ref(), amount)?;
        let end = add(&start, &amount).ok_or_else(|| TweenError::TypeMismatch {
            path: accessor.describe(),
            expected: start.kind(),
            actual: amount.kind(),
        })?;
        Ok(Self::bound(accessor, ease, start, end, duration))
    }

    /// Between two explicit endpoints.
    pub fn from_to(
        accessor: Rc<dyn MemberAccessor>,
        ease: Ease,
        start: Value,
        end: Value,
        duration: f32,
    ) -> Result<Self, TweenError> {
        let start = coerce_for(accessor.as_ref(), start)?;
        let end = coerce_for(accessor.as_ref(), end)?;
        Ok(Self::bound(accessor, ease, start, end, duration))
    }

    /// Continue an interrupted `start -> end` motion from the current value.
    ///
    /// Duration shrinks by the fraction of the full distance already covered.
    pub fn redirect_to(
        target: &dyn Tweenable,
        accessor: Rc<dyn MemberAccessor>,
        ease: Ease,
        start: Value,
        end: Value,
        duration: f32,
    ) -> Result<Self, TweenError> {
        let current = accessor.get(target)?;
        let start = coerce_for(accessor.as_ref(), start)?;
        let end = coerce_for(accessor.as_ref(), end)?;
        let full = distance(&start, &end).unwrap_or(0.0);
        let remaining = distance(&current, &end).unwrap_or(0.0);
        let duration = if full > REDIRECT_EPSILON {
            duration * (remaining / full)
        } else {
            duration
        };
        Ok(Self::bound(accessor, ease, current, end, duration))
    }

    fn bound(
        accessor: Rc<dyn MemberAccessor>,
        ease: Ease,
        start: Value,
        end: Value,
        duration: f32,
    ) -> Self {
        Self {
            accessor,
            ease,
            start,
            end,
            duration: duration.max(0.0),
        }
    }

    pub fn start(&self) -> Value {
        self.start
    }

    pub fn end(&self) -> Value {
        self.end
    }

    /// Value the curve writes at normalized time `t`.
    pub fn sample(&self, t: f32) -> Option<Value> {
        lerp(&self.start, &self.end, self.ease.evaluate(t))
    }
}

impl TweenCurve for MemberCurve {
    fn duration(&self) -> f32 {
        self.duration
    }

    fn evaluate(&mut self, target: Option<&dyn Tweenable>, t: f32) -> Result<(), TweenError> {
        let target = target.ok_or_else(|| TweenError::Apply {
            path: self.accessor.describe(),
            reason: "member curve has no target".to_string(),
        })?;
        let value = self.sample(t).ok_or_else(|| TweenError::TypeMismatch {
            path: self.accessor.describe(),
            expected: self.start.kind(),
            actual: self.end.kind(),
        })?;
        self.accessor.set(target, value)
    }
}

/// Calls a closure with eased progress instead of writing a member.
pub struct CallbackCurve<F: FnMut(f32)> {
    ease: Ease,
    duration: f32,
    callback: F,
}

impl<F: FnMut(f32)> CallbackCurve<F> {
    pub fn new(ease: Ease, duration: f32, callback: F) -> Self {
        Self {
            ease,
            duration: duration.max(0.0),
            callback,
        }
    }
}

impl<F: FnMut(f32)> TweenCurve for CallbackCurve<F> {
    fn duration(&self) -> f32 {
        self.duration
    }

    fn evaluate(&mut self, _target: Option<&dyn Tweenable>, t: f32) -> Result<(), TweenError> {
        (self.callback)(self.ease.evaluate(t));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::{AccessorResolver, PropertyResolver};
    use approx::assert_relative_eq;
    use lilt_api_core::{PropertyPath, ValueKind};
    use std::cell::{Cell, RefCell};

    struct Sprite {
        x: Cell<f32>,
        tint: Cell<[f32; 4]>,
    }

    impl Tweenable for Sprite {
        fn get_property(&self, path: &PropertyPath) -> Option<Value> {
            match path.member_chain().as_str() {
                "x" => Some(Value::Float(self.x.get())),
                "tint" => Some(Value::ColorRgba(self.tint.get())),
                _ => None,
            }
        }
        fn set_property(&self, path: &PropertyPath, value: Value) -> bool {
            match (path.member_chain().as_str(), value) {
                ("x", Value::Float(v)) => self.x.set(v),
                ("tint", Value::ColorRgba(c)) => self.tint.set(c),
                _ => return false,
            }
            true
        }
    }

    fn sprite() -> Sprite {
        Sprite {
            x: Cell::new(10.0),
            tint: Cell::new([1.0, 1.0, 1.0, 1.0]),
        }
    }

    fn bind(s: &Sprite, path: &str) -> Rc<dyn MemberAccessor> {
        PropertyResolver
            .resolve(s, &PropertyPath::parse(path).unwrap())
            .unwrap()
    }

    #[test]
    fn to_and_from_capture_current_value() {
        let s = sprite();
        let to = MemberCurve::to(&s, bind(&s, "x"), Ease::linear(), Value::f(20.0), 1.0).unwrap();
        assert_eq!(to.start(), Value::f(10.0));
        assert_eq!(to.end(), Value::f(20.0));

        let from =
            MemberCurve::from(&s, bind(&s, "x"), Ease::linear(), Value::f(0.0), 1.0).unwrap();
        assert_eq!(from.start(), Value::f(0.0));
        assert_eq!(from.end(), Value::f(10.0));
    }

    #[test]
    fn by_adds_to_current() {
        let s = sprite();
        let mut by = MemberCurve::by(&s, bind(&s, "x"), Ease::linear(), Value::f(5.0), 1.0).unwrap();
        by.evaluate(Some(&s), 0.5).unwrap();
        assert_relative_eq!(s.x.get(), 12.5);
    }

    #[test]
    fn endpoints_coerce_into_member_kind() {
        let s = sprite();
        let curve = MemberCurve::to(
            &s,
            bind(&s, "tint"),
            Ease::linear(),
            Value::vec3(0.0, 0.0, 0.0),
            1.0,
        )
        .unwrap();
        assert_eq!(curve.end(), Value::rgba(0.0, 0.0, 0.0, 1.0));

        let err = MemberCurve::to(
            &s,
            bind(&s, "x"),
            Ease::linear(),
            Value::quat(0.0, 0.0, 0.0, 1.0),
            1.0,
        )
        .err()
        .unwrap();
        assert_eq!(
            err,
            TweenError::TypeMismatch {
                path: "x".into(),
                expected: ValueKind::Float,
                actual: ValueKind::Quat,
            }
        );
    }

    #[test]
    fn redirect_scales_duration_by_remaining_distance() {
        let s = sprite();
        s.x.set(5.0);
        let curve = MemberCurve::redirect_to(
            &s,
            bind(&s, "x"),
            Ease::linear(),
            Value::f(0.0),
            Value::f(20.0),
            2.0,
        )
        .unwrap();
        assert_eq!(curve.start(), Value::f(5.0));
        assert_relative_eq!(curve.duration(), 1.5);
    }

    #[test]
    fn callback_curve_sees_eased_progress() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut curve = CallbackCurve::new(Ease::quad_in(), 1.0, move |p| sink.borrow_mut().push(p));
        curve.evaluate(None, 0.5).unwrap();
        curve.evaluate(None, 1.0).unwrap();
        assert_eq!(*seen.borrow(), vec![0.25, 1.0]);
    }
}
