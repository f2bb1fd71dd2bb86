//! Coercion helpers between Value kinds.
//!
//! Tween endpoints are supplied by callers and may not match the declared kind
//! of the bound property exactly. Rules:
//! - same kind -> unchanged
//! - Float -> VecN / Color: broadcast to every lane
//! - VecN -> VecM: truncate or zero-pad
//! - Vec4 <-> ColorRgba: lane-for-lane
//! - Quat only from Quat or Vec4 (normalized); nothing else converts into Quat
//! - anything -> Float only from Float

use crate::{Value, ValueKind};

fn lanes4(v: &Value) -> [f32; 4] {
    let mut out = [0.0f32; 4];
    for (slot, lane) in out.iter_mut().zip(v.lanes()) {
        *slot = *lane;
    }
    out
}

fn normalize_quat(q: [f32; 4]) -> [f32; 4] {
    let mag = (q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3]).sqrt();
    if mag == 0.0 {
        [0.0, 0.0, 0.0, 1.0]
    } else {
        [q[0] / mag, q[1] / mag, q[2] / mag, q[3] / mag]
    }
}

/// Attempt to coerce `value` into `kind`. Returns `None` when no sensible
/// conversion exists.
pub fn coerce(value: &Value, kind: ValueKind) -> Option<Value> {
    if value.kind() == kind {
        return Some(*value);
    }
    match (value, kind) {
        (Value::Float(f), ValueKind::Vec2) => Some(Value::Vec2([*f; 2])),
        (Value::Float(f), ValueKind::Vec3) => Some(Value::Vec3([*f; 3])),
        (Value::Float(f), ValueKind::Vec4) => Some(Value::Vec4([*f; 4])),
        (Value::Float(f), ValueKind::ColorRgba) => Some(Value::ColorRgba([*f; 4])),
        (Value::Float(_), ValueKind::Quat) => None,
        (_, ValueKind::Float) => None,
        (Value::Quat(_), _) => None,
        (Value::Vec4(a), ValueKind::Quat) => Some(Value::Quat(normalize_quat(*a))),
        (_, ValueKind::Quat) => None,
        (v, ValueKind::Vec2) => {
            let l = lanes4(v);
            Some(Value::Vec2([l[0], l[1]]))
        }
        (v, ValueKind::Vec3) => {
            let l = lanes4(v);
            Some(Value::Vec3([l[0], l[1], l[2]]))
        }
        (v, ValueKind::Vec4) => Some(Value::Vec4(lanes4(v))),
        (v, ValueKind::ColorRgba) => {
            let mut l = lanes4(v);
            // Colors padded from fewer lanes stay opaque.
            if v.kind().lanes() < 4 {
                l[3] = 1.0;
            }
            Some(Value::ColorRgba(l))
        }
    }
}

/// Whether [`coerce`] would succeed for this pair of kinds.
pub fn is_coercible(from: ValueKind, to: ValueKind) -> bool {
    coerce(&Value::identity_of(from), to).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_broadcasts_into_vectors() {
        assert_eq!(
            coerce(&Value::f(2.0), ValueKind::Vec3),
            Some(Value::vec3(2.0, 2.0, 2.0))
        );
    }

    #[test]
    fn vectors_pad_and_truncate() {
        assert_eq!(
            coerce(&Value::vec2(1.0, 2.0), ValueKind::Vec3),
            Some(Value::vec3(1.0, 2.0, 0.0))
        );
        assert_eq!(
            coerce(&Value::vec3(1.0, 2.0, 3.0), ValueKind::Vec2),
            Some(Value::vec2(1.0, 2.0))
        );
        assert_eq!(
            coerce(&Value::vec3(1.0, 0.5, 0.0), ValueKind::ColorRgba),
            Some(Value::rgba(1.0, 0.5, 0.0, 1.0))
        );
    }

    #[test]
    fn quat_and_float_are_strict() {
        assert_eq!(coerce(&Value::vec3(1.0, 2.0, 3.0), ValueKind::Float), None);
        assert_eq!(coerce(&Value::f(1.0), ValueKind::Quat), None);
        assert_eq!(coerce(&Value::quat(0.0, 0.0, 0.0, 1.0), ValueKind::Vec4), None);
        assert!(is_coercible(ValueKind::Vec4, ValueKind::Quat));
        assert!(!is_coercible(ValueKind::Vec3, ValueKind::Quat));
    }
}
