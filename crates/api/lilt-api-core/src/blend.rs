//! Interpolation and arithmetic on Values.
//! - f32 lerp for floats, vectors and colors
//! - quaternion slerp (shortest-arc)
//! - add/sub used by relative ("by") tweens; quaternions compose by rotation
//! - distance used to re-base redirected tweens
//!
//! All binary operations require both sides to share a kind and return `None`
//! otherwise; callers coerce endpoints at bind time.

use crate::Value;

#[inline]
fn lerp_f(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn zip_array<const N: usize>(a: &[f32; N], b: &[f32; N], f: impl Fn(f32, f32) -> f32) -> [f32; N] {
    let mut out = [0.0f32; N];
    for i in 0..N {
        out[i] = f(a[i], b[i]);
    }
    out
}

#[inline]
fn dot4(a: [f32; 4], b: [f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

fn normalize_quat(q: [f32; 4]) -> [f32; 4] {
    let mag = dot4(q, q).sqrt();
    if mag == 0.0 {
        [0.0, 0.0, 0.0, 1.0]
    } else {
        [q[0] / mag, q[1] / mag, q[2] / mag, q[3] / mag]
    }
}

/// Hamilton product `a * b` for quaternions stored as [x, y, z, w].
fn quat_mul(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
    let [ax, ay, az, aw] = a;
    let [bx, by, bz, bw] = b;
    [
        aw * bx + ax * bw + ay * bz - az * by,
        aw * by - ax * bz + ay * bw + az * bx,
        aw * bz + ax * by - ay * bx + az * bw,
        aw * bw - ax * bx - ay * by - az * bz,
    ]
}

fn quat_conjugate(q: [f32; 4]) -> [f32; 4] {
    [-q[0], -q[1], -q[2], q[3]]
}

/// Slerp between two quaternions, taking the short arc.
pub fn slerp(q1: [f32; 4], q2: [f32; 4], t: f32) -> [f32; 4] {
    let qa = normalize_quat(q1);
    let mut qb = normalize_quat(q2);

    let mut dot = dot4(qa, qb);
    if dot < 0.0 {
        qb = [-qb[0], -qb[1], -qb[2], -qb[3]];
        dot = -dot;
    }

    // Nearly parallel: normalized lerp is stable and indistinguishable.
    const DOT_THRESHOLD: f32 = 0.9995;
    if dot > DOT_THRESHOLD {
        return normalize_quat(zip_array(&qa, &qb, |a, b| lerp_f(a, b, t)));
    }

    let theta_0 = dot.clamp(-1.0, 1.0).acos();
    let theta = theta_0 * t;
    let sin_theta_0 = theta_0.sin();
    let s0 = (theta_0 - theta).sin() / sin_theta_0;
    let s1 = theta.sin() / sin_theta_0;
    zip_array(&qa, &qb, |a, b| s0 * a + s1 * b)
}

/// Interpolate `a -> b` at `t`. `t` is not clamped so overshooting eases work.
pub fn lerp(a: &Value, b: &Value, t: f32) -> Option<Value> {
    let out = match (a, b) {
        (Value::Float(x), Value::Float(y)) => Value::Float(lerp_f(*x, *y, t)),
        (Value::Vec2(x), Value::Vec2(y)) => Value::Vec2(zip_array(x, y, |p, q| lerp_f(p, q, t))),
        (Value::Vec3(x), Value::Vec3(y)) => Value::Vec3(zip_array(x, y, |p, q| lerp_f(p, q, t))),
        (Value::Vec4(x), Value::Vec4(y)) => Value::Vec4(zip_array(x, y, |p, q| lerp_f(p, q, t))),
        (Value::ColorRgba(x), Value::ColorRgba(y)) => {
            Value::ColorRgba(zip_array(x, y, |p, q| lerp_f(p, q, t)))
        }
        (Value::Quat(x), Value::Quat(y)) => Value::Quat(slerp(*x, *y, t)),
        _ => return None,
    };
    Some(out)
}

/// `a + b`; for quaternions, `b` applied after `a`.
pub fn add(a: &Value, b: &Value) -> Option<Value> {
    let out = match (a, b) {
        (Value::Float(x), Value::Float(y)) => Value::Float(x + y),
        (Value::Vec2(x), Value::Vec2(y)) => Value::Vec2(zip_array(x, y, |p, q| p + q)),
        (Value::Vec3(x), Value::Vec3(y)) => Value::Vec3(zip_array(x, y, |p, q| p + q)),
        (Value::Vec4(x), Value::Vec4(y)) => Value::Vec4(zip_array(x, y, |p, q| p + q)),
        (Value::ColorRgba(x), Value::ColorRgba(y)) => {
            Value::ColorRgba(zip_array(x, y, |p, q| p + q))
        }
        (Value::Quat(x), Value::Quat(y)) => Value::Quat(normalize_quat(quat_mul(*y, *x))),
        _ => return None,
    };
    Some(out)
}

/// `a - b`; for quaternions, the rotation taking `b` to `a`.
pub fn sub(a: &Value, b: &Value) -> Option<Value> {
    let out = match (a, b) {
        (Value::Float(x), Value::Float(y)) => Value::Float(x - y),
        (Value::Vec2(x), Value::Vec2(y)) => Value::Vec2(zip_array(x, y, |p, q| p - q)),
        (Value::Vec3(x), Value::Vec3(y)) => Value::Vec3(zip_array(x, y, |p, q| p - q)),
        (Value::Vec4(x), Value::Vec4(y)) => Value::Vec4(zip_array(x, y, |p, q| p - q)),
        (Value::ColorRgba(x), Value::ColorRgba(y)) => {
            Value::ColorRgba(zip_array(x, y, |p, q| p - q))
        }
        (Value::Quat(x), Value::Quat(y)) => {
            Value::Quat(normalize_quat(quat_mul(*x, quat_conjugate(normalize_quat(*y)))))
        }
        _ => return None,
    };
    Some(out)
}

/// Euclidean distance between lanes; angular distance (radians) for quaternions.
pub fn distance(a: &Value, b: &Value) -> Option<f32> {
    if a.kind() != b.kind() {
        return None;
    }
    if let (Value::Quat(x), Value::Quat(y)) = (a, b) {
        let d = dot4(normalize_quat(*x), normalize_quat(*y)).abs().min(1.0);
        return Some(2.0 * d.acos());
    }
    let sum: f32 = a
        .lanes()
        .iter()
        .zip(b.lanes())
        .map(|(p, q)| (p - q) * (p - q))
        .sum();
    Some(sum.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_rejects_mismatched_kinds() {
        assert_eq!(lerp(&Value::f(0.0), &Value::vec2(1.0, 1.0), 0.5), None);
    }

    #[test]
    fn lerp_does_not_clamp() {
        assert_eq!(lerp(&Value::f(0.0), &Value::f(10.0), 1.5), Some(Value::f(15.0)));
    }

    #[test]
    fn add_then_sub_recovers_vector() {
        let a = Value::vec3(1.0, 2.0, 3.0);
        let b = Value::vec3(0.5, -1.0, 2.0);
        let sum = add(&a, &b).unwrap();
        assert_eq!(sub(&sum, &b), Some(a));
    }
}
