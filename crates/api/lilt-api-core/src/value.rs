//! Value: runtime instances a tweenable property can hold.
//! All numeric types use f32.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse kind of a [`Value`], used as the declared type of a bound property.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Float,
    Vec2,
    Vec3,
    Vec4,
    Quat,
    ColorRgba,
}

impl ValueKind {
    /// Number of f32 lanes a value of this kind carries.
    #[inline]
    pub fn lanes(self) -> usize {
        match self {
            ValueKind::Float => 1,
            ValueKind::Vec2 => 2,
            ValueKind::Vec3 => 3,
            ValueKind::Vec4 | ValueKind::Quat | ValueKind::ColorRgba => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Float => "float",
            ValueKind::Vec2 => "vec2",
            ValueKind::Vec3 => "vec3",
            ValueKind::Vec4 => "vec4",
            ValueKind::Quat => "quat",
            ValueKind::ColorRgba => "color",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    /// Scalar float
    Float(f32),

    /// 2D vector
    Vec2([f32; 2]),

    /// 3D vector
    Vec3([f32; 3]),

    /// 4D vector
    Vec4([f32; 4]),

    /// Quaternion (x, y, z, w)
    Quat([f32; 4]),

    /// RGBA color (linear by convention)
    ColorRgba([f32; 4]),
}

impl Value {
    /// Return the coarse kind of this value.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Float(_) => ValueKind::Float,
            Value::Vec2(_) => ValueKind::Vec2,
            Value::Vec3(_) => ValueKind::Vec3,
            Value::Vec4(_) => ValueKind::Vec4,
            Value::Quat(_) => ValueKind::Quat,
            Value::ColorRgba(_) => ValueKind::ColorRgba,
        }
    }

    /// Convenience constructors
    pub fn f(v: f32) -> Self {
        Value::Float(v)
    }

    pub fn vec2(x: f32, y: f32) -> Self {
        Value::Vec2([x, y])
    }

    pub fn vec3(x: f32, y: f32, z: f32) -> Self {
        Value::Vec3([x, y, z])
    }

    pub fn quat(x: f32, y: f32, z: f32, w: f32) -> Self {
        Value::Quat([x, y, z, w])
    }

    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Value::ColorRgba([r, g, b, a])
    }

    /// The identity element for this kind: zero for vectors/colors/floats,
    /// the unit rotation for quaternions.
    pub fn identity_of(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Float => Value::Float(0.0),
            ValueKind::Vec2 => Value::Vec2([0.0; 2]),
            ValueKind::Vec3 => Value::Vec3([0.0; 3]),
            ValueKind::Vec4 => Value::Vec4([0.0; 4]),
            ValueKind::Quat => Value::Quat([0.0, 0.0, 0.0, 1.0]),
            ValueKind::ColorRgba => Value::ColorRgba([0.0; 4]),
        }
    }

    /// Scalar view, if this is a Float.
    #[inline]
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Component lanes as a slice.
    pub fn lanes(&self) -> &[f32] {
        match self {
            Value::Float(v) => std::slice::from_ref(v),
            Value::Vec2(a) => a,
            Value::Vec3(a) => a,
            Value::Vec4(a) | Value::Quat(a) | Value::ColorRgba(a) => a,
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

/// Narrowing; host scalars are often f64.
impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v as f32)
    }
}

impl From<[f32; 2]> for Value {
    fn from(v: [f32; 2]) -> Self {
        Value::Vec2(v)
    }
}

impl From<[f32; 3]> for Value {
    fn from(v: [f32; 3]) -> Self {
        Value::Vec3(v)
    }
}

impl From<[f32; 4]> for Value {
    fn from(v: [f32; 4]) -> Self {
        Value::Vec4(v)
    }
}
