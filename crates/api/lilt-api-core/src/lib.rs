//! lilt-api-core: value model and property paths shared by tweens and hosts.
//!
//! Hosts expose properties as [`Value`]s of a declared [`ValueKind`]; tweens
//! interpolate between values with [`blend`] and convert caller-supplied
//! endpoints with [`coercion`].

pub mod blend;
pub mod coercion;
pub mod property_path;
pub mod value;

pub use property_path::{PathError, PropertyPath};
pub use value::{Value, ValueKind};
