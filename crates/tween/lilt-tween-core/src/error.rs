//! Error type for tween construction, application and lifecycle misuse.

use lilt_api_core::{PathError, ValueKind};
use serde::{Deserialize, Serialize};

use crate::ids::TweenId;
use crate::tween::TweenState;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TweenError {
    /// Property path failed to parse.
    #[error("Invalid property path: {reason}")]
    InvalidPath { reason: String },

    /// Property path does not resolve to an accessor on the target.
    #[error("Property '{path}' does not resolve on the target")]
    UnresolvedProperty { path: String },

    /// Endpoint value cannot be coerced into the property's declared kind.
    #[error("Type mismatch on '{path}': property is {expected}, value is {actual}")]
    TypeMismatch {
        path: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    /// Target was already dead when a tween tried to bind to it.
    #[error("Cannot bind '{path}': target is no longer alive")]
    DeadTarget { path: String },

    /// Reading or writing a bound property failed mid-flight.
    #[error("Failed to apply '{path}': {reason}")]
    Apply { path: String, reason: String },

    /// Target of a running tween died.
    #[error("Target of {tween} is no longer alive")]
    TargetLost { tween: TweenId },

    /// Auto-kill identity or token is unusable as a key.
    #[error("Invalid auto-kill identity: {reason}")]
    InvalidIdentity { reason: String },

    /// Auto-kill was requested for a tween without an identity.
    #[error("{tween} has no identity; auto-kill requires one")]
    MissingIdentity { tween: TweenId },

    /// Operation not valid in the tween's current state.
    #[error("Cannot {requested} {tween} while {state}")]
    InvalidState {
        tween: TweenId,
        state: TweenState,
        requested: String,
    },

    /// The host reported that the application is shutting down.
    #[error("Application is closing; tween requests are ignored")]
    ApplicationClosing,

    /// Configuration could not be parsed or validated.
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },
}

impl TweenError {
    /// Errors surfaced by `play_*` before any tween exists.
    #[inline]
    pub fn is_binding_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPath { .. }
                | Self::UnresolvedProperty { .. }
                | Self::TypeMismatch { .. }
                | Self::DeadTarget { .. }
        )
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidPath { .. }
            | Self::UnresolvedProperty { .. }
            | Self::TypeMismatch { .. }
            | Self::DeadTarget { .. } => "binding",
            Self::Apply { .. } | Self::TargetLost { .. } => "runtime",
            Self::InvalidIdentity { .. } | Self::MissingIdentity { .. } => "identity",
            Self::InvalidState { .. } | Self::ApplicationClosing => "lifecycle",
            Self::Config { .. } => "config",
        }
    }
}

impl From<PathError> for TweenError {
    fn from(err: PathError) -> Self {
        Self::InvalidPath {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for TweenError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config {
            reason: err.to_string(),
        }
    }
}
