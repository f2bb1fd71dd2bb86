//! Identity keys used by the auto-kill index.
//!
//! A tween's identity defaults to its target; the optional token narrows the
//! key to one channel on that identity (e.g. "position" vs "color").

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TweenError;

/// Identity of a live target: its allocation address, or a host-assigned id.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TargetKey(pub usize);

/// Opaque identity or token for auto-kill pairing.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum TweenKey {
    Target(TargetKey),
    Id(u64),
    Name(String),
}

impl TweenKey {
    pub fn name(name: impl Into<String>) -> Self {
        TweenKey::Name(name.into())
    }

    /// Reject keys that cannot serve as a stable dedup key.
    pub fn validate(&self) -> Result<(), TweenError> {
        match self {
            TweenKey::Name(n) if n.trim().is_empty() => Err(TweenError::InvalidIdentity {
                reason: "name keys must not be empty".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for TweenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TweenKey::Target(k) => write!(f, "target@{:#x}", k.0),
            TweenKey::Id(id) => write!(f, "#{id}"),
            TweenKey::Name(n) => f.write_str(n),
        }
    }
}

impl From<&str> for TweenKey {
    fn from(s: &str) -> Self {
        TweenKey::Name(s.to_string())
    }
}

impl From<String> for TweenKey {
    fn from(s: String) -> Self {
        TweenKey::Name(s)
    }
}

impl From<u64> for TweenKey {
    fn from(id: u64) -> Self {
        TweenKey::Id(id)
    }
}

impl From<TargetKey> for TweenKey {
    fn from(k: TargetKey) -> Self {
        TweenKey::Target(k)
    }
}

/// (identity, token) pair owning one auto-kill slot.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct AutoKillKey {
    pub identity: TweenKey,
    pub token: Option<TweenKey>,
}

impl AutoKillKey {
    pub fn new(identity: TweenKey, token: Option<TweenKey>) -> Result<Self, TweenError> {
        identity.validate()?;
        if let Some(token) = &token {
            token.validate()?;
        }
        Ok(Self { identity, token })
    }
}

impl fmt::Display for AutoKillKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.token {
            Some(token) => write!(f, "({}, {})", self.identity, token),
            None => write!(f, "({}, -)", self.identity),
        }
    }
}
