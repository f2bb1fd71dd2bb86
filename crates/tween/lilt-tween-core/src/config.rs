use serde::{Deserialize, Serialize};

use crate::error::TweenError;
use crate::options::{TimeSource, UpdatePhase};

/// Scheduler configuration. Hosts typically load it from JSON; missing fields
/// fall back to defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Initial capacity of the active set.
    pub capacity: usize,
    /// Initial capacity of the auto-kill index.
    pub auto_kill_capacity: usize,
    /// Phase for tweens that do not pick one.
    pub default_phase: UpdatePhase,
    /// Clock for tweens that do not pick one.
    pub default_time_source: TimeSource,
    /// Largest delta a single tick may advance. None disables clamping.
    pub max_delta: Option<f32>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            capacity: 64,
            auto_kill_capacity: 32,
            default_phase: UpdatePhase::Early,
            default_time_source: TimeSource::Scaled,
            max_delta: None,
        }
    }
}

impl SchedulerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, TweenError> {
        let config: SchedulerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TweenError> {
        match self.max_delta {
            Some(max) if !(max.is_finite() && max > 0.0) => Err(TweenError::Config {
                reason: format!("max_delta must be a positive finite number, got {max}"),
            }),
            _ => Ok(()),
        }
    }

    /// Apply clamping to a raw tick delta. Negative deltas never rewind.
    pub fn clamp_delta(&self, dt: f32) -> f32 {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        match self.max_delta {
            Some(max) => dt.min(max),
            None => dt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let cfg = SchedulerConfig::from_json_str(r#"{ "default_phase": "Late", "max_delta": 0.1 }"#)
            .unwrap();
        assert_eq!(cfg.default_phase, UpdatePhase::Late);
        assert_eq!(cfg.capacity, 64);
        assert_eq!(cfg.clamp_delta(0.5), 0.1);
        assert_eq!(cfg.clamp_delta(-1.0), 0.0);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            SchedulerConfig::from_json_str(r#"{ "max_delta": 0.0 }"#),
            Err(TweenError::Config { .. })
        ));
        assert!(matches!(
            SchedulerConfig::from_json_str("{ nope"),
            Err(TweenError::Config { .. })
        ));
    }
}
