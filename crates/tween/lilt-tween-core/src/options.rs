use serde::{Deserialize, Serialize};

use crate::key::TweenKey;

/// Tick phase a tween is driven in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UpdatePhase {
    #[default]
    Early,
    Fixed,
    Late,
}

impl UpdatePhase {
    pub const ALL: [UpdatePhase; 3] = [UpdatePhase::Early, UpdatePhase::Fixed, UpdatePhase::Late];
}

/// How time past the end of one cycle maps back onto the curve.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WrapMode {
    /// Play once and complete.
    #[default]
    Once,
    /// Restart from the beginning each cycle.
    Loop,
    /// Alternate forward and backward cycles.
    PingPong,
    /// Hold the end value and never complete.
    ClampForever,
}

/// Which clock advances a tween.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeSource {
    /// Delta multiplied by the scheduler's time scales.
    #[default]
    Scaled,
    /// Raw delta as passed to `tick`.
    Unscaled,
}

/// Per-tween settings supplied to the play family.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweenOptions {
    /// None uses the scheduler's configured default.
    pub phase: Option<UpdatePhase>,
    pub wrap: WrapMode,
    /// Cycles before Loop/PingPong complete. 0 repeats forever.
    pub repeat: u32,
    /// Seconds before the curve starts moving.
    pub delay: f32,
    pub speed: f32,
    /// None uses the scheduler's configured default.
    pub time_source: Option<TimeSource>,
    /// Overrides the identity derived from the target.
    pub identity: Option<TweenKey>,
    /// Auto-kill token. Setting one implies `auto_kill`.
    pub token: Option<TweenKey>,
    /// Claim the (identity, token) slot even without a token.
    pub auto_kill: bool,
}

impl Default for TweenOptions {
    fn default() -> Self {
        Self {
            phase: None,
            wrap: WrapMode::Once,
            repeat: 0,
            delay: 0.0,
            speed: 1.0,
            time_source: None,
            identity: None,
            token: None,
            auto_kill: false,
        }
    }
}

impl TweenOptions {
    pub fn in_phase(mut self, phase: UpdatePhase) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn wrap(mut self, wrap: WrapMode, repeat: u32) -> Self {
        self.wrap = wrap;
        self.repeat = repeat;
        self
    }

    pub fn delay(mut self, seconds: f32) -> Self {
        self.delay = seconds;
        self
    }

    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn unscaled(mut self) -> Self {
        self.time_source = Some(TimeSource::Unscaled);
        self
    }

    pub fn identity(mut self, identity: impl Into<TweenKey>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    pub fn token(mut self, token: impl Into<TweenKey>) -> Self {
        self.token = Some(token.into());
        self.auto_kill = true;
        self
    }

    pub fn auto_kill(mut self) -> Self {
        self.auto_kill = true;
        self
    }
}
