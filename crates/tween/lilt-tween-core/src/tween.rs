//! A single tween: a curve bound to a (weak) target plus playback state.
//!
//! Tweens are shared through [`TweenHandle`]; all mutable state sits in
//! cells so the scheduler, host code and completion callbacks can hold handles
//! at the same time. The scheduler owns membership; the tween only knows how
//! to advance itself.

use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::curve::TweenCurve;
use crate::error::TweenError;
use crate::ids::TweenId;
use crate::key::{AutoKillKey, TweenKey};
use crate::options::{TimeSource, UpdatePhase, WrapMode};
use crate::target::{TargetRef, Tweenable};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TweenState {
    /// Built but never played.
    Idle,
    Playing,
    Paused,
    /// Ran to the end of its last cycle.
    Completed,
    /// Stopped early; completion callbacks never fire.
    Killed,
}

impl TweenState {
    pub fn name(self) -> &'static str {
        match self {
            TweenState::Idle => "idle",
            TweenState::Playing => "playing",
            TweenState::Paused => "paused",
            TweenState::Completed => "completed",
            TweenState::Killed => "killed",
        }
    }

    /// Live tweens belong to the active set.
    #[inline]
    pub fn is_live(self) -> bool {
        matches!(self, TweenState::Playing | TweenState::Paused)
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, TweenState::Completed | TweenState::Killed)
    }
}

impl fmt::Display for TweenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of advancing one tween by one tick.
#[derive(Clone, Debug, PartialEq)]
pub enum UpdateStatus {
    Running,
    Finished,
    TargetLost,
    Failed(TweenError),
}

/// Map curve-local time onto normalized curve time for a positive duration.
///
/// Returns `(t, finished)`.
pub fn wrap_time(local: f32, duration: f32, wrap: WrapMode, repeat: u32) -> (f32, bool) {
    let local = local.max(0.0);
    let span = duration * repeat as f32;
    match wrap {
        WrapMode::Once => {
            if local >= duration {
                (1.0, true)
            } else {
                (local / duration, false)
            }
        }
        WrapMode::ClampForever => ((local / duration).min(1.0), false),
        WrapMode::Loop => {
            if repeat > 0 && local >= span {
                return (1.0, true);
            }
            (local.rem_euclid(duration) / duration, false)
        }
        WrapMode::PingPong => {
            if repeat > 0 && local >= span {
                // the last cycle ends forward on odd counts, backward on even
                let t = if repeat % 2 == 1 { 1.0 } else { 0.0 };
                return (t, true);
            }
            let cycle = (local / duration).floor() as u64;
            let frac = local.rem_euclid(duration) / duration;
            if cycle % 2 == 1 {
                (1.0 - frac, false)
            } else {
                (frac, false)
            }
        }
    }
}

/// Everything needed to build a tween, already resolved against config.
pub(crate) struct TweenParts {
    pub id: TweenId,
    pub target: Option<TargetRef>,
    pub identity: Option<TweenKey>,
    pub auto_kill: Option<AutoKillKey>,
    pub phase: UpdatePhase,
    pub wrap: WrapMode,
    pub repeat: u32,
    pub delay: f32,
    pub speed: f32,
    pub time_source: TimeSource,
    pub curve: Box<dyn TweenCurve>,
}

type CompleteFn = Box<dyn FnOnce(&TweenHandle)>;

struct Tween {
    id: TweenId,
    target: Option<TargetRef>,
    identity: Option<TweenKey>,
    auto_kill: Option<AutoKillKey>,
    phase: UpdatePhase,
    wrap: WrapMode,
    repeat: u32,
    delay: f32,
    duration: f32,
    time_source: TimeSource,
    speed: Cell<f32>,
    state: Cell<TweenState>,
    elapsed: Cell<f32>,
    curve: RefCell<Box<dyn TweenCurve>>,
    on_complete: RefCell<Option<CompleteFn>>,
}

/// Shared handle to a tween. Equality and hashing follow the tween id.
#[derive(Clone)]
pub struct TweenHandle(Rc<Tween>);

impl TweenHandle {
    pub(crate) fn new(parts: TweenParts) -> Self {
        let duration = parts.curve.duration().max(0.0);
        Self(Rc::new(Tween {
            id: parts.id,
            target: parts.target,
            identity: parts.identity,
            auto_kill: parts.auto_kill,
            phase: parts.phase,
            wrap: parts.wrap,
            repeat: parts.repeat,
            delay: parts.delay.max(0.0),
            duration,
            time_source: parts.time_source,
            speed: Cell::new(parts.speed),
            state: Cell::new(TweenState::Idle),
            elapsed: Cell::new(0.0),
            curve: RefCell::new(parts.curve),
            on_complete: RefCell::new(None),
        }))
    }

    #[inline]
    pub fn id(&self) -> TweenId {
        self.0.id
    }

    #[inline]
    pub fn state(&self) -> TweenState {
        self.0.state.get()
    }

    pub fn is_playing(&self) -> bool {
        self.state() == TweenState::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.state() == TweenState::Paused
    }

    pub fn is_complete(&self) -> bool {
        self.state() == TweenState::Completed
    }

    pub fn is_killed(&self) -> bool {
        self.state() == TweenState::Killed
    }

    pub fn phase(&self) -> UpdatePhase {
        self.0.phase
    }

    pub fn wrap(&self) -> WrapMode {
        self.0.wrap
    }

    pub fn repeat(&self) -> u32 {
        self.0.repeat
    }

    pub fn delay(&self) -> f32 {
        self.0.delay
    }

    /// Seconds in one cycle of the curve.
    pub fn duration(&self) -> f32 {
        self.0.duration
    }

    pub fn time_source(&self) -> TimeSource {
        self.0.time_source
    }

    pub fn speed(&self) -> f32 {
        self.0.speed.get()
    }

    pub fn set_speed(&self, speed: f32) {
        self.0.speed.set(speed);
    }

    /// Seconds advanced so far, including delay.
    pub fn elapsed(&self) -> f32 {
        self.0.elapsed.get()
    }

    pub fn identity(&self) -> Option<&TweenKey> {
        self.0.identity.as_ref()
    }

    pub fn auto_kill_key(&self) -> Option<&AutoKillKey> {
        self.0.auto_kill.as_ref()
    }

    pub fn target(&self) -> Option<&TargetRef> {
        self.0.target.as_ref()
    }

    /// Callback tweens have no target and never lose it.
    pub fn is_target_alive(&self) -> bool {
        self.0.target.as_ref().map_or(true, TargetRef::is_alive)
    }

    /// Full cycles finished so far.
    pub fn completed_cycles(&self) -> u32 {
        let local = (self.elapsed() - self.0.delay).max(0.0);
        if self.0.duration <= 0.0 {
            return u32::from(self.is_complete());
        }
        let cycles = (local / self.0.duration).floor() as u32;
        match (self.0.wrap, self.0.repeat) {
            (WrapMode::Once | WrapMode::ClampForever, _) => cycles.min(1),
            (_, 0) => cycles,
            (_, repeat) => cycles.min(repeat),
        }
    }

    /// Runs once, after the final write of a naturally completed tween.
    /// Killed tweens never call it.
    pub fn on_complete(&self, f: impl FnOnce(&TweenHandle) + 'static) -> &Self {
        *self.0.on_complete.borrow_mut() = Some(Box::new(f));
        self
    }

    pub fn pause(&self) -> bool {
        if self.state() != TweenState::Playing {
            return false;
        }
        self.0.state.set(TweenState::Paused);
        true
    }

    pub fn resume(&self) -> bool {
        if self.state() != TweenState::Paused {
            return false;
        }
        self.0.state.set(TweenState::Playing);
        true
    }

    /// Jump to `time` seconds and apply the curve there. Never completes.
    pub fn scrub(&self, time: f32) -> Result<(), TweenError> {
        if self.state().is_terminal() {
            return Err(self.invalid_state("scrub"));
        }
        let time = time.max(0.0);
        self.0.elapsed.set(time);
        let target = self.resolve_target()?;
        let (t, _) = self.sample(time, false);
        self.apply(target.as_deref(), t)
    }

    /// Advance by `dt` seconds of the tween's clock.
    pub(crate) fn update(&self, dt: f32) -> UpdateStatus {
        if self.state() != TweenState::Playing {
            return UpdateStatus::Running;
        }
        let target = match self.resolve_target() {
            Ok(target) => target,
            Err(_) => return UpdateStatus::TargetLost,
        };

        let elapsed = (self.elapsed() + dt * self.speed()).max(0.0);
        self.0.elapsed.set(elapsed);
        let (t, finished) = self.sample(elapsed, true);
        if let Err(err) = self.apply(target.as_deref(), t) {
            return UpdateStatus::Failed(err);
        }
        // the curve may have paused or killed its own tween
        if self.state() != TweenState::Playing {
            return UpdateStatus::Running;
        }

        if finished {
            self.0.state.set(TweenState::Completed);
            return UpdateStatus::Finished;
        }
        UpdateStatus::Running
    }

    /// Run the completion callback, if any. Called after the scheduler has
    /// retired the tween so the callback sees it gone.
    pub(crate) fn fire_complete(&self) {
        if !self.is_complete() {
            return;
        }
        let callback = self.0.on_complete.borrow_mut().take();
        if let Some(callback) = callback {
            callback(self);
        }
    }

    pub(crate) fn mark_playing(&self) -> Result<(), TweenError> {
        if self.state() != TweenState::Idle {
            return Err(self.invalid_state("play"));
        }
        self.0.state.set(TweenState::Playing);
        Ok(())
    }

    /// Transition a live tween to Killed and drop its completion callback.
    pub(crate) fn mark_killed(&self) -> bool {
        if !self.state().is_live() {
            return false;
        }
        self.0.state.set(TweenState::Killed);
        let dropped = self.0.on_complete.borrow_mut().take();
        drop(dropped);
        true
    }

    fn sample(&self, elapsed: f32, ticked: bool) -> (f32, bool) {
        let inner = &self.0;
        if elapsed < inner.delay {
            return (0.0, false);
        }
        let local = elapsed - inner.delay;
        if inner.duration <= 0.0 {
            // zero-length curves jump to their end on the first advance
            let reached = ticked || local > 0.0;
            let t = if reached { 1.0 } else { 0.0 };
            return (t, reached && inner.wrap != WrapMode::ClampForever);
        }
        wrap_time(local, inner.duration, inner.wrap, inner.repeat)
    }

    fn resolve_target(&self) -> Result<Option<Rc<dyn Tweenable>>, TweenError> {
        match &self.0.target {
            None => Ok(None),
            Some(target) => target
                .upgrade()
                .map(Some)
                .ok_or(TweenError::TargetLost { tween: self.id() }),
        }
    }

    fn apply(&self, target: Option<&dyn Tweenable>, t: f32) -> Result<(), TweenError> {
        let mut curve = self
            .0
            .curve
            .try_borrow_mut()
            .map_err(|_| self.invalid_state("re-enter the curve of"))?;
        curve.evaluate(target, t)
    }

    fn invalid_state(&self, requested: &str) -> TweenError {
        TweenError::InvalidState {
            tween: self.id(),
            state: self.state(),
            requested: requested.to_string(),
        }
    }
}

impl PartialEq for TweenHandle {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for TweenHandle {}

impl Hash for TweenHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for TweenHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweenHandle")
            .field("id", &self.0.id)
            .field("state", &self.state())
            .field("phase", &self.0.phase)
            .field("elapsed", &self.elapsed())
            .field("duration", &self.0.duration)
            .finish()
    }
}
