//! Scheduler: owns the active set and the auto-kill index and drives ticks.
//!
//! Every entry point is reentrant. User code (accessors, easing, callbacks)
//! may call back into the scheduler mid-tick; no `RefCell` borrow of the
//! active set or the index is held while user code runs, and structural
//! changes made during a tick are staged until the outermost lock releases.

use lilt_api_core::{PropertyPath, Value};
use log::{debug, trace, warn};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::accessor::{AccessorResolver, MemberAccessor, PropertyResolver};
use crate::active_set::{ActiveSet, AddOutcome, RemoveOutcome, SetMember};
use crate::auto_kill::AutoKillIndex;
use crate::config::SchedulerConfig;
use crate::curve::{CallbackCurve, MemberCurve, TweenCurve};
use crate::ease::Ease;
use crate::error::TweenError;
use crate::ids::{IdAllocator, TweenId};
use crate::key::{AutoKillKey, TweenKey};
use crate::options::{TimeSource, TweenOptions, UpdatePhase};
use crate::target::{TargetRef, Tweenable};
use crate::time_scale::TimeScales;
use crate::tween::{TweenHandle, TweenParts, UpdateStatus};

impl SetMember for TweenHandle {
    type Key = TweenId;
    fn member_key(&self) -> TweenId {
        self.id()
    }
}

/// Host notification that a world (scene, level) was torn down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldReset {
    pub label: String,
}

impl WorldReset {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

struct Shared {
    config: SchedulerConfig,
    ids: RefCell<IdAllocator>,
    active: RefCell<ActiveSet<TweenHandle>>,
    auto_kill: RefCell<AutoKillIndex<TweenHandle>>,
    resolver: Box<dyn AccessorResolver>,
    time_scales: Rc<TimeScales>,
    closing: Cell<bool>,
}

/// Cloneable handle to one scheduler; clones share state.
#[derive(Clone)]
pub struct Scheduler {
    shared: Rc<Shared>,
}

/// Non-owning scheduler handle for capture inside callbacks.
#[derive(Clone)]
pub struct WeakScheduler {
    shared: Weak<Shared>,
}

impl WeakScheduler {
    pub fn upgrade(&self) -> Option<Scheduler> {
        self.shared.upgrade().map(|shared| Scheduler { shared })
    }
}

/// Holds the active set locked; the outermost drop flushes staged changes.
pub struct LockGuard<'a> {
    scheduler: &'a Scheduler,
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        self.scheduler.unlock();
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self::with_resolver(config, PropertyResolver)
    }

    pub fn with_resolver(config: SchedulerConfig, resolver: impl AccessorResolver + 'static) -> Self {
        Self {
            shared: Rc::new(Shared {
                ids: RefCell::new(IdAllocator::new()),
                active: RefCell::new(ActiveSet::with_capacity(config.capacity)),
                auto_kill: RefCell::new(AutoKillIndex::with_capacity(config.auto_kill_capacity)),
                resolver: Box::new(resolver),
                time_scales: Rc::new(TimeScales::new()),
                closing: Cell::new(false),
                config,
            }),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.shared.config
    }

    /// Named time scales; also a tween target through `scale(<id>)`.
    pub fn time_scales(&self) -> Rc<TimeScales> {
        self.shared.time_scales.clone()
    }

    pub fn downgrade(&self) -> WeakScheduler {
        WeakScheduler {
            shared: Rc::downgrade(&self.shared),
        }
    }

    // ---------- lifecycle ----------

    /// After this every play request fails, kills do nothing and queries
    /// report an empty scheduler.
    pub fn notify_application_closing(&self) {
        if !self.shared.closing.replace(true) {
            debug!("scheduler: application closing; ignoring further requests");
        }
    }

    pub fn is_application_closing(&self) -> bool {
        self.shared.closing.get()
    }

    fn ensure_open(&self) -> Result<(), TweenError> {
        if self.is_application_closing() {
            return Err(TweenError::ApplicationClosing);
        }
        Ok(())
    }

    // ---------- locking ----------

    /// Lock the active set until the guard drops. Adds and removes made
    /// meanwhile are staged and applied together.
    pub fn lock(&self) -> LockGuard<'_> {
        self.shared.active.borrow_mut().lock();
        LockGuard { scheduler: self }
    }

    pub fn is_locked(&self) -> bool {
        self.shared.active.borrow().is_locked()
    }

    fn unlock(&self) {
        let flush = self.shared.active.borrow_mut().unlock();
        if flush.is_empty() {
            return;
        }
        trace!(
            "active_set: flushed {} removals, {} additions",
            flush.removed.len(),
            flush.added.len()
        );
        for tween in &flush.removed {
            self.release_slot(tween);
        }
        for tween in &flush.added {
            if tween.state().is_live() {
                self.prime(tween);
            }
        }
    }

    // ---------- queries ----------

    pub fn running_count(&self) -> usize {
        if self.is_application_closing() {
            return 0;
        }
        self.shared.active.borrow().len()
    }

    /// Lock-aware: staged adds count, staged removals do not.
    pub fn is_running(&self, tween: &TweenHandle) -> bool {
        !self.is_application_closing() && self.shared.active.borrow().contains(&tween.id())
    }

    /// Snapshot of every tween that is or will be in the active set.
    pub fn tweens(&self) -> Vec<TweenHandle> {
        if self.is_application_closing() {
            return Vec::new();
        }
        self.shared.active.borrow().members()
    }

    pub fn is_active_auto_kill(
        &self,
        identity: impl Into<TweenKey>,
        token: Option<TweenKey>,
    ) -> Result<bool, TweenError> {
        Ok(self.auto_kill_owner(identity, token)?.is_some())
    }

    /// Playing owner of the slot. A paused owner keeps the slot but is not
    /// reported until it resumes.
    pub fn auto_kill_owner(
        &self,
        identity: impl Into<TweenKey>,
        token: Option<TweenKey>,
    ) -> Result<Option<TweenHandle>, TweenError> {
        let key = AutoKillKey::new(identity.into(), token)?;
        if self.is_application_closing() {
            return Ok(None);
        }
        Ok(self
            .shared
            .auto_kill
            .borrow()
            .owner(&key)
            .filter(|owner| owner.is_playing())
            .cloned())
    }

    /// First live tween, in insertion order, matching `predicate`.
    pub fn find(&self, mut predicate: impl FnMut(&TweenHandle) -> bool) -> Option<TweenHandle> {
        if self.is_application_closing() {
            return None;
        }
        let _lock = self.lock();
        let mut index = 0;
        while let Some(tween) = self.tween_at(index) {
            index += 1;
            if tween.state().is_live() && predicate(&tween) {
                return Some(tween);
            }
        }
        None
    }

    fn tween_at(&self, index: usize) -> Option<TweenHandle> {
        self.shared.active.borrow().get_index(index).cloned()
    }

    // ---------- play family ----------

    pub fn play_to(
        &self,
        target: &TargetRef,
        path: &str,
        ease: Ease,
        end: impl Into<Value>,
        duration: f32,
        options: TweenOptions,
    ) -> Result<TweenHandle, TweenError> {
        let (host, accessor) = self.bind(target, path)?;
        let curve = MemberCurve::to(host.as_ref(), accessor, ease, end.into(), duration)?;
        self.start(Some(target.clone()), Box::new(curve), options)
    }

    pub fn play_from(
        &self,
        target: &TargetRef,
        path: &str,
        ease: Ease,
        start: impl Into<Value>,
        duration: f32,
        options: TweenOptions,
    ) -> Result<TweenHandle, TweenError> {
        let (host, accessor) = self.bind(target, path)?;
        let curve = MemberCurve::from(host.as_ref(), accessor, ease, start.into(), duration)?;
        self.start(Some(target.clone()), Box::new(curve), options)
    }

    pub fn play_by(
        &self,
        target: &TargetRef,
        path: &str,
        ease: Ease,
        amount: impl Into<Value>,
        duration: f32,
        options: TweenOptions,
    ) -> Result<TweenHandle, TweenError> {
        let (host, accessor) = self.bind(target, path)?;
        let curve = MemberCurve::by(host.as_ref(), accessor, ease, amount.into(), duration)?;
        self.start(Some(target.clone()), Box::new(curve), options)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn play_from_to(
        &self,
        target: &TargetRef,
        path: &str,
        ease: Ease,
        start: impl Into<Value>,
        end: impl Into<Value>,
        duration: f32,
        options: TweenOptions,
    ) -> Result<TweenHandle, TweenError> {
        let (_, accessor) = self.bind(target, path)?;
        let curve = MemberCurve::from_to(accessor, ease, start.into(), end.into(), duration)?;
        self.start(Some(target.clone()), Box::new(curve), options)
    }

    /// Continue a `start -> end` motion from wherever the member is now,
    /// over the remaining share of `duration`.
    #[allow(clippy::too_many_arguments)]
    pub fn play_redirect_to(
        &self,
        target: &TargetRef,
        path: &str,
        ease: Ease,
        start: impl Into<Value>,
        end: impl Into<Value>,
        duration: f32,
        options: TweenOptions,
    ) -> Result<TweenHandle, TweenError> {
        let (host, accessor) = self.bind(target, path)?;
        let curve = MemberCurve::redirect_to(
            host.as_ref(),
            accessor,
            ease,
            start.into(),
            end.into(),
            duration,
        )?;
        self.start(Some(target.clone()), Box::new(curve), options)
    }

    /// Play a caller-built curve against `target`.
    pub fn play_curve(
        &self,
        target: &TargetRef,
        curve: impl TweenCurve + 'static,
        options: TweenOptions,
    ) -> Result<TweenHandle, TweenError> {
        self.start(Some(target.clone()), Box::new(curve), options)
    }

    /// Play a target-less tween that reports eased progress to `callback`.
    pub fn play_callback(
        &self,
        identity: impl Into<TweenKey>,
        ease: Ease,
        duration: f32,
        mut options: TweenOptions,
        callback: impl FnMut(f32) + 'static,
    ) -> Result<TweenHandle, TweenError> {
        options.identity = Some(identity.into());
        let curve = CallbackCurve::new(ease, duration, callback);
        self.start(None, Box::new(curve), options)
    }

    /// Build an Idle tween without starting it.
    pub fn create(
        &self,
        target: Option<&TargetRef>,
        curve: Box<dyn TweenCurve>,
        options: TweenOptions,
    ) -> Result<TweenHandle, TweenError> {
        self.ensure_open()?;
        let id = self.shared.ids.borrow_mut().alloc_tween();
        let config = &self.shared.config;

        let identity = options
            .identity
            .or_else(|| target.map(|t| TweenKey::Target(t.key())));
        if let Some(identity) = &identity {
            identity.validate()?;
        }
        let auto_kill = if options.auto_kill || options.token.is_some() {
            let identity = identity
                .clone()
                .ok_or(TweenError::MissingIdentity { tween: id })?;
            Some(AutoKillKey::new(identity, options.token)?)
        } else {
            None
        };

        Ok(TweenHandle::new(TweenParts {
            id,
            target: target.cloned(),
            identity,
            auto_kill,
            phase: options.phase.unwrap_or(config.default_phase),
            wrap: options.wrap,
            repeat: options.repeat,
            delay: options.delay,
            speed: options.speed,
            time_source: options.time_source.unwrap_or(config.default_time_source),
            curve,
        }))
    }

    /// Start an Idle tween: displace the owner of its key (claiming the slot
    /// when opted in), then add it to the active set. Outside a tick it is primed at t=0 immediately.
    pub fn play(&self, tween: &TweenHandle) -> Result<(), TweenError> {
        self.ensure_open()?;
        tween.mark_playing()?;
        match (tween.auto_kill_key(), tween.identity()) {
            (Some(key), _) => self.claim(key.clone(), tween),
            // identified tweens displace the owner of their key without taking it
            (None, Some(identity)) => {
                let key = AutoKillKey {
                    identity: identity.clone(),
                    token: None,
                };
                self.displace(&key, tween);
            }
            (None, None) => {}
        }
        let outcome = self.shared.active.borrow_mut().add(tween.clone());
        if outcome == AddOutcome::Inserted {
            if let Err(err) = tween.scrub(0.0) {
                self.kill_tween(tween);
                return Err(err);
            }
        }
        Ok(())
    }

    fn start(
        &self,
        target: Option<TargetRef>,
        curve: Box<dyn TweenCurve>,
        options: TweenOptions,
    ) -> Result<TweenHandle, TweenError> {
        let tween = self.create(target.as_ref(), curve, options)?;
        self.play(&tween)?;
        Ok(tween)
    }

    fn bind(
        &self,
        target: &TargetRef,
        path: &str,
    ) -> Result<(Rc<dyn Tweenable>, Rc<dyn MemberAccessor>), TweenError> {
        self.ensure_open()?;
        let path = PropertyPath::parse(path)?;
        let host = target.upgrade().ok_or_else(|| TweenError::DeadTarget {
            path: path.to_string(),
        })?;
        let accessor = self.shared.resolver.resolve(host.as_ref(), &path)?;
        Ok((host, accessor))
    }

    /// Kill the slot's current owner, then install `tween`.
    fn claim(&self, key: AutoKillKey, tween: &TweenHandle) {
        self.displace(&key, tween);
        self.shared.auto_kill.borrow_mut().install(key, tween.clone());
    }

    fn displace(&self, key: &AutoKillKey, tween: &TweenHandle) {
        let displaced = self
            .shared
            .auto_kill
            .borrow()
            .owner(key)
            .filter(|owner| *owner != tween)
            .cloned();
        if let Some(old) = displaced {
            debug!("auto_kill: {} displaces {} on {}", tween.id(), old.id(), key);
            self.kill_tween(&old);
        }
    }

    fn prime(&self, tween: &TweenHandle) {
        if let Err(err) = tween.scrub(0.0) {
            self.discard(tween, &err);
        }
    }

    // ---------- ticking ----------

    /// Advance every playing tween registered for `phase`.
    pub fn tick(&self, phase: UpdatePhase, dt: f32) {
        if self.is_application_closing() {
            return;
        }
        let dt = self.shared.config.clamp_delta(dt);
        let scaled = dt * self.shared.time_scales.product();

        let _lock = self.lock();
        let mut index = 0;
        let mut advanced = 0usize;
        while let Some(tween) = self.tween_at(index) {
            index += 1;
            if tween.phase() != phase || !tween.is_playing() {
                continue;
            }
            advanced += 1;
            let step = match tween.time_source() {
                TimeSource::Scaled => scaled,
                TimeSource::Unscaled => dt,
            };
            match tween.update(step) {
                UpdateStatus::Running => {}
                UpdateStatus::Finished => {
                    self.retire(&tween);
                    tween.fire_complete();
                }
                UpdateStatus::TargetLost => {
                    self.discard(&tween, &TweenError::TargetLost { tween: tween.id() });
                }
                UpdateStatus::Failed(err) => self.discard(&tween, &err),
            }
        }
        trace!("tick: {phase:?} advanced {advanced} tweens");
    }

    /// Early then Late. Fixed is driven by the host's fixed-step loop.
    pub fn tick_frame(&self, dt: f32) {
        self.tick(UpdatePhase::Early, dt);
        self.tick(UpdatePhase::Late, dt);
    }

    // ---------- killing ----------

    /// Stop a live tween without completing it. False if it was not live.
    pub fn kill(&self, tween: &TweenHandle) -> bool {
        if self.is_application_closing() {
            return false;
        }
        self.kill_tween(tween)
    }

    pub fn kill_all(&self) -> usize {
        if self.is_application_closing() {
            return 0;
        }
        let tweens = self.shared.active.borrow().members();
        let mut killed = 0;
        for tween in &tweens {
            if tween.mark_killed() {
                killed += 1;
            }
            self.release_slot(tween);
        }
        self.shared.active.borrow_mut().clear();
        if killed > 0 {
            debug!("scheduler: killed all {killed} tweens");
        }
        killed
    }

    /// Kill every tween whose identity is `identity`, whatever its token.
    pub fn kill_all_with(&self, identity: impl Into<TweenKey>) -> Result<usize, TweenError> {
        let identity = identity.into();
        identity.validate()?;
        if self.is_application_closing() {
            return Ok(0);
        }
        let matching: Vec<TweenHandle> = self
            .shared
            .active
            .borrow()
            .members()
            .into_iter()
            .filter(|t| t.identity() == Some(&identity))
            .collect();
        Ok(matching.iter().filter(|t| self.kill_tween(t)).count())
    }

    /// Kill the owner of the (identity, token) slot, if any.
    pub fn kill_all_keyed(
        &self,
        identity: impl Into<TweenKey>,
        token: Option<TweenKey>,
    ) -> Result<bool, TweenError> {
        let key = AutoKillKey::new(identity.into(), token)?;
        if self.is_application_closing() {
            return Ok(false);
        }
        let owner = self.shared.auto_kill.borrow_mut().take(&key);
        Ok(owner.is_some_and(|owner| self.kill_tween(&owner)))
    }

    /// Kill every tween whose target died. Completion callbacks do not run.
    pub fn prune_dead_targets(&self) -> usize {
        if self.is_application_closing() {
            return 0;
        }
        let _lock = self.lock();
        let mut index = 0;
        let mut pruned = 0;
        while let Some(tween) = self.tween_at(index) {
            index += 1;
            if !tween.is_target_alive() && self.kill_tween(&tween) {
                pruned += 1;
            }
        }
        if pruned > 0 {
            debug!("prune: killed {pruned} tweens with dead targets");
        }
        pruned
    }

    pub fn on_world_reset(&self, reset: &WorldReset) -> usize {
        debug!("scheduler: world reset '{}'", reset.label);
        self.prune_dead_targets()
    }

    fn kill_tween(&self, tween: &TweenHandle) -> bool {
        if !tween.mark_killed() {
            return false;
        }
        self.release_slot(tween);
        self.remove(tween);
        true
    }

    /// Completed tweens leave the set and give up their slot.
    fn retire(&self, tween: &TweenHandle) {
        self.release_slot(tween);
        self.remove(tween);
    }

    fn discard(&self, tween: &TweenHandle, err: &TweenError) {
        match err {
            TweenError::TargetLost { .. } => debug!("tween: {} lost its target", tween.id()),
            _ => warn!("tween: {} removed after {} error: {err}", tween.id(), err.category()),
        }
        self.kill_tween(tween);
    }

    fn remove(&self, tween: &TweenHandle) {
        let outcome = self.shared.active.borrow_mut().remove(&tween.id());
        match outcome {
            RemoveOutcome::Removed(item) | RemoveOutcome::Cancelled(item) => {
                self.release_slot(&item)
            }
            RemoveOutcome::Staged | RemoveOutcome::NotPresent => {}
        }
    }

    fn release_slot(&self, tween: &TweenHandle) {
        if let Some(key) = tween.auto_kill_key() {
            self.shared.auto_kill.borrow_mut().release(key, tween);
        }
    }
}
