//! Lilt Tween Core (host-agnostic)
//!
//! A single-threaded tween scheduler. Tweens interpolate one member of a host
//! object (or call a closure) over time; the scheduler keeps them in a
//! reentrant active set, deduplicates them per (identity, token) through an
//! auto-kill index and advances them in Early / Fixed / Late tick phases.

pub mod accessor;
pub mod active_set;
pub mod auto_kill;
pub mod config;
pub mod curve;
pub mod ease;
pub mod error;
pub mod ids;
pub mod key;
pub mod options;
pub mod scheduler;
pub mod target;
pub mod time_scale;
pub mod tween;

// Re-exports for hosts
pub use accessor::{
    AccessorResolver, MemberAccessor, PropertyAccessor, PropertyResolver, ResolverRegistry,
};
pub use active_set::{ActiveSet, AddOutcome, Flush, RemoveOutcome, SetMember};
pub use auto_kill::AutoKillIndex;
pub use config::SchedulerConfig;
pub use curve::{CallbackCurve, MemberCurve, TweenCurve};
pub use ease::Ease;
pub use error::TweenError;
pub use ids::TweenId;
pub use key::{AutoKillKey, TargetKey, TweenKey};
pub use options::{TimeSource, TweenOptions, UpdatePhase, WrapMode};
pub use scheduler::{LockGuard, Scheduler, WeakScheduler, WorldReset};
pub use target::{TargetRef, Tweenable};
pub use time_scale::{TimeScales, DEFAULT_TIME_SCALE_ID};
pub use tween::{TweenHandle, TweenState, UpdateStatus};
pub use lilt_api_core::{PropertyPath, Value, ValueKind};
