mod common;

use approx::assert_relative_eq;
use common::node;
use lilt_tween_core::{
    Ease, Scheduler, SchedulerConfig, TargetRef, TimeSource, TweenOptions, UpdatePhase,
    DEFAULT_TIME_SCALE_ID,
};

/// it should slow scaled tweens and leave unscaled ones on real time
#[test]
fn scales_apply_to_scaled_tweens_only() {
    let sched = Scheduler::default();
    let (a, ta) = node(0.0);
    let (b, tb) = node(0.0);
    sched
        .play_to(&ta, "x", Ease::linear(), 1.0, 1.0, TweenOptions::default())
        .unwrap();
    sched
        .play_to(&tb, "x", Ease::linear(), 1.0, 1.0, TweenOptions::default().unscaled())
        .unwrap();

    let scales = sched.time_scales();
    scales.set(DEFAULT_TIME_SCALE_ID, 0.5);
    scales.set("ui", 0.5);
    sched.tick(UpdatePhase::Early, 0.5);
    assert_relative_eq!(a.x.get(), 0.125);
    assert_relative_eq!(b.x.get(), 0.5);
}

/// it should animate a named time scale like any other float member
#[test]
fn tween_a_time_scale() {
    let sched = Scheduler::default();
    let scales = sched.time_scales();
    let target = TargetRef::new(&scales);
    let ramp = sched
        .play_to(
            &target,
            "scale(slowmo)",
            Ease::linear(),
            0.0,
            1.0,
            TweenOptions::default().unscaled().token("slowmo"),
        )
        .unwrap();
    assert_eq!(scales.get("slowmo"), 1.0);

    sched.tick(UpdatePhase::Early, 0.5);
    assert_relative_eq!(scales.get("slowmo"), 0.5);
    sched.tick(UpdatePhase::Early, 0.5);
    assert!(ramp.is_complete());
    assert_eq!(scales.product(), 0.0);
}

/// it should continue an interrupted move over the remaining share of the duration
#[test]
fn redirect_resumes_from_current_value() {
    let sched = Scheduler::default();
    let (n, target) = node(0.0);
    let opts = TweenOptions::default().token("x");
    sched
        .play_from_to(&target, "x", Ease::linear(), 0.0, 10.0, 2.0, opts.clone())
        .unwrap();
    sched.tick(UpdatePhase::Early, 0.5);
    assert_relative_eq!(n.x.get(), 2.5);

    let back = sched
        .play_redirect_to(&target, "x", Ease::linear(), 10.0, 0.0, 2.0, opts)
        .unwrap();
    assert_relative_eq!(back.duration(), 0.5);
    sched.tick(UpdatePhase::Early, 0.5);
    assert!(back.is_complete());
    assert_relative_eq!(n.x.get(), 0.0);
}

/// it should add an amount on top of the current value
#[test]
fn play_by_is_relative() {
    let sched = Scheduler::default();
    let (n, target) = node(3.0);
    sched
        .play_by(&target, "x", Ease::linear(), 2.0, 1.0, TweenOptions::default())
        .unwrap();
    sched.tick(UpdatePhase::Early, 1.0);
    assert_relative_eq!(n.x.get(), 5.0);
}

/// it should clamp oversized deltas and use configured defaults
#[test]
fn config_drives_defaults_and_clamp() {
    let cfg = SchedulerConfig::from_json_str(
        r#"{ "default_phase": "Fixed", "default_time_source": "Unscaled", "max_delta": 0.1 }"#,
    )
    .unwrap();
    let sched = Scheduler::new(cfg);
    let (n, target) = node(0.0);
    let h = sched
        .play_to(&target, "x", Ease::linear(), 1.0, 1.0, TweenOptions::default())
        .unwrap();
    assert_eq!(h.phase(), UpdatePhase::Fixed);
    assert_eq!(h.time_source(), TimeSource::Unscaled);

    sched.time_scales().set(DEFAULT_TIME_SCALE_ID, 0.0);
    sched.tick(UpdatePhase::Fixed, 5.0);
    assert_relative_eq!(n.x.get(), 0.1);
}
