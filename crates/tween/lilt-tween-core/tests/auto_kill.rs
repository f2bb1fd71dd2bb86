mod common;

use common::{counter, node};
use lilt_tween_core::{Ease, Scheduler, TweenKey, TweenOptions, TweenState, UpdatePhase, Value};

/// it should keep at most one owner per (identity, token) and kill the prior one
#[test]
fn second_tween_on_same_slot_kills_the_first() {
    let sched = Scheduler::default();
    let (n, target) = node(0.0);
    let (fired, bump) = counter();

    let first = sched
        .play_to(&target, "x", Ease::linear(), 10.0, 1.0, TweenOptions::default().token("x"))
        .unwrap();
    first.on_complete(move |_| bump());
    sched.tick(UpdatePhase::Early, 0.5);
    assert_eq!(n.x.get(), 5.0);

    let second = sched
        .play_to(&target, "x", Ease::linear(), 0.0, 1.0, TweenOptions::default().token("x"))
        .unwrap();
    assert_eq!(first.state(), TweenState::Killed);
    assert!(!sched.is_running(&first));
    assert_eq!(
        sched.auto_kill_owner(target.key(), Some("x".into())).unwrap(),
        Some(second.clone())
    );

    sched.tick(UpdatePhase::Early, 1.0);
    assert_eq!(n.x.get(), 0.0);
    assert_eq!(fired.get(), 0);
    assert_eq!(second.state(), TweenState::Completed);
}

/// it should keep tweens with different tokens on the same target independent
#[test]
fn tokens_partition_slots() {
    let sched = Scheduler::default();
    let (n, target) = node(0.0);

    let x = sched
        .play_to(&target, "x", Ease::linear(), 1.0, 1.0, TweenOptions::default().token("x"))
        .unwrap();
    let pos = sched
        .play_to(
            &target,
            "pos",
            Ease::linear(),
            Value::vec3(1.0, 1.0, 1.0),
            1.0,
            TweenOptions::default().token("pos"),
        )
        .unwrap();
    assert!(x.is_playing());
    assert!(pos.is_playing());
    assert_eq!(sched.running_count(), 2);

    sched.tick(UpdatePhase::Early, 1.0);
    assert_eq!(n.x.get(), 1.0);
    assert_eq!(n.pos.get(), [1.0, 1.0, 1.0]);
}

/// it should let plain tweens stack while none of them owns the slot
#[test]
fn untokened_tweens_stack() {
    let sched = Scheduler::default();
    let (_n, target) = node(0.0);
    let a = sched
        .play_to(&target, "x", Ease::linear(), 1.0, 1.0, TweenOptions::default())
        .unwrap();
    let b = sched
        .play_to(&target, "x", Ease::linear(), 2.0, 1.0, TweenOptions::default())
        .unwrap();
    assert!(a.is_playing() && b.is_playing());
    assert!(!sched.is_active_auto_kill(target.key(), None).unwrap());
}

/// it should kill the registered owner when a plain tween with the same identity plays
#[test]
fn plain_tween_displaces_registered_owner() {
    let sched = Scheduler::default();
    let (_n, target) = node(0.0);
    let owner = sched
        .play_to(&target, "x", Ease::linear(), 1.0, 1.0, TweenOptions::default().auto_kill())
        .unwrap();
    assert!(sched.is_active_auto_kill(target.key(), None).unwrap());

    let plain = sched
        .play_to(&target, "x", Ease::linear(), 2.0, 1.0, TweenOptions::default())
        .unwrap();
    assert_eq!(owner.state(), TweenState::Killed);
    assert!(plain.is_playing());
    assert_eq!(plain.identity(), owner.identity());
    assert!(!sched.is_active_auto_kill(target.key(), None).unwrap());
    assert_eq!(sched.running_count(), 1);
}

/// it should leave owners under other tokens alone when a plain tween plays
#[test]
fn plain_tween_spares_tokened_slots() {
    let sched = Scheduler::default();
    let (_n, target) = node(0.0);
    let tokened = sched
        .play_to(&target, "x", Ease::linear(), 1.0, 1.0, TweenOptions::default().token("x"))
        .unwrap();
    sched
        .play_to(&target, "x", Ease::linear(), 2.0, 1.0, TweenOptions::default())
        .unwrap();
    assert!(tokened.is_playing());
}

/// it should dedupe across targets that share an explicit identity
#[test]
fn explicit_identity_spans_targets() {
    let sched = Scheduler::default();
    let (_a, ta) = node(0.0);
    let (_b, tb) = node(0.0);
    let opts = TweenOptions::default().identity("door").auto_kill();

    let first = sched
        .play_to(&ta, "x", Ease::linear(), 1.0, 1.0, opts.clone())
        .unwrap();
    let second = sched.play_to(&tb, "x", Ease::linear(), 1.0, 1.0, opts).unwrap();
    assert!(first.is_killed());
    assert!(second.is_playing());
    assert!(sched.is_active_auto_kill("door", None).unwrap());
}

/// it should release the slot on completion and on kill
#[test]
fn slot_released_when_owner_leaves() {
    let sched = Scheduler::default();
    let (_n, target) = node(0.0);
    let opts = TweenOptions::default().token("x");

    let h = sched
        .play_to(&target, "x", Ease::linear(), 1.0, 0.5, opts.clone())
        .unwrap();
    assert!(sched.is_active_auto_kill(target.key(), Some("x".into())).unwrap());
    sched.tick(UpdatePhase::Early, 1.0);
    assert!(h.is_complete());
    assert!(!sched.is_active_auto_kill(target.key(), Some("x".into())).unwrap());

    let h = sched
        .play_to(&target, "x", Ease::linear(), 1.0, 0.5, opts)
        .unwrap();
    assert!(sched.kill(&h));
    assert!(!sched.kill(&h));
    assert!(!sched.is_active_auto_kill(target.key(), Some("x".into())).unwrap());
}

/// it should hide a paused owner from slot queries and report it again on resume
#[test]
fn paused_owner_is_not_discoverable() {
    let sched = Scheduler::default();
    let (n, target) = node(0.0);
    let h = sched
        .play_to(&target, "x", Ease::linear(), 10.0, 1.0, TweenOptions::default().token("x"))
        .unwrap();
    sched.tick(UpdatePhase::Early, 0.25);
    let held = n.x.get();
    assert_eq!(held, 2.5);
    assert!(h.pause());
    sched.tick(UpdatePhase::Early, 0.25);
    assert_eq!(n.x.get(), held);
    assert!(!sched.is_active_auto_kill(target.key(), Some("x".into())).unwrap());
    assert_eq!(sched.auto_kill_owner(target.key(), Some("x".into())).unwrap(), None);
    assert!(sched.is_running(&h));

    assert!(h.resume());
    assert!(sched.is_active_auto_kill(target.key(), Some("x".into())).unwrap());
    sched.tick(UpdatePhase::Early, 0.75);
    assert!(h.is_complete());
    assert_eq!(n.x.get(), 10.0);
}

/// it should kill exactly the keyed owner and every tween of an identity
#[test]
fn keyed_and_identity_bulk_kills() {
    let sched = Scheduler::default();
    let (_n, target) = node(0.0);
    let (_other, other_target) = node(0.0);

    let x = sched
        .play_to(&target, "x", Ease::linear(), 1.0, 1.0, TweenOptions::default().token("x"))
        .unwrap();
    let pos = sched
        .play_to(
            &target,
            "pos",
            Ease::linear(),
            Value::vec3(1.0, 0.0, 0.0),
            1.0,
            TweenOptions::default().token("pos"),
        )
        .unwrap();
    let plain = sched
        .play_to(&target, "x", Ease::linear(), 2.0, 1.0, TweenOptions::default())
        .unwrap();
    let elsewhere = sched
        .play_to(&other_target, "x", Ease::linear(), 2.0, 1.0, TweenOptions::default())
        .unwrap();

    assert!(sched.kill_all_keyed(target.key(), Some("x".into())).unwrap());
    assert!(!sched.kill_all_keyed(target.key(), Some("x".into())).unwrap());
    assert!(x.is_killed());
    assert!(pos.is_playing());

    assert_eq!(sched.kill_all_with(target.key()).unwrap(), 2);
    assert!(pos.is_killed() && plain.is_killed());
    assert!(elsewhere.is_playing());
    assert_eq!(sched.running_count(), 1);

    assert!(sched.kill_all_with(TweenKey::name("")).is_err());
}

/// it should kill everything, including staged adds, in one call
#[test]
fn kill_all_clears_set_and_index() {
    let sched = Scheduler::default();
    let (_n, target) = node(0.0);
    let a = sched
        .play_to(&target, "x", Ease::linear(), 1.0, 1.0, TweenOptions::default().token("x"))
        .unwrap();

    let staged = {
        let _lock = sched.lock();
        let staged = sched
            .play_to(
                &target,
                "pos",
                Ease::linear(),
                Value::vec3(1.0, 1.0, 1.0),
                1.0,
                TweenOptions::default(),
            )
            .unwrap();
        assert_eq!(sched.kill_all(), 2);
        staged
    };
    assert!(a.is_killed() && staged.is_killed());
    assert_eq!(sched.running_count(), 0);
    assert!(!sched.is_active_auto_kill(target.key(), Some("x".into())).unwrap());
}

/// it should still displace a paused owner when a new tween claims its slot
#[test]
fn claim_kills_paused_owner() {
    let sched = Scheduler::default();
    let (_n, target) = node(0.0);
    let opts = TweenOptions::default().token("x");
    let paused = sched
        .play_to(&target, "x", Ease::linear(), 1.0, 1.0, opts.clone())
        .unwrap();
    paused.pause();
    let next = sched
        .play_to(&target, "x", Ease::linear(), 2.0, 1.0, opts)
        .unwrap();
    assert!(paused.is_killed());
    assert_eq!(
        sched.auto_kill_owner(target.key(), Some("x".into())).unwrap(),
        Some(next)
    );
}
