//! Suspend/Resume Tests
//!
//! While suspended, continuations are parked instead of run. Resuming
//! replays them most recent first.

use crate::common::*;
use parking_lot::Mutex;
use std::sync::Arc;

fn recorder(scheduler: &Scheduler, log: &Arc<Mutex<Vec<String>>>, name: &str) {
    let log = Arc::clone(log);
    let entry = name.to_string();
    scheduler
        .submit(name, move || log.lock().push(entry))
        .unwrap();
}

#[test]
fn buffered_tasks_replay_lifo() {
    let scheduler = Scheduler::inline();
    let log = Arc::new(Mutex::new(Vec::new()));

    scheduler.suspend();
    for name in ["a", "b", "c"] {
        recorder(&scheduler, &log, name);
    }
    scheduler.drain();
    assert!(log.lock().is_empty());
    assert_eq!(scheduler.buffered_task_names(), vec!["a", "b", "c"]);

    scheduler.resume();
    assert_eq!(*log.lock(), vec!["c", "b", "a"]);
    assert_eq!(scheduler.stats().buffered, 0);
}

#[test]
fn stepping_one_task_at_a_time() {
    let scheduler = Scheduler::inline();
    let log = Arc::new(Mutex::new(Vec::new()));

    scheduler.suspend();
    for name in ["first", "second"] {
        recorder(&scheduler, &log, name);
    }

    assert!(scheduler.resume_n(1));
    assert_eq!(*log.lock(), vec!["second"]);
    assert!(scheduler.is_suspended());
    assert_eq!(scheduler.buffered_task_names(), vec!["first"]);

    scheduler.resume();
    assert_eq!(*log.lock(), vec!["second", "first"]);
}

#[test]
fn deferred_operation_parks_until_resume() {
    let rt = inline_runtime();
    let x = Future::named("x");
    let out = vireo_engine::binary(
        &rt,
        vireo_engine::BinaryOp::Add,
        Value::Future(x.clone()),
        Value::Int(1),
    )
    .unwrap();
    let result = out.as_future().cloned().unwrap();

    rt.scheduler().suspend();
    x.success(Value::Int(41));
    rt.drain();
    assert!(!result.is_completed());
    assert_eq!(rt.scheduler().buffered_task_names(), vec!["add"]);

    rt.scheduler().resume();
    rt.drain();
    assert_eq!(result.result(), Some(Value::Int(42)));
}

#[test]
fn resume_when_running_is_noop() {
    let scheduler = Scheduler::inline();
    assert!(!scheduler.resume());
    assert!(!scheduler.resume_n(3));
    assert!(scheduler.suspend());
    assert!(!scheduler.suspend());
}
