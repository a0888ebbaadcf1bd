//! Worker Pool Tests

use crate::common::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn workers_run_submitted_tasks() {
    init_tracing();
    let scheduler = Scheduler::new(SchedulerConfig {
        workers: 4,
        ..SchedulerConfig::default()
    })
    .unwrap();
    let done = Arc::new(AtomicUsize::new(0));

    for i in 0..100 {
        let done = Arc::clone(&done);
        scheduler
            .submit(format!("task {}", i), move || {
                done.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
    }
    scheduler.drain();

    assert_eq!(done.load(Ordering::SeqCst), 100);
    assert_eq!(scheduler.stats().tasks_completed, 100);
    scheduler.shutdown();
}

#[test]
fn panicking_continuation_faults_its_result() {
    let scheduler = Scheduler::new(SchedulerConfig {
        workers: 2,
        ..SchedulerConfig::default()
    })
    .unwrap();
    let result = scheduler.enqueue("explode", Value::Int(1), |_| panic!("boom"), None);
    scheduler.drain();

    assert!(matches!(
        result.error(),
        Some(Error::WrappedExternalFault { .. })
    ));

    // the pool survives the panic
    let ok = scheduler.enqueue("after", Value::Int(2), Ok, None);
    scheduler.drain();
    assert_eq!(ok.result(), Some(Value::Int(2)));
    scheduler.shutdown();
}

#[test]
fn submit_after_shutdown_is_rejected() {
    let scheduler = Scheduler::new(SchedulerConfig {
        workers: 1,
        ..SchedulerConfig::default()
    })
    .unwrap();
    scheduler.shutdown();
    assert!(scheduler.is_shut_down());
    assert!(scheduler.submit("late", || {}).is_err());

    let result = scheduler.enqueue("late", Value::Void, Ok, None);
    assert!(result.error().is_some());
}

#[test]
fn fault_handler_recovers() {
    let scheduler = Scheduler::inline();
    let target = Future::named("target");
    let result = scheduler.enqueue(
        "recover",
        Value::Future(target.clone()),
        |_| Ok(Value::from("unreachable")),
        Some(Box::new(|_| Ok(Value::from("recovered")))),
    );
    target.fault(Error::void_reference("missing"));
    scheduler.drain();
    assert_eq!(result.result(), Some(Value::from("recovered")));
    assert_eq!(
        scheduler.stats().tasks_completed,
        1,
        "only the fault handler ran"
    );
}
