//! Future Lifecycle Tests
//!
//! A future completes at most once; subscribers see exactly one outcome.

use crate::common::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn second_completion_is_dropped() {
    let f = Future::named("once");
    assert!(f.success(Value::Int(1)));
    assert!(!f.success(Value::Int(2)));
    assert!(!f.fault(Error::external("late")));
    assert_eq!(f.result(), Some(Value::Int(1)));
    assert_eq!(f.error(), None);
}

#[test]
fn fault_then_success_keeps_fault() {
    let f = Future::new();
    assert!(f.fault(Error::void_reference("gone")));
    assert!(!f.success(Value::Int(1)));
    assert_eq!(f.error(), Some(Error::void_reference("gone")));
}

#[test]
fn only_matching_subscribers_run() {
    let f = Future::new();
    let successes = counter();
    let errors = counter();
    let s = Arc::clone(&successes);
    let e = Arc::clone(&errors);
    f.on_success(move |_| *s.lock() += 1);
    f.on_error(move |_| *e.lock() += 1);

    f.success(Value::Int(1));
    f.fault(Error::external("ignored"));

    assert_eq!(*successes.lock(), 1);
    assert_eq!(*errors.lock(), 0);
}

#[test]
fn late_subscriber_runs_immediately() {
    let f = Future::resolved(Value::from("done"));
    let seen = Arc::new(parking_lot::Mutex::new(None));
    let s = Arc::clone(&seen);
    f.on_success(move |v| *s.lock() = Some(v.clone()));
    assert_eq!(*seen.lock(), Some(Value::from("done")));
}

#[test]
fn racing_writers_single_winner() {
    for _ in 0..50 {
        let f = Future::named("race");
        let runs = Arc::new(AtomicUsize::new(0));
        let r = Arc::clone(&runs);
        f.on_success(move |_| {
            r.fetch_add(1, Ordering::SeqCst);
        });

        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let f = f.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    f.success(Value::Int(i))
                })
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(wins, 1);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }
}

#[test]
fn contract_is_applied_on_completion() {
    let f = Future::new();
    f.set_contract(Contract::integer()).unwrap();
    f.success(Value::Float(2.0));
    assert_eq!(f.result(), Some(Value::Int(2)));

    let g = Future::new();
    g.set_contract(Contract::integer()).unwrap();
    g.success(Value::from("nope"));
    assert!(matches!(g.error(), Some(Error::BindingFailure { .. })));
}

#[test]
fn contract_narrows_but_never_widens() {
    let f = Future::new();
    f.set_contract(Contract::float()).unwrap();
    f.set_contract(Contract::integer()).unwrap();
    assert_eq!(f.contract(), Some(Contract::integer()));
    f.set_contract(Contract::float()).unwrap();
    assert_eq!(f.contract(), Some(Contract::integer()));
    assert!(f.set_contract(Contract::string()).is_err());
}

#[test]
fn route_forwards_outcome() {
    let source = Future::new();
    let target = Future::new();
    source.route(&target);
    source.fault(Error::arity(1, 0));
    assert_eq!(target.error(), Some(Error::arity(1, 0)));
}

#[test]
fn wait_from_another_thread() {
    let f = Future::named("waited");
    let producer = f.clone();
    let handle = thread::spawn(move || {
        producer.success(Value::Int(7));
    });
    let value = futures::executor::block_on(f.wait()).unwrap();
    handle.join().unwrap();
    assert_eq!(value, Value::Int(7));
}
