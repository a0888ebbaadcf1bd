//! Repeat Tests
//!
//! The iteration state machine end to end.

use crate::common::*;
use vireo_engine::{repeat, Iteration, IterationState};

#[test]
fn emits_sequence_without_aggregator() {
    let rt = inline_runtime();
    let out = repeat(&rt, count_to(3), None).unwrap();
    rt.drain();
    assert_eq!(
        resolved(&out),
        Value::Vector(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
    );
}

#[test]
fn folds_with_sum_aggregator() {
    let rt = inline_runtime();
    let out = repeat(&rt, count_to(3), Some(sum())).unwrap();
    rt.drain();
    assert_eq!(resolved(&out), Value::Int(6));
}

#[test]
fn long_repeat_does_not_grow_the_stack() {
    let rt = inline_runtime();
    let out = repeat(&rt, count_to(10_000), Some(sum())).unwrap();
    rt.drain();
    assert_eq!(resolved(&out), Value::Int(10_000 * 10_001 / 2));
}

#[test]
fn repeat_on_worker_runtime() {
    let rt = worker_runtime(2);
    let out = repeat(&rt, count_to(5), None).unwrap();
    let value = futures::executor::block_on(out.as_future().unwrap().wait()).unwrap();
    assert_eq!(value.as_vector().map(|v| v.len()), Some(5));
    rt.shutdown();
}

#[test]
fn explicit_transitions() {
    let rt = inline_runtime();
    let it = Iteration::start(&rt, Value::Void, None);
    assert_eq!(it.state(), IterationState::Running);
    assert!(it.continue_with(Value::Int(1)));
    assert!(it.continue_with(Value::Void));
    assert_eq!(it.index(), 2);
    assert!(it.break_with(Value::Int(2)));
    assert_eq!(it.state(), IterationState::Finished);
    assert_eq!(
        it.result().result(),
        Some(Value::Vector(vec![Value::Int(1), Value::Int(2)]))
    );
}
