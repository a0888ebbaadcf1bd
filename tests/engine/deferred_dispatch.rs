//! Deferred Dispatch Tests
//!
//! An operation over a pending operand returns a future immediately and
//! runs once the operand resolves.

use crate::common::*;
use vireo_engine::{bind, binary, get_member, invoke, set_index, BinaryOp};

#[test]
fn deferred_add_delivers_five() {
    let rt = inline_runtime();
    let left = Future::named("left");
    let out = binary(&rt, BinaryOp::Add, Value::Future(left.clone()), Value::Int(3)).unwrap();

    let delivered = counter();
    let seen = std::sync::Arc::new(parking_lot::Mutex::new(None));
    let (d, s) = (std::sync::Arc::clone(&delivered), std::sync::Arc::clone(&seen));
    out.as_future().unwrap().on_success(move |v| {
        *d.lock() += 1;
        *s.lock() = Some(v.clone());
    });

    left.success(Value::Int(2));
    rt.drain();

    assert_eq!(*delivered.lock(), 1);
    assert_eq!(*seen.lock(), Some(Value::Int(5)));
}

#[test]
fn pipelines_compose_without_callbacks() {
    let rt = inline_runtime();
    let record = Future::named("record");

    let x = get_member(&rt, Value::Future(record.clone()), "x").unwrap();
    let doubled = binary(&rt, BinaryOp::Mul, x, Value::Int(2)).unwrap();
    let total = invoke(&rt, sum(), vec![doubled, Value::Int(1)]).unwrap();
    assert!(total.is_pending());

    record.success(Value::Record(Record::named([("x", Value::Int(10))])));
    rt.drain();
    assert_eq!(resolved(&total), Value::Int(21));
}

#[test]
fn failure_short_circuits_pipeline() {
    let rt = inline_runtime();
    let record = Future::named("record");
    let x = get_member(&rt, Value::Future(record.clone()), "x").unwrap();
    let doubled = binary(&rt, BinaryOp::Mul, x, Value::Int(2)).unwrap();

    record.success(Value::Record(Record::new()));
    rt.drain();
    assert!(matches!(
        doubled.as_future().unwrap().error(),
        Some(Error::VoidReference { .. })
    ));
}

#[test]
fn deferred_binding_against_pending_contract() {
    let rt = inline_runtime();
    let contract = Future::named("contract");
    let out = bind(&rt, Value::Int(3), Value::Future(contract.clone())).unwrap();

    contract.success(Value::Contract(Contract::float()));
    rt.drain();
    assert_eq!(resolved(&out), Value::Float(3.0));
}

#[test]
fn set_index_on_pending_vector() {
    let rt = inline_runtime();
    let v = Future::named("v");
    let out = set_index(&rt, Value::Future(v.clone()), Value::Int(0), Value::Int(9)).unwrap();
    v.success(Value::Vector(vec![Value::Int(1), Value::Int(2)]));
    rt.drain();
    assert_eq!(resolved(&out), Value::Vector(vec![Value::Int(9), Value::Int(2)]));
}

#[test]
fn worker_runtime_resolves_deferred_operations() {
    let rt = worker_runtime(2);
    let left = Future::named("left");
    let out = binary(&rt, BinaryOp::Add, Value::Future(left.clone()), Value::Int(3)).unwrap();
    left.success(Value::Int(2));
    let value = futures::executor::block_on(out.as_future().unwrap().wait()).unwrap();
    assert_eq!(value, Value::Int(5));
    rt.shutdown();
}
