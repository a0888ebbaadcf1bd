//! Shared test utilities for all integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from any test's
//! main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use proptest::prelude::*;
use std::sync::{Arc, Once};
pub use vireo_concurrency::{Scheduler, SchedulerConfig};
pub use vireo_core::{
    relationship, Callable, Contract, Error, Future, Record, Relationship, Result, Signature,
    Value,
};
pub use vireo_engine::{Runtime, RuntimeConfig};

// ============================================================================
// Initialization
// ============================================================================

static INIT_TRACING: Once = Once::new();

/// Route `tracing` output to the test harness. Set `RUST_LOG` to see it.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Runtime backed by `workers` threads.
pub fn worker_runtime(workers: usize) -> Runtime {
    init_tracing();
    Runtime::with_config(RuntimeConfig {
        workers,
        ..RuntimeConfig::default()
    })
    .expect("worker runtime")
}

/// Inline runtime; queued work runs on `drain`.
pub fn inline_runtime() -> Runtime {
    init_tracing();
    Runtime::new()
}

// ============================================================================
// Callables
// ============================================================================

/// Integer callable of the given arity.
pub fn int_fn(name: &str, arity: usize, f: fn(&[i64]) -> i64) -> Value {
    Value::Callable(Callable::new(
        name,
        Signature::new(vec![Contract::integer(); arity]),
        move |args| {
            let ints: Vec<i64> = args.iter().map(|a| a.as_int().unwrap_or(0)).collect();
            Ok(Value::Int(f(&ints)))
        },
    ))
}

/// Two-argument integer addition.
pub fn sum() -> Value {
    int_fn("sum", 2, |a| a[0] + a[1])
}

/// Repeat body that emits `1..=n` and breaks on the last one.
pub fn count_to(n: i64) -> Value {
    Value::Callable(Callable::new(
        "count",
        Signature::new(vec![Contract::any()]),
        move |args| {
            let control = args[0].as_record().cloned().unwrap_or_default();
            let index = control.get("index").and_then(Value::as_int).unwrap_or(0);
            let member = if index + 1 < n { "continue" } else { "break" };
            match control.get(member).and_then(Value::as_callable) {
                Some(f) => f.call(vec![Value::Int(index + 1)]),
                None => Err(Error::void_reference(member)),
            }
        },
    ))
}

/// Completed future's value, panicking with context otherwise.
pub fn resolved(value: &Value) -> Value {
    match value {
        Value::Future(f) => f
            .result()
            .unwrap_or_else(|| panic!("expected completed future, got {:?}", f)),
        other => other.clone(),
    }
}

// ============================================================================
// Contract strategies
// ============================================================================

fn arb_primitive() -> impl Strategy<Value = Contract> {
    prop_oneof![
        Just(Contract::any()),
        Just(Contract::void()),
        Just(Contract::boolean()),
        Just(Contract::integer()),
        Just(Contract::float()),
        Just(Contract::string()),
        Just(Contract::contract()),
    ]
}

/// Arbitrary contracts of every variant, a few levels deep.
pub fn arb_contract() -> impl Strategy<Value = Contract> {
    arb_primitive().prop_recursive(3, 24, 3, |inner| {
        prop_oneof![
            (inner.clone(), 0usize..4).prop_map(|(e, n)| Contract::vector(e, n)),
            prop::collection::vec(inner.clone(), 0..3).prop_map(Contract::signature),
            prop::collection::vec((prop::option::of("[a-c]"), inner.clone()), 0..3).prop_map(
                |fields| {
                    Contract::Record(
                        fields
                            .into_iter()
                            .map(|(name, contract)| vireo_core::Field { name, contract })
                            .collect(),
                    )
                }
            ),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Contract::union(a, b)),
            inner.prop_map(Contract::complement),
        ]
    })
}

/// Shared counter for callback assertions.
pub fn counter() -> Arc<parking_lot::Mutex<usize>> {
    Arc::new(parking_lot::Mutex::new(0))
}
