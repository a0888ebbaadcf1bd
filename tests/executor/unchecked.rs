//! Unchecked Evaluation Tests
//!
//! Unchecked mode replaces binding failures and void references with void,
//! whether they happen now or arrive later on a deferred result.

use crate::common::*;
use vireo::{BinaryOp, EvalMode, Executor, Expr, UnaryOp};

fn unchecked_executor(rt: Runtime) -> Executor {
    Executor::with_mode(rt, EvalMode::Unchecked)
}

#[test]
fn synchronous_binding_failure_is_void() {
    let executor = unchecked_executor(inline_runtime());
    let expr = Expr::binary(BinaryOp::Add, Expr::literal(1), Expr::literal("x"));
    assert_eq!(executor.eval_value(&expr), Ok(Value::Void));
}

#[test]
fn void_flows_into_enclosing_operation() {
    let executor = unchecked_executor(inline_runtime());
    let missing = Expr::member(Expr::literal(Record::new()), "x");
    let expr = Expr::binary(BinaryOp::Add, Expr::literal(4), missing);
    assert_eq!(executor.eval_value(&expr), Ok(Value::Int(4)));
}

#[test]
fn deferred_void_reference_is_void() {
    let rt = inline_runtime();
    let executor = unchecked_executor(rt.clone());
    let record = Future::named("record");
    let out = executor.eval(&Expr::member(
        Expr::literal(Value::Future(record.clone())),
        "missing",
    ));

    record.success(Value::Record(Record::new()));
    rt.drain();
    assert_eq!(out.result(), Some(Value::Void));
}

#[test]
fn other_faults_still_surface() {
    let rt = inline_runtime();
    let executor = unchecked_executor(rt.clone());
    let x = Future::named("x");
    let out = executor.eval(&Expr::binary(
        BinaryOp::Div,
        Expr::literal(Value::Future(x.clone())),
        Expr::literal(0),
    ));

    x.success(Value::Int(1));
    rt.drain();
    assert!(matches!(out.error(), Some(Error::WrappedExternalFault { .. })));
}

#[test]
fn config_selects_default_mode() {
    let rt = Runtime::with_config(RuntimeConfig {
        checked: false,
        ..RuntimeConfig::default()
    })
    .unwrap();
    let executor = Executor::new(rt);
    assert_eq!(executor.mode(), EvalMode::Unchecked);
    let expr = Expr::index(Expr::literal(Value::Vector(vec![])), Expr::literal(0));
    assert_eq!(executor.eval_value(&expr), Ok(Value::Void));
}

#[test]
fn checked_region_is_not_suppressed_by_enclosing_mode() {
    let executor = unchecked_executor(inline_runtime());
    let missing = || Expr::checked(Expr::member(Expr::literal(Record::new()), "x"));

    let direct = executor.eval_value(&missing());
    assert!(matches!(direct, Err(Error::VoidReference { .. })));

    let under_unary = Expr::unary(UnaryOp::Neg, missing());
    let under_binary = Expr::binary(BinaryOp::Add, Expr::literal(4), missing());
    assert!(matches!(
        executor.eval_value(&under_unary),
        Err(Error::VoidReference { .. })
    ));
    assert!(matches!(
        executor.eval_value(&under_binary),
        Err(Error::VoidReference { .. })
    ));
}

#[test]
fn child_faults_are_filtered_alike_under_every_parent() {
    let executor = unchecked_executor(inline_runtime());
    let bad = || Expr::binary(BinaryOp::Add, Expr::literal("s"), Expr::literal(1));

    // the child's own binding failure becomes void before the parent runs
    let under_unary = Expr::unary(UnaryOp::Neg, bad());
    let under_binary = Expr::binary(BinaryOp::Mul, bad(), Expr::literal(3));
    assert_eq!(executor.eval_value(&under_unary), Ok(Value::Void));
    assert_eq!(executor.eval_value(&under_binary), Ok(Value::Void));
}

#[test]
fn user_primitives_stay_distinct_across_runtimes() {
    let first = inline_runtime();
    let second = inline_runtime();
    let meters = Contract::Primitive(first.registry().define("meters", None).unwrap());
    let seconds = Contract::Primitive(second.registry().define("seconds", None).unwrap());
    assert_eq!(relationship(&meters, &seconds), Relationship::Unrelated);

    let executor = Executor::new(first);
    let same = Expr::binary(
        BinaryOp::Eq,
        Expr::literal(Value::Contract(meters)),
        Expr::literal(Value::Contract(seconds)),
    );
    assert_eq!(executor.eval_value(&same), Ok(Value::Bool(false)));
}
