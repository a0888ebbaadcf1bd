//! End-to-End Evaluation Tests

use crate::common::*;
use vireo::{BinaryOp, Executor, Expr, UnaryOp};

#[test]
fn arithmetic_over_pending_literal() {
    let rt = inline_runtime();
    let executor = Executor::new(rt.clone());
    let x = Future::named("x");

    let expr = Expr::binary(
        BinaryOp::Add,
        Expr::literal(Value::Future(x.clone())),
        Expr::literal(3),
    );
    let out = executor.eval(&expr);
    assert!(!out.is_completed());

    x.success(Value::Int(2));
    rt.drain();
    assert_eq!(out.result(), Some(Value::Int(5)));
}

#[test]
fn record_update_and_read() {
    let executor = Executor::new(inline_runtime());
    let point = Expr::literal(Record::named([("x", Value::Int(1)), ("y", Value::Int(2))]));
    let expr = Expr::member(
        Expr::set_member(point, "x", Expr::literal(Value::Float(5.0))),
        "x",
    );
    assert_eq!(executor.eval_value(&expr), Ok(Value::Int(5)));
}

#[test]
fn bind_through_expression() {
    let executor = Executor::new(inline_runtime());
    let expr = Expr::bind(
        Expr::literal(Value::Float(2.0)),
        Expr::literal(Contract::integer()),
    );
    assert_eq!(executor.eval_value(&expr), Ok(Value::Int(2)));
}

#[test]
fn repeat_through_expression() {
    let rt = inline_runtime();
    let executor = Executor::new(rt.clone());
    let out = executor.eval(&Expr::repeat(Expr::literal(count_to(3)), Some(Expr::literal(sum()))));
    rt.drain();
    assert_eq!(out.result(), Some(Value::Int(6)));

    let out = executor.eval(&Expr::repeat(Expr::literal(count_to(3)), None));
    rt.drain();
    assert_eq!(
        out.result(),
        Some(Value::Vector(vec![Value::Int(1), Value::Int(2), Value::Int(3)]))
    );
}

#[test]
fn contract_of_expression() {
    let executor = Executor::new(inline_runtime());
    let expr = Expr::unary(
        UnaryOp::ContractOf,
        Expr::literal(Value::Vector(vec![Value::Int(1), Value::Float(0.5)])),
    );
    assert_eq!(
        executor.eval_value(&expr),
        Ok(Value::Contract(Contract::vector(Contract::float(), 2)))
    );
}

#[test]
fn sequence_and_index() {
    let executor = Executor::new(inline_runtime());
    let expr = Expr::Sequence(vec![
        Expr::literal("ignored"),
        Expr::index(
            Expr::set_index(
                Expr::literal(Value::Vector(vec![Value::Int(1), Value::Int(2)])),
                Expr::literal(1),
                Expr::literal(20),
            ),
            Expr::literal(1),
        ),
    ]);
    assert_eq!(executor.eval_value(&expr), Ok(Value::Int(20)));
}
