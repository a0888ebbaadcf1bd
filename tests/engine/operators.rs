//! Operator Tests
//!
//! Dispatch by operand kind through the public entry points.

use crate::common::*;
use vireo_engine::{binary, get_member, invoke, unary, BinaryOp, UnaryOp};

#[test]
fn contract_operators_expose_the_algebra() {
    let rt = inline_runtime();
    let int = Value::Contract(Contract::integer());
    let float = Value::Contract(Contract::float());
    assert_eq!(binary(&rt, BinaryOp::Lt, int.clone(), float.clone()), Ok(Value::Bool(true)));
    assert_eq!(binary(&rt, BinaryOp::Ge, float.clone(), int.clone()), Ok(Value::Bool(true)));
    assert_eq!(binary(&rt, BinaryOp::Eq, int.clone(), float), Ok(Value::Bool(false)));

    let not_int = unary(&rt, UnaryOp::Not, int.clone()).unwrap();
    let back = unary(&rt, UnaryOp::Not, not_int).unwrap();
    assert_eq!(binary(&rt, BinaryOp::Eq, back, int), Ok(Value::Bool(true)));
}

#[test]
fn composed_callables() {
    let rt = inline_runtime();
    let inc = int_fn("inc", 1, |a| a[0] + 1);
    let double = int_fn("double", 1, |a| a[0] * 2);

    let piped = binary(&rt, BinaryOp::Shr, inc.clone(), double.clone()).unwrap();
    assert_eq!(invoke(&rt, piped, vec![Value::Int(3)]), Ok(Value::Int(8)));

    let joined = binary(&rt, BinaryOp::Add, inc, double).unwrap();
    assert_eq!(get_member(&rt, joined.clone(), "arity"), Ok(Value::Int(2)));
    assert_eq!(
        invoke(&rt, joined, vec![Value::Int(1), Value::Int(2)]),
        Ok(Value::Record(Record::tuple([Value::Int(2), Value::Int(4)])))
    );
}

#[test]
fn contracts_construct_instances() {
    let rt = inline_runtime();
    let point = Value::Contract(Contract::record([
        ("x", Contract::float()),
        ("y", Contract::float()),
    ]));
    let origin = invoke(&rt, point.clone(), vec![]).unwrap();
    assert_eq!(get_member(&rt, origin, "x"), Ok(Value::Float(0.0)));

    let p = invoke(&rt, point, vec![Value::Int(1), Value::Int(2)]).unwrap();
    assert_eq!(get_member(&rt, p, "y"), Ok(Value::Float(2.0)));
}

#[test]
fn integer_overflow_is_a_fault() {
    let rt = inline_runtime();
    let err = binary(&rt, BinaryOp::Mul, Value::Int(i64::MAX), Value::Int(2)).unwrap_err();
    assert!(matches!(err, Error::WrappedExternalFault { .. }));
}
