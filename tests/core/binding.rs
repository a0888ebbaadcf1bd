//! Binding Tests
//!
//! Coercion of concrete values into a contract's canonical form.

use crate::common::*;
use vireo_core::coerce;

#[test]
fn numeric_coercions() {
    assert_eq!(coerce(Value::Float(3.0), &Contract::integer()), Ok(Value::Int(3)));
    assert_eq!(coerce(Value::Int(3), &Contract::float()), Ok(Value::Float(3.0)));
    assert!(matches!(
        coerce(Value::Float(3.5), &Contract::integer()),
        Err(Error::BindingFailure { .. })
    ));
}

#[test]
fn void_becomes_default() {
    assert_eq!(coerce(Value::Void, &Contract::string()), Ok(Value::from("")));
    assert_eq!(
        coerce(Value::Void, &Contract::vector(Contract::boolean(), 2)),
        Ok(Value::Vector(vec![Value::Bool(false), Value::Bool(false)]))
    );
}

#[test]
fn record_narrowing_keeps_contract_order() {
    let contract = Contract::record([("b", Contract::integer()), ("a", Contract::float())]);
    let value = Value::Record(Record::named([
        ("a", Value::Int(1)),
        ("b", Value::Int(2)),
        ("c", Value::Int(3)),
    ]));
    let out = coerce(value, &contract).unwrap();
    assert_eq!(
        out,
        Value::Record(Record::named([("b", Value::Int(2)), ("a", Value::Float(1.0))]))
    );
}

#[test]
fn record_missing_field_fails() {
    let contract = Contract::record([("a", Contract::integer()), ("z", Contract::integer())]);
    let value = Value::Record(Record::named([("a", Value::Int(1))]));
    assert!(matches!(
        coerce(value, &contract),
        Err(Error::BindingFailure { .. })
    ));
}

#[test]
fn vectors_truncate_to_contract_length() {
    let contract = Contract::vector(Contract::integer(), 2);
    let value = Value::Vector(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    assert_eq!(
        coerce(value, &contract),
        Ok(Value::Vector(vec![Value::Int(1), Value::Int(2)]))
    );
}

#[test]
fn pending_future_narrows_instead_of_waiting() {
    let f = Future::named("later");
    let out = coerce(Value::Future(f.clone()), &Contract::integer()).unwrap();
    assert_eq!(out, Value::Future(f.clone()));
    f.success(Value::Float(4.0));
    assert_eq!(f.result(), Some(Value::Int(4)));
}

#[test]
fn union_picks_accepting_branch() {
    let contract = Contract::union(Contract::string(), Contract::float());
    assert_eq!(coerce(Value::Int(2), &contract), Ok(Value::Float(2.0)));
    assert_eq!(coerce(Value::from("s"), &contract), Ok(Value::from("s")));
    assert!(coerce(Value::Bool(true), &contract).is_err());
}
