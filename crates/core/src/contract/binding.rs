//! Pure binding of concrete values against contracts
//!
//! [`coerce`] validates a value against a contract and converts it into the
//! contract's canonical representation:
//!
//! - `any` accepts everything unchanged
//! - a pending future is not unwrapped; its attached contract is narrowed
//! - the void sentinel becomes the contract's default instance
//! - otherwise the contract must accept the value's own contract, and the
//!   value is converted (numeric widening, vector truncation, record field
//!   narrowing and reordering)
//!
//! Deferral on a contract that is itself pending lives one layer up, in the
//! engine's `bind`.

use super::relationship::{pair_fields, relationship};
use super::{contract_of, is_integral, primitive, Contract, Field, Signature};
use crate::error::{Error, Result};
use crate::future::FutureState;
use crate::value::{Callable, Record, Value};

/// Bind `value` against `contract`.
pub fn coerce(value: Value, contract: &Contract) -> Result<Value> {
    if contract.is_any() {
        return Ok(value);
    }

    match value {
        Value::Future(future) => match future.state() {
            FutureState::Pending => {
                future.set_contract(contract.clone())?;
                Ok(Value::Future(future))
            }
            FutureState::Succeeded => match future.result() {
                Some(inner) => coerce(inner, contract),
                None => Err(Error::void_reference("succeeded future without a result")),
            },
            FutureState::Failed => Err(future
                .error()
                .unwrap_or_else(|| Error::void_reference("failed future without an error"))),
        },
        Value::Void => default_instance(contract),
        value => {
            if let (Value::Vector(items), Contract::Vector { length: 0, .. }) = (&value, contract) {
                if items.is_empty() {
                    return Ok(value);
                }
            }
            let actual = contract_of(&value);
            if !relationship(contract, &actual).accepts() {
                return Err(Error::binding(contract, actual));
            }
            convert(value, contract)
        }
    }
}

/// Convert an accepted value into the canonical representation of `contract`.
fn convert(value: Value, contract: &Contract) -> Result<Value> {
    match (contract, value) {
        (Contract::Primitive(p), Value::Float(f)) if p.id() == primitive::INTEGER_ID => {
            if is_integral(f) {
                Ok(Value::Int(f as i64))
            } else {
                Err(Error::binding(contract, Contract::float()))
            }
        }
        (Contract::Primitive(p), Value::Int(i)) if p.id() == primitive::FLOAT_ID => {
            Ok(Value::Float(i as f64))
        }
        (Contract::Vector { element, length }, Value::Vector(items)) => items
            .into_iter()
            .take(*length)
            .map(|item| coerce(item, element))
            .collect::<Result<Vec<_>>>()
            .map(Value::Vector),
        (Contract::Record(fields), Value::Record(record)) => convert_record(fields, record),
        (Contract::Union(first, second), value) => {
            let actual = contract_of(&value);
            if relationship(first, &actual).accepts() {
                coerce(value, first)
            } else if relationship(second, &actual).accepts() {
                coerce(value, second)
            } else {
                Ok(value)
            }
        }
        (_, value) => Ok(value),
    }
}

/// Rebuild a record in the contract's field order, dropping extra fields.
fn convert_record(fields: &[Field], record: Record) -> Result<Value> {
    let left: Vec<Option<&str>> = fields.iter().map(|f| f.name.as_deref()).collect();
    let pairing = pair_fields(&left, &record.names());

    let mut slots: Vec<Option<(Option<String>, Value)>> =
        record.into_fields().into_iter().map(Some).collect();
    let mut out = Vec::with_capacity(fields.len());
    for (i, j) in pairing.pairs {
        let Some((name, value)) = slots[j].take() else {
            continue;
        };
        let field = &fields[i];
        let name = field.name.clone().or(name);
        out.push((name, coerce(value, &field.contract)?));
    }
    Ok(Value::Record(Record::from_fields(out)))
}

/// The value a contract produces when invoked with no arguments.
///
/// Complements and registry-defined primitives have no default and fail
/// with a binding error.
pub fn default_instance(contract: &Contract) -> Result<Value> {
    match contract {
        Contract::Primitive(p) => match p.id() {
            primitive::ANY_ID | primitive::VOID_ID => Ok(Value::Void),
            primitive::BOOLEAN_ID => Ok(Value::Bool(false)),
            primitive::FLOAT_ID => Ok(Value::Float(0.0)),
            primitive::INTEGER_ID => Ok(Value::Int(0)),
            primitive::STRING_ID => Ok(Value::Str(String::new())),
            primitive::CONTRACT_ID => Ok(Value::Contract(Contract::any())),
            _ => Err(Error::binding(contract, Contract::void())),
        },
        Contract::Vector { element, length } => (0..*length)
            .map(|_| default_instance(element))
            .collect::<Result<Vec<_>>>()
            .map(Value::Vector),
        Contract::Signature(sig) => Ok(Value::Callable(noop_callable(sig.clone()))),
        Contract::Record(fields) => fields
            .iter()
            .map(|f| Ok((f.name.clone(), default_instance(&f.contract)?)))
            .collect::<Result<Vec<_>>>()
            .map(|fields| Value::Record(Record::from_fields(fields))),
        Contract::Union(first, _) => default_instance(first),
        Contract::Complement(_) => Err(Error::binding(contract, Contract::void())),
    }
}

fn noop_callable(signature: Signature) -> Callable {
    Callable::new("default", signature, |_| Ok(Value::Void))
}

impl Contract {
    /// See [`default_instance`].
    pub fn default_instance(&self) -> Result<Value> {
        default_instance(self)
    }

    /// See [`coerce`].
    pub fn bind(&self, value: Value) -> Result<Value> {
        coerce(value, self)
    }
}
