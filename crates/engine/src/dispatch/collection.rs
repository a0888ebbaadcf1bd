//! Vectors and records: operators, members and indexing.
//!
//! Values are immutable; every write returns the updated container. A
//! written value is bound against the contract of the value it replaces,
//! except that a void slot accepts anything and a float slot stays float.

use super::BinaryOp;
use vireo_core::{coerce, contract_of, Contract, Error, Record, Result, Value};

fn slot_contract(old: &Value) -> Contract {
    match old {
        Value::Void => Contract::any(),
        Value::Float(_) => Contract::float(),
        other => contract_of(other),
    }
}

fn bind_slot(old: &Value, value: Value) -> Result<Value> {
    coerce(value, &slot_contract(old))
}

/// Non-negative position from an index operand.
fn position(index: Value) -> Result<usize> {
    match coerce(index, &Contract::integer())? {
        Value::Int(i) => usize::try_from(i)
            .map_err(|_| Error::void_reference(format!("negative index {}", i))),
        other => Err(Error::binding(Contract::integer(), contract_of(&other))),
    }
}

fn out_of_range(index: usize, len: usize) -> Error {
    Error::void_reference(format!("index {} out of range for length {}", index, len))
}

pub(super) fn vector_binary(op: BinaryOp, mut items: Vec<Value>, right: Value) -> Result<Value> {
    match (op, right) {
        (BinaryOp::Add, Value::Vector(more)) => {
            items.extend(more);
            Ok(Value::Vector(items))
        }
        (BinaryOp::Add, other) => Err(Error::binding("vector", contract_of(&other))),
        (op, other) => Err(Error::unsupported(
            op.name(),
            format!("vector and {}", other.type_name()),
        )),
    }
}

pub(super) fn record_binary(op: BinaryOp, record: Record, right: Value) -> Result<Value> {
    match (op, right) {
        (BinaryOp::Add, Value::Record(more)) => {
            let mut fields = record.into_fields();
            fields.extend(more.into_fields());
            Ok(Value::Record(Record::from_fields(fields)))
        }
        (BinaryOp::Add, other) => {
            let mut record = record;
            record.push(None::<String>, other);
            Ok(Value::Record(record))
        }
        (op, other) => Err(Error::unsupported(
            op.name(),
            format!("record and {}", other.type_name()),
        )),
    }
}

pub(super) fn get_member(target: Value, name: &str) -> Result<Value> {
    match target {
        Value::Record(record) => record.get(name).cloned().ok_or_else(|| {
            Error::void_reference(format!("record has no member '{}'", name))
        }),
        Value::Vector(items) if name == "length" => Ok(Value::Int(items.len() as i64)),
        Value::Str(s) if name == "length" => Ok(Value::Int(s.chars().count() as i64)),
        Value::Contract(c) => contract_member(&c, name),
        Value::Callable(f) => match name {
            "arity" => Ok(Value::Int(f.signature().arity() as i64)),
            "name" => Ok(Value::from(f.name())),
            "signature" => Ok(Value::Contract(Contract::Signature(f.signature().clone()))),
            _ => Err(Error::void_reference(format!(
                "callable has no member '{}'",
                name
            ))),
        },
        Value::Void => Err(Error::void_reference(format!("member '{}' of void", name))),
        other => Err(Error::unsupported(
            format!("member '{}'", name),
            other.type_name(),
        )),
    }
}

fn contract_member(contract: &Contract, name: &str) -> Result<Value> {
    let found = match (contract, name) {
        (Contract::Vector { element, .. }, "element") => Some(Value::Contract((**element).clone())),
        (Contract::Vector { length, .. }, "length") => Some(Value::Int(*length as i64)),
        (Contract::Signature(s), "arity") => Some(Value::Int(s.arity() as i64)),
        (Contract::Signature(s), "one_way") => Some(Value::Bool(s.one_way)),
        (Contract::Record(fields), name) => fields
            .iter()
            .find(|f| f.name.as_deref() == Some(name))
            .map(|f| Value::Contract(f.contract.clone())),
        (Contract::Primitive(p), "name") => Some(Value::from(p.name())),
        (Contract::Primitive(p), "parent") => Some(
            p.parent()
                .map(|parent| Value::Contract(Contract::Primitive(parent.clone())))
                .unwrap_or(Value::Void),
        ),
        (Contract::Union(first, _), "first") => Some(Value::Contract((**first).clone())),
        (Contract::Union(_, second), "second") => Some(Value::Contract((**second).clone())),
        (Contract::Complement(base), "base") => Some(Value::Contract((**base).clone())),
        _ => None,
    };
    found.ok_or_else(|| {
        Error::void_reference(format!("contract {} has no member '{}'", contract, name))
    })
}

pub(super) fn set_member(target: Value, name: &str, value: Value) -> Result<Value> {
    match target {
        Value::Record(mut record) => {
            match record.position(name) {
                Some(i) => {
                    let old = record.at(i).cloned().unwrap_or(Value::Void);
                    record.set_at(i, bind_slot(&old, value)?);
                }
                None => record.push(Some(name), value),
            }
            Ok(Value::Record(record))
        }
        Value::Void => Err(Error::void_reference(format!("member '{}' of void", name))),
        other => Err(Error::unsupported(
            format!("set member '{}'", name),
            other.type_name(),
        )),
    }
}

pub(super) fn get_index(target: Value, index: Value) -> Result<Value> {
    if let (Value::Record(_), Value::Str(name)) = (&target, &index) {
        let name = name.clone();
        return get_member(target, &name);
    }
    match target {
        Value::Vector(items) => {
            let i = position(index)?;
            let len = items.len();
            items.into_iter().nth(i).ok_or_else(|| out_of_range(i, len))
        }
        Value::Record(record) => {
            let i = position(index)?;
            record.at(i).cloned().ok_or_else(|| out_of_range(i, record.len()))
        }
        Value::Str(s) => {
            let i = position(index)?;
            s.chars()
                .nth(i)
                .map(|c| Value::Str(c.to_string()))
                .ok_or_else(|| out_of_range(i, s.chars().count()))
        }
        Value::Contract(Contract::Vector { element, length }) => {
            let i = position(index)?;
            if i < length {
                Ok(Value::Contract((*element).clone()))
            } else {
                Err(out_of_range(i, length))
            }
        }
        Value::Contract(Contract::Record(fields)) => {
            let i = position(index)?;
            fields
                .get(i)
                .map(|f| Value::Contract(f.contract.clone()))
                .ok_or_else(|| out_of_range(i, fields.len()))
        }
        Value::Void => Err(Error::void_reference("index into void")),
        other => Err(Error::unsupported("index", other.type_name())),
    }
}

pub(super) fn set_index(target: Value, index: Value, value: Value) -> Result<Value> {
    if let (Value::Record(_), Value::Str(name)) = (&target, &index) {
        let name = name.clone();
        return set_member(target, &name, value);
    }
    match target {
        Value::Vector(mut items) => {
            let i = position(index)?;
            let len = items.len();
            let slot = items.get_mut(i).ok_or_else(|| out_of_range(i, len))?;
            *slot = bind_slot(slot, value)?;
            Ok(Value::Vector(items))
        }
        Value::Record(mut record) => {
            let i = position(index)?;
            let old = record
                .at(i)
                .cloned()
                .ok_or_else(|| out_of_range(i, record.len()))?;
            record.set_at(i, bind_slot(&old, value)?);
            Ok(Value::Record(record))
        }
        Value::Void => Err(Error::void_reference("index into void")),
        other => Err(Error::unsupported("set index", other.type_name())),
    }
}
