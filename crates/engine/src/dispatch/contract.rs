//! Contracts as operands.
//!
//! Comparisons expose the relationship algebra: `a < b` holds when `a` is
//! a strict subset of `b`, `a <= b` when it fits inside `b`, and so on.

use super::BinaryOp;
use vireo_core::{coerce, contract_of, relationship, Contract, Error, Relationship, Result, Value};

/// Non-negative count for truncation.
pub(super) fn count(value: Value) -> Result<usize> {
    match coerce(value, &Contract::integer())? {
        Value::Int(n) if n >= 0 => Ok(n as usize),
        other => Err(Error::binding("non-negative integer", other.to_string())),
    }
}

pub(super) fn binary(op: BinaryOp, left: Contract, right: Value) -> Result<Value> {
    if matches!(op, BinaryOp::Shl | BinaryOp::Shr) {
        let Contract::Signature(sig) = &left else {
            return Err(Error::unsupported(op.name(), left.variant_name()));
        };
        let n = count(right)?;
        let truncated = if op == BinaryOp::Shl {
            sig.drop_front(n)
        } else {
            sig.drop_back(n)
        };
        return Ok(Value::Contract(Contract::Signature(truncated)));
    }

    let right = match right {
        Value::Contract(c) => c,
        other => return Err(Error::binding(Contract::contract(), contract_of(&other))),
    };

    let rel = || relationship(&left, &right);
    match op {
        BinaryOp::Or => Ok(Value::Contract(Contract::union(left, right))),
        BinaryOp::Eq => Ok(Value::Bool(rel() == Relationship::Equal)),
        BinaryOp::Ne => Ok(Value::Bool(rel() != Relationship::Equal)),
        BinaryOp::Lt => Ok(Value::Bool(rel() == Relationship::Subset)),
        BinaryOp::Le => Ok(Value::Bool(rel().fits())),
        BinaryOp::Gt => Ok(Value::Bool(rel() == Relationship::Superset)),
        BinaryOp::Ge => Ok(Value::Bool(rel().accepts())),
        BinaryOp::Add => match (&left, &right) {
            (Contract::Signature(a), Contract::Signature(b)) => {
                Ok(Value::Contract(Contract::Signature(a.concat(b))))
            }
            (Contract::Record(a), Contract::Record(b)) => {
                let mut fields = a.clone();
                fields.extend(b.iter().cloned());
                Ok(Value::Contract(Contract::Record(fields)))
            }
            _ => Err(Error::unsupported(
                op.name(),
                format!("{} and {}", left.variant_name(), right.variant_name()),
            )),
        },
        op => Err(Error::unsupported(op.name(), "contract")),
    }
}
