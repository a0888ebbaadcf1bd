//! Numbers, strings and booleans.

use super::BinaryOp;
use std::cmp::Ordering;
use vireo_core::{coerce, contract_of, Contract, Error, Result, Value};

pub(super) fn overflow(op: &str) -> Error {
    Error::external(format!("integer overflow in {}", op))
}

fn ordering(op: BinaryOp, ord: Option<Ordering>) -> Value {
    let holds = match (op, ord) {
        (_, None) => false,
        (BinaryOp::Lt, Some(o)) => o == Ordering::Less,
        (BinaryOp::Le, Some(o)) => o != Ordering::Greater,
        (BinaryOp::Gt, Some(o)) => o == Ordering::Greater,
        (BinaryOp::Ge, Some(o)) => o != Ordering::Less,
        (_, Some(_)) => false,
    };
    Value::Bool(holds)
}

fn unsupported(op: BinaryOp, left: &str, right: &Value) -> Error {
    Error::unsupported(op.name(), format!("{} and {}", left, right.type_name()))
}

/// Bind to `float` and unwrap.
fn as_float(value: Value) -> Result<f64> {
    match coerce(value, &Contract::float())? {
        Value::Float(f) => Ok(f),
        Value::Int(i) => Ok(i as f64),
        other => Err(Error::binding(Contract::float(), contract_of(&other))),
    }
}

pub(super) fn numeric(op: BinaryOp, left: Value, right: Value) -> Result<Value> {
    // a non-number right operand is bound against the left operand's kind
    let right = match right {
        Value::Int(_) | Value::Float(_) => right,
        other => {
            let target = match left {
                Value::Int(_) => Contract::integer(),
                _ => Contract::float(),
            };
            coerce(other, &target)?
        }
    };

    match (left, right) {
        (Value::Int(a), Value::Int(b)) => integer(op, a, b),
        (left, right) => {
            let right_kind = right.type_name();
            let (a, b) = (as_float(left)?, as_float(right)?);
            float(op, a, b, right_kind)
        }
    }
}

fn integer(op: BinaryOp, a: i64, b: i64) -> Result<Value> {
    let checked = match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Sub => a.checked_sub(b),
        BinaryOp::Mul => a.checked_mul(b),
        BinaryOp::Div | BinaryOp::Rem if b == 0 => {
            return Err(Error::external("division by zero"));
        }
        BinaryOp::Div => a.checked_div(b),
        BinaryOp::Rem => a.checked_rem(b),
        BinaryOp::Shl | BinaryOp::Shr => {
            let shift = u32::try_from(b)
                .map_err(|_| Error::external(format!("negative shift count {}", b)))?;
            if op == BinaryOp::Shl {
                a.checked_shl(shift)
            } else {
                a.checked_shr(shift)
            }
        }
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            return Ok(ordering(op, Some(a.cmp(&b))));
        }
        BinaryOp::Eq => return Ok(Value::Bool(a == b)),
        BinaryOp::Ne => return Ok(Value::Bool(a != b)),
        BinaryOp::And | BinaryOp::Or => {
            return Err(unsupported(op, "integer", &Value::Int(b)));
        }
    };
    checked.map(Value::Int).ok_or_else(|| overflow(op.name()))
}

fn float(op: BinaryOp, a: f64, b: f64, right_kind: &str) -> Result<Value> {
    let out = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Rem => a % b,
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            return Ok(ordering(op, a.partial_cmp(&b)));
        }
        BinaryOp::Eq => return Ok(Value::Bool(a == b)),
        BinaryOp::Ne => return Ok(Value::Bool(a != b)),
        BinaryOp::And | BinaryOp::Or | BinaryOp::Shl | BinaryOp::Shr => {
            return Err(Error::unsupported(
                op.name(),
                format!("float and {}", right_kind),
            ));
        }
    };
    Ok(Value::Float(out))
}

pub(super) fn string(op: BinaryOp, left: String, right: Value) -> Result<Value> {
    let right = match coerce(right, &Contract::string())? {
        Value::Str(s) => s,
        other => return Err(unsupported(op, "string", &other)),
    };
    match op {
        BinaryOp::Add => Ok(Value::Str(left + &right)),
        BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::Ne => Ok(Value::Bool(left != right)),
        op if op.is_ordering() => Ok(ordering(op, Some(left.cmp(&right)))),
        op => Err(unsupported(op, "string", &Value::Str(right))),
    }
}

pub(super) fn boolean(op: BinaryOp, left: bool, right: Value) -> Result<Value> {
    let right = match coerce(right, &Contract::boolean())? {
        Value::Bool(b) => b,
        other => return Err(unsupported(op, "boolean", &other)),
    };
    match op {
        BinaryOp::And => Ok(Value::Bool(left && right)),
        BinaryOp::Or => Ok(Value::Bool(left || right)),
        BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::Ne => Ok(Value::Bool(left != right)),
        op => Err(unsupported(op, "boolean", &Value::Bool(right))),
    }
}
