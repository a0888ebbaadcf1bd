//! Operation dispatch
//!
//! Every operator goes through the same three steps:
//!
//! 1. [`lift`](crate::lift) resolves operands, deferring on the first
//!    pending one and failing fast on a failed one
//! 2. operands are bound against the operation's parameter contracts
//! 3. the implementation is picked by an exhaustive match on the primary
//!    operand's variant
//!
//! A result is returned synchronously when nothing was deferred, and as a
//! [`Value::Future`] otherwise.
//!
//! ## Module Structure
//!
//! - `scalar`: numbers, strings, booleans
//! - `collection`: vectors and records (operators, members, indexing)
//! - `contract`: the relationship algebra exposed as operators
//! - `callable`: composition, truncation, piping, invocation

mod callable;
mod collection;
mod contract;
mod scalar;

use crate::lift::{lift, lift_all};
use crate::runtime::Runtime;
use serde::{Deserialize, Serialize};
use std::fmt;
use vireo_core::{contract_of, relationship, Contract, Error, Relationship, Result, Value};

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Arithmetic negation
    Neg,
    /// Logical negation; complement on contracts
    Not,
    /// Most specific contract of the operand
    ContractOf,
}

impl UnaryOp {
    /// Operation name used in faults and task names
    pub const fn name(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Not => "not",
            UnaryOp::ContractOf => "contract_of",
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `&`
    And,
    /// `|`
    Or,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
}

impl BinaryOp {
    /// Operation name used in faults and task names
    pub const fn name(&self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
            BinaryOp::Rem => "rem",
            BinaryOp::Eq => "eq",
            BinaryOp::Ne => "ne",
            BinaryOp::Lt => "lt",
            BinaryOp::Le => "le",
            BinaryOp::Gt => "gt",
            BinaryOp::Ge => "ge",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Shl => "shl",
            BinaryOp::Shr => "shr",
        }
    }

    /// Operator symbol
    pub const fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
        }
    }

    /// Whether the operator is one of the four orderings
    pub const fn is_ordering(&self) -> bool {
        matches!(
            self,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Apply a unary operator.
pub fn unary(rt: &Runtime, op: UnaryOp, operand: Value) -> Result<Value> {
    lift(rt, op.name(), [operand], move |_, [value]| apply_unary(op, value))
}

/// Apply a binary operator.
pub fn binary(rt: &Runtime, op: BinaryOp, left: Value, right: Value) -> Result<Value> {
    lift(rt, op.name(), [left, right], move |rt, [l, r]| {
        apply_binary(rt, op, l, r)
    })
}

/// Read a named member.
pub fn get_member(rt: &Runtime, target: Value, name: &str) -> Result<Value> {
    let name = name.to_string();
    lift(rt, "get_member", [target], move |_, [target]| {
        collection::get_member(target, &name)
    })
}

/// Write a named member, returning the updated target.
pub fn set_member(rt: &Runtime, target: Value, name: &str, value: Value) -> Result<Value> {
    let name = name.to_string();
    lift(rt, "set_member", [target, value], move |_, [target, value]| {
        collection::set_member(target, &name, value)
    })
}

/// Read by index.
pub fn get_index(rt: &Runtime, target: Value, index: Value) -> Result<Value> {
    lift(rt, "get_index", [target, index], |_, [target, index]| {
        collection::get_index(target, index)
    })
}

/// Write by index, returning the updated target.
pub fn set_index(rt: &Runtime, target: Value, index: Value, value: Value) -> Result<Value> {
    lift(
        rt,
        "set_index",
        [target, index, value],
        |_, [target, index, value]| collection::set_index(target, index, value),
    )
}

/// Invoke a callable or construct from a contract.
///
/// Callee and arguments are all resolved first.
pub fn invoke(rt: &Runtime, callee: Value, args: Vec<Value>) -> Result<Value> {
    let mut operands = Vec::with_capacity(args.len() + 1);
    operands.push(callee);
    operands.extend(args);
    lift_all(rt, "invoke", operands, |_, mut operands| {
        let callee = operands.remove(0);
        callable::call(callee, operands)
    })
}

// ============================================================================
// Implementations
// ============================================================================

fn apply_unary(op: UnaryOp, value: Value) -> Result<Value> {
    match (op, value) {
        (UnaryOp::ContractOf, value) => Ok(Value::Contract(contract_of(&value))),
        (UnaryOp::Neg, Value::Int(i)) => i
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| scalar::overflow(op.name())),
        (UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Not, Value::Contract(c)) => Ok(Value::Contract(Contract::complement(c))),
        (op, Value::Void) => Err(Error::void_reference(format!("operand of {} is void", op))),
        (op, value) => Err(Error::unsupported(op.name(), value.type_name())),
    }
}

fn apply_binary(rt: &Runtime, op: BinaryOp, left: Value, right: Value) -> Result<Value> {
    match op {
        BinaryOp::Eq => return Ok(Value::Bool(values_equal(&left, &right))),
        BinaryOp::Ne => return Ok(Value::Bool(!values_equal(&left, &right))),
        _ => {}
    }

    match left {
        Value::Int(_) | Value::Float(_) => scalar::numeric(op, left, right),
        Value::Str(s) => scalar::string(op, s, right),
        Value::Bool(b) => scalar::boolean(op, b, right),
        Value::Vector(items) => collection::vector_binary(op, items, right),
        Value::Record(record) => collection::record_binary(op, record, right),
        Value::Contract(c) => contract::binary(op, c, right),
        Value::Callable(f) => callable::binary(rt, op, f, right),
        Value::Void => Err(Error::void_reference(format!(
            "left operand of {} is void",
            op
        ))),
        Value::Future(_) => Err(Error::unsupported(op.name(), "future")),
    }
}

/// Equality as seen by `==`: numbers compare numerically, contracts by
/// relationship, everything else structurally.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => (*a as f64) == *b,
        (Value::Contract(a), Value::Contract(b)) => relationship(a, b) == Relationship::Equal,
        (Value::Vector(a), Value::Vector(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Record(a), Value::Record(b)) => {
            a.len() == b.len()
                && a
                    .fields()
                    .iter()
                    .zip(b.fields())
                    .all(|((na, x), (nb, y))| na == nb && values_equal(x, y))
        }
        (a, b) => a == b,
    }
}
