//! Value types for Vireo
//!
//! This module defines:
//! - Value: closed variant set for every runtime operand
//! - Record: ordered, optionally named fields
//! - Callable: native function with a signature contract
//! - ValueKind: discriminant used for dispatch diagnostics
//!
//! ## Type Rules
//!
//! - Different variants are never equal: `Int(1) != Float(1.0)`
//! - Float equality follows IEEE-754: `NaN != NaN`, `-0.0 == 0.0`
//! - Callables and futures compare by identity
//! - Contracts compare by structure

use crate::contract::{self, Contract, Signature};
use crate::error::Result;
use crate::future::Future;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Runtime operand.
#[derive(Clone)]
pub enum Value {
    /// The "no value" sentinel
    Void,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// UTF-8 string
    Str(String),
    /// Sequence of values
    Vector(Vec<Value>),
    /// Structural record
    Record(Record),
    /// First-class contract
    Contract(Contract),
    /// Native callable
    Callable(Callable),
    /// Value that may not be available yet
    Future(Future),
}

/// Discriminant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// `Value::Void`
    Void,
    /// `Value::Bool`
    Bool,
    /// `Value::Int`
    Int,
    /// `Value::Float`
    Float,
    /// `Value::Str`
    Str,
    /// `Value::Vector`
    Vector,
    /// `Value::Record`
    Record,
    /// `Value::Contract`
    Contract,
    /// `Value::Callable`
    Callable,
    /// `Value::Future`
    Future,
}

impl ValueKind {
    /// Human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            ValueKind::Void => "void",
            ValueKind::Bool => "boolean",
            ValueKind::Int => "integer",
            ValueKind::Float => "float",
            ValueKind::Str => "string",
            ValueKind::Vector => "vector",
            ValueKind::Record => "record",
            ValueKind::Contract => "contract",
            ValueKind::Callable => "callable",
            ValueKind::Future => "future",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Void, Value::Void) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // IEEE-754: NaN != NaN, -0.0 == 0.0
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Vector(a), Value::Vector(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Contract(a), Value::Contract(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => a.ptr_eq(b),
            (Value::Future(a), Value::Future(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Value {
    /// Variant discriminant
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Void => ValueKind::Void,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::Vector(_) => ValueKind::Vector,
            Value::Record(_) => ValueKind::Record,
            Value::Contract(_) => ValueKind::Contract,
            Value::Callable(_) => ValueKind::Callable,
            Value::Future(_) => ValueKind::Future,
        }
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    /// Most specific contract this value satisfies
    pub fn contract(&self) -> Contract {
        contract::contract_of(self)
    }

    /// Check if this is the void sentinel
    pub fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }

    /// Check if this is a future that has not completed yet
    pub fn is_pending(&self) -> bool {
        matches!(self, Value::Future(f) if !f.is_completed())
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a Float or Int value
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as &str if this is a Str value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get as a slice if this is a Vector value
    pub fn as_vector(&self) -> Option<&[Value]> {
        match self {
            Value::Vector(v) => Some(v),
            _ => None,
        }
    }

    /// Get as &Record if this is a Record value
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Get as &Contract if this is a Contract value
    pub fn as_contract(&self) -> Option<&Contract> {
        match self {
            Value::Contract(c) => Some(c),
            _ => None,
        }
    }

    /// Get as &Callable if this is a Callable value
    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Callable(c) => Some(c),
            _ => None,
        }
    }

    /// Get as &Future if this is a Future value
    pub fn as_future(&self) -> Option<&Future> {
        match self {
            Value::Future(f) => Some(f),
            _ => None,
        }
    }
}

// ============================================================================
// Record
// ============================================================================

/// Ordered fields, each optionally named.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(Option<String>, Value)>,
}

impl Record {
    /// Empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Record from raw fields
    pub fn from_fields(fields: Vec<(Option<String>, Value)>) -> Self {
        Record { fields }
    }

    /// Record of named fields
    pub fn named<N: Into<String>>(fields: impl IntoIterator<Item = (N, Value)>) -> Self {
        Record {
            fields: fields
                .into_iter()
                .map(|(name, value)| (Some(name.into()), value))
                .collect(),
        }
    }

    /// Record of positional fields
    pub fn tuple(values: impl IntoIterator<Item = Value>) -> Self {
        Record {
            fields: values.into_iter().map(|v| (None, v)).collect(),
        }
    }

    /// Append a field
    pub fn push<N: Into<String>>(&mut self, name: Option<N>, value: Value) {
        self.fields.push((name.map(Into::into), value));
    }

    /// Field value by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.position(name).map(|i| &self.fields[i].1)
    }

    /// Field value by position
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.fields.get(index).map(|(_, v)| v)
    }

    /// Position of the first field with this name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|(n, _)| n.as_deref() == Some(name))
    }

    /// Replace the value at a position; returns false when out of range
    pub fn set_at(&mut self, index: usize, value: Value) -> bool {
        match self.fields.get_mut(index) {
            Some(slot) => {
                slot.1 = value;
                true
            }
            None => false,
        }
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// All fields in order
    pub fn fields(&self) -> &[(Option<String>, Value)] {
        &self.fields
    }

    /// Field names in order
    pub fn names(&self) -> Vec<Option<&str>> {
        self.fields.iter().map(|(n, _)| n.as_deref()).collect()
    }

    /// Consume into raw fields
    pub fn into_fields(self) -> Vec<(Option<String>, Value)> {
        self.fields
    }
}

// ============================================================================
// Callable
// ============================================================================

/// Native function body.
pub type NativeFn = dyn Fn(Vec<Value>) -> Result<Value> + Send + Sync;

/// Callable value: a native function with a signature contract.
///
/// Arguments arrive already bound against the signature's parameters.
#[derive(Clone)]
pub struct Callable {
    name: Arc<str>,
    signature: Signature,
    func: Arc<NativeFn>,
}

impl Callable {
    /// Wrap a native function
    pub fn new<F>(name: impl Into<String>, signature: Signature, func: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value> + Send + Sync + 'static,
    {
        Callable {
            name: Arc::from(name.into()),
            signature,
            func: Arc::new(func),
        }
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Signature contract
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Invoke the native body directly, without binding
    pub fn call(&self, args: Vec<Value>) -> Result<Value> {
        (self.func)(args)
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish()
    }
}

// ============================================================================
// Formatting
// ============================================================================

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => f.write_str("Void"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Int(i) => write!(f, "Int({})", i),
            Value::Float(x) => write!(f, "Float({:?})", x),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::Vector(v) => f.debug_tuple("Vector").field(v).finish(),
            Value::Record(r) => f.debug_tuple("Record").field(&r.fields).finish(),
            Value::Contract(c) => write!(f, "Contract({})", c),
            Value::Callable(c) => write!(f, "Callable({})", c.name()),
            Value::Future(fut) => write!(f, "{:?}", fut),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => f.write_str("void"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => f.write_str(s),
            Value::Vector(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Record(record) => {
                f.write_str("{")?;
                for (i, (name, value)) in record.fields().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match name {
                        Some(name) => write!(f, "{}: {}", name, value)?,
                        None => write!(f, "{}", value)?,
                    }
                }
                f.write_str("}")
            }
            Value::Contract(c) => write!(f, "{}", c),
            Value::Callable(c) => write!(f, "<{} {}>", c.name(), c.signature()),
            Value::Future(fut) => write!(f, "<future {} {}>", fut.name(), fut.state()),
        }
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Vector(v)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

impl From<Contract> for Value {
    fn from(c: Contract) -> Self {
        Value::Contract(c)
    }
}

impl From<Callable> for Value {
    fn from(c: Callable) -> Self {
        Value::Callable(c)
    }
}

impl From<Future> for Value {
    fn from(f: Future) -> Self {
        Value::Future(f)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Void
    }
}
