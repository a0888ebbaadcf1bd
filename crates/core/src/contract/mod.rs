//! Structural contracts
//!
//! A [`Contract`] is an immutable structural type descriptor. Contracts are
//! compared by structure, never by identity, except for primitives, which
//! are identity markers.
//!
//! ## Module Structure
//!
//! - `primitive`: identity markers and the built-in primitive set
//! - `relationship`: the subtyping algebra (`Equal`/`Subset`/`Superset`/`Unrelated`)
//! - `binding`: pure validation and coercion of concrete values
//! - `registry`: per-runtime allocation of named primitives
//!
//! ## Usage
//!
//! ```
//! use vireo_core::contract::{relationship, Contract, Relationship};
//!
//! let point = Contract::record([("x", Contract::integer()), ("y", Contract::integer())]);
//! let point3 = Contract::record([
//!     ("x", Contract::integer()),
//!     ("y", Contract::integer()),
//!     ("z", Contract::integer()),
//! ]);
//! assert_eq!(relationship(&point3, &point), Relationship::Subset);
//! ```

pub mod binding;
pub mod primitive;
pub mod registry;
pub mod relationship;

pub use binding::{coerce, default_instance};
pub use primitive::Primitive;
pub use registry::ContractRegistry;
pub use relationship::{relationship, Relationship};

use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Structural type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Contract {
    /// Opaque identity marker
    Primitive(Primitive),
    /// Fixed-length homogeneous sequence
    Vector {
        /// Contract of every element
        element: Arc<Contract>,
        /// Number of elements
        length: usize,
    },
    /// Callable shape
    Signature(Signature),
    /// Structural tuple/record
    Record(Vec<Field>),
    /// Either of two contracts
    Union(Arc<Contract>, Arc<Contract>),
    /// Everything outside a contract
    Complement(Arc<Contract>),
}

/// Parameter list of a callable contract.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signature {
    /// Positional parameter contracts
    pub params: Vec<Contract>,
    /// Callable produces no result for its caller
    pub one_way: bool,
}

/// One field of a record contract.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name; unnamed fields match by position
    pub name: Option<String>,
    /// Field contract
    pub contract: Contract,
}

impl Field {
    /// Named field
    pub fn named(name: impl Into<String>, contract: Contract) -> Self {
        Field {
            name: Some(name.into()),
            contract,
        }
    }

    /// Positional field
    pub fn positional(contract: Contract) -> Self {
        Field {
            name: None,
            contract,
        }
    }
}

impl Signature {
    /// Signature returning a result
    pub fn new(params: Vec<Contract>) -> Self {
        Signature {
            params,
            one_way: false,
        }
    }

    /// Signature whose callable returns nothing to its caller
    pub fn one_way(params: Vec<Contract>) -> Self {
        Signature {
            params,
            one_way: true,
        }
    }

    /// Number of parameters
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Concatenate parameter lists (composition).
    ///
    /// The result is one-way only when both sides are.
    pub fn concat(&self, other: &Signature) -> Signature {
        let mut params = self.params.clone();
        params.extend(other.params.iter().cloned());
        Signature {
            params,
            one_way: self.one_way && other.one_way,
        }
    }

    /// Drop the first `n` parameters.
    pub fn drop_front(&self, n: usize) -> Signature {
        Signature {
            params: self.params.iter().skip(n).cloned().collect(),
            one_way: self.one_way,
        }
    }

    /// Drop the last `n` parameters.
    pub fn drop_back(&self, n: usize) -> Signature {
        let keep = self.params.len().saturating_sub(n);
        Signature {
            params: self.params[..keep].to_vec(),
            one_way: self.one_way,
        }
    }
}

impl Contract {
    /// The universal contract
    pub fn any() -> Self {
        Contract::Primitive(Primitive::any())
    }

    /// Contract of the "no value" sentinel
    pub fn void() -> Self {
        Contract::Primitive(Primitive::void())
    }

    /// Booleans
    pub fn boolean() -> Self {
        Contract::Primitive(Primitive::boolean())
    }

    /// Integers
    pub fn integer() -> Self {
        Contract::Primitive(Primitive::integer())
    }

    /// Floats
    pub fn float() -> Self {
        Contract::Primitive(Primitive::float())
    }

    /// Strings
    pub fn string() -> Self {
        Contract::Primitive(Primitive::string())
    }

    /// Contract of contract values
    pub fn contract() -> Self {
        Contract::Primitive(Primitive::contract())
    }

    /// Fixed-length vector
    pub fn vector(element: Contract, length: usize) -> Self {
        Contract::Vector {
            element: Arc::new(element),
            length,
        }
    }

    /// Callable shape returning a result
    pub fn signature(params: Vec<Contract>) -> Self {
        Contract::Signature(Signature::new(params))
    }

    /// Record of named fields
    pub fn record<N: Into<String>>(fields: impl IntoIterator<Item = (N, Contract)>) -> Self {
        Contract::Record(
            fields
                .into_iter()
                .map(|(name, contract)| Field::named(name, contract))
                .collect(),
        )
    }

    /// Record of positional fields (a tuple)
    pub fn tuple(fields: impl IntoIterator<Item = Contract>) -> Self {
        Contract::Record(fields.into_iter().map(Field::positional).collect())
    }

    /// Union of two contracts.
    ///
    /// A union of a contract with itself is that contract, and a union with
    /// `any` is `any`.
    pub fn union(first: Contract, second: Contract) -> Self {
        if first == second || first.is_any() {
            return first;
        }
        if second.is_any() {
            return second;
        }
        Contract::Union(Arc::new(first), Arc::new(second))
    }

    /// Complement; double complement collapses to the operand
    pub fn complement(base: Contract) -> Self {
        match base {
            Contract::Complement(inner) => (*inner).clone(),
            other => Contract::Complement(Arc::new(other)),
        }
    }

    /// Whether this is the universal contract
    pub fn is_any(&self) -> bool {
        matches!(self, Contract::Primitive(p) if p.is_any())
    }

    /// Primitive marker, if this is a primitive contract
    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            Contract::Primitive(p) => Some(p),
            _ => None,
        }
    }

    /// Signature, if this is a callable contract
    pub fn as_signature(&self) -> Option<&Signature> {
        match self {
            Contract::Signature(s) => Some(s),
            _ => None,
        }
    }

    /// Variant name for diagnostics
    pub fn variant_name(&self) -> &'static str {
        match self {
            Contract::Primitive(_) => "primitive",
            Contract::Vector { .. } => "vector",
            Contract::Signature(_) => "signature",
            Contract::Record(_) => "record",
            Contract::Union(..) => "union",
            Contract::Complement(_) => "complement",
        }
    }
}

/// The most specific contract a value satisfies.
///
/// Integral floats report `integer`; vectors report the join of their
/// element contracts; a future reports its attached contract, or `any`.
pub fn contract_of(value: &Value) -> Contract {
    match value {
        Value::Void => Contract::void(),
        Value::Bool(_) => Contract::boolean(),
        Value::Int(_) => Contract::integer(),
        Value::Float(f) => {
            if is_integral(*f) {
                Contract::integer()
            } else {
                Contract::float()
            }
        }
        Value::Str(_) => Contract::string(),
        Value::Vector(items) => {
            let element = items
                .iter()
                .map(contract_of)
                .reduce(join)
                .unwrap_or_else(Contract::any);
            Contract::vector(element, items.len())
        }
        Value::Record(record) => Contract::Record(
            record
                .fields()
                .iter()
                .map(|(name, v)| Field {
                    name: name.clone(),
                    contract: contract_of(v),
                })
                .collect(),
        ),
        Value::Contract(_) => Contract::contract(),
        Value::Callable(c) => Contract::Signature(c.signature().clone()),
        Value::Future(f) => f.contract().unwrap_or_else(Contract::any),
    }
}

/// Least contract covering both operands, falling back to `any`.
fn join(a: Contract, b: Contract) -> Contract {
    match relationship(&a, &b) {
        Relationship::Equal | Relationship::Superset => a,
        Relationship::Subset => b,
        Relationship::Unrelated => Contract::any(),
    }
}

pub(crate) fn is_integral(f: f64) -> bool {
    f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.one_way {
            f.write_str("oneway ")?;
        }
        f.write_str("fn(")?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", p)?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contract::Primitive(p) => write!(f, "{}", p),
            Contract::Vector { element, length } => write!(f, "[{}; {}]", element, length),
            Contract::Signature(s) => write!(f, "{}", s),
            Contract::Record(fields) => {
                f.write_str("{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match &field.name {
                        Some(name) => write!(f, "{}: {}", name, field.contract)?,
                        None => write!(f, "{}", field.contract)?,
                    }
                }
                f.write_str("}")
            }
            Contract::Union(a, b) => write!(f, "{} | {}", a, b),
            Contract::Complement(base) => match &**base {
                Contract::Union(..) => write!(f, "~({})", base),
                _ => write!(f, "~{}", base),
            },
        }
    }
}
