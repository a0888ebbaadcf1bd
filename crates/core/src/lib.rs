//! Core types for Vireo
//!
//! This crate defines the foundational types used throughout the runtime:
//! - Value: closed variant set of runtime operands (Record, Callable)
//! - Contract: structural type descriptors (Primitive, Signature, Field)
//! - Relationship: the subtyping algebra over contracts
//! - Binding: pure validation and coercion of values against contracts
//! - ContractRegistry: per-runtime named primitives
//! - Future: single-assignment result cell with subscribers
//! - Error: the runtime fault taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod contract;
pub mod error;
pub mod future;
pub mod value;

pub use contract::{
    coerce, contract_of, default_instance, relationship, Contract, ContractRegistry, Field,
    Primitive, Relationship, Signature,
};
pub use error::{Error, Result};
pub use future::{ErrorHandler, Future, FutureState, Subscriber, SuccessHandler, Wait};
pub use value::{Callable, NativeFn, Record, Value, ValueKind};
