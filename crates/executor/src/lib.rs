//! # Vireo Executor
//!
//! The evaluation entry point for the Vireo runtime.
//!
//! This is the only crate an embedder needs to import. It provides:
//! - [`Executor`] - walks an [`Expr`] tree against a [`Runtime`]
//! - [`Expr`] - the expression instruction set
//! - [`Value`], [`Contract`], [`Future`] - re-exported core types
//!
//! ## Quick Start
//!
//! ```text
//! use vireo_executor::{BinaryOp, Executor, Expr, Runtime, Value};
//!
//! let executor = Executor::new(Runtime::new());
//! let result = executor.eval(&Expr::binary(
//!     BinaryOp::Add,
//!     Expr::literal(2),
//!     Expr::literal(3),
//! ));
//! assert_eq!(result.result(), Some(Value::Int(5)));
//! ```
//!
//! ## Deferred Evaluation
//!
//! An operand that is still pending does not block. The operation is queued
//! on the runtime's scheduler and the caller gets a [`Future`] that completes
//! once the operand resolves. With an inline runtime (`workers = 0`) the
//! host runs queued work by calling [`Runtime::drain`].

#![warn(missing_docs)]
#![warn(clippy::all)]

mod executor;
mod expr;

#[cfg(test)]
mod tests;

pub use executor::{EvalMode, Executor};
pub use expr::Expr;

pub use vireo_concurrency::{Scheduler, SchedulerConfig, SchedulerStats};
pub use vireo_core::{
    coerce, contract_of, relationship, Callable, Contract, ContractRegistry, Error, Field, Future,
    FutureState, Primitive, Record, Relationship, Result, Signature, Subscriber, Value, ValueKind,
};
pub use vireo_engine::{
    BinaryOp, Iteration, IterationState, Runtime, RuntimeConfig, UnaryOp, CONFIG_FILE_NAME,
};
