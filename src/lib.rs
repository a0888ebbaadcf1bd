//! Vireo - runtime core for a dynamic language
//!
//! Vireo evaluates operations over values that may not exist yet. Every
//! operation accepts pending [`Future`]s as operands and defers itself until
//! they resolve, so chains of ordinary operations compose into pipelines
//! without callbacks. Values are checked against structural contracts with a
//! subtyping algebra, and deferred work runs on a scheduler that can be
//! suspended and stepped.
//!
//! # Quick Start
//!
//! ```ignore
//! use vireo::{BinaryOp, Executor, Expr, Future, Runtime, Value};
//!
//! let rt = Runtime::new();
//! let executor = Executor::new(rt.clone());
//!
//! let x = Future::named("x");
//! let sum = executor.eval(&Expr::binary(
//!     BinaryOp::Add,
//!     Expr::literal(Value::Future(x.clone())),
//!     Expr::literal(3),
//! ));
//!
//! x.success(Value::Int(2));
//! rt.drain();
//! assert_eq!(sum.result(), Some(Value::Int(5)));
//! ```
//!
//! # Architecture
//!
//! All evaluation goes through the [`Executor`]. The engine, scheduler and
//! core types are re-exported for embedders that drive them directly.

// Re-export the public API from vireo-executor
pub use vireo_executor::*;
