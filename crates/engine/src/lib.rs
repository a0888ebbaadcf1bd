//! Evaluation engine for Vireo
//!
//! This crate ties the core types to the scheduler:
//! - Runtime: explicit context (scheduler, contract registry, config)
//! - RuntimeConfig: TOML configuration
//! - lift: defers an operation until its pending operands resolve
//! - bind: contract binding, deferring on a pending contract
//! - dispatch: unary, binary, member, index and invoke operations
//! - repeat: the iteration state machine
//!
//! Every operation returns its result synchronously when its operands are
//! concrete and a [`Value::Future`](vireo_core::Value::Future) otherwise.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binding;
pub mod config;
pub mod dispatch;
pub mod iteration;
pub mod lift;
pub mod runtime;

pub use binding::bind;
pub use config::{RuntimeConfig, CONFIG_FILE_NAME, MAX_WORKERS};
pub use dispatch::{
    binary, get_index, get_member, invoke, set_index, set_member, unary, values_equal, BinaryOp,
    UnaryOp,
};
pub use iteration::{repeat, Iteration, IterationState};
pub use lift::{lift, lift_all};
pub use runtime::Runtime;
