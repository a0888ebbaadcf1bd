//! Concurrency layer for Vireo
//!
//! This crate implements the continuation scheduler:
//! - Scheduler: submits, defers and replays continuations
//! - Suspend/resume buffering with LIFO replay
//! - enqueue: run an action once a target future resolves, routing results
//! - Worker pool or inline (caller-driven) execution

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod scheduler;

pub use scheduler::{FaultHandler, Scheduler, SchedulerConfig, SchedulerStats};
