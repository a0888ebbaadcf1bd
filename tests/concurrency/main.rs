//! Concurrency Integration Tests
//!
//! Tests for the continuation scheduler: buffering, replay order, and the
//! worker pool.

#[path = "../common/mod.rs"]
mod common;

mod suspend_resume;
mod workers;
