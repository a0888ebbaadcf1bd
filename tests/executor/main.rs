//! Executor Integration Tests
//!
//! Tests for expression evaluation through the public facade.

#[path = "../common/mod.rs"]
mod common;

mod end_to_end;
mod unchecked;
