//! Core Integration Tests
//!
//! Tests for the future cell, the contract relationship algebra, and
//! binding.

#[path = "../common/mod.rs"]
mod common;

mod binding;
mod future_lifecycle;
mod relationship_laws;
