//! Named primitive registry
//!
//! Each runtime owns one registry. Defining a name allocates a fresh
//! primitive id above the built-in range; looking a name up returns the
//! interned primitive. Built-ins are pre-registered under their own names.
//!
//! Registries share no names; a name defined in one is unknown to another.
//! Ids come from one process-wide counter, so primitives defined by
//! different registries never compare equal.

use super::primitive::{Primitive, FIRST_USER_ID};
use crate::error::{Error, Result};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_USER_ID: AtomicU32 = AtomicU32::new(FIRST_USER_ID);

/// Interns named primitives for one runtime.
pub struct ContractRegistry {
    by_name: RwLock<FxHashMap<String, Primitive>>,
}

impl ContractRegistry {
    /// Registry holding only the built-in primitives
    pub fn new() -> Self {
        let mut by_name = FxHashMap::default();
        for p in Primitive::builtins() {
            by_name.insert(p.name().to_string(), p);
        }
        ContractRegistry {
            by_name: RwLock::new(by_name),
        }
    }

    /// Define a named primitive.
    ///
    /// Redefining a name with the same parent returns the existing
    /// primitive; a different parent is rejected.
    pub fn define(&self, name: &str, parent: Option<&Primitive>) -> Result<Primitive> {
        let mut by_name = self.by_name.write();
        if let Some(existing) = by_name.get(name) {
            if existing.parent() == parent {
                return Ok(existing.clone());
            }
            return Err(Error::unsupported("redefine", name));
        }
        let id = NEXT_USER_ID.fetch_add(1, Ordering::Relaxed);
        let primitive = Primitive::new(id, name, parent.cloned());
        by_name.insert(name.to_string(), primitive.clone());
        tracing::trace!(target: "vireo::contract", name, id, "defined primitive");
        Ok(primitive)
    }

    /// Look up a primitive by name
    pub fn lookup(&self, name: &str) -> Option<Primitive> {
        self.by_name.read().get(name).cloned()
    }

    /// Number of registered primitives, built-ins included
    pub fn len(&self) -> usize {
        self.by_name.read().len()
    }

    /// Always false: built-ins are registered on construction
    pub fn is_empty(&self) -> bool {
        self.by_name.read().is_empty()
    }
}

impl Default for ContractRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContractRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractRegistry")
            .field("primitives", &self.len())
            .finish()
    }
}
