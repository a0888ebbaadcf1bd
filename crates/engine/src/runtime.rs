//! Runtime context
//!
//! A [`Runtime`] owns everything an evaluation needs: the scheduler that
//! runs deferred operations, the registry of named primitives, and the
//! configuration it was built from. Nothing is global; independent
//! runtimes can coexist in one process.

use crate::config::RuntimeConfig;
use std::path::Path;
use std::sync::Arc;
use vireo_concurrency::{Scheduler, SchedulerStats};
use vireo_core::{ContractRegistry, Result};

struct RuntimeInner {
    scheduler: Scheduler,
    registry: ContractRegistry,
    config: RuntimeConfig,
}

/// Explicit runtime context.
///
/// Cloning is cheap and shares the context.
#[derive(Clone)]
pub struct Runtime {
    inner: Arc<RuntimeInner>,
}

impl Runtime {
    /// Runtime with the default configuration (inline scheduling).
    pub fn new() -> Self {
        Runtime {
            inner: Arc::new(RuntimeInner {
                scheduler: Scheduler::inline(),
                registry: ContractRegistry::new(),
                config: RuntimeConfig::default(),
            }),
        }
    }

    /// Runtime built from a configuration.
    pub fn with_config(config: RuntimeConfig) -> Result<Self> {
        config.validate()?;
        let scheduler = Scheduler::new(config.scheduler_config())?;
        tracing::debug!(
            target: "vireo::runtime",
            workers = config.workers,
            checked = config.checked,
            "runtime created"
        );
        Ok(Runtime {
            inner: Arc::new(RuntimeInner {
                scheduler,
                registry: ContractRegistry::new(),
                config,
            }),
        })
    }

    /// Runtime configured from a `vireo.toml` file, written with defaults
    /// first if it does not exist.
    pub fn from_config_file(path: &Path) -> Result<Self> {
        RuntimeConfig::write_default_if_missing(path)?;
        Self::with_config(RuntimeConfig::from_file(path)?)
    }

    /// Scheduler running this runtime's continuations
    pub fn scheduler(&self) -> &Scheduler {
        &self.inner.scheduler
    }

    /// Named primitives of this runtime
    pub fn registry(&self) -> &ContractRegistry {
        &self.inner.registry
    }

    /// Configuration this runtime was built from
    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    /// Run (or wait for) every ready continuation. See [`Scheduler::drain`].
    pub fn drain(&self) {
        self.inner.scheduler.drain();
    }

    /// Scheduler metrics
    pub fn stats(&self) -> SchedulerStats {
        self.inner.scheduler.stats()
    }

    /// Stop the scheduler. Idempotent.
    pub fn shutdown(&self) {
        self.inner.scheduler.shutdown();
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.inner.config)
            .field("scheduler", &self.inner.scheduler)
            .finish()
    }
}
