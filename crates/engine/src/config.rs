//! Runtime configuration via `vireo.toml`
//!
//! A runtime is configured by a small TOML file. Every field has a default,
//! so an empty file (or no file at all) yields the default runtime: inline
//! scheduling, checked evaluation, named tasks.

use serde::{Deserialize, Serialize};
use std::path::Path;
use vireo_concurrency::SchedulerConfig;
use vireo_core::{Error, Result};

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "vireo.toml";

/// Upper bound on worker threads.
pub const MAX_WORKERS: usize = 256;

/// Runtime configuration loaded from `vireo.toml`.
///
/// # Example
///
/// ```toml
/// # Worker threads; 0 runs continuations when the host drains the scheduler
/// workers = 0
///
/// # Start evaluations in checked mode
/// checked = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Worker threads for the scheduler; `0` is the inline substrate.
    #[serde(default)]
    pub workers: usize,
    /// Whether evaluations start in checked mode.
    #[serde(default = "default_true")]
    pub checked: bool,
    /// Whether buffered continuations keep their descriptive names.
    #[serde(default = "default_true")]
    pub task_names: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            checked: true,
            task_names: true,
        }
    }
}

impl RuntimeConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Vireo runtime configuration
#
# Worker threads (default: 0)
#   0  = inline: continuations run when the host drains the scheduler
#   >0 = a pool of worker threads named vireo-worker-N
workers = 0

# Evaluation mode (default: true)
#   true  = binding failures and void references raise faults
#   false = they evaluate to void instead
checked = true

# Keep descriptive names on buffered tasks (default: true)
task_names = true
"#
    }

    /// Parse config from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RuntimeConfig = toml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: RuntimeConfig = toml::from_str(&content).map_err(|e| {
            Error::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Reject values outside supported bounds.
    pub fn validate(&self) -> Result<()> {
        if self.workers > MAX_WORKERS {
            return Err(Error::config(format!(
                "workers = {} exceeds the maximum of {}",
                self.workers, MAX_WORKERS
            )));
        }
        Ok(())
    }

    /// Scheduler settings derived from this config.
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            workers: self.workers,
            task_names: self.task_names,
        }
    }
}
