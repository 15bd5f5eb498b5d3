//! Engine configuration
//!
//! The grid size is the only input of a count. Everything here shapes the
//! engine around it: which runtime the blocking entry points build, an
//! optional ceiling on the number of paths, and how much of the counter
//! history a [`WalkReport`](crate::walk::WalkReport) keeps.

use crate::core::errors::{LatticeError, Result};
use serde::{Deserialize, Serialize};
use tokio::runtime::{Builder, Runtime};

/// Runtime flavor used by the blocking entry points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workers {
    /// Single-threaded scheduler, every explorer interleaves on one thread
    CurrentThread,
    /// Multi-threaded scheduler with a fixed number of worker threads
    Fixed(usize),
    /// Multi-threaded scheduler sized by tokio (one worker per core)
    Available,
}

/// Configuration for a [`PathCounter`](crate::walk::PathCounter)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    pub workers: Workers,
    /// Upper bound on C(nx+ny, nx); larger grids are refused before spawning
    pub max_paths: Option<u64>,
    /// Keep every observed (started, finished) state in the report
    pub record_transitions: bool,
    /// Name given to runtime worker threads
    pub thread_name: String,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            workers: Workers::Available,
            max_paths: None,
            record_transitions: false,
            thread_name: "lattice-walker".to_string(),
        }
    }
}

impl WalkConfig {
    /// Create a new builder for WalkConfig
    pub fn builder() -> WalkConfigBuilder {
        WalkConfigBuilder::new()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Workers::Fixed(0) = self.workers {
            return Err(LatticeError::configuration_field(
                "worker count must be greater than 0",
                "workers",
            ));
        }
        if self.max_paths == Some(0) {
            return Err(LatticeError::configuration_field(
                "max_paths must be greater than 0, every grid has at least one path",
                "max_paths",
            ));
        }
        if self.thread_name.trim().is_empty() {
            return Err(LatticeError::configuration_field(
                "thread_name must not be empty",
                "thread_name",
            ));
        }
        Ok(())
    }

    /// Configuration for development: a small fixed pool and full history
    pub fn development() -> Self {
        Self {
            workers: Workers::Fixed(4),
            max_paths: Some(1_000_000),
            record_transitions: true,
            ..Default::default()
        }
    }

    /// Single-threaded with a low path ceiling
    pub fn conservative() -> Self {
        Self {
            workers: Workers::CurrentThread,
            max_paths: Some(100_000),
            ..Default::default()
        }
    }

    /// Parse a JSON document and validate the result
    pub fn from_json_str(input: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Build the tokio runtime described by `workers`
    pub fn build_runtime(&self) -> Result<Runtime> {
        let mut builder = match self.workers {
            Workers::CurrentThread => Builder::new_current_thread(),
            Workers::Fixed(count) => {
                let mut builder = Builder::new_multi_thread();
                builder.worker_threads(count);
                builder
            }
            Workers::Available => Builder::new_multi_thread(),
        };
        builder
            .thread_name(self.thread_name.clone())
            .enable_all()
            .build()
            .map_err(|e| LatticeError::runtime("build tokio runtime", e))
    }
}

/// Builder for WalkConfig
pub struct WalkConfigBuilder {
    config: WalkConfig,
}

impl WalkConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: WalkConfig::default(),
        }
    }

    pub fn workers(mut self, workers: Workers) -> Self {
        self.config.workers = workers;
        self
    }

    /// Set the path ceiling
    pub fn max_paths(mut self, max_paths: Option<u64>) -> Self {
        self.config.max_paths = max_paths;
        self
    }

    pub fn record_transitions(mut self, enabled: bool) -> Self {
        self.config.record_transitions = enabled;
        self
    }

    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.config.thread_name = name.into();
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<WalkConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for WalkConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
