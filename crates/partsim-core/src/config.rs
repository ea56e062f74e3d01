//! Workload configuration loading for the engine binary.
//!
//! The canonical configuration lives in `partsim.yaml` at the project
//! root. This module defines a strongly-typed struct mirroring the YAML
//! structure and provides a loader that reads the file, falling back to
//! the built-in demo workload (25 jobs, 10 partitions) when no file is
//! present.

use std::path::Path;

use serde::Deserialize;

use partsim_types::{JobSpec, Strategy};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level workload configuration.
///
/// Every field has a default, so an empty file (or no file at all) yields
/// the demo workload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkloadConfig {
    /// The job batch, in arrival order.
    #[serde(default = "default_jobs")]
    pub jobs: Vec<JobSpec>,

    /// Partition sizes in KB, in id order.
    #[serde(default = "default_partitions")]
    pub partitions: Vec<u32>,

    /// Placement strategy.
    #[serde(default)]
    pub strategy: Strategy,

    /// Real-time milliseconds between ticks; 0 runs flat out.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// TCP port for the observer API server.
    #[serde(default = "default_observer_port")]
    pub observer_port: u16,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            jobs: default_jobs(),
            partitions: default_partitions(),
            strategy: Strategy::default(),
            tick_interval_ms: default_tick_interval_ms(),
            observer_port: default_observer_port(),
        }
    }
}

impl WorkloadConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yml::from_str(&contents)?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}

/// Milliseconds between ticks for a watchable demo run.
const fn default_tick_interval_ms() -> u64 {
    100
}

/// Observer API port.
const fn default_observer_port() -> u16 {
    8000
}

/// The demo partition layout: ten fixed partitions of assorted sizes.
fn default_partitions() -> Vec<u32> {
    vec![9500, 7000, 4500, 8500, 3000, 9000, 1000, 5500, 1500, 500]
}

/// The demo job batch: 25 jobs of assorted sizes and run times.
fn default_jobs() -> Vec<JobSpec> {
    let raw: [(u32, u32, u64); 25] = [
        (1, 5760, 5),
        (2, 4190, 4),
        (3, 3290, 8),
        (4, 2030, 2),
        (5, 2550, 2),
        (6, 6990, 6),
        (7, 8940, 8),
        (8, 740, 10),
        (9, 3930, 7),
        (10, 6890, 6),
        (11, 6580, 5),
        (12, 3820, 8),
        (13, 9140, 9),
        (14, 420, 10),
        (15, 220, 10),
        (16, 7540, 7),
        (17, 3210, 3),
        (18, 1380, 1),
        (19, 9850, 9),
        (20, 3610, 3),
        (21, 7540, 7),
        (22, 2710, 2),
        (23, 8390, 8),
        (24, 5950, 5),
        (25, 760, 10),
    ];
    raw.into_iter()
        .map(|(id, size, run_time)| JobSpec { id, size, run_time })
        .collect()
}
