//! Error types for the engine binary.

use partsim_core::{ConfigError, SimError, TickError};
use partsim_observer::startup::StartupError;

/// Errors that can occur while starting or running the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },

    /// The configured workload was rejected by the simulation constructor.
    #[error("workload error: {source}")]
    Workload {
        /// The underlying construction error.
        #[from]
        source: SimError,
    },

    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },

    /// The observer server failed to start.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying startup error.
        #[from]
        source: StartupError,
    },
}
