//! Simulation engine for the partsim memory-allocation simulator.
//!
//! This crate owns the deterministic tick cycle that drives the
//! simulation: the allocation pass, the running-job advance, waiting-job
//! bookkeeping, and the clock.
//!
//! # Modules
//!
//! - [`alloc`] -- First-fit and best-fit partition selection (pure).
//! - [`clock`] -- Monotonic tick counter with checked advance.
//! - [`config`] -- Workload configuration loading from `partsim.yaml`.
//! - [`log`] -- Append-only tick-tagged event log.
//! - [`sim`] -- The [`Simulation`] instance: construction, queries, reset.
//! - [`stats`] -- Aggregate and detailed statistics (internal; reached via
//!   [`Simulation::statistics`]).
//! - [`tick`] -- The 4-phase tick cycle engine loop.
//!
//! The engine is single-threaded and synchronous: exactly one
//! [`Simulation::advance`] runs at a time, the caller controls pacing, and
//! no operation blocks or yields mid-tick. A network-facing wrapper (see
//! the observer crate) must serialize all access to one instance.
//!
//! [`Simulation`]: sim::Simulation
//! [`Simulation::advance`]: sim::Simulation::advance
//! [`Simulation::statistics`]: sim::Simulation::statistics

pub mod alloc;
pub mod clock;
pub mod config;
pub mod log;
pub mod sim;
mod stats;
pub mod tick;

// Re-export primary types for convenience.
pub use config::{ConfigError, WorkloadConfig};
pub use sim::{SimError, Simulation};
pub use tick::{TickError, TickSummary};
