//! Shared type definitions for the partsim memory-allocation simulator.
//!
//! This crate is the single source of truth for all types used across the
//! partsim workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the dashboard frontend.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe integer wrappers for job and partition identifiers
//! - [`enums`] -- Status and strategy enumerations with their wire strings
//! - [`structs`] -- Entity structs, snapshot rows, and the statistics report

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{JobStatus, ParseStrategyError, PartitionStatus, Strategy};
pub use ids::{JobId, PartitionId};
pub use structs::{
    Job, JobRow, JobSpec, Partition, PartitionRow, StatisticsDetails, StatisticsReport,
};
