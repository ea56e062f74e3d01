//! Observer API server for the partsim simulator.
//!
//! This crate provides an Axum HTTP server that exposes the simulation
//! engine to a dashboard frontend:
//!
//! - **REST endpoints** for driving the simulation (init, step, reset,
//!   run-complete) and reading its state (snapshot, health)
//! - **Minimal HTML status page** (`GET /`) showing current tick,
//!   strategy, and links to API endpoints
//!
//! # Architecture
//!
//! The engine is single-threaded with no internal synchronization, so the
//! observer owns the one simulation instance behind an async `RwLock` and
//! serializes every operation through it (one logical in-flight operation
//! at a time). Any JSON shape served here is a translation of the core's
//! snapshot and statistics projections, not a separate contract.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{start_server, ServerConfig, ServerError};
pub use startup::spawn_observer;
pub use state::AppState;
