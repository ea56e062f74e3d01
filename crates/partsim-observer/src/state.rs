//! Shared application state for the Observer API server.
//!
//! [`AppState`] holds the one simulation instance the API operates on,
//! behind an async [`RwLock`]. The core engine has no internal
//! synchronization, so the lock is what guarantees one logical in-flight
//! operation at a time; every handler (and the engine binary's tick loop)
//! goes through it. The core itself never assumes a singleton -- the
//! instance lives here, owned by the server.

use std::sync::Arc;

use partsim_core::Simulation;
use tokio::sync::RwLock;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor. The slot
/// is `None` until `POST /api/init` (or the engine binary) installs a
/// simulation.
#[derive(Clone, Default)]
pub struct AppState {
    /// The current simulation, if one has been initialized.
    pub sim: Arc<RwLock<Option<Simulation>>>,
}

impl AppState {
    /// Create application state with an empty simulation slot.
    pub fn new() -> Self {
        Self {
            sim: Arc::new(RwLock::new(None)),
        }
    }

    /// Create application state holding an already-constructed simulation
    /// (used by the engine binary, which builds the workload itself).
    pub fn with_simulation(sim: Simulation) -> Self {
        Self {
            sim: Arc::new(RwLock::new(Some(sim))),
        }
    }
}
