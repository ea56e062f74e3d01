//! REST API endpoint handlers for the Observer server.
//!
//! All handlers operate on the single simulation slot in [`AppState`].
//! Write endpoints (init, step, reset, run-complete) take the write lock;
//! read endpoints take the read lock. The engine itself performs no
//! synchronization, so the lock discipline here is the serialization
//! guarantee.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `POST` | `/api/init` | Initialize a new simulation |
//! | `POST` | `/api/step` | Execute one tick |
//! | `GET` | `/api/snapshot` | Current simulation state |
//! | `POST` | `/api/reset` | Rebuild from the original parameters |
//! | `POST` | `/api/run-complete` | Run to completion |
//! | `GET` | `/api/health` | Liveness check |

use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::Json;
use partsim_core::{Simulation, TickError};
use partsim_types::{JobSpec, Strategy};

use crate::error::ObserverError;
use crate::state::AppState;

/// How many of the newest log lines a snapshot payload carries.
const RECENT_LOG_WINDOW: usize = 50;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Request body for `POST /api/init`.
#[derive(Debug, serde::Deserialize)]
pub struct InitRequest {
    /// The job batch, in arrival order.
    pub jobs: Vec<JobSpec>,
    /// Partition sizes in KB, in id order.
    pub partitions: Vec<u32>,
    /// Placement strategy string; defaults to `first-fit` when absent.
    pub strategy: Option<String>,
}

// ---------------------------------------------------------------------------
// POST /api/init -- initialize a new simulation
// ---------------------------------------------------------------------------

/// Construct a new simulation in the shared slot, replacing any existing
/// one.
pub async fn init(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InitRequest>,
) -> Result<impl IntoResponse, ObserverError> {
    let strategy: Strategy = request
        .strategy
        .as_deref()
        .unwrap_or("first-fit")
        .parse()
        .map_err(|e: partsim_types::ParseStrategyError| ObserverError::InvalidInput(e.to_string()))?;

    let total_jobs = request.jobs.len();
    let total_partitions = request.partitions.len();

    let sim = Simulation::new(request.jobs, request.partitions, strategy)
        .map_err(|e| ObserverError::InvalidInput(e.to_string()))?;

    tracing::info!(total_jobs, total_partitions, %strategy, "Simulation initialized");

    let mut slot = state.sim.write().await;
    *slot = Some(sim);

    Ok(Json(serde_json::json!({
        "message": "Simulation initialized successfully",
        "strategy": strategy,
        "total_jobs": total_jobs,
        "total_partitions": total_partitions,
    })))
}

// ---------------------------------------------------------------------------
// POST /api/step -- execute one tick
// ---------------------------------------------------------------------------

/// Advance the simulation by one tick and return the resulting snapshot.
///
/// Fails with 400 when no simulation exists or the run already completed.
pub async fn step(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let mut slot = state.sim.write().await;
    let sim = slot.as_mut().ok_or(ObserverError::NotInitialized)?;

    sim.advance().map_err(map_tick_error)?;

    Ok(Json(snapshot_payload(sim)?))
}

// ---------------------------------------------------------------------------
// GET /api/snapshot -- current simulation state
// ---------------------------------------------------------------------------

/// Return the current simulation state: clock, completion flag, strategy,
/// job table, memory table, recent logs, and (once complete) statistics.
pub async fn get_snapshot(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let slot = state.sim.read().await;
    let sim = slot.as_ref().ok_or(ObserverError::NotInitialized)?;

    Ok(Json(snapshot_payload(sim)?))
}

// ---------------------------------------------------------------------------
// POST /api/reset -- rebuild from original parameters
// ---------------------------------------------------------------------------

/// Replace the simulation with a fresh instance built from the same
/// original parameters (jobs, partitions, strategy). No entity survives.
pub async fn reset(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let mut slot = state.sim.write().await;
    let sim = slot.as_ref().ok_or(ObserverError::NotInitialized)?;

    let fresh = sim
        .reset()
        .map_err(|e| ObserverError::Internal(e.to_string()))?;
    *slot = Some(fresh);

    tracing::info!("Simulation reset");

    Ok(Json(serde_json::json!({
        "message": "Simulation reset successfully",
    })))
}

// ---------------------------------------------------------------------------
// POST /api/run-complete -- run to completion
// ---------------------------------------------------------------------------

/// Run the simulation to completion and return the final snapshot.
///
/// A no-op (returning the final state) when the run already completed.
pub async fn run_complete(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let mut slot = state.sim.write().await;
    let sim = slot.as_mut().ok_or(ObserverError::NotInitialized)?;

    let ticks = sim.run_to_completion().map_err(map_tick_error)?;
    tracing::info!(ticks, "Simulation ran to completion");

    Ok(Json(snapshot_payload(sim)?))
}

// ---------------------------------------------------------------------------
// GET /api/health -- liveness check
// ---------------------------------------------------------------------------

/// Report server liveness and whether a simulation is active.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let slot = state.sim.read().await;
    Json(serde_json::json!({
        "status": "healthy",
        "simulation_active": slot.is_some(),
    }))
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing simulation status and API links.
///
/// This is the placeholder dashboard until the React frontend is wired up.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let slot = state.sim.read().await;

    let (clock, strategy, job_count, partition_count, pending, status) = slot.as_ref().map_or_else(
        || (0, String::from("--"), 0, 0, 0, "NOT INITIALIZED"),
        |sim| {
            (
                sim.clock(),
                sim.strategy().to_string(),
                sim.jobs().len(),
                sim.partitions().len(),
                sim.pending_count(),
                if sim.all_done() { "COMPLETE" } else { "RUNNING" },
            )
        },
    );

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Partsim Observer</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        .status {{ color: #3fb950; font-weight: bold; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Partsim Observer</h1>
    <p class="subtitle">Fixed-partition memory allocation simulator</p>

    <p>Status: <span class="status">{status}</span></p>

    <div>
        <div class="metric">
            <div class="label">Tick</div>
            <div class="value">{clock}</div>
        </div>
        <div class="metric">
            <div class="label">Strategy</div>
            <div class="value">{strategy}</div>
        </div>
        <div class="metric">
            <div class="label">Jobs</div>
            <div class="value">{job_count}</div>
        </div>
        <div class="metric">
            <div class="label">Partitions</div>
            <div class="value">{partition_count}</div>
        </div>
        <div class="metric">
            <div class="label">Pending</div>
            <div class="value">{pending}</div>
        </div>
    </div>

    <hr>

    <h2>API Endpoints</h2>
    <ul>
        <li>POST <a href="/api/init">/api/init</a> -- Initialize a simulation</li>
        <li>POST <a href="/api/step">/api/step</a> -- Execute one tick</li>
        <li>GET <a href="/api/snapshot">/api/snapshot</a> -- Current state</li>
        <li>POST <a href="/api/reset">/api/reset</a> -- Reset to initial state</li>
        <li>POST <a href="/api/run-complete">/api/run-complete</a> -- Run to completion</li>
        <li>GET <a href="/api/health">/api/health</a> -- Health check</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Assemble the snapshot payload served by step, snapshot, and
/// run-complete: clock, completion flag, strategy, the two row tables,
/// the newest log lines, and statistics once the run is complete.
fn snapshot_payload(sim: &Simulation) -> Result<serde_json::Value, ObserverError> {
    let (job_table, memory_table) = sim.snapshot();
    let recent_logs = sim.recent_logs(RECENT_LOG_WINDOW);
    let is_done = sim.all_done();

    let statistics = if is_done {
        serde_json::to_value(sim.statistics())?
    } else {
        serde_json::Value::Null
    };

    Ok(serde_json::json!({
        "clock": sim.clock(),
        "is_done": is_done,
        "strategy": sim.strategy(),
        "job_table": job_table,
        "memory_table": memory_table,
        "recent_logs": recent_logs,
        "statistics": statistics,
    }))
}

/// Map a core tick error to its HTTP-facing form.
fn map_tick_error(err: TickError) -> ObserverError {
    match err {
        TickError::AlreadyComplete => ObserverError::AlreadyComplete,
        TickError::Clock { source } => ObserverError::Internal(source.to_string()),
    }
}
