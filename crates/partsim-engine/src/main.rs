//! Engine binary for the partsim simulator.
//!
//! This is the main entry point that wires together the workload
//! configuration, the simulation engine, and the observer API server.
//! It loads the workload, runs the tick loop to completion with the
//! configured pacing, logs the final statistics, and then keeps the
//! observer serving the final state until interrupted.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load the workload from `partsim.yaml` (built-in demo when absent)
//! 3. Construct the simulation
//! 4. Start the observer API server, sharing the simulation slot
//! 5. Run the tick loop until every job is done or too big
//! 6. Log the statistics report
//! 7. Keep serving until Ctrl-C

mod error;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use partsim_core::{Simulation, WorkloadConfig};
use partsim_observer::state::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Application entry point for the engine.
///
/// Initializes all subsystems and runs the simulation to completion.
///
/// # Errors
///
/// Returns an error if configuration loading, simulation construction,
/// observer startup, or a tick execution fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("partsim-engine starting");

    // 2. Load the workload configuration.
    let config = load_config()?;
    info!(
        jobs = config.jobs.len(),
        partitions = config.partitions.len(),
        strategy = %config.strategy,
        tick_interval_ms = config.tick_interval_ms,
        "Workload loaded"
    );

    // 3. Construct the simulation.
    let sim = Simulation::new(config.jobs, config.partitions, config.strategy)
        .map_err(EngineError::from)?;
    info!("Simulation constructed");

    // 4. Start the observer API server, sharing the simulation slot.
    let state = Arc::new(AppState::with_simulation(sim));
    let _observer_handle = partsim_observer::spawn_observer(config.observer_port, Arc::clone(&state))
        .await
        .map_err(EngineError::from)?;
    info!(port = config.observer_port, "Observer API server started");

    // 5. Run the tick loop. The write lock is taken per tick, never held
    //    across the sleep, so API reads interleave with the run.
    let total_ticks = run_loop(&state, config.tick_interval_ms).await?;
    info!(total_ticks, "Simulation complete");

    // 6. Log the statistics report.
    log_statistics(&state).await;

    // 7. Keep the observer serving the final state until interrupted.
    info!("Observer still serving; press Ctrl-C to exit");
    let _ = tokio::signal::ctrl_c().await;

    info!("partsim-engine shutdown complete");
    Ok(())
}

/// Load the workload from `partsim.yaml`, falling back to the built-in
/// demo workload when the file does not exist.
fn load_config() -> Result<WorkloadConfig, EngineError> {
    let config_path = Path::new("partsim.yaml");
    if config_path.exists() {
        let config = WorkloadConfig::from_file(config_path)?;
        Ok(config)
    } else {
        info!("Config file not found, using the demo workload");
        Ok(WorkloadConfig::default())
    }
}

/// Drive the shared simulation to completion, sleeping `tick_interval_ms`
/// between ticks (0 runs flat out). Returns the number of ticks executed.
async fn run_loop(state: &Arc<AppState>, tick_interval_ms: u64) -> Result<u64, EngineError> {
    let mut total_ticks: u64 = 0;

    loop {
        {
            let mut slot = state.sim.write().await;
            let Some(sim) = slot.as_mut() else {
                break;
            };
            if sim.all_done() {
                break;
            }
            sim.advance().map_err(EngineError::from)?;
            total_ticks = total_ticks.saturating_add(1);
        }

        if tick_interval_ms > 0 {
            tokio::time::sleep(Duration::from_millis(tick_interval_ms)).await;
        }
    }

    Ok(total_ticks)
}

/// Log the final statistics report, one line per derived metric.
async fn log_statistics(state: &Arc<AppState>) {
    let slot = state.sim.read().await;
    let Some(sim) = slot.as_ref() else {
        return;
    };

    let report = sim.statistics();
    info!(
        strategy = %report.strategy,
        throughput = report.throughput,
        avg_wait_time = %report.avg_wait_time,
        utilization_pct = %report.utilization_pct,
        avg_internal_frag = %report.avg_internal_frag,
        too_big_count = report.too_big_count,
        "Run statistics"
    );
    info!("{}", report.details.throughput_calc);
    info!("{}", report.details.wait_time_calc);
    info!("{}", report.details.utilization_calc);
    info!("{}", report.details.fragmentation_calc);
    for line in &report.details.partition_usage {
        info!("{line}");
    }
}
