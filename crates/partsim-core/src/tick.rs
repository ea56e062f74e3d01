//! Tick cycle: the 4-phase engine loop that drives the simulation.
//!
//! Each call to [`run_tick`] runs through these phases, in this fixed
//! order:
//!
//! 1. **Allocation pass** -- for every job in the pending queue (snapshot
//!    taken before mutation), run the allocator: place the job, or mark it
//!    too big for the system, or leave it pending.
//!
//! 2. **Running-job advance** -- decrement `remaining` for every busy
//!    partition's job; jobs reaching 0 complete and free their partition.
//!    A partition allocated in phase 1 is busy here, so a job's countdown
//!    starts on its allocation tick.
//!
//! 3. **Waiting bookkeeping** -- jobs still pending after phase 1 accrue
//!    one tick of wait time. Jobs allocated or rejected this tick do not.
//!
//! 4. **Clock advance** -- the tick counter increments by 1.
//!
//! Events emitted during a tick are tagged with the pre-increment clock
//! value. The cycle is fully deterministic: same construction parameters,
//! same tick-by-tick state, no hidden randomness.

use partsim_types::{JobId, JobStatus, PartitionId, PartitionStatus};

use crate::alloc;
use crate::clock::ClockError;
use crate::sim::Simulation;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// Advance was requested after every job reached a terminal state.
    /// Nothing is mutated.
    #[error("simulation already complete: every job is done or too big")]
    AlreadyComplete,

    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSummary {
    /// The tick number that was executed (the pre-increment clock value).
    pub tick: u64,
    /// Jobs allocated this tick, with the partition each received.
    pub allocated: Vec<(JobId, PartitionId)>,
    /// Jobs that completed this tick, in completion order.
    pub completed: Vec<JobId>,
    /// Jobs rejected this tick as too big for any partition.
    pub marked_too_big: Vec<JobId>,
    /// Jobs still pending at the end of the tick.
    pub pending_count: usize,
}

/// Execute one complete tick of the simulation.
///
/// # Errors
///
/// Returns [`TickError::AlreadyComplete`] (before any mutation) when
/// [`Simulation::all_done`] already holds, or [`TickError::Clock`] on
/// tick-counter overflow.
pub fn run_tick(sim: &mut Simulation) -> Result<TickSummary, TickError> {
    if sim.all_done() {
        return Err(TickError::AlreadyComplete);
    }

    let tick = sim.clock.tick();

    // --- Phase 1: allocation pass ---
    let (allocated, marked_too_big) = phase_allocation(sim, tick);

    // --- Phase 2: running-job advance ---
    let completed = phase_run_running(sim, tick);

    // --- Phase 3: waiting bookkeeping ---
    phase_waiting(sim);

    // --- Phase 4: clock advance ---
    sim.clock.advance()?;

    let summary = TickSummary {
        tick,
        allocated,
        completed,
        marked_too_big,
        pending_count: sim.pending.len(),
    };

    tracing::info!(
        tick,
        allocated = summary.allocated.len(),
        completed = summary.completed.len(),
        too_big = summary.marked_too_big.len(),
        pending = summary.pending_count,
        "Tick executed"
    );

    Ok(summary)
}

/// Phase 1: try to place every pending job.
///
/// Iterates over a snapshot of the queue membership, so a job allocated
/// this tick is not also evaluated as still-waiting later in the same
/// pass. Each job is placed, rejected as too big (checked against the
/// full partition set, busy ones included), or left pending.
fn phase_allocation(
    sim: &mut Simulation,
    tick: u64,
) -> (Vec<(JobId, PartitionId)>, Vec<JobId>) {
    let mut allocated = Vec::new();
    let mut marked_too_big = Vec::new();

    let pass: Vec<usize> = sim.pending.iter().copied().collect();
    for job_idx in pass {
        let Some(job) = sim.jobs.get(job_idx) else {
            continue;
        };
        let job_id = job.id;
        let job_size = job.size;

        if let Some(partition_id) = alloc::choose_partition(sim.strategy, job_size, &sim.partitions)
        {
            let partition_size = sim
                .partition_mut(partition_id)
                .map(|p| p.size)
                .unwrap_or_default();

            if let Some(job) = sim.jobs.get_mut(job_idx) {
                job.status = JobStatus::Running;
                // Allocation always (re)starts the countdown at the full
                // run time, regardless of any prior partial progress.
                job.remaining = job.run_time;
                job.assigned_partition = Some(partition_id);
            }
            if let Some(partition) = sim.partition_mut(partition_id) {
                partition.status = PartitionStatus::Busy;
                partition.resident_job = Some(job_id);
                partition.use_count = partition.use_count.saturating_add(1);
            }

            sim.log.record(
                tick,
                format!(
                    "Job {job_id} (size={job_size}) allocated to Partition {partition_id} (size={partition_size})"
                ),
            );
            sim.pending.retain(|&i| i != job_idx);
            allocated.push((job_id, partition_id));
        } else {
            let max_size = alloc::max_partition_size(&sim.partitions).unwrap_or(0);
            if job_size > max_size {
                if let Some(job) = sim.jobs.get_mut(job_idx) {
                    job.status = JobStatus::TooBig;
                }
                sim.log.record(
                    tick,
                    format!(
                        "Job {job_id} (size={job_size}) marked as TOO BIG - largest partition is {max_size}"
                    ),
                );
                sim.pending.retain(|&i| i != job_idx);
                marked_too_big.push(job_id);
            } else {
                sim.log.record(
                    tick,
                    format!("Job {job_id} (size={job_size}) waiting - no suitable partition available"),
                );
            }
        }
    }

    (allocated, marked_too_big)
}

/// Phase 2: advance every running job by one tick.
///
/// Partitions are visited in id order. A job whose countdown reaches 0
/// completes: its `completion_tick` records the pre-increment clock, it
/// joins the completed list in this order, and its partition frees
/// (`use_count` untouched).
fn phase_run_running(sim: &mut Simulation, tick: u64) -> Vec<JobId> {
    let mut finished = Vec::new();

    for partition_idx in 0..sim.partitions.len() {
        let Some(partition) = sim.partitions.get(partition_idx) else {
            continue;
        };
        if partition.status != PartitionStatus::Busy {
            continue;
        }
        let partition_id = partition.id;
        let Some(job_id) = partition.resident_job else {
            continue;
        };
        let Some(job_idx) = sim.job_position(job_id) else {
            continue;
        };

        let mut done = false;
        if let Some(job) = sim.jobs.get_mut(job_idx) {
            job.remaining = job.remaining.saturating_sub(1);
            if job.remaining == 0 {
                job.status = JobStatus::Done;
                job.completion_tick = Some(tick);
                done = true;
            }
        }

        if done {
            sim.completed.push(job_idx);
            if let Some(partition) = sim.partitions.get_mut(partition_idx) {
                partition.status = PartitionStatus::Free;
                partition.resident_job = None;
            }
            sim.log.record(
                tick,
                format!("Job {job_id} completed, Partition {partition_id} freed"),
            );
            finished.push(job_id);
        }
    }

    finished
}

/// Phase 3: jobs still pending accrue one tick of wait time and become
/// `Waiting`.
fn phase_waiting(sim: &mut Simulation) {
    let still_pending: Vec<usize> = sim.pending.iter().copied().collect();
    for job_idx in still_pending {
        if let Some(job) = sim.jobs.get_mut(job_idx) {
            job.wait_time = job.wait_time.saturating_add(1);
            job.status = JobStatus::Waiting;
        }
    }
}
