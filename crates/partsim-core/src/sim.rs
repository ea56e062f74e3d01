//! The simulation instance: construction, queries, and lifecycle.
//!
//! [`Simulation`] owns every entity (jobs in input order, partitions in id
//! order), the pending queue, the clock, and the event log. The tick engine
//! in [`crate::tick`] mutates this state; everything exposed here is either
//! construction or a read-only projection.
//!
//! A simulation's parameters (job specs, partition sizes, strategy) are
//! immutable for its lifetime. Changing anything -- including the placement
//! strategy -- means building a fresh instance via [`Simulation::reset`] or
//! [`Simulation::new`]; no entity survives a reset.

use std::collections::{BTreeMap, VecDeque};

use partsim_types::{
    Job, JobId, JobRow, JobSpec, Partition, PartitionId, PartitionRow, StatisticsReport, Strategy,
};

use crate::clock::SimClock;
use crate::log::EventLog;
use crate::stats;
use crate::tick::{self, TickError, TickSummary};

/// Errors that can occur when constructing a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Malformed construction parameters. The instance is never partially
    /// constructed: validation runs before any entity is built.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Explanation of what is wrong with the parameters.
        reason: String,
    },
}

/// The construction parameters, retained verbatim so [`Simulation::reset`]
/// can rebuild an identical fresh instance.
#[derive(Debug, Clone)]
struct SimParams {
    /// Job specs in input order.
    jobs: Vec<JobSpec>,
    /// Partition sizes in input order.
    partition_sizes: Vec<u32>,
    /// Placement strategy.
    strategy: Strategy,
}

/// A fixed-partition memory allocation simulation.
#[derive(Debug, Clone)]
pub struct Simulation {
    /// Construction parameters, kept for reset.
    params: SimParams,
    /// Placement strategy, immutable for the instance's lifetime.
    pub(crate) strategy: Strategy,
    /// The tick counter.
    pub(crate) clock: SimClock,
    /// All jobs, in input (creation) order.
    pub(crate) jobs: Vec<Job>,
    /// All partitions, in id order (index == id).
    pub(crate) partitions: Vec<Partition>,
    /// Lookup from job id to index in `jobs`.
    pub(crate) job_index: BTreeMap<JobId, usize>,
    /// Indices (into `jobs`) of jobs not yet allocated and not too big,
    /// in FIFO arrival order.
    pub(crate) pending: VecDeque<usize>,
    /// Indices (into `jobs`) of completed jobs, in completion order.
    pub(crate) completed: Vec<usize>,
    /// Append-only event log.
    pub(crate) log: EventLog,
}

impl Simulation {
    /// Construct a simulation from job tuples, partition sizes, and a
    /// placement strategy, recording the initial log entry.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidInput`] if either sequence is empty, any
    /// size or run time is zero, a job id is duplicated, or the partition
    /// count exceeds the id space. Nothing is constructed on failure.
    pub fn new(
        jobs: Vec<JobSpec>,
        partition_sizes: Vec<u32>,
        strategy: Strategy,
    ) -> Result<Self, SimError> {
        validate(&jobs, &partition_sizes)?;

        let params = SimParams {
            jobs: jobs.clone(),
            partition_sizes: partition_sizes.clone(),
            strategy,
        };

        let jobs: Vec<Job> = jobs.into_iter().map(Job::from_spec).collect();

        let job_index: BTreeMap<JobId, usize> =
            jobs.iter().enumerate().map(|(i, j)| (j.id, i)).collect();

        let mut partitions = Vec::with_capacity(partition_sizes.len());
        for (i, size) in partition_sizes.into_iter().enumerate() {
            let id = u32::try_from(i).map_err(|_err| SimError::InvalidInput {
                reason: String::from("partition count exceeds the u32 id space"),
            })?;
            partitions.push(Partition::new(PartitionId::new(id), size));
        }

        let pending: VecDeque<usize> = (0..jobs.len()).collect();

        let mut log = EventLog::new();
        log.record(
            0,
            format!(
                "Simulation started with {} jobs and {} partitions using {} strategy",
                jobs.len(),
                partitions.len(),
                strategy
            ),
        );

        Ok(Self {
            params,
            strategy,
            clock: SimClock::new(),
            jobs,
            partitions,
            job_index,
            pending,
            completed: Vec::new(),
            log,
        })
    }

    /// Build a fresh simulation from this instance's original construction
    /// parameters. The current instance is untouched; no entity carries
    /// over.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidInput`] only if the retained parameters
    /// were somehow invalid, which construction already ruled out.
    pub fn reset(&self) -> Result<Self, SimError> {
        Self::new(
            self.params.jobs.clone(),
            self.params.partition_sizes.clone(),
            self.params.strategy,
        )
    }

    /// Advance the simulation by one tick.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::AlreadyComplete`] (without mutating anything)
    /// when every job is already done or too big, or
    /// [`TickError::Clock`] on tick-counter overflow.
    pub fn advance(&mut self) -> Result<TickSummary, TickError> {
        tick::run_tick(self)
    }

    /// Run ticks until [`Self::all_done`] holds. Returns the number of
    /// ticks executed; 0 when the simulation was already complete (which
    /// is not an error).
    ///
    /// Termination is guaranteed: every pending job either exceeds every
    /// partition (and is rejected on its first allocation pass) or fits
    /// some partition that a finite number of finite-run-time jobs can
    /// occupy ahead of it.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Clock`] on tick-counter overflow.
    pub fn run_to_completion(&mut self) -> Result<u64, TickError> {
        let mut executed: u64 = 0;
        while !self.all_done() {
            tick::run_tick(self)?;
            executed = executed.saturating_add(1);
        }
        Ok(executed)
    }

    /// True iff every job's status is terminal (done or too big). Pure
    /// query; once true it stays true without further [`Self::advance`]
    /// calls.
    pub fn all_done(&self) -> bool {
        self.jobs.iter().all(|j| j.status.is_terminal())
    }

    /// Current tick count. 0 at construction.
    pub const fn clock(&self) -> u64 {
        self.clock.tick()
    }

    /// The placement strategy this instance was constructed with.
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// All jobs, in creation order.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// All partitions, in id order.
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Number of jobs still in the pending queue.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Read-only projection of current state into display-ready rows, in
    /// creation order. Safe to call at any tick, including before the
    /// first [`Self::advance`].
    pub fn snapshot(&self) -> (Vec<JobRow>, Vec<PartitionRow>) {
        let job_rows = self
            .jobs
            .iter()
            .map(|j| JobRow {
                id: j.id,
                size: j.size,
                run_time: j.run_time,
                status: j.status,
                wait_time: j.wait_time,
                completion_tick: j.completion_tick,
            })
            .collect();

        let partition_rows = self
            .partitions
            .iter()
            .map(|p| PartitionRow {
                id: p.id,
                size: p.size,
                status: p.status,
                resident_job: p.resident_job,
                use_count: p.use_count,
            })
            .collect();

        (job_rows, partition_rows)
    }

    /// The most recent `count` log lines, oldest of the window first.
    /// `count == 0` yields an empty vector.
    pub fn recent_logs(&self, count: usize) -> Vec<String> {
        self.log.recent(count)
    }

    /// Aggregate and detailed metrics over completed-so-far data. Never an
    /// error: degenerates to zeroed fields when nothing has completed.
    pub fn statistics(&self) -> StatisticsReport {
        stats::compute(self)
    }

    /// Look up a partition by id. Index equals id by construction.
    pub(crate) fn partition_mut(&mut self, id: PartitionId) -> Option<&mut Partition> {
        usize::try_from(id.into_inner())
            .ok()
            .and_then(|i| self.partitions.get_mut(i))
    }

    /// Look up a job index by id.
    pub(crate) fn job_position(&self, id: JobId) -> Option<usize> {
        self.job_index.get(&id).copied()
    }
}

/// Validate construction parameters before anything is built.
fn validate(jobs: &[JobSpec], partition_sizes: &[u32]) -> Result<(), SimError> {
    if jobs.is_empty() {
        return Err(SimError::InvalidInput {
            reason: String::from("at least one job must be supplied"),
        });
    }
    if partition_sizes.is_empty() {
        return Err(SimError::InvalidInput {
            reason: String::from("at least one partition must be supplied"),
        });
    }

    let mut seen = std::collections::BTreeSet::new();
    for spec in jobs {
        if spec.size == 0 {
            return Err(SimError::InvalidInput {
                reason: format!("job {} has non-positive size", spec.id),
            });
        }
        if spec.run_time == 0 {
            return Err(SimError::InvalidInput {
                reason: format!("job {} has non-positive run time", spec.id),
            });
        }
        if !seen.insert(spec.id) {
            return Err(SimError::InvalidInput {
                reason: format!("duplicate job id: {}", spec.id),
            });
        }
    }

    for (i, &size) in partition_sizes.iter().enumerate() {
        if size == 0 {
            return Err(SimError::InvalidInput {
                reason: format!("partition {i} has non-positive size"),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use partsim_types::JobStatus;

    use super::*;

    fn spec(id: u32, size: u32, run_time: u64) -> JobSpec {
        JobSpec { id, size, run_time }
    }

    #[test]
    fn construction_builds_entities_in_input_order() {
        let sim = Simulation::new(
            vec![spec(5, 100, 2), spec(1, 200, 3)],
            vec![500, 300],
            Strategy::FirstFit,
        )
        .unwrap();

        let ids: Vec<JobId> = sim.jobs().iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![JobId::new(5), JobId::new(1)]);
        let pids: Vec<PartitionId> = sim.partitions().iter().map(|p| p.id).collect();
        assert_eq!(pids, vec![PartitionId::new(0), PartitionId::new(1)]);
        assert_eq!(sim.clock(), 0);
        assert_eq!(sim.pending_count(), 2);
        assert!(!sim.all_done());
    }

    #[test]
    fn construction_records_initial_log_entry() {
        let sim = Simulation::new(vec![spec(1, 100, 2)], vec![500], Strategy::BestFit).unwrap();
        let logs = sim.recent_logs(10);
        assert_eq!(
            logs,
            vec![String::from(
                "[T000] Simulation started with 1 jobs and 1 partitions using best-fit strategy"
            )]
        );
    }

    #[test]
    fn construction_rejects_empty_jobs() {
        let result = Simulation::new(vec![], vec![500], Strategy::FirstFit);
        assert!(result.is_err());
    }

    #[test]
    fn construction_rejects_empty_partitions() {
        let result = Simulation::new(vec![spec(1, 100, 2)], vec![], Strategy::FirstFit);
        assert!(result.is_err());
    }

    #[test]
    fn construction_rejects_zero_size() {
        let result = Simulation::new(vec![spec(1, 0, 2)], vec![500], Strategy::FirstFit);
        assert!(result.is_err());
    }

    #[test]
    fn construction_rejects_zero_run_time() {
        let result = Simulation::new(vec![spec(1, 100, 0)], vec![500], Strategy::FirstFit);
        assert!(result.is_err());
    }

    #[test]
    fn construction_rejects_zero_partition_size() {
        let result = Simulation::new(vec![spec(1, 100, 2)], vec![500, 0], Strategy::FirstFit);
        assert!(result.is_err());
    }

    #[test]
    fn construction_rejects_duplicate_job_ids() {
        let result = Simulation::new(
            vec![spec(1, 100, 2), spec(1, 200, 3)],
            vec![500],
            Strategy::FirstFit,
        );
        assert!(result.is_err());
    }

    #[test]
    fn snapshot_is_safe_before_first_advance() {
        let sim = Simulation::new(vec![spec(1, 100, 2)], vec![500], Strategy::FirstFit).unwrap();
        let (job_rows, partition_rows) = sim.snapshot();
        assert_eq!(job_rows.len(), 1);
        assert_eq!(partition_rows.len(), 1);
        assert_eq!(job_rows.first().map(|r| r.status), Some(JobStatus::New));
        assert_eq!(job_rows.first().and_then(|r| r.completion_tick), None);
    }

    #[test]
    fn reset_builds_a_fresh_instance_from_original_parameters() {
        let mut sim = Simulation::new(
            vec![spec(1, 100, 2), spec(2, 200, 1)],
            vec![500],
            Strategy::FirstFit,
        )
        .unwrap();
        sim.run_to_completion().unwrap();
        assert!(sim.all_done());

        let fresh = sim.reset().unwrap();
        assert_eq!(fresh.clock(), 0);
        assert!(!fresh.all_done());
        assert_eq!(fresh.pending_count(), 2);
        assert!(fresh.jobs().iter().all(|j| j.status == JobStatus::New));
        assert_eq!(fresh.strategy(), Strategy::FirstFit);
    }

    #[test]
    fn run_to_completion_on_finished_simulation_is_a_no_op() {
        let mut sim = Simulation::new(vec![spec(1, 100, 2)], vec![500], Strategy::FirstFit).unwrap();
        sim.run_to_completion().unwrap();
        let clock_before = sim.clock();
        assert_eq!(sim.run_to_completion().unwrap(), 0);
        assert_eq!(sim.clock(), clock_before);
    }
}
