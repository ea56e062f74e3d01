//! Core entity structs for the partsim simulator.
//!
//! [`Job`] and [`Partition`] are passive records: the tick engine in
//! `partsim-core` mutates them in place, nothing here carries decision
//! logic. The cross-references between them (`assigned_partition`,
//! `resident_job`) are plain id values, never owning handles, so the
//! owning collections in the simulation stay the single source of truth.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{JobStatus, PartitionStatus, Strategy};
use crate::ids::{JobId, PartitionId};

// ---------------------------------------------------------------------------
// Input specification
// ---------------------------------------------------------------------------

/// Caller-supplied description of one job: the `(id, size, run_time)`
/// tuple of the construction interface.
///
/// `size` is the memory demand in KB; `run_time` is the number of ticks the
/// job occupies a partition once running. Both must be positive; the
/// simulation constructor rejects zeroes and duplicate ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct JobSpec {
    /// Caller-chosen unique job identifier.
    pub id: u32,
    /// Memory demand in KB.
    pub size: u32,
    /// Ticks required once running.
    pub run_time: u64,
}

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// A job moving through the simulation lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Job {
    /// Unique, stable identity.
    pub id: JobId,
    /// Memory demand in KB.
    pub size: u32,
    /// Ticks required once running.
    pub run_time: u64,
    /// Ticks left while running. Reset to `run_time` at allocation time.
    pub remaining: u64,
    /// Accumulated ticks spent waiting in the pending queue.
    pub wait_time: u64,
    /// Tick during which the job finished. Set exactly once, iff `Done`.
    pub completion_tick: Option<u64>,
    /// Current lifecycle state.
    pub status: JobStatus,
    /// The partition the job was allocated to. Set once at allocation and
    /// never cleared, so fragmentation accounting works after the partition
    /// frees.
    pub assigned_partition: Option<PartitionId>,
}

impl Job {
    /// Create a fresh job from its input specification.
    pub const fn from_spec(spec: JobSpec) -> Self {
        Self {
            id: JobId::new(spec.id),
            size: spec.size,
            run_time: spec.run_time,
            remaining: spec.run_time,
            wait_time: 0,
            completion_tick: None,
            status: JobStatus::New,
            assigned_partition: None,
        }
    }

    /// True while the job is still in the pending queue (`New` or
    /// `Waiting`).
    pub const fn is_pending(&self) -> bool {
        matches!(self.status, JobStatus::New | JobStatus::Waiting)
    }
}

// ---------------------------------------------------------------------------
// Partition
// ---------------------------------------------------------------------------

/// A fixed-size memory partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Partition {
    /// Identity, fixed at construction from position in the size list.
    pub id: PartitionId,
    /// Capacity in KB, fixed at construction.
    pub size: u32,
    /// Occupancy state.
    pub status: PartitionStatus,
    /// The resident job, present iff `Busy`.
    pub resident_job: Option<JobId>,
    /// How many times this partition transitioned free -> busy. Never
    /// decremented; equals the number of jobs ever hosted.
    pub use_count: u32,
}

impl Partition {
    /// Create a free partition with the given identity and capacity.
    pub const fn new(id: PartitionId, size: u32) -> Self {
        Self {
            id,
            size,
            status: PartitionStatus::Free,
            resident_job: None,
            use_count: 0,
        }
    }

    /// True when no job is resident.
    pub fn is_free(&self) -> bool {
        self.status == PartitionStatus::Free
    }
}

// ---------------------------------------------------------------------------
// Snapshot rows
// ---------------------------------------------------------------------------

/// Display-ready projection of one job, in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct JobRow {
    /// Job identity.
    pub id: JobId,
    /// Memory demand in KB.
    pub size: u32,
    /// Ticks required once running.
    pub run_time: u64,
    /// Current lifecycle state.
    pub status: JobStatus,
    /// Accumulated waiting ticks.
    pub wait_time: u64,
    /// Completion tick, absent until the job finishes.
    pub completion_tick: Option<u64>,
}

/// Display-ready projection of one partition, in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PartitionRow {
    /// Partition identity.
    pub id: PartitionId,
    /// Capacity in KB.
    pub size: u32,
    /// Occupancy state.
    pub status: PartitionStatus,
    /// Resident job id, absent when free.
    pub resident_job: Option<JobId>,
    /// Free -> busy transition count.
    pub use_count: u32,
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Textual derivations of each statistic: the arithmetic shown, one
/// fragmentation line per completed job, and one usage line per partition.
///
/// Presentation aids only -- every string is derived from the same counts
/// and means as the numeric fields of [`StatisticsReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StatisticsDetails {
    /// Throughput derivation, with a note when jobs were too big.
    pub throughput_calc: String,
    /// Average wait time derivation listing the sampled values.
    pub wait_time_calc: String,
    /// Utilization derivation (`used/total` and the percentage).
    pub utilization_calc: String,
    /// Average internal fragmentation derivation.
    pub fragmentation_calc: String,
    /// One `Job N: partition - size = frag` line per completed job.
    pub fragmentation_details: Vec<String>,
    /// One `Partition N (size=S): used K times` line per partition.
    pub partition_usage: Vec<String>,
}

/// Aggregate end-of-run (or run-so-far) metrics.
///
/// All fields degrade to zeroes when nothing has completed; requesting
/// statistics on an in-progress simulation is never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StatisticsReport {
    /// The placement strategy the run used.
    pub strategy: Strategy,
    /// Count of completed jobs (too-big jobs excluded).
    pub throughput: u64,
    /// Mean wait time over completed jobs, 0 when none completed.
    #[ts(as = "String")]
    pub avg_wait_time: Decimal,
    /// Percentage of partitions with `use_count > 0`.
    #[ts(as = "String")]
    pub utilization_pct: Decimal,
    /// Mean internal fragmentation (partition size - job size) over
    /// completed jobs, 0 when none completed.
    #[ts(as = "String")]
    pub avg_internal_frag: Decimal,
    /// Count of jobs rejected as too big for any partition.
    pub too_big_count: u64,
    /// Textual derivations of the numbers above.
    pub details: StatisticsDetails,
}
