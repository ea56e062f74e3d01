//! Enumeration types for the partsim simulator.
//!
//! Status enums carry their wire/display strings (`"too big"`, `"busy"`)
//! so snapshot tables and log lines render the same vocabulary the
//! dashboard frontend expects.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Job status
// ---------------------------------------------------------------------------

/// Lifecycle state of a job.
///
/// Progression is strict: `New` -> (`Waiting` until allocated) -> `Running`
/// -> `Done`, or `New` -> `TooBig` (terminal; allocation is never attempted
/// again once a job cannot fit any partition in the system).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum JobStatus {
    /// Created, not yet considered by an allocation pass.
    #[serde(rename = "new")]
    New,
    /// In the pending queue; no suitable partition was free.
    #[serde(rename = "waiting")]
    Waiting,
    /// Occupying a partition, counting down its run time.
    #[serde(rename = "running")]
    Running,
    /// Finished; `completion_tick` records when.
    #[serde(rename = "done")]
    Done,
    /// Larger than every partition in the system. Terminal.
    #[serde(rename = "too big")]
    TooBig,
}

impl JobStatus {
    /// True for the two terminal states (`Done` and `TooBig`).
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::TooBig)
    }
}

impl core::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::New => "new",
            Self::Waiting => "waiting",
            Self::Running => "running",
            Self::Done => "done",
            Self::TooBig => "too big",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Partition status
// ---------------------------------------------------------------------------

/// Occupancy state of a memory partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum PartitionStatus {
    /// No job is resident.
    #[serde(rename = "free")]
    Free,
    /// A job is resident and running.
    #[serde(rename = "busy")]
    Busy,
}

impl core::fmt::Display for PartitionStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::Free => "free",
            Self::Busy => "busy",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Placement strategy
// ---------------------------------------------------------------------------

/// Error returned when a strategy string is not one of the two recognized
/// values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized strategy: {input} (expected \"first-fit\" or \"best-fit\")")]
pub struct ParseStrategyError {
    /// The rejected input string.
    pub input: String,
}

/// Partition placement strategy, fixed for the lifetime of a simulation.
///
/// Changing strategy requires constructing a new simulation from the same
/// parameters; there is no mutable strategy state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Strategy {
    /// Scan partitions in ascending id order, take the first free one that
    /// is large enough.
    #[default]
    #[serde(rename = "first-fit")]
    FirstFit,
    /// Among free partitions large enough, take the smallest; ties break to
    /// the lowest id for reproducible runs.
    #[serde(rename = "best-fit")]
    BestFit,
}

impl core::fmt::Display for Strategy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::FirstFit => "first-fit",
            Self::BestFit => "best-fit",
        };
        write!(f, "{s}")
    }
}

impl core::str::FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-fit" => Ok(Self::FirstFit),
            "best-fit" => Ok(Self::BestFit),
            other => Err(ParseStrategyError {
                input: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_status_display_strings() {
        assert_eq!(JobStatus::New.to_string(), "new");
        assert_eq!(JobStatus::Waiting.to_string(), "waiting");
        assert_eq!(JobStatus::Running.to_string(), "running");
        assert_eq!(JobStatus::Done.to_string(), "done");
        assert_eq!(JobStatus::TooBig.to_string(), "too big");
    }

    #[test]
    fn terminal_states() {
        assert!(JobStatus::Done.is_terminal());
        assert!(JobStatus::TooBig.is_terminal());
        assert!(!JobStatus::New.is_terminal());
        assert!(!JobStatus::Waiting.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
    }

    #[test]
    fn status_serde_uses_wire_strings() {
        assert_eq!(
            serde_json::to_string(&JobStatus::TooBig).ok(),
            Some(String::from("\"too big\""))
        );
        assert_eq!(
            serde_json::to_string(&PartitionStatus::Free).ok(),
            Some(String::from("\"free\""))
        );
    }

    #[test]
    fn strategy_parses_recognized_values() {
        assert_eq!("first-fit".parse::<Strategy>().ok(), Some(Strategy::FirstFit));
        assert_eq!("best-fit".parse::<Strategy>().ok(), Some(Strategy::BestFit));
    }

    #[test]
    fn strategy_rejects_unknown_values() {
        let err = "worst-fit".parse::<Strategy>();
        assert!(err.is_err());
    }

    #[test]
    fn strategy_display_roundtrips_through_parse() {
        for strategy in [Strategy::FirstFit, Strategy::BestFit] {
            assert_eq!(strategy.to_string().parse::<Strategy>().ok(), Some(strategy));
        }
    }
}
