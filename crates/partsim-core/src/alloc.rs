//! Partition placement strategies.
//!
//! Pure selection logic: given a job's memory demand and the partition set,
//! pick the partition the active strategy prescribes, or report that none
//! fits right now. No side effects; the tick engine performs all mutation.
//!
//! Both strategies rely on the simulation invariant that partitions are
//! stored in ascending id order (ids are assigned from construction
//! position), so a plain front-to-back scan *is* the id-ordered scan.

use partsim_types::{Partition, PartitionId, Strategy};

/// Select a partition for a job of `job_size` KB, or `None` when no free
/// partition is currently large enough.
///
/// `None` means "no fit this tick" -- the caller separately decides whether
/// the job can never fit (see [`max_partition_size`]).
///
/// - **First-fit** scans in ascending id order and takes the first free
///   partition with `size >= job_size`.
/// - **Best-fit** takes the smallest free partition with
///   `size >= job_size`; among equal-size candidates the lowest id wins,
///   so repeated calls on identical state always pick the same partition.
pub fn choose_partition(
    strategy: Strategy,
    job_size: u32,
    partitions: &[Partition],
) -> Option<PartitionId> {
    match strategy {
        Strategy::FirstFit => first_fit(job_size, partitions),
        Strategy::BestFit => best_fit(job_size, partitions),
    }
}

/// First free partition, in id order, large enough for the job.
fn first_fit(job_size: u32, partitions: &[Partition]) -> Option<PartitionId> {
    partitions
        .iter()
        .find(|p| p.is_free() && p.size >= job_size)
        .map(|p| p.id)
}

/// Smallest free partition large enough for the job; lowest id on ties.
///
/// The strict `<` comparison over an id-ordered scan keeps the first
/// (lowest-id) partition among equal-size candidates.
fn best_fit(job_size: u32, partitions: &[Partition]) -> Option<PartitionId> {
    let mut best: Option<&Partition> = None;
    for partition in partitions {
        if !partition.is_free() || partition.size < job_size {
            continue;
        }
        match best {
            Some(current) if partition.size >= current.size => {}
            _ => best = Some(partition),
        }
    }
    best.map(|p| p.id)
}

/// Size of the largest partition in the system, busy ones included.
///
/// A job larger than this can never be allocated and is marked too big by
/// the tick engine. Returns `None` only for an empty partition set, which
/// the simulation constructor rules out.
pub fn max_partition_size(partitions: &[Partition]) -> Option<u32> {
    partitions.iter().map(|p| p.size).max()
}

#[cfg(test)]
mod tests {
    use partsim_types::{JobId, PartitionStatus};

    use super::*;

    fn make_partitions(sizes: &[u32]) -> Vec<Partition> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| Partition::new(PartitionId::new(u32::try_from(i).unwrap_or(0)), size))
            .collect()
    }

    #[test]
    fn first_fit_takes_first_large_enough() {
        let partitions = make_partitions(&[500, 2000]);
        let chosen = choose_partition(Strategy::FirstFit, 400, &partitions);
        assert_eq!(chosen, Some(PartitionId::new(0)));
    }

    #[test]
    fn first_fit_is_deterministic_across_repeated_calls() {
        let partitions = make_partitions(&[500, 2000]);
        for _ in 0..10 {
            assert_eq!(
                choose_partition(Strategy::FirstFit, 400, &partitions),
                Some(PartitionId::new(0))
            );
        }
    }

    #[test]
    fn first_fit_skips_busy_partitions() {
        let mut partitions = make_partitions(&[500, 2000]);
        if let Some(p) = partitions.first_mut() {
            p.status = PartitionStatus::Busy;
            p.resident_job = Some(JobId::new(9));
        }
        let chosen = choose_partition(Strategy::FirstFit, 400, &partitions);
        assert_eq!(chosen, Some(PartitionId::new(1)));
    }

    #[test]
    fn best_fit_takes_smallest_fit() {
        let partitions = make_partitions(&[9500, 4500, 3000]);
        let chosen = choose_partition(Strategy::BestFit, 2900, &partitions);
        assert_eq!(chosen, Some(PartitionId::new(2)));
    }

    #[test]
    fn best_fit_breaks_size_ties_to_lowest_id() {
        let partitions = make_partitions(&[1000, 1000]);
        for _ in 0..10 {
            assert_eq!(
                choose_partition(Strategy::BestFit, 800, &partitions),
                Some(PartitionId::new(0))
            );
        }
    }

    #[test]
    fn no_fit_returns_none() {
        let partitions = make_partitions(&[500]);
        assert_eq!(choose_partition(Strategy::FirstFit, 600, &partitions), None);
        assert_eq!(choose_partition(Strategy::BestFit, 600, &partitions), None);
    }

    #[test]
    fn all_busy_returns_none_even_when_sizes_fit() {
        let mut partitions = make_partitions(&[500, 2000]);
        for p in &mut partitions {
            p.status = PartitionStatus::Busy;
        }
        assert_eq!(choose_partition(Strategy::FirstFit, 400, &partitions), None);
        assert_eq!(choose_partition(Strategy::BestFit, 400, &partitions), None);
    }

    #[test]
    fn max_partition_size_scans_full_set() {
        let mut partitions = make_partitions(&[500, 9000, 2000]);
        // Busy partitions still count: "too big" means bigger than every
        // partition in the system, not just the free ones.
        for p in &mut partitions {
            p.status = PartitionStatus::Busy;
        }
        assert_eq!(max_partition_size(&partitions), Some(9000));
    }
}
