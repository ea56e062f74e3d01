//! End-of-run statistics, computable at any tick.
//!
//! All metrics are derived from completed-so-far data: requesting
//! statistics on an in-progress simulation is never an error, the means
//! simply degrade to zero while nothing has completed. Fractional values
//! use [`Decimal`] so identical runs produce identical reports, digit for
//! digit.
//!
//! The detailed breakdown shows the arithmetic behind each number. It is
//! derived from exactly the same counts and means as the numeric fields --
//! presentation only, no extra computation.

use rust_decimal::Decimal;

use partsim_types::{Job, JobStatus, StatisticsDetails, StatisticsReport};

use crate::sim::Simulation;

/// Compute the full statistics report for the simulation's current state.
pub(crate) fn compute(sim: &Simulation) -> StatisticsReport {
    let completed_jobs: Vec<&Job> = sim
        .completed
        .iter()
        .filter_map(|&i| sim.jobs.get(i))
        .collect();
    let total_jobs = sim.jobs.len();

    let throughput = u64::try_from(completed_jobs.len()).unwrap_or(u64::MAX);
    let too_big_count = u64::try_from(
        sim.jobs
            .iter()
            .filter(|j| j.status == JobStatus::TooBig)
            .count(),
    )
    .unwrap_or(u64::MAX);

    let wait_times: Vec<u64> = completed_jobs.iter().map(|j| j.wait_time).collect();
    let avg_wait_time = mean(&wait_times);

    let used_partitions = sim.partitions.iter().filter(|p| p.use_count > 0).count();
    let total_partitions = sim.partitions.len();
    let utilization_pct = percentage(used_partitions, total_partitions);

    let mut frag_values = Vec::new();
    let mut fragmentation_details = Vec::new();
    for job in &completed_jobs {
        let Some(partition) = job
            .assigned_partition
            .map(u32::from)
            .and_then(|raw| usize::try_from(raw).ok())
            .and_then(|i| sim.partitions.get(i))
        else {
            continue;
        };
        let frag = u64::from(partition.size.saturating_sub(job.size));
        frag_values.push(frag);
        fragmentation_details.push(format!(
            "Job {}: {} - {} = {frag}",
            job.id, partition.size, job.size
        ));
    }
    let avg_internal_frag = mean(&frag_values);

    let mut throughput_calc = format!(
        "Throughput = {} jobs completed (out of {total_jobs} total jobs)",
        completed_jobs.len()
    );
    if too_big_count > 0 {
        throughput_calc
            .push_str(&format!("\n   Note: {too_big_count} jobs were too big for any partition"));
    }

    let wait_time_calc = if wait_times.is_empty() {
        String::from("Avg Wait Time = 0 (no completed jobs)")
    } else {
        format!("Avg Wait Time = {avg_wait_time:.2} ticks (from jobs: {wait_times:?})")
    };

    let utilization_calc = format!(
        "Utilization = {used_partitions}/{total_partitions} partitions used = {utilization_pct:.1}%"
    );

    let fragmentation_calc = if frag_values.is_empty() {
        String::from("Avg Fragmentation = 0 (no completed jobs)")
    } else {
        format!("Avg Fragmentation = {avg_internal_frag:.2} KB")
    };

    let partition_usage = sim
        .partitions
        .iter()
        .map(|p| format!("Partition {} (size={}): used {} times", p.id, p.size, p.use_count))
        .collect();

    StatisticsReport {
        strategy: sim.strategy,
        throughput,
        avg_wait_time,
        utilization_pct,
        avg_internal_frag,
        too_big_count,
        details: StatisticsDetails {
            throughput_calc,
            wait_time_calc,
            utilization_calc,
            fragmentation_calc,
            fragmentation_details,
            partition_usage,
        },
    }
}

/// Arithmetic mean of the values, or zero for an empty slice.
fn mean(values: &[u64]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let sum = values.iter().fold(0_u64, |acc, &v| acc.saturating_add(v));
    let count = u64::try_from(values.len()).unwrap_or(u64::MAX);
    Decimal::from(sum)
        .checked_div(Decimal::from(count))
        .unwrap_or(Decimal::ZERO)
}

/// `numerator / denominator * 100`, or zero when the denominator is zero.
fn percentage(numerator: usize, denominator: usize) -> Decimal {
    if denominator == 0 {
        return Decimal::ZERO;
    }
    let numerator = u64::try_from(numerator).unwrap_or(u64::MAX);
    let denominator = u64::try_from(denominator).unwrap_or(u64::MAX);
    Decimal::from(numerator)
        .checked_div(Decimal::from(denominator))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}
