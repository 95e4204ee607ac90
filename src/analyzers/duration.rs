use chrono::TimeDelta;

use crate::analyzers::types::DurationStats;
use crate::dataset::{Dataset, TripRecord};
use crate::error::{Result, StatsError};

/// Sum of every trip's signed duration. Zero for an empty dataset.
pub fn total_duration(dataset: &Dataset) -> TimeDelta {
    dataset
        .iter()
        .map(TripRecord::duration)
        .fold(TimeDelta::zero(), |acc, d| acc + d)
}

/// Arithmetic mean trip duration, to millisecond precision.
///
/// # Errors
///
/// Returns [`StatsError::EmptyDataset`] when there are no trips.
pub fn mean_duration(dataset: &Dataset) -> Result<TimeDelta> {
    if dataset.is_empty() {
        return Err(StatsError::EmptyDataset {
            statistic: "mean trip duration",
        });
    }

    let total_ms = total_duration(dataset).num_milliseconds();
    Ok(TimeDelta::milliseconds(total_ms / dataset.len() as i64))
}

pub fn duration_stats(dataset: &Dataset) -> DurationStats {
    DurationStats {
        trips: dataset.len(),
        total: total_duration(dataset),
        mean: mean_duration(dataset).ok(),
    }
}
