use chrono::{Month, Weekday};

use crate::analyzers::types::{Tally, TemporalStats};
use crate::analyzers::utility::mode_of;
use crate::dataset::{Dataset, TripRecord};
use crate::error::Result;

pub fn most_common_month(dataset: &Dataset) -> Result<Tally<Month>> {
    mode_of(dataset, "most common month", TripRecord::month)
}

pub fn most_common_weekday(dataset: &Dataset) -> Result<Tally<Weekday>> {
    mode_of(dataset, "most common weekday", TripRecord::weekday)
}

pub fn most_common_start_hour(dataset: &Dataset) -> Result<Tally<u32>> {
    mode_of(dataset, "most common start hour", TripRecord::start_hour)
}

/// Most frequent month, weekday, and start hour.
///
/// # Errors
///
/// Returns [`crate::error::StatsError::EmptyDataset`] when the dataset has no
/// trips.
pub fn temporal_stats(dataset: &Dataset) -> Result<TemporalStats> {
    Ok(TemporalStats {
        month: most_common_month(dataset)?,
        weekday: most_common_weekday(dataset)?,
        start_hour: most_common_start_hour(dataset)?,
    })
}
