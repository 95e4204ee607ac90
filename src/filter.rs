//! Month and day-of-week narrowing of a dataset.

use tracing::{debug, instrument};

use crate::criteria::{DayFilter, FilterCriteria, MonthFilter};
use crate::dataset::{Dataset, TripRecord};

/// Returns a new dataset with the trips matching `criteria`'s month and day.
///
/// The city has already been chosen by loading its source, so only month and
/// day are applied here. No match gives an empty dataset.
#[instrument(skip_all, fields(input = dataset.len(), criteria = %criteria))]
pub fn filter(dataset: &Dataset, criteria: &FilterCriteria) -> Dataset {
    let filtered = dataset.retain_view(|trip| matches(trip, criteria));
    debug!(kept = filtered.len(), "Applied trip filter");
    filtered
}

/// Whether `trip` satisfies both the month and the day selection.
pub fn matches(trip: &TripRecord, criteria: &FilterCriteria) -> bool {
    let month_ok = match criteria.month {
        MonthFilter::All => true,
        MonthFilter::Only(month) => trip.month() == month,
    };
    let day_ok = match criteria.day {
        DayFilter::All => true,
        DayFilter::Only(day) => trip.weekday() == day,
    };
    month_ok && day_ok
}
