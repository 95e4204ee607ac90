use crate::analyzers::types::{StationStats, Tally};
use crate::analyzers::utility::mode_of;
use crate::dataset::{Dataset, TripRecord};
use crate::error::Result;

/// Joins start and end station names into a single trip label.
pub const PAIR_SEPARATOR: &str = " and ";

pub fn station_pair_label(trip: &TripRecord) -> String {
    format!("{}{PAIR_SEPARATOR}{}", trip.start_station(), trip.end_station())
}

pub fn most_common_start_station(dataset: &Dataset) -> Result<Tally<String>> {
    mode_of(dataset, "most common start station", |t| {
        t.start_station().to_string()
    })
}

pub fn most_common_end_station(dataset: &Dataset) -> Result<Tally<String>> {
    mode_of(dataset, "most common end station", |t| {
        t.end_station().to_string()
    })
}

pub fn most_common_station_pair(dataset: &Dataset) -> Result<Tally<String>> {
    mode_of(dataset, "most common station pair", station_pair_label)
}

pub fn station_stats(dataset: &Dataset) -> Result<StationStats> {
    Ok(StationStats {
        start_station: most_common_start_station(dataset)?,
        end_station: most_common_end_station(dataset)?,
        station_pair: most_common_station_pair(dataset)?,
    })
}
