//! Statistics fragments produced by the aggregators.

use chrono::{Month, TimeDelta, Weekday};
use serde::{Serialize, Serializer};
use std::fmt;

/// A value together with how many trips carried it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tally<T> {
    pub value: T,
    pub count: usize,
}

impl<T> Tally<T> {
    pub fn new(value: T, count: usize) -> Self {
        Self { value, count }
    }
}

/// Most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemporalStats {
    pub month: Tally<Month>,
    pub weekday: Tally<Weekday>,
    /// Hour of day, 0-23.
    pub start_hour: Tally<u32>,
}

/// Most popular stations and trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub start_station: Tally<String>,
    pub end_station: Tally<String>,
    /// `"<start> and <end>"` label of the most frequent pairing.
    pub station_pair: Tally<String>,
}

/// Total and average trip length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub trips: usize,
    #[serde(rename = "total_seconds", serialize_with = "serialize_seconds")]
    pub total: TimeDelta,
    /// `None` when there are no trips to average over.
    #[serde(rename = "mean_seconds", serialize_with = "serialize_opt_seconds")]
    pub mean: Option<TimeDelta>,
}

/// Rider category as recorded in the source.
///
/// Rows with no user type are counted under [`UserType::Unspecified`] rather
/// than dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserType {
    Known(String),
    Unspecified,
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserType::Known(name) => f.write_str(name),
            UserType::Unspecified => f.write_str("Unspecified"),
        }
    }
}

impl Serialize for UserType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Trip counts per user type, highest first.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UserTypeStats {
    pub counts: Vec<Tally<UserType>>,
}

impl UserTypeStats {
    pub fn total(&self) -> usize {
        self.counts.iter().map(|t| t.count).sum()
    }
}

/// Trip counts per recorded gender, highest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderCounts {
    pub counts: Vec<Tally<String>>,
}

/// Earliest, most recent, and most common birth year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub min: i32,
    pub max: i32,
    pub mode: i32,
}

fn seconds(delta: &TimeDelta) -> f64 {
    delta.num_milliseconds() as f64 / 1000.0
}

fn serialize_seconds<S: Serializer>(delta: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(seconds(delta))
}

fn serialize_opt_seconds<S: Serializer>(
    delta: &Option<TimeDelta>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match delta {
        Some(d) => serializer.serialize_some(&seconds(d)),
        None => serializer.serialize_none(),
    }
}
