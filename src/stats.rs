use serde::Serialize;
use tracing::{debug, instrument};

use crate::analyzers::duration::duration_stats;
use crate::analyzers::station::station_stats;
use crate::analyzers::temporal::temporal_stats;
use crate::analyzers::types::{
    BirthYearStats, DurationStats, GenderCounts, StationStats, TemporalStats, UserTypeStats,
};
use crate::analyzers::users::{birth_year_stats, gender_counts, user_type_counts};
use crate::criteria::FilterCriteria;
use crate::dataset::Dataset;
use crate::error::{Result, StatsError};

/// One section of a [`StatisticsReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Fragment<T> {
    Ready(T),
    /// The statistic has no trips (or no values) to work from.
    NoData,
    /// The source has no column this statistic is built from.
    NotAvailable,
}

impl<T> Fragment<T> {
    /// Maps an aggregator result, turning an empty dataset into
    /// [`Fragment::NoData`]. Any other error is passed back.
    pub fn from_result(result: Result<T>) -> Result<Self> {
        match result {
            Ok(value) => Ok(Fragment::Ready(value)),
            Err(StatsError::EmptyDataset { statistic }) => {
                debug!(statistic, "No trips for statistic");
                Ok(Fragment::NoData)
            }
            Err(e) => Err(e),
        }
    }

    /// `NotAvailable` when the column is missing, otherwise `Ready` or `NoData`.
    pub fn from_optional(column_present: bool, value: Option<T>) -> Self {
        match (column_present, value) {
            (false, _) => Fragment::NotAvailable,
            (true, Some(value)) => Fragment::Ready(value),
            (true, None) => Fragment::NoData,
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Fragment::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Fragment::Ready(_))
    }
}

/// Rider demographics; each part depends on its own optional column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemographicStats {
    pub gender: Fragment<GenderCounts>,
    pub birth_year: Fragment<BirthYearStats>,
}

/// Everything computed for one city/month/day selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsReport {
    pub criteria: FilterCriteria,
    pub trips: usize,
    pub temporal: Fragment<TemporalStats>,
    pub stations: Fragment<StationStats>,
    pub duration: DurationStats,
    pub user_types: Fragment<UserTypeStats>,
    pub demographics: DemographicStats,
}

impl StatisticsReport {
    /// Runs every aggregator over an already filtered dataset.
    ///
    /// Fragments are independent of each other. An empty dataset never
    /// fails the report; the affected fragments come back as
    /// [`Fragment::NoData`].
    #[instrument(skip_all, fields(trips = dataset.len(), criteria = %criteria))]
    pub fn build(dataset: &Dataset, criteria: &FilterCriteria) -> Result<Self> {
        let columns = dataset.columns();

        let user_types = if columns.user_type {
            Fragment::Ready(user_type_counts(dataset))
        } else {
            Fragment::NotAvailable
        };

        let report = StatisticsReport {
            criteria: *criteria,
            trips: dataset.len(),
            temporal: Fragment::from_result(temporal_stats(dataset))?,
            stations: Fragment::from_result(station_stats(dataset))?,
            duration: duration_stats(dataset),
            user_types,
            demographics: DemographicStats {
                gender: Fragment::from_optional(columns.gender, gender_counts(dataset)),
                birth_year: Fragment::from_optional(columns.birth_year, birth_year_stats(dataset)),
            },
        };

        debug!(
            temporal = report.temporal.is_ready(),
            stations = report.stations.is_ready(),
            gender = report.demographics.gender.is_ready(),
            birth_year = report.demographics.birth_year.is_ready(),
            "Statistics report assembled"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::{Tally, UserType};
    use crate::criteria::City;
    use crate::dataset::TripRecord;
    use crate::parser::SourceColumns;
    use chrono::{Month, NaiveDateTime, TimeDelta};

    #[test]
    fn test_build_full_report() {
        let dataset = Dataset::new(
            SourceColumns::ALL,
            vec![
                trip("2017-01-02 08:00:00", 10, "A", "B")
                    .with_user_type(Some("Subscriber".into()))
                    .with_gender(Some("Male".into()))
                    .with_birth_year(Some(1990)),
                trip("2017-01-03 09:00:00", 20, "A", "C")
                    .with_user_type(Some("Customer".into()))
                    .with_birth_year(Some(1985)),
                trip("2017-02-02 08:30:00", 30, "B", "B")
                    .with_user_type(Some("Subscriber".into()))
                    .with_gender(Some("Female".into()))
                    .with_birth_year(Some(1990)),
            ],
        );
        let report = StatisticsReport::build(&dataset, &criteria()).unwrap();

        assert_eq!(report.trips, 3);

        let temporal = report.temporal.ready().unwrap();
        assert_eq!(temporal.month, Tally::new(Month::January, 2));
        assert_eq!(temporal.start_hour, Tally::new(8, 2));

        let stations = report.stations.ready().unwrap();
        assert_eq!(stations.start_station, Tally::new("A".to_string(), 2));
        assert_eq!(stations.station_pair, Tally::new("A and B".to_string(), 1));

        assert_eq!(report.duration.total, TimeDelta::minutes(60));
        assert_eq!(report.duration.mean, Some(TimeDelta::minutes(20)));

        let users = report.user_types.ready().unwrap();
        assert_eq!(
            users.counts[0],
            Tally::new(UserType::Known("Subscriber".into()), 2)
        );

        let gender = report.demographics.gender.ready().unwrap();
        assert_eq!(gender.counts.len(), 2);
        assert_eq!(
            report.demographics.birth_year,
            Fragment::Ready(BirthYearStats {
                min: 1985,
                max: 1990,
                mode: 1990
            })
        );
    }

    #[test]
    fn test_missing_columns_are_not_available() {
        let columns = SourceColumns {
            user_type: true,
            gender: false,
            birth_year: false,
        };
        let dataset = Dataset::new(columns, vec![trip("2017-04-04 12:00:00", 5, "A", "B")]);
        let report = StatisticsReport::build(&dataset, &criteria()).unwrap();

        assert_eq!(report.demographics.gender, Fragment::NotAvailable);
        assert_eq!(report.demographics.birth_year, Fragment::NotAvailable);
        assert_eq!(
            report.user_types.ready().unwrap().counts,
            vec![Tally::new(UserType::Unspecified, 1)]
        );
    }

    #[test]
    fn test_empty_dataset_gives_no_data_not_failure() {
        let dataset = Dataset::new(SourceColumns::ALL, vec![]);
        let report = StatisticsReport::build(&dataset, &criteria()).unwrap();

        assert_eq!(report.trips, 0);
        assert_eq!(report.temporal, Fragment::NoData);
        assert_eq!(report.stations, Fragment::NoData);
        assert_eq!(report.duration.total, TimeDelta::zero());
        assert_eq!(report.duration.mean, None);
        assert_eq!(report.user_types, Fragment::Ready(UserTypeStats::default()));
        assert_eq!(report.demographics.gender, Fragment::NoData);
        assert_eq!(report.demographics.birth_year, Fragment::NoData);
    }

    #[test]
    fn test_user_type_column_absent() {
        let dataset = Dataset::new(SourceColumns::NONE, vec![trip("2017-04-04 12:00:00", 5, "A", "B")]);
        let report = StatisticsReport::build(&dataset, &criteria()).unwrap();

        assert_eq!(report.user_types, Fragment::NotAvailable);
    }

    #[test]
    fn test_fragment_serializes_with_status() {
        let ready = serde_json::to_value(Fragment::Ready(7)).unwrap();
        let missing = serde_json::to_value(Fragment::<u32>::NotAvailable).unwrap();

        assert_eq!(ready["status"], "ready");
        assert_eq!(ready["value"], 7);
        assert_eq!(missing["status"], "not_available");
    }

    #[test]
    fn test_from_result_passes_other_errors() {
        let err = StatsError::Schema { column: "Start Time" };
        assert!(Fragment::<u32>::from_result(Err(err)).is_err());
    }

    // Helper functions for tests
    fn criteria() -> FilterCriteria {
        FilterCriteria::unfiltered(City::Chicago)
    }

    fn trip(start: &str, minutes: i64, from: &str, to: &str) -> TripRecord {
        let start = NaiveDateTime::parse_from_str(start, "%Y-%m-%d %H:%M:%S").unwrap();
        TripRecord::new(start, start + TimeDelta::minutes(minutes), from, to)
    }
}
