//! In-memory trip records and the dataset they form.

use chrono::{Datelike, Month, NaiveDateTime, TimeDelta, Timelike, Weekday};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::analyzers::utility::interpolate_linear;
use crate::error::{Result, StatsError};
use crate::parser::{
    BIRTH_YEAR, END_STATION, END_TIME, RawTrip, START_STATION, START_TIME, SourceColumns,
    TripTable,
};

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// One trip. Calendar fields are derived from `start_time` at construction
/// and there is no way to change `start_time` afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    start_station: String,
    end_station: String,
    user_type: Option<String>,
    gender: Option<String>,
    birth_year: Option<i32>,
    month: Month,
    weekday: Weekday,
}

impl TripRecord {
    pub fn new(
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
    ) -> Self {
        Self {
            start_time,
            end_time,
            start_station: start_station.into(),
            end_station: end_station.into(),
            user_type: None,
            gender: None,
            birth_year: None,
            month: MONTHS[start_time.month0() as usize],
            weekday: start_time.weekday(),
        }
    }

    pub fn with_user_type(mut self, user_type: Option<String>) -> Self {
        self.user_type = user_type;
        self
    }

    pub fn with_gender(mut self, gender: Option<String>) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_birth_year(mut self, birth_year: Option<i32>) -> Self {
        self.birth_year = birth_year;
        self
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveDateTime {
        self.end_time
    }

    pub fn start_station(&self) -> &str {
        &self.start_station
    }

    pub fn end_station(&self) -> &str {
        &self.end_station
    }

    pub fn user_type(&self) -> Option<&str> {
        self.user_type.as_deref()
    }

    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    pub fn birth_year(&self) -> Option<i32> {
        self.birth_year
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn start_hour(&self) -> u32 {
        self.start_time.hour()
    }

    /// Signed trip length; negative when the row ends before it starts.
    pub fn duration(&self) -> TimeDelta {
        self.end_time - self.start_time
    }
}

/// Ordered trips from a single source, plus which optional columns it has.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: SourceColumns,
    records: Vec<TripRecord>,
}

impl Dataset {
    pub fn new(columns: SourceColumns, records: Vec<TripRecord>) -> Self {
        Self { columns, records }
    }

    /// Builds typed records from a parsed table.
    ///
    /// Birth-year gaps are interpolated here, across the whole table, so that
    /// any later month/day narrowing sees values filled from unfiltered
    /// neighbours.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidValue`] for an empty or unparsable
    /// timestamp, an empty station, or a non-numeric birth year.
    #[instrument(skip_all, fields(rows = table.rows.len()))]
    pub fn from_table(table: TripTable) -> Result<Self> {
        let mut birth_years = table
            .rows
            .iter()
            .map(parse_birth_year)
            .collect::<Result<Vec<_>>>()?;

        if table.columns.birth_year {
            let gaps = birth_years.iter().filter(|y| y.is_none()).count();
            interpolate_linear(&mut birth_years);
            debug!(gaps, "Interpolated birth years");
        }

        let records = table
            .rows
            .into_iter()
            .zip(birth_years)
            .map(|(row, birth_year)| build_record(row, birth_year))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(table.columns, records))
    }

    pub fn columns(&self) -> SourceColumns {
        self.columns
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TripRecord> {
        self.records.iter()
    }

    /// New dataset holding the records that satisfy `keep`, in order.
    pub fn retain_view(&self, keep: impl Fn(&TripRecord) -> bool) -> Dataset {
        Dataset {
            columns: self.columns,
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a TripRecord;
    type IntoIter = std::slice::Iter<'a, TripRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn build_record(row: RawTrip, birth_year: Option<f64>) -> Result<TripRecord> {
    let start_time = parse_timestamp(&row.start_time, row.line, START_TIME)?;
    let end_time = parse_timestamp(&row.end_time, row.line, END_TIME)?;
    let start_station = require_text(row.start_station, row.line, START_STATION)?;
    let end_station = require_text(row.end_station, row.line, END_STATION)?;
    let birth_year = birth_year
        .map(|y| {
            whole_year(y).ok_or_else(|| StatsError::InvalidValue {
                line: row.line,
                column: BIRTH_YEAR,
                value: y.to_string(),
            })
        })
        .transpose()?;

    Ok(TripRecord::new(start_time, end_time, start_station, end_station)
        .with_user_type(row.user_type)
        .with_gender(row.gender)
        .with_birth_year(birth_year))
}

fn parse_timestamp(value: &str, line: u64, column: &'static str) -> Result<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| StatsError::InvalidValue {
            line,
            column,
            value: value.to_string(),
        })
}

fn require_text(value: String, line: u64, column: &'static str) -> Result<String> {
    if value.is_empty() {
        return Err(StatsError::InvalidValue {
            line,
            column,
            value,
        });
    }
    Ok(value)
}

fn parse_birth_year(row: &RawTrip) -> Result<Option<f64>> {
    match &row.birth_year {
        None => Ok(None),
        Some(raw) => raw
            .parse::<f64>()
            .ok()
            .filter(|y| whole_year(*y).is_some())
            .map(Some)
            .ok_or_else(|| StatsError::InvalidValue {
                line: row.line,
                column: BIRTH_YEAR,
                value: raw.clone(),
            }),
    }
}

/// Nearest whole year, or `None` when `year` is not finite or does not fit
/// an `i32`.
fn whole_year(year: f64) -> Option<i32> {
    let rounded = year.round();
    (rounded >= f64::from(i32::MIN) && rounded <= f64::from(i32::MAX)).then_some(rounded as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_trips;

    #[test]
    fn test_derived_fields_follow_start_time() {
        let trip = TripRecord::new(ts("2017-03-05 23:50:00"), ts("2017-03-06 00:20:00"), "A", "B");

        assert_eq!(trip.month(), Month::March);
        assert_eq!(trip.weekday(), Weekday::Sun);
        assert_eq!(trip.start_hour(), 23);
        assert_eq!(trip.duration(), TimeDelta::minutes(30));
    }

    #[test]
    fn test_negative_duration_passes_through() {
        let trip = TripRecord::new(ts("2017-01-01 10:00:00"), ts("2017-01-01 09:59:00"), "A", "B");

        assert_eq!(trip.duration(), TimeDelta::minutes(-1));
    }

    #[test]
    fn test_from_table_interpolates_before_any_filtering() {
        let csv = "Start Time,End Time,Start Station,End Station,Birth Year\n\
                   2017-01-02 08:00:00,2017-01-02 08:10:00,A,B,\n\
                   2017-01-02 08:00:00,2017-01-02 08:10:00,A,B,1980\n\
                   2017-02-02 08:00:00,2017-02-02 08:10:00,A,B,\n\
                   2017-02-02 08:00:00,2017-02-02 08:10:00,A,B,\n\
                   2017-03-02 08:00:00,2017-03-02 08:10:00,A,B,1986.0\n\
                   2017-03-02 08:00:00,2017-03-02 08:10:00,A,B,\n";
        let dataset = Dataset::from_table(parse_trips(csv.as_bytes()).unwrap()).unwrap();

        let years: Vec<_> = dataset.iter().map(TripRecord::birth_year).collect();
        assert_eq!(
            years,
            vec![None, Some(1980), Some(1982), Some(1984), Some(1986), Some(1986)]
        );
    }

    #[test]
    fn test_from_table_accepts_fractional_seconds_and_t_separator() {
        let csv = "Start Time,End Time,Start Station,End Station\n\
                   2017-01-02T08:00:00,2017-01-02 08:10:00.500,A,B\n";
        let dataset = Dataset::from_table(parse_trips(csv.as_bytes()).unwrap()).unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(
            dataset.records()[0].duration(),
            TimeDelta::milliseconds(10 * 60 * 1000 + 500)
        );
    }

    #[test]
    fn test_from_table_rejects_bad_timestamp() {
        let csv = "Start Time,End Time,Start Station,End Station\n\
                   2017-01-02 08:00:00,2017-01-02 08:10:00,A,B\n\
                   yesterday,2017-01-02 08:10:00,A,B\n";
        let err = Dataset::from_table(parse_trips(csv.as_bytes()).unwrap()).unwrap_err();

        match err {
            StatsError::InvalidValue {
                line,
                column,
                value,
            } => {
                assert_eq!(line, 3);
                assert_eq!(column, START_TIME);
                assert_eq!(value, "yesterday");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_table_rejects_empty_station() {
        let csv = "Start Time,End Time,Start Station,End Station\n\
                   2017-01-02 08:00:00,2017-01-02 08:10:00,,B\n";
        let err = Dataset::from_table(parse_trips(csv.as_bytes()).unwrap()).unwrap_err();

        assert!(matches!(
            err,
            StatsError::InvalidValue {
                column: START_STATION,
                ..
            }
        ));
    }

    #[test]
    fn test_from_table_rejects_out_of_range_birth_year() {
        let csv = "Start Time,End Time,Start Station,End Station,Birth Year\n\
                   2017-01-02 08:00:00,2017-01-02 08:10:00,A,B,1e12\n\
                   2017-01-03 08:00:00,2017-01-03 08:10:00,A,B,1990\n";
        let err = Dataset::from_table(parse_trips(csv.as_bytes()).unwrap()).unwrap_err();

        match err {
            StatsError::InvalidValue {
                line,
                column,
                value,
            } => {
                assert_eq!(line, 2);
                assert_eq!(column, BIRTH_YEAR);
                assert_eq!(value, "1e12");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_whole_year_bounds() {
        assert_eq!(whole_year(1989.6), Some(1990));
        assert_eq!(whole_year(f64::from(i32::MAX)), Some(i32::MAX));
        assert_eq!(whole_year(1e12), None);
        assert_eq!(whole_year(-1e12), None);
        assert_eq!(whole_year(f64::NAN), None);
        assert_eq!(whole_year(f64::INFINITY), None);
    }

    #[test]
    fn test_retain_view_keeps_order_and_columns() {
        let dataset = Dataset::new(
            SourceColumns::ALL,
            vec![
                TripRecord::new(ts("2017-01-01 00:00:00"), ts("2017-01-01 00:05:00"), "A", "B"),
                TripRecord::new(ts("2017-01-02 00:00:00"), ts("2017-01-02 00:05:00"), "C", "D"),
                TripRecord::new(ts("2017-01-03 00:00:00"), ts("2017-01-03 00:05:00"), "E", "F"),
            ],
        );

        let view = dataset.retain_view(|r| r.start_station() != "C");
        let stations: Vec<_> = view.iter().map(TripRecord::start_station).collect();

        assert_eq!(stations, vec!["A", "E"]);
        assert_eq!(view.columns(), SourceColumns::ALL);
        assert_eq!(dataset.len(), 3);
    }

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }
}
