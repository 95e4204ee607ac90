//! CSV parser for bike-share trip logs.
//!
//! Only the header decides which columns exist. Cells are kept as text here;
//! [`crate::dataset::Dataset::from_table`] turns them into typed records.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::{Result, StatsError};

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

/// Which optional columns the source header carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceColumns {
    pub user_type: bool,
    pub gender: bool,
    pub birth_year: bool,
}

impl SourceColumns {
    pub const ALL: SourceColumns = SourceColumns {
        user_type: true,
        gender: true,
        birth_year: true,
    };

    pub const NONE: SourceColumns = SourceColumns {
        user_type: false,
        gender: false,
        birth_year: false,
    };
}

/// One data row as it appeared in the file, cells trimmed, empty cells dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTrip {
    pub line: u64,
    pub start_time: String,
    pub end_time: String,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<String>,
}

/// All rows of a trip file plus its optional-column presence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripTable {
    pub columns: SourceColumns,
    pub rows: Vec<RawTrip>,
}

/// Header positions resolved once per file.
struct ColumnIndex {
    start_time: usize,
    end_time: usize,
    start_station: usize,
    end_station: usize,
    user_type: Option<usize>,
    gender: Option<usize>,
    birth_year: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &'static str| find(name).ok_or(StatsError::Schema { column: name });

        Ok(Self {
            start_time: require(START_TIME)?,
            end_time: require(END_TIME)?,
            start_station: require(START_STATION)?,
            end_station: require(END_STATION)?,
            user_type: find(USER_TYPE),
            gender: find(GENDER),
            birth_year: find(BIRTH_YEAR),
        })
    }

    fn columns(&self) -> SourceColumns {
        SourceColumns {
            user_type: self.user_type.is_some(),
            gender: self.gender.is_some(),
            birth_year: self.birth_year.is_some(),
        }
    }
}

/// Reads a headed CSV trip log.
///
/// # Errors
///
/// Returns [`StatsError::Schema`] if a required column is missing from the
/// header, or [`StatsError::Csv`] if the CSV itself is malformed.
pub fn parse_trips<R: Read>(reader: R) -> Result<TripTable> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);

    let index = ColumnIndex::resolve(rdr.headers()?)?;
    let columns = index.columns();
    debug!(?columns, "Resolved trip file header");

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(i as u64 + 2);

        let cell = |idx: usize| record.get(idx).map(str::trim).unwrap_or("").to_string();
        let optional = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        rows.push(RawTrip {
            line,
            start_time: cell(index.start_time),
            end_time: cell(index.end_time),
            start_station: cell(index.start_station),
            end_station: cell(index.end_station),
            user_type: optional(index.user_type),
            gender: optional(index.gender),
            birth_year: optional(index.birth_year),
        });
    }

    debug!(rows = rows.len(), "Parsed trip rows");
    Ok(TripTable { columns, rows })
}
