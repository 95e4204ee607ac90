//! Error types for the trip filtering and aggregation core.

/// Errors raised while building, filtering, or aggregating a trip dataset.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    /// A column every trip needs is missing from the source header.
    #[error("required column '{column}' is missing from the trip data")]
    Schema {
        /// Header name of the missing column.
        column: &'static str,
    },

    /// A statistic that needs at least one trip was asked of an empty dataset.
    #[error("cannot compute {statistic} over an empty dataset")]
    EmptyDataset {
        /// Name of the statistic that was requested.
        statistic: &'static str,
    },

    /// A cell could not be parsed into the type its column requires.
    #[error("line {line}: invalid value {value:?} in column '{column}'")]
    InvalidValue {
        /// 1-based line number in the source file.
        line: u64,
        /// Header name of the offending column.
        column: &'static str,
        /// The raw cell text.
        value: String,
    },

    /// The CSV reader failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl StatsError {
    /// Returns `true` for the recoverable "no trips to aggregate" case.
    pub fn is_empty_dataset(&self) -> bool {
        matches!(self, StatsError::EmptyDataset { .. })
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
