use crate::analyzers::types::{BirthYearStats, GenderCounts, UserType, UserTypeStats};
use crate::analyzers::utility::FrequencyTable;
use crate::dataset::{Dataset, TripRecord};

/// Trip counts per user type. Trips without a user type land in
/// [`UserType::Unspecified`]. An empty dataset yields an empty table.
pub fn user_type_counts(dataset: &Dataset) -> UserTypeStats {
    let table: FrequencyTable<UserType> = dataset
        .iter()
        .map(|t| match t.user_type() {
            Some(name) => UserType::Known(name.to_string()),
            None => UserType::Unspecified,
        })
        .collect();

    UserTypeStats {
        counts: table.ranked(),
    }
}

/// Trip counts per gender, or `None` if no trip records a gender.
pub fn gender_counts(dataset: &Dataset) -> Option<GenderCounts> {
    let table: FrequencyTable<String> = dataset
        .iter()
        .filter_map(TripRecord::gender)
        .map(str::to_string)
        .collect();

    if table.is_empty() {
        return None;
    }

    Some(GenderCounts {
        counts: table.ranked(),
    })
}

/// Birth-year extremes and mode, or `None` if no trip records a birth year.
/// Mode ties go to the lowest year.
pub fn birth_year_stats(dataset: &Dataset) -> Option<BirthYearStats> {
    let table: FrequencyTable<i32> = dataset.iter().filter_map(TripRecord::birth_year).collect();

    let years = table.entries();
    let min = years.iter().map(|(year, _)| *year).min()?;
    let max = years.iter().map(|(year, _)| *year).max()?;
    let (mode, _) = years
        .iter()
        .min_by(|(a_year, a_count), (b_year, b_count)| {
            b_count.cmp(a_count).then(a_year.cmp(b_year))
        })?;

    Some(BirthYearStats {
        min,
        max,
        mode: *mode,
    })
}
