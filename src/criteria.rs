//! City, month, and day selections that drive one analysis cycle.

use chrono::{Month, Weekday};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Months that can be selected as a filter, in order (january = 1).
pub const FILTER_MONTHS: [Month; 6] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
];

/// Days that can be selected as a filter, in order.
pub const FILTER_DAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Rejected selection text, with the kind of selection it was meant for.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{input}'")]
pub struct ParseSelectionError {
    pub kind: &'static str,
    pub input: String,
}

impl ParseSelectionError {
    fn new(kind: &'static str, input: &str) -> Self {
        Self {
            kind,
            input: input.to_string(),
        }
    }
}

/// A city with trip data available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    /// File name of the city's trip log inside a data location.
    pub fn file_name(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = ParseSelectionError;

    /// Accepts the display name in any case, with spaces, dashes, or
    /// underscores between words ("New York City", "new-york-city").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        match normalized.as_str() {
            "chicago" => Ok(City::Chicago),
            "new york city" => Ok(City::NewYorkCity),
            "washington" => Ok(City::Washington),
            _ => Err(ParseSelectionError::new("city", s)),
        }
    }
}

/// Month narrowing: everything, or a single month from [`FILTER_MONTHS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthFilter {
    #[default]
    All,
    Only(Month),
}

impl MonthFilter {
    /// 1-based month number the filter keeps, `None` for [`MonthFilter::All`].
    pub fn number(self) -> Option<u32> {
        match self {
            MonthFilter::All => None,
            MonthFilter::Only(month) => Some(month.number_from_month()),
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all months"),
            MonthFilter::Only(month) => f.write_str(month.name()),
        }
    }
}

impl FromStr for MonthFilter {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        if needle == "all" {
            return Ok(MonthFilter::All);
        }

        FILTER_MONTHS
            .iter()
            .find(|month| month.name().to_lowercase() == needle)
            .map(|month| MonthFilter::Only(*month))
            .ok_or_else(|| ParseSelectionError::new("month", s))
    }
}

/// Day-of-week narrowing: everything, or a single weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayFilter {
    #[default]
    All,
    Only(Weekday),
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str("all days"),
            DayFilter::Only(day) => f.write_str(weekday_name(*day)),
        }
    }
}

impl FromStr for DayFilter {
    type Err = ParseSelectionError;

    /// Only full day names are accepted; casing is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        if needle == "all" {
            return Ok(DayFilter::All);
        }

        FILTER_DAYS
            .iter()
            .find(|day| weekday_name(**day).to_lowercase() == needle)
            .map(|day| DayFilter::Only(*day))
            .ok_or_else(|| ParseSelectionError::new("day", s))
    }
}

/// Canonical capitalized weekday name ("Monday").
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// A validated city/month/day selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl FilterCriteria {
    /// Selection covering every trip of `city`.
    pub fn unfiltered(city: City) -> Self {
        Self {
            city,
            month: MonthFilter::All,
            day: DayFilter::All,
        }
    }

    pub fn with_month(mut self, month: MonthFilter) -> Self {
        self.month = month;
        self
    }

    pub fn with_day(mut self, day: DayFilter) -> Self {
        self.day = day;
        self
    }
}

impl fmt::Display for FilterCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.city, self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_parse_is_lenient() {
        assert_eq!("Chicago".parse::<City>().unwrap(), City::Chicago);
        assert_eq!("new york city".parse::<City>().unwrap(), City::NewYorkCity);
        assert_eq!("New-York-City".parse::<City>().unwrap(), City::NewYorkCity);
        assert_eq!(" WASHINGTON ".parse::<City>().unwrap(), City::Washington);
        assert!("boston".parse::<City>().is_err());
    }

    #[test]
    fn test_month_parse_limits_to_first_half() {
        assert_eq!("all".parse::<MonthFilter>().unwrap(), MonthFilter::All);
        assert_eq!(
            "March".parse::<MonthFilter>().unwrap(),
            MonthFilter::Only(Month::March)
        );
        assert_eq!("june".parse::<MonthFilter>().unwrap().number(), Some(6));
        assert_eq!("january".parse::<MonthFilter>().unwrap().number(), Some(1));

        let err = "july".parse::<MonthFilter>().unwrap_err();
        assert_eq!(err.kind, "month");
        assert_eq!(err.input, "july");
    }

    #[test]
    fn test_day_parse_is_case_insensitive() {
        assert_eq!("ALL".parse::<DayFilter>().unwrap(), DayFilter::All);
        assert_eq!(
            "monday".parse::<DayFilter>().unwrap(),
            DayFilter::Only(Weekday::Mon)
        );
        assert_eq!(
            "SuNdAy".parse::<DayFilter>().unwrap(),
            DayFilter::Only(Weekday::Sun)
        );
        assert!("mon".parse::<DayFilter>().is_err());
    }

    #[test]
    fn test_city_file_names() {
        assert_eq!(City::Chicago.file_name(), "chicago.csv");
        assert_eq!(City::NewYorkCity.file_name(), "new_york_city.csv");
        assert_eq!(City::Washington.file_name(), "washington.csv");
    }

    #[test]
    fn test_criteria_display() {
        let criteria = FilterCriteria::unfiltered(City::NewYorkCity)
            .with_month(MonthFilter::Only(Month::May))
            .with_day(DayFilter::Only(Weekday::Fri));

        assert_eq!(criteria.to_string(), "New York City, May, Friday");
    }
}
