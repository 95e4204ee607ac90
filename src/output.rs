//! Output formatting for statistics reports and raw trip pages.
//!
//! Supports human-readable text, pretty-printing, and JSON serialization.

use anyhow::Result;
use chrono::TimeDelta;
use tracing::{debug, info};

use crate::criteria::weekday_name;
use crate::dataset::TripRecord;
use crate::stats::{Fragment, StatisticsReport};

const SEPARATOR_WIDTH: usize = 40;

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &StatisticsReport) {
    debug!("{:#?}", report);
}

/// Logs a report as pretty-printed JSON.
pub fn print_json(report: &StatisticsReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Serializes a report as pretty-printed JSON.
pub fn to_json(report: &StatisticsReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

/// Renders the whole report, one section per fragment.
pub fn render_report(report: &StatisticsReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} trips for {}.\n\n",
        report.trips, report.criteria
    ));
    out.push_str(&render_temporal(report));
    out.push_str(&render_stations(report));
    out.push_str(&render_duration(report));
    out.push_str(&render_users(report));
    out
}

pub fn render_temporal(report: &StatisticsReport) -> String {
    let mut out = String::from("Most frequent times of travel\n");
    match &report.temporal {
        Fragment::Ready(t) => {
            out.push_str(&format!(
                "  Most common month: {} ({} trips)\n",
                t.month.value.name(),
                t.month.count
            ));
            out.push_str(&format!(
                "  Most common day: {} ({} trips)\n",
                weekday_name(t.weekday.value),
                t.weekday.count
            ));
            out.push_str(&format!(
                "  Most common start hour: {}:00 ({} trips)\n",
                t.start_hour.value, t.start_hour.count
            ));
        }
        other => out.push_str(&absent_line(other, "travel times")),
    }
    out.push_str(&separator());
    out.push('\n');
    out
}

pub fn render_stations(report: &StatisticsReport) -> String {
    let mut out = String::from("Most popular stations and trip\n");
    match &report.stations {
        Fragment::Ready(s) => {
            out.push_str(&format!(
                "  Most common start station: {} with {} starts\n",
                s.start_station.value, s.start_station.count
            ));
            out.push_str(&format!(
                "  Most common end station: {} with {} endings\n",
                s.end_station.value, s.end_station.count
            ));
            out.push_str(&format!(
                "  Most frequent trip: {} with {} trips\n",
                s.station_pair.value, s.station_pair.count
            ));
        }
        other => out.push_str(&absent_line(other, "stations")),
    }
    out.push_str(&separator());
    out.push('\n');
    out
}

pub fn render_duration(report: &StatisticsReport) -> String {
    let mut out = String::from("Trip duration\n");
    out.push_str(&format!(
        "  Total travel time: {}\n",
        format_duration(report.duration.total)
    ));
    match report.duration.mean {
        Some(mean) => out.push_str(&format!("  Mean travel time: {}\n", format_duration(mean))),
        None => out.push_str("  Mean travel time: no data\n"),
    }
    out.push_str(&separator());
    out.push('\n');
    out
}

pub fn render_users(report: &StatisticsReport) -> String {
    let mut out = String::from("User stats\n");

    match &report.user_types {
        Fragment::Ready(stats) if stats.counts.is_empty() => {
            out.push_str("  User types: 0 trips\n");
        }
        Fragment::Ready(stats) => {
            out.push_str("  User types:\n");
            for tally in &stats.counts {
                out.push_str(&format!("    {}: {}\n", tally.value, tally.count));
            }
        }
        other => out.push_str(&absent_line(other, "user types")),
    }

    match &report.demographics.gender {
        Fragment::Ready(gender) => {
            out.push_str("  Gender:\n");
            for tally in &gender.counts {
                out.push_str(&format!("    {}: {}\n", tally.value, tally.count));
            }
        }
        other => out.push_str(&absent_line(other, "gender")),
    }

    match &report.demographics.birth_year {
        Fragment::Ready(years) => {
            out.push_str(&format!("  Earliest birth year: {}\n", years.min));
            out.push_str(&format!("  Most recent birth year: {}\n", years.max));
            out.push_str(&format!("  Most common birth year: {}\n", years.mode));
        }
        other => out.push_str(&absent_line(other, "birth year")),
    }

    out.push_str(&separator());
    out.push('\n');
    out
}

/// Renders one block per trip, numbered from `first_index`.
pub fn render_page(records: &[TripRecord], first_index: usize) -> String {
    let mut out = String::new();
    for (offset, trip) in records.iter().enumerate() {
        out.push_str(&format!("#{}\n", first_index + offset));
        out.push_str(&format!("  Start Time:    {}\n", trip.start_time()));
        out.push_str(&format!("  End Time:      {}\n", trip.end_time()));
        out.push_str(&format!("  Start Station: {}\n", trip.start_station()));
        out.push_str(&format!("  End Station:   {}\n", trip.end_station()));
        if let Some(user_type) = trip.user_type() {
            out.push_str(&format!("  User Type:     {user_type}\n"));
        }
        if let Some(gender) = trip.gender() {
            out.push_str(&format!("  Gender:        {gender}\n"));
        }
        if let Some(year) = trip.birth_year() {
            out.push_str(&format!("  Birth Year:    {year}\n"));
        }
    }
    out
}

/// `[-]D days HH:MM:SS`, the days part only when non-zero.
pub fn format_duration(delta: TimeDelta) -> String {
    let sign = if delta < TimeDelta::zero() { "-" } else { "" };
    let secs = delta.num_seconds().unsigned_abs();
    let (days, rem) = (secs / 86_400, secs % 86_400);
    let (hours, minutes, seconds) = (rem / 3600, (rem % 3600) / 60, rem % 60);

    if days > 0 {
        format!("{sign}{days} days {hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{sign}{hours:02}:{minutes:02}:{seconds:02}")
    }
}

fn absent_line<T>(fragment: &Fragment<T>, what: &str) -> String {
    match fragment {
        Fragment::NotAvailable => format!("  No {what} data is available for this city\n"),
        _ => format!("  No {what} data for this selection\n"),
    }
}
