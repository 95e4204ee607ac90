//! Interactive question-and-answer session over stdin/stdout.
//!
//! Asks for a city, month, and day (re-asking until the answer is valid),
//! prints each statistics section, offers raw trips five at a time after
//! every section, and finally offers to start over.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::Result;
use bikeshare_stats::criteria::{City, DayFilter, FilterCriteria, MonthFilter};
use bikeshare_stats::dataset::Dataset;
use bikeshare_stats::filter::filter;
use bikeshare_stats::output::{
    render_duration, render_page, render_stations, render_temporal, render_users, separator,
};
use bikeshare_stats::pager::Pager;
use bikeshare_stats::source::DataSource;
use bikeshare_stats::stats::StatisticsReport;
use tracing::{error, info};

/// Line-oriented prompts over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Trimmed answer, or `None` once input is closed.
    pub fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Re-asks until the answer parses, or returns `None` once input is closed.
    pub fn ask_until<T>(&mut self, question: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        loop {
            let Some(answer) = self.ask(question)? else {
                return Ok(None);
            };
            match answer.parse::<T>() {
                Ok(value) => {
                    self.say(format!("You selected {answer}"))?;
                    return Ok(Some(value));
                }
                Err(e) => self.say(format!("Sorry, {e}. Please try again."))?,
            }
        }
    }

    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(self
            .ask(question)?
            .is_some_and(|answer| answer.eq_ignore_ascii_case("yes")))
    }

    /// Collects a full city/month/day selection.
    pub fn ask_criteria(&mut self) -> Result<Option<FilterCriteria>> {
        let Some(city) = self.ask_until::<City>(
            "Enter a city name, we have data for Chicago, New York City and Washington: ",
        )?
        else {
            return Ok(None);
        };
        let Some(month) = self.ask_until::<MonthFilter>(
            "Enter a month between January and June, or all to select all months: ",
        )?
        else {
            return Ok(None);
        };
        let Some(day) = self.ask_until::<DayFilter>(
            "Enter a day between Monday and Sunday, or all to select all days: ",
        )?
        else {
            return Ok(None);
        };
        self.say(separator())?;

        Ok(Some(FilterCriteria { city, month, day }))
    }

    /// Shows five trips at a time for as long as the user answers yes.
    pub fn offer_raw_trips(&mut self, dataset: &Dataset) -> Result<()> {
        let mut pager = Pager::new(dataset);
        while self.confirm("Would you like to see 5 lines of raw data? Enter yes or no: ")? {
            let first = pager.cursor();
            let page = pager.next_page();
            if page.is_empty() {
                self.say("No more trips to show.")?;
                break;
            }
            write!(self.output, "{}", render_page(page, first))?;
        }
        Ok(())
    }

    /// Prints every section of the report for an already filtered dataset.
    pub fn present(&mut self, dataset: &Dataset, criteria: &FilterCriteria) -> Result<()> {
        let report = StatisticsReport::build(dataset, criteria)?;
        self.say(format!("{} trips match {}.", report.trips, criteria))?;

        let sections: [fn(&StatisticsReport) -> String; 4] =
            [render_temporal, render_stations, render_duration, render_users];
        for render in sections {
            write!(self.output, "\n{}", render(&report))?;
            self.offer_raw_trips(dataset)?;
        }
        Ok(())
    }
}

/// Runs the interactive session until the user declines to restart.
pub async fn run<R: BufRead, W: Write>(source: &DataSource, input: R, output: W) -> Result<()> {
    let mut prompter = Prompter::new(input, output);
    prompter.say("Hello! Let's explore some US bikeshare data!")?;

    loop {
        let Some(criteria) = prompter.ask_criteria()? else {
            break;
        };
        info!(criteria = %criteria, "Starting analysis cycle");

        match source.load_dataset(criteria.city).await {
            Ok(dataset) => {
                let filtered = filter(&dataset, &criteria);
                prompter.present(&filtered, &criteria)?;
            }
            Err(e) => {
                error!(error = %e, city = %criteria.city, "Failed to load trip data");
                prompter.say(format!("Could not analyze {}: {e:#}", criteria.city))?;
            }
        }

        if !prompter.confirm("\nWould you like to restart? Enter yes or no.\n")? {
            break;
        }
    }

    Ok(())
}
