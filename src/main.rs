//! CLI entry point for the bike-share statistics tool.
//!
//! Provides subcommands for a one-shot statistics report, paging through raw
//! trips, and an interactive exploration session.

mod explore;

use anyhow::Result;
use bikeshare_stats::criteria::{City, DayFilter, FilterCriteria, MonthFilter};
use bikeshare_stats::filter::filter;
use bikeshare_stats::output::{print_pretty, render_page, render_report, to_json};
use bikeshare_stats::pager::Pager;
use bikeshare_stats::source::DataSource;
use bikeshare_stats::stats::StatisticsReport;
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEFAULT_DATA_LOCATION: &str = "data";

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "Descriptive statistics over US bike-share trip data", long_about = None)]
struct Cli {
    /// Directory or HTTP base URL holding the city CSV files
    /// (defaults to $BIKESHARE_DATA, then "data")
    #[arg(long, global = true, value_name = "DIR_OR_URL")]
    data: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Selection {
    /// City to analyze: chicago, "new york city", or washington
    city: City,

    /// Month to keep (january..june), or all
    #[arg(short, long, default_value = "all")]
    month: MonthFilter,

    /// Day of week to keep (monday..sunday), or all
    #[arg(short, long, default_value = "all")]
    day: DayFilter,
}

impl Selection {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            city: self.city,
            month: self.month,
            day: self.day,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print travel time, station, duration, and rider statistics
    Analyze {
        #[command(flatten)]
        selection: Selection,

        /// Print the report as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print raw trips five at a time
    Raw {
        #[command(flatten)]
        selection: Selection,

        /// Index of the first trip to show
        #[arg(short, long, default_value_t = 0)]
        cursor: usize,

        /// Number of five-trip pages to show
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },
    /// Pick a city, month, and day at prompts and step through each section
    Explore,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", "info")?);

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("RUST_LOG_JSON", "debug")?);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let location = cli
        .data
        .or_else(|| std::env::var("BIKESHARE_DATA").ok())
        .unwrap_or_else(|| DEFAULT_DATA_LOCATION.to_string());
    let source = DataSource::from_location(&location);
    info!(location = %location, "Using trip data location");

    run(cli.command, source).await
}

fn env_filter(var: &str, default: &str) -> Result<EnvFilter> {
    Ok(EnvFilter::from_env(var).add_directive(default.parse()?))
}

async fn run(command: Commands, source: DataSource) -> Result<()> {
    match command {
        Commands::Analyze { selection, json } => {
            let criteria = selection.criteria();
            let dataset = source.load_dataset(criteria.city).await?;
            let filtered = filter(&dataset, &criteria);
            let report = StatisticsReport::build(&filtered, &criteria)?;
            print_pretty(&report);

            if json {
                println!("{}", to_json(&report)?);
            } else {
                print!("{}", render_report(&report));
            }
        }
        Commands::Raw {
            selection,
            cursor,
            pages,
        } => {
            let criteria = selection.criteria();
            let dataset = source.load_dataset(criteria.city).await?;
            let filtered = filter(&dataset, &criteria);

            let mut pager = Pager::starting_at(&filtered, cursor);
            for _ in 0..pages {
                let first = pager.cursor();
                let page = pager.next_page();
                if page.is_empty() {
                    info!(cursor = first, trips = filtered.len(), "No more trips");
                    break;
                }
                print!("{}", render_page(page, first));
            }
        }
        Commands::Explore => {
            let stdin = std::io::stdin();
            explore::run(&source, stdin.lock(), std::io::stdout()).await?;
        }
    }

    Ok(())
}
