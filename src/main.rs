//! CLI entry point for the taxi trip statistics tool.
//!
//! Provides subcommands for monthly and rolling-window averages, for
//! prefetching months into the local cache, and for listing the cache.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use taxi_trip_stats::{
    MonthKey, TripSource, average_trip_duration, average_trip_length,
    cache::TripCache,
    config::Settings,
    fetch::BasicClient,
    output::{Metric, Report, append_record, render},
    stats::mean_trip_distance,
    window::{DateWindow, collect_window},
};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "taxi_trip_stats")]
#[command(about = "Average NYC yellow-taxi trip statistics by month or rolling window", long_about = None)]
struct Cli {
    /// Directory holding cached monthly CSV files [env: TAXI_DATA_DIR]
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Base URL the monthly files are downloaded from [env: TAXI_BASE_URL]
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct MonthArgs {
    #[arg(short, long)]
    year: i32,

    #[arg(short, long)]
    month: u32,
}

#[derive(Args)]
struct ReportArgs {
    /// Print the report as JSON instead of the bare value
    #[arg(long, default_value_t = false)]
    json: bool,

    /// CSV file to append the report to
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Average trip distance for one month
    Month {
        #[command(flatten)]
        month: MonthArgs,

        #[command(flatten)]
        report: ReportArgs,
    },
    /// Average trip distance over N days from a start date
    Rolling {
        #[command(flatten)]
        month: MonthArgs,

        /// Day of month the window starts on
        #[arg(short, long)]
        day: u32,

        /// Window length in days
        #[arg(short = 'n', long)]
        days: u64,

        #[command(flatten)]
        report: ReportArgs,
    },
    /// Average trip duration in minutes for one month
    Duration {
        #[command(flatten)]
        month: MonthArgs,

        #[command(flatten)]
        report: ReportArgs,
    },
    /// Download one month into the local cache if it is missing
    Fetch {
        #[command(flatten)]
        month: MonthArgs,
    },
    /// List the months present in the local cache
    Cached,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();
    let settings = Settings::from_env().with_overrides(cli.data_dir, cli.base_url);

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = settings.log_file.parent().unwrap_or(Path::new("logs"));
    let log_file_name = settings
        .log_file
        .file_name()
        .unwrap_or(OsStr::new("taxi_trip_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    info!(
        data_dir = %settings.data_dir.display(),
        base_url = %settings.base_url,
        "Settings loaded"
    );

    let source = TripSource::new(
        BasicClient::new()?,
        TripCache::new(&settings.data_dir),
        settings.base_url.as_str(),
    );

    match cli.command {
        Commands::Month { month, report } => {
            let value = average_trip_length(&source, month.year, month.month)?;
            let period = MonthKey::new(month.year, month.month).to_string();
            emit(Report::new(Metric::MeanTripDistance, period, value), &report)?;
        }
        Commands::Rolling {
            month,
            day,
            days,
            report,
        } => {
            let window = DateWindow::starting(month.year, month.month, day, days)?;
            let period = format!("{}..{}", window.start(), window.end());
            let trips = collect_window(&source, &window)?;
            let value = mean_trip_distance(&trips, &period)?;
            emit(Report::new(Metric::MeanTripDistance, period, value), &report)?;
        }
        Commands::Duration { month, report } => {
            let value = average_trip_duration(&source, month.year, month.month)?;
            let period = MonthKey::new(month.year, month.month).to_string();
            emit(Report::new(Metric::MeanTripDuration, period, value), &report)?;
        }
        Commands::Fetch { month } => {
            let key = MonthKey::new(month.year, month.month);
            let (path, downloaded) = source.ensure_cached(key)?;
            if downloaded {
                info!(month = %key, path = %path.display(), "Month downloaded");
            } else {
                info!(month = %key, path = %path.display(), "Month already cached");
            }
            println!("{}", path.display());
        }
        Commands::Cached => {
            let months = source.cache().list()?;
            info!(count = months.len(), "Cached months listed");
            for key in months {
                println!("{key}");
            }
        }
    }

    Ok(())
}

/// Prints a report to stdout and optionally appends it to a CSV file.
fn emit(report: Report, args: &ReportArgs) -> Result<()> {
    println!("{}", render(&report, args.json)?);

    if let Some(path) = &args.output {
        append_record(path, &report)?;
        info!(path = %path.display(), "Report appended");
    }

    Ok(())
}
