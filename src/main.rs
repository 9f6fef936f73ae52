//! CLI entry point for the bikeshare explorer.
//!
//! Provides an interactive exploration session and a one-shot report
//! subcommand over the Chicago, New York City and Washington trip files.

use anyhow::Result;
use bikeshare_explorer::{
    CityCatalog, Cursor, compute_report, load_filtered, next_page,
    output::{print_json, print_pretty, render_report, write_rows},
    session::Session,
};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_explorer")]
#[command(about = "Explore US bikeshare trip data", long_about = None)]
struct Cli {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(short, long, global = true, env = "BIKESHARE_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session: pick a city and filters, view statistics, page raw rows
    Explore,
    /// Print the statistics report for one selection and exit
    Report {
        /// chicago, "new york city" or washington
        #[arg(short, long)]
        city: String,

        /// january..june, or all
        #[arg(short, long, default_value = "all")]
        month: String,

        /// sunday..saturday, or all
        #[arg(short = 'w', long, default_value = "all")]
        day: String,

        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Also print this many raw rows, five at a time
        #[arg(short, long, default_value_t = 0)]
        rows: usize,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/bikeshare_explorer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_explorer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    // stderr stays quiet by default so it does not interleave with prompts
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", "warn"));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("RUST_LOG_JSON", "debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let catalog = CityCatalog::new(&cli.data_dir);
    info!(data_dir = %cli.data_dir.display(), "Starting");

    match cli.command.unwrap_or(Commands::Explore) {
        Commands::Explore => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            Session::new(catalog, stdin.lock(), stdout.lock()).run()?;
        }
        Commands::Report {
            city,
            month,
            day,
            json,
            rows,
        } => {
            if let Err(e) = report(&catalog, &city, &month, &day, json, rows) {
                error!(error = %e, "Report failed");
                return Err(e);
            }
        }
    }

    Ok(())
}

/// Filter from `var` when it is set and valid, `default` otherwise.
fn env_filter(var: &str, default: &str) -> EnvFilter {
    EnvFilter::try_from_env(var).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Loads one selection, prints its report and optionally the first `rows` raw rows.
#[tracing::instrument(skip(catalog))]
fn report(
    catalog: &CityCatalog,
    city: &str,
    month: &str,
    day: &str,
    json: bool,
    rows: usize,
) -> Result<()> {
    let dataset = load_filtered(catalog, city, month, day)?;
    let report = compute_report(&dataset);
    print_pretty(&report);

    let mut out = io::stdout().lock();
    if json {
        print_json(&report, &mut out)?;
    } else {
        render_report(&report, &mut out)?;
    }

    if rows > 0 {
        let mut cursor = Cursor::new();
        let mut shown = Vec::new();
        while shown.len() < rows && !cursor.is_exhausted(&dataset) {
            shown.extend(next_page(&dataset, &mut cursor));
        }
        shown.truncate(rows);
        writeln!(out)?;
        write_rows(&shown, dataset.columns(), &mut out)?;
    }

    out.flush()?;
    Ok(())
}
