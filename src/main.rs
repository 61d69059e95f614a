//! CLI entry point for the utility consumption tool.
//!
//! With no subcommand it prints the average therms reported by National Grid
//! in the bundled dataset. Subcommands select other providers, fields, and
//! output formats.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use utility_consumption::{
    aggregate::{Field, InvalidPolicy, average_field},
    filter::{Provider, filter_by},
    observe::log_and_return,
    output::{SummaryFormat, append_summaries, write_summaries},
    paths::DEFAULT_DATA_FILE,
    pipeline::{load_dataset, national_average, summarize_providers},
};

#[derive(Parser)]
#[command(name = "utility_consumption")]
#[command(about = "Average utility consumption by provider", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Average one numeric field, optionally for a single provider
    Average {
        /// Dataset filename, resolved against the data directory
        #[arg(short, long)]
        file: Option<String>,

        /// Only include records from this provider
        #[arg(short, long, value_enum)]
        provider: Option<Provider>,

        /// Numeric column to average
        #[arg(long, value_enum, default_value_t = Field::Therms)]
        field: Field,

        /// Leave out values that are not numbers instead of failing
        #[arg(long, default_value_t = false)]
        skip_invalid: bool,
    },
    /// Average therms for every known provider
    Summary {
        /// Dataset filename, resolved against the data directory
        #[arg(short, long)]
        file: Option<String>,

        /// Leave out values that are not numbers instead of failing
        #[arg(long, default_value_t = false)]
        skip_invalid: bool,

        /// Print the summaries as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// CSV file to append summary rows to
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the parsed records, diagnostics, and metadata
    Inspect {
        /// Dataset filename, resolved against the data directory
        #[arg(short, long)]
        file: Option<String>,
    },
}

fn policy(skip_invalid: bool) -> InvalidPolicy {
    if skip_invalid {
        InvalidPolicy::Skip
    } else {
        InvalidPolicy::Fail
    }
}

/// Dataset filename from the command line, then `UTILITY_DATA_FILE`, then the bundled default.
fn data_file(file: Option<String>) -> String {
    file.or_else(|| std::env::var("UTILITY_DATA_FILE").ok())
        .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/utility_consumption.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("utility_consumption.log"));

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

    let cli = Cli::parse();

    match cli.command {
        None => {
            national_average(&data_file(None))?;
        }
        Some(Commands::Average {
            file,
            provider,
            field,
            skip_invalid,
        }) => {
            let dataset = load_dataset(&data_file(file))?;
            let selected = match provider {
                Some(p) => filter_by(&dataset, p.label()),
                None => dataset,
            };
            let avg = average_field(&selected, field, policy(skip_invalid))?;
            log_and_return(avg);
        }
        Some(Commands::Summary {
            file,
            skip_invalid,
            json,
            output,
        }) => {
            let dataset = load_dataset(&data_file(file))?;
            let summaries = summarize_providers(&dataset, policy(skip_invalid));

            let format = if json {
                SummaryFormat::Json
            } else {
                SummaryFormat::Text
            };
            write_summaries(&mut std::io::stdout().lock(), &summaries, format)?;

            if let Some(ref path) = output {
                append_summaries(path, &summaries)?;
                info!(path = %path.display(), rows = summaries.len(), "Summaries appended");
            }
        }
        Some(Commands::Inspect { file }) => {
            let dataset = load_dataset(&data_file(file))?;
            log_and_return(dataset);
        }
    }

    Ok(())
}
