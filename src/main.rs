//! # News JSONL
//!
//! Converts archived news pages into newline-delimited JSON article records.
//!
//! ## Features
//!
//! - Extracts title, headline, body, keywords, author, date and categories
//!   from The Japan Times and The New York Times archives
//! - Handles several historical page templates per outlet
//! - Skips (and logs) pages missing required fields instead of emitting
//!   partial records
//! - Processes files concurrently with a bounded worker count
//!
//! ## Usage
//!
//! ```sh
//! # From inside the archive directory
//! news_jsonl                          # scan roots -> ../dataset.jsonl
//! news_jsonl -f test.url.filelist     # filelist   -> ../test.jsonl
//! ```
//!
//! ## Architecture
//!
//! 1. **Inputs**: Read a filelist or scan the archive roots
//! 2. **Dispatch**: Pick the outlet extractor from the file path
//! 3. **Extraction**: Parse the page and build a `Record` (parallel, `workers` at a time)
//! 4. **Output**: Append each record to the JSONL file and report counts

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod errors;
mod inputs;
mod markup;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use cli::Cli;
use config::{RunConfig, Settings};
use outputs::jsonl::JsonlSink;
use pipeline::Summary;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("start converting...");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let settings = Settings::load(args.config.as_deref())?;
    let config = RunConfig::resolve(&args, settings);
    info!(
        output = %config.output.display(),
        workers = config.workers,
        filelist = ?config.filelist,
        "Resolved run configuration"
    );

    let mut summary = Summary::default();
    let jobs = match &config.filelist {
        Some(filelist) => {
            let jobs = inputs::load_filelist(filelist)?;
            pipeline::retain_existing(jobs, &mut summary)
        }
        None => inputs::scan_roots(&config.roots)?,
    };
    info!(count = jobs.len(), "Files to convert");

    let mut sink = match JsonlSink::create(&config.output).await {
        Ok(sink) => sink,
        Err(e) => {
            error!(error = %e, "Cannot open output file");
            return Err(e.into());
        }
    };

    let progress = pipeline::progress_bar(jobs.len(), config.progress);
    pipeline::run(jobs, config.workers, &mut sink, &mut summary, &progress).await?;
    info!(path = %config.output.display(), written = sink.written(), "Flushing output");
    sink.finish().await?;

    pipeline::report(&summary);

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
