//! Concurrent conversion of jobs into the record sink.
//!
//! Each job is read, parsed and extracted on tokio's blocking pool, at most
//! `workers` at a time. Results are consumed as they complete
//! (`buffer_unordered`), so output order follows completion, not input.
//! Only the consuming task touches the sink and the [`Summary`].
//!
//! A worker that panics surfaces as a `JoinError` and is counted like any
//! other per-file failure; the batch keeps going.

use crate::errors::{ExtractError, PipelineError};
use crate::inputs::Job;
use crate::models::Record;
use crate::outputs::jsonl::JsonlSink;
use crate::scrapers;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tokio::io::AsyncWrite;
use tokio::task;
use tracing::{error, info, instrument};

/// Per-file extraction entry point run on a worker.
pub type ExtractFn = fn(&str, Option<String>) -> Result<Record, ExtractError>;

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Filelist entries, when the run is driven by a filelist.
    pub expected: Option<usize>,
    /// Filelist entries whose file is not on disk.
    pub not_found: usize,
    pub converted: usize,
    pub rejected: usize,
    pub unrecognized: usize,
    pub unreadable: usize,
    pub crashed: usize,
}

impl Summary {
    /// Filelist entries that produced no record.
    pub fn missing(&self) -> Option<usize> {
        self.expected
            .map(|expected| expected.saturating_sub(self.converted))
    }

    fn note_failure(&mut self, err: &ExtractError) {
        match err {
            ExtractError::MissingField { .. } => self.rejected += 1,
            ExtractError::UnrecognizedSource { .. } => self.unrecognized += 1,
            ExtractError::Read { .. } => self.unreadable += 1,
            ExtractError::Worker { .. } => self.crashed += 1,
        }
    }
}

/// Drop filelist jobs whose file is missing, recording how many were dropped.
pub fn retain_existing(jobs: Vec<Job>, summary: &mut Summary) -> Vec<Job> {
    summary.expected = Some(jobs.len());
    let (present, absent): (Vec<_>, Vec<_>) =
        jobs.into_iter().partition(|job| Path::new(&job.path).is_file());
    summary.not_found = absent.len();
    if !absent.is_empty() {
        info!(count = absent.len(), "Skipping filelist entries not found on disk");
    }
    present
}

/// A progress bar over `len` jobs, or a hidden one when disabled.
pub fn progress_bar(len: usize, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

/// Convert `jobs` with the outlet extractors and write accepted records.
pub async fn run<W>(
    jobs: Vec<Job>,
    workers: usize,
    sink: &mut JsonlSink<W>,
    summary: &mut Summary,
    progress: &ProgressBar,
) -> Result<(), PipelineError>
where
    W: AsyncWrite + Unpin,
{
    run_with(jobs, workers, sink, summary, progress, scrapers::process_file).await
}

/// [`run`] with a caller-supplied extraction function.
#[instrument(level = "info", skip_all, fields(jobs = jobs.len(), workers = workers))]
pub async fn run_with<W>(
    jobs: Vec<Job>,
    workers: usize,
    sink: &mut JsonlSink<W>,
    summary: &mut Summary,
    progress: &ProgressBar,
    extract: ExtractFn,
) -> Result<(), PipelineError>
where
    W: AsyncWrite + Unpin,
{
    let mut results = stream::iter(jobs)
        .map(move |job| async move {
            let path = job.path.clone();
            match task::spawn_blocking(move || extract(&job.path, job.id)).await {
                Ok(result) => result,
                Err(e) => Err(ExtractError::Worker {
                    path,
                    reason: e.to_string(),
                }),
            }
        })
        .buffer_unordered(workers.max(1));

    while let Some(result) = results.next().await {
        match result {
            Ok(record) => {
                sink.write(&record).await?;
                summary.converted += 1;
            }
            Err(err) => {
                match &err {
                    // Extractors log their own rejections.
                    ExtractError::MissingField { .. } => {}
                    ExtractError::UnrecognizedSource { path } => {
                        error!(%path, "Unrecognised file type");
                    }
                    ExtractError::Read { path, source } => {
                        error!(%path, error = %source, "Failed to read file");
                    }
                    ExtractError::Worker { path, reason } => {
                        error!(%path, %reason, "Worker failed; skipping file");
                    }
                }
                summary.note_failure(&err);
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();
    Ok(())
}

/// Log the completion summary.
pub fn report(summary: &Summary) {
    info!(
        converted = summary.converted,
        rejected = summary.rejected,
        unrecognized = summary.unrecognized,
        unreadable = summary.unreadable,
        crashed = summary.crashed,
        "Converted {} articles",
        summary.converted
    );
    if let Some(missing) = summary.missing().filter(|missing| *missing > 0) {
        info!(
            missing,
            not_found = summary.not_found,
            "There are {missing} missing articles. Please (re)try downloading them"
        );
    }
}
