//! Error types for per-file extraction and batch-level failures.
//!
//! Per-file problems are [`ExtractError`]s: they are logged, counted, and the
//! batch moves on. Only [`PipelineError`]s stop a run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a single input file produced no record.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no {field} for {path}")]
    MissingField { field: &'static str, path: String },
    #[error("unrecognised file type: {path}")]
    UnrecognizedSource { path: String },
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("worker for {path} did not finish: {reason}")]
    Worker { path: String, reason: String },
}

impl ExtractError {
    pub fn missing(field: &'static str, path: &str) -> Self {
        ExtractError::MissingField {
            field,
            path: path.to_string(),
        }
    }
}

/// Failures that abort the whole conversion.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("cannot read filelist {path}: {source}")]
    Filelist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid file pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("output sink {path} failed: {source}")]
    Sink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}
