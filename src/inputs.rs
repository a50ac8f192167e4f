//! Input discovery: filelists and archive directory scans.
//!
//! Two ways to name the pages to convert:
//!
//! 1. **Filelist**: `id<TAB>url` lines. The URL scheme is stripped so the
//!    rest is a path relative to the working directory, and the id is
//!    carried onto the resulting record.
//! 2. **Directory scan**: each configured root is walked recursively and
//!    every file whose name matches the root's pattern becomes a job.

use crate::config::SourceRoot;
use crate::errors::PipelineError;
use regex::Regex;
use std::path::Path;
use tracing::{info, instrument, warn};
use walkdir::WalkDir;

/// One page to convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Filelist identifier, if the job came from a filelist.
    pub id: Option<String>,
    /// Archive-relative path of the page.
    pub path: String,
}

/// Strip a leading `http://` or `https://` from a filelist URL.
pub fn url_to_path(url: &str) -> &str {
    url.strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .unwrap_or(url)
}

/// Parse filelist text into jobs.
///
/// Blank lines are ignored; lines without a tab are logged and skipped.
pub fn parse_filelist(text: &str) -> Vec<Job> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(idx, line)| match line.trim().split_once('\t') {
            Some((id, url)) => Some(Job {
                id: Some(id.trim().to_string()),
                path: url_to_path(url.trim()).to_string(),
            }),
            None => {
                warn!(line = idx + 1, "Malformed filelist line; expected id<TAB>url");
                None
            }
        })
        .collect()
}

/// Read and parse a filelist file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn load_filelist(path: &Path) -> Result<Vec<Job>, PipelineError> {
    let text = std::fs::read_to_string(path).map_err(|source| PipelineError::Filelist {
        path: path.to_path_buf(),
        source,
    })?;
    let jobs = parse_filelist(&text);
    info!(count = jobs.len(), "Loaded filelist");
    Ok(jobs)
}

/// Walk every root and collect the files its pattern accepts.
///
/// Roots that do not exist are logged and skipped. Results are sorted
/// per root so runs over the same tree see the same job order.
#[instrument(level = "info", skip_all)]
pub fn scan_roots(roots: &[SourceRoot]) -> Result<Vec<Job>, PipelineError> {
    let mut jobs = Vec::new();
    for source in roots {
        let pattern = Regex::new(&source.file_pattern).map_err(|e| PipelineError::Pattern {
            pattern: source.file_pattern.clone(),
            source: e,
        })?;
        if !source.root.is_dir() {
            warn!(root = %source.root.display(), "Archive root not found; skipping");
            continue;
        }

        let before = jobs.len();
        for entry in WalkDir::new(&source.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
        {
            let name = entry.file_name().to_string_lossy();
            if pattern.is_match(&name) {
                jobs.push(Job {
                    id: None,
                    path: entry.path().to_string_lossy().into_owned(),
                });
            }
        }
        info!(root = %source.root.display(), count = jobs.len() - before, "Scanned archive root");
    }
    Ok(jobs)
}
