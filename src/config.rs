//! Run configuration: YAML settings merged with CLI overrides.
//!
//! A settings file is optional. Every key has a default:
//!
//! ```yaml
//! output: ../dataset.jsonl
//! workers: 8
//! roots:
//!   - root: www.japantimes.co.jp/
//!     file_pattern: "^[^.]"
//!   - root: www.nytimes.com/
//!     file_pattern: "\\.html$"
//! ```
//!
//! `file_pattern` is a regex matched against each file's name during the
//! directory scan. It is ignored when a filelist drives the run.

use crate::cli::Cli;
use crate::errors::PipelineError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::thread;
use tracing::instrument;

/// One archive root and the file names accepted under it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceRoot {
    pub root: PathBuf,
    pub file_pattern: String,
}

/// Contents of the optional YAML settings file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub output: Option<PathBuf>,
    pub workers: Option<usize>,
    pub roots: Vec<SourceRoot>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output: None,
            workers: None,
            roots: default_roots(),
        }
    }
}

fn default_roots() -> Vec<SourceRoot> {
    vec![
        SourceRoot {
            root: PathBuf::from("www.japantimes.co.jp/"),
            file_pattern: "^[^.]".to_string(),
        },
        SourceRoot {
            root: PathBuf::from("www.nytimes.com/"),
            file_pattern: r"\.html$".to_string(),
        },
    ]
}

impl Settings {
    /// Parse settings from YAML text.
    pub fn from_yaml(path: &Path, text: &str) -> Result<Self, PipelineError> {
        serde_yaml::from_str(text).map_err(|source| PipelineError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load settings from `path`, or defaults when no path is given.
    #[instrument(level = "info", skip_all, fields(path = ?path))]
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| PipelineError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(path, &text)
    }
}

/// Fully resolved options for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub filelist: Option<PathBuf>,
    pub output: PathBuf,
    pub workers: usize,
    pub roots: Vec<SourceRoot>,
    pub progress: bool,
}

impl RunConfig {
    /// Merge CLI arguments over settings. CLI values win.
    pub fn resolve(cli: &Cli, settings: Settings) -> Self {
        let output = cli
            .output
            .clone()
            .or(settings.output)
            .unwrap_or_else(|| default_output(cli.filelist.as_deref()));
        let workers = cli
            .workers
            .or(settings.workers)
            .unwrap_or_else(default_workers)
            .max(1);
        Self {
            filelist: cli.filelist.clone(),
            output,
            workers,
            roots: settings.roots,
            progress: !cli.no_progress,
        }
    }
}

fn default_workers() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Output path used when neither the CLI nor the settings name one.
///
/// With a filelist `test.url.filelist` this is `../test.jsonl`; without one it
/// is `../dataset.jsonl`.
pub fn default_output(filelist: Option<&Path>) -> PathBuf {
    let parent = PathBuf::from("..");
    let Some(name) = filelist.and_then(Path::file_name) else {
        return parent.join("dataset.jsonl");
    };
    let name = name.to_string_lossy();
    if name.contains("url.filelist") {
        parent.join(name.replace("url.filelist", "jsonl"))
    } else {
        parent.join(format!("{name}.jsonl"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_output_without_filelist() {
        assert_eq!(default_output(None), PathBuf::from("../dataset.jsonl"));
    }

    #[test]
    fn test_default_output_from_filelist_name() {
        assert_eq!(
            default_output(Some(Path::new("lists/test.url.filelist"))),
            PathBuf::from("../test.jsonl")
        );
        assert_eq!(
            default_output(Some(Path::new("ids.tsv"))),
            PathBuf::from("../ids.tsv.jsonl")
        );
    }

    #[test]
    fn test_settings_yaml_partial_keeps_defaults() {
        let settings = Settings::from_yaml(Path::new("s.yaml"), "workers: 3\n").unwrap();
        assert_eq!(settings.workers, Some(3));
        assert_eq!(settings.roots, default_roots());
        assert_eq!(settings.output, None);
    }

    #[test]
    fn test_settings_yaml_custom_roots() {
        let yaml = "output: out.jsonl\nroots:\n  - root: archive/\n    file_pattern: \"\\\\.htm$\"\n";
        let settings = Settings::from_yaml(Path::new("s.yaml"), yaml).unwrap();
        assert_eq!(settings.output, Some(PathBuf::from("out.jsonl")));
        assert_eq!(settings.roots.len(), 1);
        assert_eq!(settings.roots[0].file_pattern, r"\.htm$");
    }

    #[test]
    fn test_settings_yaml_invalid() {
        let err = Settings::from_yaml(Path::new("s.yaml"), "workers: [nope").unwrap_err();
        assert!(matches!(err, PipelineError::ConfigParse { .. }));
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let err = Settings::load(Some(Path::new("/nonexistent/settings.yaml"))).unwrap_err();
        assert!(matches!(err, PipelineError::ConfigRead { .. }));
    }

    #[test]
    fn test_cli_overrides_settings() {
        let cli = Cli::parse_from(["news_jsonl", "-o", "cli.jsonl", "-w", "2", "--no-progress"]);
        let settings = Settings {
            output: Some(PathBuf::from("settings.jsonl")),
            workers: Some(16),
            roots: Vec::new(),
        };
        let config = RunConfig::resolve(&cli, settings);
        assert_eq!(config.output, PathBuf::from("cli.jsonl"));
        assert_eq!(config.workers, 2);
        assert!(!config.progress);
        assert!(config.roots.is_empty());
    }

    #[test]
    fn test_zero_workers_clamped() {
        let cli = Cli::parse_from(["news_jsonl", "-w", "0"]);
        let config = RunConfig::resolve(&cli, Settings::default());
        assert_eq!(config.workers, 1);
    }
}
