//! Command-line interface definitions for the news JSONL converter.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option is optional; values given here override the YAML settings
//! file (see [`crate::config`]).

use clap::Parser;
use std::path::PathBuf;

/// Convert archived news pages to JSON Lines, either from a filelist or by
/// scanning the archive roots in the working directory.
///
/// # Examples
///
/// ```sh
/// # Scan www.japantimes.co.jp/ and www.nytimes.com/ into ../dataset.jsonl
/// news_jsonl
///
/// # Convert only the files named in a filelist, tagging records with ids
/// news_jsonl -f test.url.filelist
///
/// # Explicit output and worker count
/// news_jsonl -f test.url.filelist -o out.jsonl -w 8
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Tab-separated `id<TAB>url` filelist. If not given, every matching
    /// file under the archive roots is converted without ids
    #[arg(short, long)]
    pub filelist: Option<PathBuf>,

    /// Output JSONL file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of files processed concurrently
    #[arg(short, long, env = "NEWS_JSONL_WORKERS")]
    pub workers: Option<usize>,

    /// Optional path to a YAML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["news_jsonl"]);
        assert!(cli.filelist.is_none());
        assert!(cli.output.is_none());
        assert!(cli.config.is_none());
        assert!(!cli.no_progress);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "news_jsonl",
            "-f",
            "test.url.filelist",
            "-o",
            "/tmp/out.jsonl",
            "-w",
            "4",
            "-c",
            "settings.yaml",
        ]);

        assert_eq!(cli.filelist, Some(PathBuf::from("test.url.filelist")));
        assert_eq!(cli.output, Some(PathBuf::from("/tmp/out.jsonl")));
        assert_eq!(cli.workers, Some(4));
        assert_eq!(cli.config, Some(PathBuf::from("settings.yaml")));
    }

    #[test]
    fn test_cli_long_flags() {
        let cli = Cli::parse_from([
            "news_jsonl",
            "--filelist",
            "a.url.filelist",
            "--no-progress",
        ]);
        assert_eq!(cli.filelist, Some(PathBuf::from("a.url.filelist")));
        assert!(cli.no_progress);
    }
}
