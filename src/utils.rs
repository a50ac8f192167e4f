//! Utility functions for text normalization and archive path handling.
//!
//! This module provides helpers shared by both outlet extractors:
//! - Whitespace collapsing for titles, summaries and body text
//! - Keyword splitting into comma groups and `;` sub-terms
//! - Slicing archive paths into date, category and file-name parts
//! - String truncation for log previews

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collapse every run of whitespace to a single space and trim both ends.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(collapse_whitespace("  a\n\t b  "), "a b");
/// ```
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE_RUN.replace_all(s, " ").trim().to_string()
}

/// Split keyword metadata into ordered groups of sub-terms.
///
/// `content` is whitespace-collapsed, split on `delimiter` into groups, and
/// each group is split on `;`. Sub-terms are trimmed; empty sub-terms and
/// groups left empty are dropped.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(split_keywords("a; b, c", ", "), vec![vec!["a", "b"], vec!["c"]]);
/// ```
pub fn split_keywords(content: &str, delimiter: &str) -> Vec<Vec<String>> {
    collapse_whitespace(content)
        .split(delimiter)
        .filter(|group| !group.is_empty())
        .map(|group| {
            group
                .split(';')
                .map(str::trim)
                .filter(|term| !term.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|group| !group.is_empty())
        .collect()
}

/// Split a relative archive path into its `/`-separated segments.
pub fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').collect()
}

/// Take `segments[start..end]`, clamping both bounds to the slice length.
///
/// `end` of `None` means "all but the last segment", which is where the
/// file name lives.
pub fn segment_slice<'a>(segments: &[&'a str], start: usize, end: Option<usize>) -> Vec<&'a str> {
    let len = segments.len();
    let end = end.unwrap_or_else(|| len.saturating_sub(1)).min(len);
    let start = start.min(end);
    segments[start..end].to_vec()
}

/// Drop the final `.ext` from a file name, if any.
///
/// A name without a dot yields an empty string, matching how the archive
/// names New York Times pages (always `slug.html`).
pub fn strip_extension(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(idx) => file_name[..idx].to_string(),
        None => String::new(),
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at `max` bytes (backed off to a char boundary) with
/// an ellipsis and byte count appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut cut = max;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
    }
}
