//! Per-outlet article extractors and the dispatcher that selects them.
//!
//! Each supported outlet has its own submodule mapping a parsed page and its
//! archive path to a [`Record`]:
//!
//! | Outlet | Module | Path marker | Notes |
//! |--------|--------|-------------|-------|
//! | The Japan Times | [`japantimes`] | `japantimes` | Void tags repaired before parsing; author optional |
//! | The New York Times | [`nytimes`] | `nytimes` | Two template generations (pre/post 2013); author required |
//!
//! # Common Patterns
//!
//! Each extractor exports `extract(path, content) -> Result<Record, ExtractError>`.
//! A required field that cannot be found rejects the whole file with
//! [`ExtractError::MissingField`]; no partial record is ever returned.
//!
//! The helpers at the bottom of this module wrap the `scraper` queries both
//! extractors share: meta-tag lookup and whitespace-collapsed text.

pub mod japantimes;
pub mod nytimes;

use crate::errors::ExtractError;
use crate::models::Record;
use crate::utils::collapse_whitespace;
use itertools::Itertools;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use std::fs;
use tracing::{debug, instrument};

/// The supported source layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outlet {
    JapanTimes,
    NyTimes,
}

impl Outlet {
    /// Pick the outlet for an archive path by substring, `nytimes` first.
    pub fn detect(path: &str) -> Option<Outlet> {
        if path.contains("nytimes") {
            Some(Outlet::NyTimes)
        } else if path.contains("japantimes") {
            Some(Outlet::JapanTimes)
        } else {
            None
        }
    }

    /// Run this outlet's extractor over already-loaded page content.
    pub fn extract(self, path: &str, content: &str) -> Result<Record, ExtractError> {
        match self {
            Outlet::JapanTimes => japantimes::extract(path, content),
            Outlet::NyTimes => nytimes::extract(path, content),
        }
    }
}

impl fmt::Display for Outlet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outlet::JapanTimes => f.write_str("japantimes"),
            Outlet::NyTimes => f.write_str("nytimes"),
        }
    }
}

/// Read one archived page from disk and route it to its outlet's extractor.
///
/// The outlet is decided before reading, so unrecognised paths never touch
/// the filesystem and fail with [`ExtractError::UnrecognizedSource`]. Invalid
/// UTF-8 is replaced rather than rejected. The filelist `id`, if any, is
/// attached to the returned record.
#[instrument(level = "debug", skip_all, fields(%path))]
pub fn process_file(path: &str, id: Option<String>) -> Result<Record, ExtractError> {
    let outlet = Outlet::detect(path).ok_or_else(|| ExtractError::UnrecognizedSource {
        path: path.to_string(),
    })?;
    let bytes = fs::read(path).map_err(|source| ExtractError::Read {
        path: path.to_string(),
        source,
    })?;
    let content = String::from_utf8_lossy(&bytes);
    let record = outlet.extract(path, &content)?;
    debug!(%outlet, title = %crate::utils::truncate_for_log(&record.title, 80), "Extracted article");
    Ok(record.with_id(id))
}

/// One way of finding a byline in a parsed page.
pub(crate) type AuthorStrategy = fn(&Html) -> Option<String>;

/// Try each strategy in order; the first that yields an author wins.
///
/// `None` means no strategy matched. Callers decide whether that is fatal.
pub(crate) fn find_author(doc: &Html, strategies: &[AuthorStrategy]) -> Option<String> {
    strategies.iter().find_map(|strategy| strategy(doc))
}

/// Parse a CSS selector that is a compile-time constant.
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

/// The `content` attribute of the first element matching `sel`.
///
/// `None` when no element matches or the element has no `content`.
pub(crate) fn meta_content(doc: &Html, sel: &Selector) -> Option<String> {
    doc.select(sel)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::to_string)
}

/// All text beneath `el`, joined with single spaces and collapsed.
pub(crate) fn element_text(el: ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().join(" "))
}

/// Like [`element_text`], but skips whole subtrees whose tag is in `skip`.
pub(crate) fn visible_text(el: ElementRef<'_>, skip: &[&str]) -> String {
    let mut parts = Vec::new();
    collect_text(el, skip, &mut parts);
    collapse_whitespace(&parts.join(" "))
}

fn collect_text<'a>(el: ElementRef<'a>, skip: &[&str], parts: &mut Vec<&'a str>) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => parts.push(&**text),
            Node::Element(inner) if skip.contains(&inner.name()) => {}
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, skip, parts);
                }
            }
            _ => {}
        }
    }
}
