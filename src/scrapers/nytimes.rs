//! New York Times article extractor.
//!
//! Archived pages live under `www.nytimes.com/YYYY/MM/DD/<categories...>/<slug>.html`.
//! Two page generations are handled:
//!
//! - **Before 2013**: byline in `meta[name="author"]`, body split across
//!   `p.story-body-text.story-content` paragraphs.
//! - **After 2013**: byline in `meta[name="byl"]` (prefixed with `By `),
//!   body inside `section[name="articleBody"]`.
//!
//! `script`, `style`, `link` and `button` subtrees never contribute body text.
//! Unlike the Japan Times, a page without any byline is rejected.

use super::{AuthorStrategy, find_author, meta_content, selector, visible_text};
use crate::errors::ExtractError;
use crate::models::Record;
use crate::utils::{
    collapse_whitespace, path_segments, segment_slice, split_keywords, strip_extension,
};
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{error, instrument};

const KEYWORD_DELIMITER: &str = ",";
const STRIPPED_TAGS: &[&str] = &["script", "style", "link", "button"];

static AUTHOR_META: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="author"]"#));
static BYLINE_META: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="byl"]"#));
static TITLE_META: Lazy<Selector> = Lazy::new(|| selector(r#"meta[property="og:title"]"#));
static DESCRIPTION_META: Lazy<Selector> =
    Lazy::new(|| selector(r#"meta[property="og:description"]"#));
static ARTICLE_BODY: Lazy<Selector> = Lazy::new(|| selector(r#"section[name="articleBody"]"#));
static STORY_PARAGRAPHS: Lazy<Selector> =
    Lazy::new(|| selector("p.story-body-text.story-content"));
static NEWS_KEYWORDS_META: Lazy<Selector> =
    Lazy::new(|| selector(r#"meta[name="news_keywords"]"#));
static KEYWORDS_META: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="keywords"]"#));

// Pre-2013 pages first.
const AUTHOR_STRATEGIES: &[AuthorStrategy] = &[author_from_meta, author_from_byline];

fn author_from_meta(doc: &Html) -> Option<String> {
    meta_content(doc, &AUTHOR_META).map(|content| collapse_whitespace(&content))
}

fn author_from_byline(doc: &Html) -> Option<String> {
    meta_content(doc, &BYLINE_META).map(|content| {
        let byline = collapse_whitespace(&content);
        byline.strip_prefix("By ").unwrap_or(&byline).to_string()
    })
}

/// Body text from the `articleBody` section, else from story paragraphs.
///
/// A section that yields no text counts as absent.
fn article_body(doc: &Html) -> Option<String> {
    let section = doc
        .select(&ARTICLE_BODY)
        .next()
        .map(|el| visible_text(el, STRIPPED_TAGS))
        .filter(|text| !text.is_empty());
    if section.is_some() {
        return section;
    }

    let paragraphs = doc
        .select(&STORY_PARAGRAPHS)
        .map(|p| visible_text(p, STRIPPED_TAGS))
        .filter(|text| !text.is_empty())
        .join(" ");
    Some(paragraphs).filter(|text| !text.is_empty())
}

/// Extract a [`Record`] from a New York Times page.
///
/// # Arguments
///
/// * `path` - Archive-relative path, e.g. `www.nytimes.com/2015/01/05/world/asia/slug.html`
/// * `content` - Raw page markup
///
/// # Errors
///
/// [`ExtractError::MissingField`] when the author, title, headline, body or
/// keywords are missing or empty.
#[instrument(level = "debug", skip_all, fields(%path))]
pub fn extract(path: &str, content: &str) -> Result<Record, ExtractError> {
    let doc = Html::parse_document(content);

    let segments = path_segments(path);
    let date = segment_slice(&segments, 1, Some(4)).join("/");
    let categories = segment_slice(&segments, 4, None)
        .into_iter()
        .map(str::to_string)
        .collect();
    let file_name = strip_extension(segments.last().copied().unwrap_or_default());
    let url = format!("http://{path}");

    let author = find_author(&doc, AUTHOR_STRATEGIES).ok_or_else(|| reject("author", path))?;

    let title = meta_content(&doc, &TITLE_META)
        .map(|raw| collapse_whitespace(&raw))
        .filter(|title| !title.is_empty())
        .ok_or_else(|| reject("title", path))?;

    let headline = meta_content(&doc, &DESCRIPTION_META)
        .map(|raw| collapse_whitespace(&raw))
        .filter(|headline| !headline.is_empty())
        .ok_or_else(|| reject("headline", path))?;

    let body = article_body(&doc).ok_or_else(|| reject("body", path))?;

    let keyword = meta_content(&doc, &NEWS_KEYWORDS_META)
        .or_else(|| meta_content(&doc, &KEYWORDS_META))
        .map(|raw| split_keywords(&raw, KEYWORD_DELIMITER))
        .filter(|groups| !groups.is_empty())
        .ok_or_else(|| reject("keywords", path))?;

    Ok(Record {
        title,
        headline,
        body,
        keyword,
        file_name,
        date,
        categories,
        url,
        author: Some(author),
        id: None,
    })
}

fn reject(field: &'static str, path: &str) -> ExtractError {
    error!(field, %path, "Rejected article: required field missing");
    ExtractError::missing(field, path)
}
