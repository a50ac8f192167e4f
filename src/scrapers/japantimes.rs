//! The Japan Times article extractor.
//!
//! Archived pages live under `www.japantimes.co.jp/<section>/YYYY/MM/DD/<categories...>/<slug>`.
//! Their markup often leaves `<meta>` and `<link>` unclosed, so it is run
//! through [`normalize_void_tags`] before parsing.
//!
//! # Field Sources
//!
//! | Field | Source | Required |
//! |-------|--------|----------|
//! | title | `meta[property="og:title"]`, `| The Japan Times` stripped | yes |
//! | abstract | text of `div#jtarticle` | yes |
//! | keyword | `meta[name="keywords"]`, split on `", "` then `;` | yes |
//! | author | `meta[name="author"]`, then `a.author` | no |
//!
//! The headline is never extracted for this outlet and is always empty.

use super::{AuthorStrategy, element_text, find_author, meta_content, selector};
use crate::errors::ExtractError;
use crate::markup::normalize_void_tags;
use crate::models::Record;
use crate::utils::{collapse_whitespace, path_segments, segment_slice, split_keywords};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{error, instrument, warn};

const TITLE_SUFFIX: &str = "| The Japan Times";
const KEYWORD_DELIMITER: &str = ", ";

static AUTHOR_META: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="author"]"#));
static AUTHOR_LINK: Lazy<Selector> = Lazy::new(|| selector("a.author"));
static TITLE_META: Lazy<Selector> = Lazy::new(|| selector(r#"meta[property="og:title"]"#));
static BODY: Lazy<Selector> = Lazy::new(|| selector("div#jtarticle"));
static KEYWORDS_META: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="keywords"]"#));

const AUTHOR_STRATEGIES: &[AuthorStrategy] = &[author_from_meta, author_from_link];

fn author_from_meta(doc: &Html) -> Option<String> {
    meta_content(doc, &AUTHOR_META)
        .map(|content| collapse_whitespace(&content))
        .filter(|author| !author.is_empty())
}

fn author_from_link(doc: &Html) -> Option<String> {
    doc.select(&AUTHOR_LINK)
        .next()
        .map(element_text)
        .filter(|author| !author.is_empty())
}

/// Strip the site-name suffix from an already collapsed title.
fn strip_site_suffix(title: &str) -> String {
    title.replace(TITLE_SUFFIX, "").trim().to_string()
}

/// Extract a [`Record`] from a Japan Times page.
///
/// # Arguments
///
/// * `path` - Archive-relative path, e.g. `www.japantimes.co.jp/news/2019/01/05/national/slug/`
/// * `content` - Raw page markup
///
/// # Errors
///
/// [`ExtractError::MissingField`] when the title, body or keywords are
/// missing or empty. A missing author only logs a warning.
#[instrument(level = "debug", skip_all, fields(%path))]
pub fn extract(path: &str, content: &str) -> Result<Record, ExtractError> {
    let doc = Html::parse_document(&normalize_void_tags(content));

    let segments = path_segments(path);
    let date = segment_slice(&segments, 2, Some(5)).join("/");
    let categories = segment_slice(&segments, 5, None)
        .into_iter()
        .map(str::to_string)
        .collect();
    let file_name = segments.last().copied().unwrap_or_default().to_string();
    let url = format!("https://{path}");

    let author = find_author(&doc, AUTHOR_STRATEGIES);
    if author.is_none() {
        warn!(%path, "No author metadata; keeping article without author");
    }

    let title = meta_content(&doc, &TITLE_META)
        .map(|raw| strip_site_suffix(&collapse_whitespace(&raw)))
        .filter(|title| !title.is_empty())
        .ok_or_else(|| reject("title", path))?;

    let body = doc
        .select(&BODY)
        .next()
        .map(element_text)
        .filter(|body| !body.is_empty())
        .ok_or_else(|| reject("body", path))?;

    let keyword = meta_content(&doc, &KEYWORDS_META)
        .map(|raw| split_keywords(&raw, KEYWORD_DELIMITER))
        .filter(|groups| !groups.is_empty())
        .ok_or_else(|| reject("keywords", path))?;

    Ok(Record {
        title,
        headline: String::new(),
        body,
        keyword,
        file_name,
        date,
        categories,
        url,
        author,
        id: None,
    })
}

fn reject(field: &'static str, path: &str) -> ExtractError {
    error!(field, %path, "Rejected article: required field missing");
    ExtractError::missing(field, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = "www.japantimes.co.jp/news/2019/01/05/national/politics-diplomacy/abe-visit";

    fn page(head: &str, body: &str) -> String {
        format!("<html><head>{head}</head><body>{body}</body></html>")
    }

    fn full_head() -> &'static str {
        "<meta name=\"author\" content=\"Kyodo\">\
         <meta property=\"og:title\" content=\"  Abe   visits\n Europe | The Japan Times\">\
         <meta property=\"og:description\" content=\"Summary\">\
         <meta name=\"keywords\" content=\"Shinzo Abe; Europe, diplomacy\">\
         <link rel=\"canonical\" href=\"https://www.japantimes.co.jp/\">"
    }

    #[test]
    fn test_extracts_full_record() {
        let html = page(
            full_head(),
            "<div id=\"jtarticle\"><p>First   paragraph.</p>\n<p>Second\nparagraph.</p></div>",
        );
        let record = extract(PATH, &html).unwrap();

        assert_eq!(record.title, "Abe visits Europe");
        assert_eq!(record.headline, "");
        assert_eq!(record.body, "First paragraph. Second paragraph.");
        assert_eq!(
            record.keyword,
            vec![
                vec!["Shinzo Abe".to_string(), "Europe".to_string()],
                vec!["diplomacy".to_string()]
            ]
        );
        assert_eq!(record.date, "2019/01/05");
        assert_eq!(record.categories, vec!["national", "politics-diplomacy"]);
        assert_eq!(record.file_name, "abe-visit");
        assert_eq!(record.url, format!("https://{PATH}"));
        assert_eq!(record.author.as_deref(), Some("Kyodo"));
        assert_eq!(record.id, None);
    }

    #[test]
    fn test_author_falls_back_to_link() {
        let head = full_head().replace("<meta name=\"author\" content=\"Kyodo\">", "");
        let html = page(
            &head,
            "<a class=\"author\" href=\"/author/x\"> Jane  Doe </a><div id=\"jtarticle\">Text</div>",
        );
        let record = extract(PATH, &html).unwrap();
        assert_eq!(record.author.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_missing_author_is_not_fatal() {
        let head = full_head().replace("<meta name=\"author\" content=\"Kyodo\">", "");
        let html = page(&head, "<div id=\"jtarticle\">Text</div>");
        let record = extract(PATH, &html).unwrap();
        assert_eq!(record.author, None);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("author").is_none());
    }

    #[test]
    fn test_missing_title_rejects() {
        let head = full_head().replace("og:title", "og:other");
        let html = page(&head, "<div id=\"jtarticle\">Text</div>");
        let err = extract(PATH, &html).unwrap_err();
        assert!(matches!(err, ExtractError::MissingField { field: "title", .. }));
    }

    #[test]
    fn test_title_that_is_only_suffix_rejects() {
        let head = "<meta property=\"og:title\" content=\"| The Japan Times\">\
                    <meta name=\"keywords\" content=\"a\">";
        let html = page(head, "<div id=\"jtarticle\">Text</div>");
        let err = extract(PATH, &html).unwrap_err();
        assert!(matches!(err, ExtractError::MissingField { field: "title", .. }));
    }

    #[test]
    fn test_missing_body_rejects() {
        let html = page(full_head(), "<div id=\"other\">Text</div>");
        let err = extract(PATH, &html).unwrap_err();
        assert!(matches!(err, ExtractError::MissingField { field: "body", .. }));
    }

    #[test]
    fn test_empty_body_rejects() {
        let html = page(full_head(), "<div id=\"jtarticle\">  \n </div>");
        let err = extract(PATH, &html).unwrap_err();
        assert!(matches!(err, ExtractError::MissingField { field: "body", .. }));
    }

    #[test]
    fn test_missing_or_empty_keywords_reject() {
        let head = full_head().replace("name=\"keywords\"", "name=\"other\"");
        let html = page(&head, "<div id=\"jtarticle\">Text</div>");
        let err = extract(PATH, &html).unwrap_err();
        assert!(matches!(err, ExtractError::MissingField { field: "keywords", .. }));

        let head = full_head().replace("Shinzo Abe; Europe, diplomacy", "; , ;");
        let html = page(&head, "<div id=\"jtarticle\">Text</div>");
        let err = extract(PATH, &html).unwrap_err();
        assert!(matches!(err, ExtractError::MissingField { field: "keywords", .. }));
    }

    #[test]
    fn test_headline_not_required() {
        let head = full_head().replace("og:description", "og:other");
        let html = page(&head, "<div id=\"jtarticle\">Text</div>");
        assert_eq!(extract(PATH, &html).unwrap().headline, "");
    }

    #[test]
    fn test_unclosed_author_meta_is_repaired() {
        let html = "<html><head>\n<meta name=\"author\" content=\"X\">\n\
                    <meta property=\"og:title\" content=\"T\">\n\
                    <meta name=\"keywords\" content=\"k\">\n</head>\
                    <body><div id=\"jtarticle\">Body</div></body></html>";
        let record = extract(PATH, html).unwrap();
        assert_eq!(record.author.as_deref(), Some("X"));
    }

    #[test]
    fn test_short_path_yields_empty_date_parts() {
        let html = page(full_head(), "<div id=\"jtarticle\">Text</div>");
        let record = extract("www.japantimes.co.jp/slug", &html).unwrap();
        assert_eq!(record.date, "");
        assert!(record.categories.is_empty());
        assert_eq!(record.file_name, "slug");
    }

    #[test]
    fn test_angle_bracket_inside_meta_content_survives_repair() {
        let head = "<meta property=\"og:title\" content=\"Yen > dollar | The Japan Times\">\
                    <meta name=\"keywords\" content=\"a > b, c\">";
        let html = page(head, "<div id=\"jtarticle\">Text</div>");
        let record = extract(PATH, &html).unwrap();
        assert_eq!(record.title, "Yen > dollar");
        assert_eq!(
            record.keyword,
            vec![vec!["a > b".to_string()], vec!["c".to_string()]]
        );
    }
}
