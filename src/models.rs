//! Data models for extracted article records.
//!
//! This module defines the single output unit of the converter:
//! - [`Record`]: one article, serialized as one JSON Lines row
//! - [`KeywordGroup`]: one comma-delimited keyword entry, split into sub-terms
//!
//! Both outlets produce the same schema. Fields an outlet cannot supply are
//! either emitted empty (`headline` for the Japan Times) or omitted (`author`
//! when no byline metadata exists, `id` when no filelist is used).

use serde::{Deserialize, Serialize};

/// An ordered group of keyword sub-terms.
///
/// Keyword metadata looks like `"Tokyo; Olympics, sports"`: entries are
/// separated by commas and each entry may carry several `;`-separated
/// sub-terms. A group always holds at least one non-empty term.
pub type KeywordGroup = Vec<String>;

/// A normalized article record extracted from one archived HTML page.
///
/// Records are built fresh per input file and are never partially filled:
/// an extractor either returns a complete `Record` or rejects the file.
///
/// # JSON Schema
///
/// ```json
/// {
///   "title": "...", "headline": "...", "abstract": "...",
///   "keyword": [["a", "b"], ["c"]], "file_name": "...",
///   "date": "2019/01/05", "categories": ["national"],
///   "url": "https://www.japantimes.co.jp/...", "author": "...", "id": "..."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Record {
    /// The article title, whitespace-collapsed and never empty.
    pub title: String,
    /// The article summary; always empty for the Japan Times.
    pub headline: String,
    /// The full article body text, whitespace-collapsed and never empty.
    #[serde(rename = "abstract")]
    pub body: String,
    /// Keyword groups in document order; never empty.
    pub keyword: Vec<KeywordGroup>,
    /// The final path segment (extension stripped for the New York Times).
    pub file_name: String,
    /// `/`-joined year/month/day path segments.
    pub date: String,
    /// Path segments between the date and the file name.
    pub categories: Vec<String>,
    /// Scheme plus the original relative path.
    pub url: String,
    /// The article byline, when the page carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// External identifier from the filelist, attached after extraction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Record {
    /// Attach the filelist identifier for this record.
    pub fn with_id(mut self, id: Option<String>) -> Self {
        self.id = id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record {
            title: "Foo".to_string(),
            headline: String::new(),
            body: "Body text".to_string(),
            keyword: vec![vec!["a".to_string(), "b".to_string()], vec!["c".to_string()]],
            file_name: "foo".to_string(),
            date: "2019/01/05".to_string(),
            categories: vec!["national".to_string()],
            url: "https://www.japantimes.co.jp/news/2019/01/05/national/foo".to_string(),
            author: None,
            id: None,
        }
    }

    #[test]
    fn test_record_serializes_body_as_abstract() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["abstract"], "Body text");
        assert!(json.get("body").is_none());
        assert_eq!(json["keyword"][0][1], "b");
    }

    #[test]
    fn test_record_omits_missing_author_and_id() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("author").is_none());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_with_id_attaches_identifier() {
        let record = sample().with_id(Some("42".to_string()));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "42");
    }
}
