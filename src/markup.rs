//! Void-element repair for archived markup.
//!
//! Older Japan Times pages carry `<meta ...>` and `<link ...>` tags that are
//! never closed. The repair is a textual substitution run before parsing:
//! every `<meta ...>`/`<link ...>` that does not already end in `/` (or in
//! `-`, as in conditional comments) is rewritten to `<tag ... />`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// Quoted attribute values may contain `<` or `>`.
static META_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<(meta\b(?:[^<>"']|"[^"]*"|'[^']*')*)>"#).unwrap()
});
static LINK_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<(link\b(?:[^<>"']|"[^"]*"|'[^']*')*)>"#).unwrap()
});

/// Void elements the repair knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoidTag {
    Meta,
    Link,
}

/// Self-close every unclosed occurrence of `tag` in `html`.
///
/// Inputs with nothing to repair are returned unchanged.
pub fn fix_unclosed(tag: VoidTag, html: &str) -> String {
    match tag {
        VoidTag::Meta => close_with(&META_TAG, html),
        VoidTag::Link => close_with(&LINK_TAG, html),
    }
}

/// Repair the void elements that matter for Japan Times pages.
pub fn normalize_void_tags(html: &str) -> String {
    let html = fix_unclosed(VoidTag::Meta, html);
    fix_unclosed(VoidTag::Link, &html)
}

fn close_with(re: &Regex, html: &str) -> String {
    re.replace_all(html, |caps: &Captures| {
        let inner = &caps[1];
        if inner.ends_with('/') || inner.ends_with('-') {
            caps[0].to_string()
        } else {
            format!("<{} />", inner.trim_end())
        }
    })
    .into_owned()
}
