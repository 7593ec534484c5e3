//! Wiki-link inline scanning
//!
//! Splits paragraph text into plain-text and link spans on the
//! `[[slug]]` / `[[slug|alias display text]]` pattern. Targets may
//! carry a directory component and an extension; both are stripped
//! before resolution so `[[notes/Intro.md]]` and `[[Intro]]` hit the
//! same index entry.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use vellum_core::NoteLinkIndex;

use crate::node::InlineSpan;

static WIKILINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]|]+)(?:\|([^\[\]]+))?\]\]").expect("wikilink regex"));

/// Resolution key for a wiki-link target: file-name portion, without
/// extension
pub fn link_slug(target: &str) -> String {
    let name = Path::new(target.trim())
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(target);
    name.strip_suffix(".md").unwrap_or(name).to_string()
}

/// Scan `text` into inline spans, resolving each link against `index`
/// for hover-preview purposes. Text before, between, and after matches
/// is emitted verbatim.
pub fn scan_spans(text: &str, index: &NoteLinkIndex) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for caps in WIKILINK_REGEX.captures_iter(text) {
        let full = caps.get(0).expect("capture 0 always present");
        if full.start() > cursor {
            spans.push(InlineSpan::Text(text[cursor..full.start()].to_string()));
        }

        let target = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let slug = link_slug(target);
        let display = caps
            .get(2)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_else(|| slug.clone());

        let resolved = index.resolve_by_slug(&slug).is_some();
        spans.push(InlineSpan::Link {
            slug,
            display,
            resolved,
        });
        cursor = full.end();
    }

    if cursor < text.len() {
        spans.push(InlineSpan::Text(text[cursor..].to_string()));
    }
    spans
}
