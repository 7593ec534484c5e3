//! YAML front-matter extraction
//!
//! Maps the leading `---` fence block of a note onto a strongly-typed,
//! lossless [`Metadata`] record. The well-known keys `date`, `tags`,
//! and `aliases` are mapped explicitly; every other key is preserved
//! verbatim in [`Metadata::extra`] so data is never lost.
//!
//! Malformed or missing front-matter never aborts rendering: the
//! extractor returns `None` and callers fall back gracefully.

use chrono::NaiveDate;
use pulldown_cmark::{Event, MetadataBlockKind, Options, Parser, Tag};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::HashMap;
use tracing::debug;

/// Typed, lossless view of a note's front-matter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Calendar date, if the `date` key parses as one
    pub date: Option<NaiveDate>,
    /// Ordered, blank-filtered `tags` entries
    pub tags: Vec<String>,
    /// Ordered, blank-filtered `aliases` entries
    pub aliases: Vec<String>,
    /// Every key other than `date`/`tags`/`aliases`, shape preserved
    pub extra: HashMap<String, Value>,
}

impl Metadata {
    /// Whether a badge row should be shown for this metadata
    pub fn has_badges(&self) -> bool {
        !self.tags.is_empty() || !self.aliases.is_empty()
    }
}

/// Parse the first YAML fence of `raw` (if any) into a [`Metadata`].
///
/// Pure: identical input always yields a structurally equal result.
/// Returns `None` when there is no front-matter block at the top of
/// the document or when its YAML does not deserialize.
pub fn extract(raw: &str) -> Option<Metadata> {
    let span = frontmatter_span(raw)?;

    // The span covers the fences; fence + at least one content line +
    // fence is the minimum well-formed shape.
    let lines: Vec<&str> = raw[span.clone()].trim_end().split('\n').collect();
    if lines.len() < 3 {
        return None;
    }
    let inner = lines[1..lines.len() - 1].join("\n");

    let map: HashMap<String, Value> = match serde_yaml::from_str(&inner) {
        Ok(map) => map,
        Err(err) => {
            // Corrupted YAML must never take down the render pipeline.
            debug!(error = %err, "skipping malformed front-matter");
            return None;
        }
    };

    let mut metadata = Metadata::default();
    for (key, value) in map {
        match key.as_str() {
            "tags" => metadata.tags = string_list(&value),
            "aliases" => metadata.aliases = string_list(&value),
            "date" => metadata.date = parse_date(&value),
            _ => {
                metadata.extra.insert(key, value);
            }
        }
    }
    Some(metadata)
}

/// Byte span of the YAML metadata block at the top of the document
fn frontmatter_span(raw: &str) -> Option<std::ops::Range<usize>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);

    for (event, range) in Parser::new_ext(raw, options).into_offset_iter() {
        return match event {
            Event::Start(Tag::MetadataBlock(MetadataBlockKind::YamlStyle)) if range.start == 0 => {
                Some(range)
            }
            _ => None,
        };
    }
    None
}

/// Normalize a scalar or sequence value to an ordered string list
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Sequence(seq) => seq
            .iter()
            .filter_map(scalar_text)
            .filter(|s| !s.trim().is_empty())
            .collect(),
        other => scalar_text(other)
            .filter(|s| !s.trim().is_empty())
            .into_iter()
            .collect(),
    }
}

/// Stringify a YAML scalar; mappings and sequences have no scalar text
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Accept any value that reads as a calendar date
fn parse_date(value: &Value) -> Option<NaiveDate> {
    let text = scalar_text(value)?;
    let text = text.trim();

    for format in ["%Y-%m-%d", "%d-%b-%y", "%d-%m-%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    None
}
