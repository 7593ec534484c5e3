//! Render-node tree types
//!
//! The abstract, toolkit-neutral shape of a rendered note. Every node
//! is rebuilt on each render pass; nothing here is cached across text
//! changes.

use serde::Serialize;

/// Horizontal indentation applied per list nesting level
pub const INDENT_UNIT: f32 = 20.0;

/// Number of distinct badge tints in the palette
pub const BADGE_PALETTE_SIZE: u8 = 8;

/// Smallest readable heading font size
const MIN_HEADING_SIZE: f32 = 12.0;

/// One node of the interactive render tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RenderNode {
    /// Root container holding the note's top-level nodes in order
    Document { children: Vec<RenderNode> },

    /// Front-matter pills: date first, then tags, then aliases
    BadgeRow { badges: Vec<Badge> },

    /// `#`..`######` heading, rendered bold
    Heading { level: u8, text: String },

    /// Paragraph as a run of text and wiki-link spans
    Paragraph { spans: Vec<InlineSpan> },

    /// Ordered or bullet list.
    ///
    /// `depth` is the count of ancestor lists; indentation is
    /// cumulative (`depth × INDENT_UNIT`) so nesting composes at any
    /// depth.
    List {
        ordered: bool,
        start: u64,
        depth: usize,
        items: Vec<RenderNode>,
    },

    /// Plain bullet or numbered line; `children` holds nested lists
    ListItem {
        ordinal: Option<u64>,
        text: String,
        children: Vec<RenderNode>,
    },

    /// Task-list checkbox line.
    ///
    /// `source_line_index` is the zero-based count of newlines before
    /// the item's start offset in the raw text: the single source of
    /// truth for routing a toggle back to its source line.
    TaskItem {
        source_line_index: usize,
        checked: bool,
        label: String,
        children: Vec<RenderNode>,
    },

    /// Horizontal rule (`---`)
    ThematicBreak,

    /// Invisible fallback for unhandled block kinds
    Spacer,
}

impl RenderNode {
    /// Font size for a heading level: decreases with depth, floored
    pub fn heading_font_size(level: u8) -> f32 {
        (32.0 - 4.0 * f32::from(level)).max(MIN_HEADING_SIZE)
    }

    /// Cumulative left indent for a list at `depth`
    pub fn list_indent(depth: usize) -> f32 {
        depth as f32 * INDENT_UNIT
    }
}

/// A run of paragraph content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InlineSpan {
    /// Plain text, verbatim
    Text(String),

    /// Wiki-link. `slug` is the resolution key (directory and
    /// extension already stripped); `display` is the alias when given,
    /// else the slug. `resolved` records whether the link index knew
    /// the target at render time, for hover-preview purposes only —
    /// navigation re-resolves at activation time.
    Link {
        slug: String,
        display: String,
        resolved: bool,
    },
}

/// One date / tag / alias pill
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Badge {
    pub text: String,
    /// Palette slot, derived deterministically from the badge key
    pub tint: u8,
}

impl Badge {
    /// Date badge (`date` namespace)
    pub fn date(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            tint: tint_for("date"),
            text,
        }
    }

    /// Tag badge (`tag:` namespace)
    pub fn tag(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            tint: tint_for(&format!("tag:{text}")),
            text,
        }
    }

    /// Alias badge (`alias:` namespace)
    pub fn alias(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            tint: tint_for(&format!("alias:{text}")),
            text,
        }
    }
}

/// Stable hash of a namespaced badge key, folded into the palette.
///
/// Identical keys produce identical tints across runs and across
/// notes; the hash must not depend on process-local seeds.
fn tint_for(key: &str) -> u8 {
    blake3::hash(key.as_bytes()).as_bytes()[0] % BADGE_PALETTE_SIZE
}
