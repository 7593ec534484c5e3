//! Vellum renderer
//!
//! Walks raw Markdown into an interactive render-node tree:
//! - badge row from front-matter (date / tag / alias pills)
//! - headings, paragraphs, thematic breaks
//! - nested lists with ordered counters and task checkboxes that map
//!   back to exact source lines
//! - wiki-link inline spans resolved against the vault link index,
//!   with bounded hover previews
//!
//! The tree is plain data: it is rebuilt wholesale on every render
//! pass and never mutated or diffed. Interaction events route back to
//! the caller through [`RenderCallbacks`].

pub mod inline;
pub mod node;
pub mod preview;
pub mod renderer;

pub use inline::{link_slug, scan_spans};
pub use node::{Badge, InlineSpan, RenderNode, BADGE_PALETTE_SIZE, INDENT_UNIT};
pub use preview::{HoverGate, HoverPreview};
pub use renderer::{DocumentRenderer, RenderCallbacks, RenderedDocument};
