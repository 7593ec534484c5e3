//! Document renderer
//!
//! Builds the render-node tree for one note from its raw text and a
//! fresh metadata snapshot. The walk is a single pass over the
//! pulldown-cmark offset-event stream, so every task item knows the
//! exact source line it came from; the front-matter block and
//! link-reference definitions produce no visible nodes, and block
//! kinds the tree has no shape for degrade to an invisible spacer.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::sync::Arc;
use tracing::warn;

use vellum_core::{metadata, Metadata, NoteLinkIndex, NoteReader};

use crate::inline::{link_slug, scan_spans};
use crate::node::{Badge, RenderNode};
use crate::preview::HoverPreview;

/// Interaction callbacks supplied by the caller.
///
/// Both fire synchronously from the owning thread when the
/// corresponding rendered control does.
#[derive(Clone, Default)]
pub struct RenderCallbacks {
    pub on_task_toggled: Option<Arc<dyn Fn(usize, bool) + Send + Sync>>,
    pub on_link_activated: Option<Arc<dyn Fn(&str) + Send + Sync>>,
}

impl RenderCallbacks {
    /// Callbacks that do nothing; useful for read-only renders
    pub fn none() -> Self {
        Self::default()
    }
}

/// One complete render pass over a note.
///
/// Plain data plus the callbacks that interactive nodes route through;
/// discarded wholesale and rebuilt on the next text change.
pub struct RenderedDocument {
    pub root: RenderNode,
    callbacks: RenderCallbacks,
    preview_depth: u8,
}

impl RenderedDocument {
    /// Invoked by the UI when a task checkbox changes state
    pub fn toggle_task(&self, line_index: usize, checked: bool) {
        if let Some(cb) = &self.callbacks.on_task_toggled {
            cb(line_index, checked);
        }
    }

    /// Invoked by the UI when a wiki-link is activated. Resolution
    /// happens at the receiving end, so a broken link stays a no-op.
    pub fn activate_link(&self, slug: &str) {
        if let Some(cb) = &self.callbacks.on_link_activated {
            cb(slug);
        }
    }

    /// Whether links in this document may spawn hover previews.
    /// False inside a preview: previews never nest.
    pub fn allows_previews(&self) -> bool {
        self.preview_depth == 0
    }
}

/// Renders raw Markdown into [`RenderedDocument`] trees against one
/// vault's link index
pub struct DocumentRenderer<'a> {
    index: &'a NoteLinkIndex,
    reader: &'a dyn NoteReader,
}

impl<'a> DocumentRenderer<'a> {
    pub fn new(index: &'a NoteLinkIndex, reader: &'a dyn NoteReader) -> Self {
        Self { index, reader }
    }

    /// Build the render tree for `raw` with its current metadata
    /// snapshot. Never fails: pulldown-cmark accepts arbitrary text,
    /// and every degradation is visual.
    pub fn render(
        &self,
        raw: &str,
        metadata: Option<&Metadata>,
        callbacks: RenderCallbacks,
    ) -> RenderedDocument {
        self.render_at(raw, metadata, callbacks, 0)
    }

    fn render_at(
        &self,
        raw: &str,
        metadata: Option<&Metadata>,
        callbacks: RenderCallbacks,
        preview_depth: u8,
    ) -> RenderedDocument {
        let mut children = Vec::new();
        if let Some(meta) = metadata {
            if meta.has_badges() {
                children.push(badge_row(meta));
            }
        }
        children.extend(self.walk_blocks(raw));

        RenderedDocument {
            root: RenderNode::Document { children },
            callbacks,
            preview_depth,
        }
    }

    /// Construct the hover preview for a link in `origin`.
    ///
    /// Called lazily when the link (or the open preview itself) is
    /// hovered. Returns `None` when `origin` is itself a preview —
    /// previews never spawn further previews, which bounds recursion
    /// on cyclic vaults. An unresolvable slug yields the "not found"
    /// indicator and never recurses.
    pub fn hover_preview(&self, origin: &RenderedDocument, slug: &str) -> Option<HoverPreview> {
        if !origin.allows_previews() {
            return None;
        }

        let Some(note) = self.index.resolve_by_slug(&link_slug(slug)) else {
            return Some(HoverPreview::NotFound);
        };
        let raw = match self.reader.read_note(&note) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(slug, error = %err, "preview target unreadable");
                return Some(HoverPreview::NotFound);
            }
        };

        // Fresh metadata for the target, same callbacks as the origin.
        let meta = metadata::extract(&raw);
        let document = self.render_at(
            &raw,
            meta.as_ref(),
            origin.callbacks.clone(),
            origin.preview_depth + 1,
        );
        Some(HoverPreview::Note {
            title: note.display_name().to_string(),
            document,
        })
    }

    fn walk_blocks(&self, raw: &str) -> Vec<RenderNode> {
        let mut out = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();
        let mut heading: Option<(u8, String)> = None;
        let mut paragraph: Option<String> = None;
        // nesting depth inside block kinds the tree has no shape for
        let mut foreign = 0usize;

        for (event, range) in Parser::new_ext(raw, parser_options()).into_offset_iter() {
            if foreign > 0 {
                match &event {
                    Event::Start(tag) if !is_inline_start(tag) => foreign += 1,
                    Event::End(end) if !is_inline_end(end) => foreign -= 1,
                    _ => {}
                }
                continue;
            }

            match event {
                // Front-matter is consumed by the metadata extractor;
                // it produces no visible node here.
                Event::Start(Tag::MetadataBlock(_)) => foreign += 1,

                Event::Start(Tag::Heading { level, .. }) => {
                    heading = Some((heading_level_to_u8(level), String::new()));
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((level, text)) = heading.take() {
                        push_node(&mut stack, &mut out, RenderNode::Heading { level, text });
                    }
                }

                Event::Start(Tag::Paragraph) => {
                    // Inside a list item the paragraph text belongs to
                    // the item line, not to a standalone node.
                    if !matches!(stack.last(), Some(Frame::Item(_))) {
                        paragraph = Some(String::new());
                    }
                }
                Event::End(TagEnd::Paragraph) => {
                    if let Some(text) = paragraph.take() {
                        if !text.trim().is_empty() {
                            push_node(
                                &mut stack,
                                &mut out,
                                RenderNode::Paragraph {
                                    spans: scan_spans(&text, self.index),
                                },
                            );
                        }
                    } else if let Some(Frame::Item(item)) = stack.last_mut() {
                        // only the item's first paragraph becomes its line
                        if !item.text.trim().is_empty() {
                            item.text_done = true;
                        }
                    }
                }

                Event::Start(Tag::List(start)) => {
                    if let Some(Frame::Item(item)) = stack.last_mut() {
                        item.text_done = true;
                    }
                    let depth = stack
                        .iter()
                        .filter(|f| matches!(f, Frame::List(_)))
                        .count();
                    let first = start.unwrap_or(1);
                    stack.push(Frame::List(ListFrame {
                        ordered: start.is_some(),
                        start: first,
                        next: first,
                        depth,
                        items: Vec::new(),
                    }));
                }
                Event::End(TagEnd::List(_)) => {
                    if let Some(Frame::List(list)) = stack.pop() {
                        let node = RenderNode::List {
                            ordered: list.ordered,
                            start: list.start,
                            depth: list.depth,
                            items: list.items,
                        };
                        push_node(&mut stack, &mut out, node);
                    }
                }

                Event::Start(Tag::Item) => {
                    stack.push(Frame::Item(ItemFrame {
                        start_offset: range.start,
                        task: None,
                        text: String::new(),
                        text_done: false,
                        children: Vec::new(),
                    }));
                }
                Event::TaskListMarker(checked) => {
                    if let Some(Frame::Item(item)) = stack.last_mut() {
                        item.task = Some(checked);
                    }
                }
                Event::End(TagEnd::Item) => {
                    if let Some(Frame::Item(item)) = stack.pop() {
                        self.close_item(raw, item, &mut stack, &mut out);
                    }
                }

                Event::Rule => push_node(&mut stack, &mut out, RenderNode::ThematicBreak),

                Event::Text(text) => {
                    append_text(&mut heading, &mut paragraph, &mut stack, &text);
                }
                Event::Code(code) => {
                    append_text(&mut heading, &mut paragraph, &mut stack, &code);
                }
                Event::SoftBreak | Event::HardBreak => {
                    append_text(&mut heading, &mut paragraph, &mut stack, " ");
                }

                // Any other block kind degrades to an invisible spacer
                // instead of leaking raw debug text.
                Event::Start(tag) if !is_inline_start(&tag) => {
                    push_node(&mut stack, &mut out, RenderNode::Spacer);
                    foreign += 1;
                }

                // Inline formatting tags: their text flows through above.
                _ => {}
            }
        }

        out
    }

    fn close_item(
        &self,
        raw: &str,
        item: ItemFrame,
        stack: &mut Vec<Frame>,
        out: &mut Vec<RenderNode>,
    ) {
        let ordinal = match stack.last_mut() {
            Some(Frame::List(list)) => {
                let n = list.next;
                list.next += 1;
                list.ordered.then_some(n)
            }
            _ => None,
        };

        let node = match item.task {
            Some(checked) => RenderNode::TaskItem {
                source_line_index: line_index_at(raw, item.start_offset),
                checked,
                label: item.text.trim().to_string(),
                children: item.children,
            },
            None => RenderNode::ListItem {
                ordinal,
                text: item.text.trim().to_string(),
                children: item.children,
            },
        };

        match stack.last_mut() {
            Some(Frame::List(list)) => list.items.push(node),
            Some(Frame::Item(parent)) => parent.children.push(node),
            None => out.push(node),
        }
    }
}

/// In-progress list or list-item during the block walk
enum Frame {
    List(ListFrame),
    Item(ItemFrame),
}

struct ListFrame {
    ordered: bool,
    start: u64,
    next: u64,
    depth: usize,
    items: Vec<RenderNode>,
}

struct ItemFrame {
    start_offset: usize,
    task: Option<bool>,
    text: String,
    text_done: bool,
    children: Vec<RenderNode>,
}

/// Same pipeline options everywhere: advanced extensions, task lists,
/// and the front-matter fence.
fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
    options
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn is_inline_start(tag: &Tag) -> bool {
    matches!(
        tag,
        Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link { .. } | Tag::Image { .. }
    )
}

fn is_inline_end(end: &TagEnd) -> bool {
    matches!(
        end,
        TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link | TagEnd::Image
    )
}

/// Zero-based count of newlines before `offset` in `raw`, clamped
fn line_index_at(raw: &str, offset: usize) -> usize {
    let end = offset.min(raw.len());
    raw.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count()
}

/// Attach a completed block node to the innermost open container
fn push_node(stack: &mut [Frame], out: &mut Vec<RenderNode>, node: RenderNode) {
    match stack.last_mut() {
        Some(Frame::Item(item)) => item.children.push(node),
        Some(Frame::List(list)) => list.items.push(node),
        None => out.push(node),
    }
}

/// Route inline text to whichever accumulator is open
fn append_text(
    heading: &mut Option<(u8, String)>,
    paragraph: &mut Option<String>,
    stack: &mut [Frame],
    text: &str,
) {
    if let Some((_, buf)) = heading.as_mut() {
        buf.push_str(text);
    } else if let Some(buf) = paragraph.as_mut() {
        buf.push_str(text);
    } else if let Some(Frame::Item(item)) = stack.last_mut() {
        if !item.text_done {
            item.text.push_str(text);
        }
    }
}

/// Date badge first, then one badge per tag, then per alias, in order
fn badge_row(meta: &Metadata) -> RenderNode {
    let mut badges = Vec::new();
    if let Some(date) = meta.date {
        badges.push(Badge::date(date.format("%d %b %Y").to_string()));
    }
    badges.extend(meta.tags.iter().cloned().map(Badge::tag));
    badges.extend(meta.aliases.iter().cloned().map(Badge::alias));
    RenderNode::BadgeRow { badges }
}
