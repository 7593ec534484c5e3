//! End-to-end render pipeline tests: raw text → render tree →
//! interaction → patched text → fresh render.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use vellum_core::{apply_task_toggle, metadata, EngineError, EngineResult, Note, NoteLinkIndex, NoteReader};
use vellum_render::{DocumentRenderer, HoverPreview, InlineSpan, RenderCallbacks, RenderNode, INDENT_UNIT};

/// In-memory note source keyed by path
#[derive(Default)]
struct MemoryReader {
    texts: HashMap<String, String>,
}

impl MemoryReader {
    fn insert(&mut self, path: &str, text: &str) {
        self.texts.insert(path.to_string(), text.to_string());
    }
}

impl NoteReader for MemoryReader {
    fn read_note(&self, note: &Note) -> EngineResult<String> {
        self.texts
            .get(note.path().to_string_lossy().as_ref())
            .cloned()
            .ok_or_else(|| EngineError::not_found(note.slug().to_string()))
    }
}

fn children(root: &RenderNode) -> &[RenderNode] {
    match root {
        RenderNode::Document { children } => children,
        other => panic!("expected document root, got {other:?}"),
    }
}

fn list_items(node: &RenderNode) -> &[RenderNode] {
    match node {
        RenderNode::List { items, .. } => items,
        other => panic!("expected list, got {other:?}"),
    }
}

#[test]
fn task_items_carry_literal_source_line_indices() {
    let index = NoteLinkIndex::new();
    let reader = MemoryReader::default();
    let renderer = DocumentRenderer::new(&index, &reader);

    let raw = "# T\n\n- [ ] a\n- [x] b\n";
    let doc = renderer.render(raw, None, RenderCallbacks::none());

    let nodes = children(&doc.root);
    assert!(matches!(&nodes[0], RenderNode::Heading { level: 1, text } if text == "T"));

    let items = list_items(&nodes[1]);
    match (&items[0], &items[1]) {
        (
            RenderNode::TaskItem { source_line_index: a, checked: false, label: la, .. },
            RenderNode::TaskItem { source_line_index: b, checked: true, label: lb, .. },
        ) => {
            assert_eq!((*a, *b), (2, 3));
            assert_eq!((la.as_str(), lb.as_str()), ("a", "b"));
        }
        other => panic!("expected two task items, got {other:?}"),
    }
}

#[test]
fn end_to_end_toggle_round_trip() {
    let raw = "---\ntags: [x,y]\n---\n# H\n\n- [ ] one\n";

    let index = NoteLinkIndex::new();
    let reader = MemoryReader::default();
    let renderer = DocumentRenderer::new(&index, &reader);

    let meta = metadata::extract(raw).expect("front-matter parses");
    assert_eq!(meta.tags, vec!["x", "y"]);

    let source = Arc::new(Mutex::new(raw.to_string()));
    let sink = Arc::clone(&source);
    let callbacks = RenderCallbacks {
        on_task_toggled: Some(Arc::new(move |line, checked| {
            let mut text = sink.lock().unwrap();
            *text = apply_task_toggle(&text, line, checked);
        })),
        on_link_activated: None,
    };

    let doc = renderer.render(raw, Some(&meta), callbacks);
    let nodes = children(&doc.root);

    // badge row with exactly the two tag badges, then the heading
    match &nodes[0] {
        RenderNode::BadgeRow { badges } => {
            assert_eq!(badges.len(), 2);
            assert_eq!(badges[0].text, "x");
            assert_eq!(badges[1].text, "y");
        }
        other => panic!("expected badge row first, got {other:?}"),
    }
    assert!(matches!(&nodes[1], RenderNode::Heading { level: 1, text } if text == "H"));

    let items = list_items(&nodes[2]);
    let line = match &items[0] {
        RenderNode::TaskItem { source_line_index, checked: false, label, .. } => {
            assert_eq!(label, "one");
            *source_line_index
        }
        other => panic!("expected unchecked task, got {other:?}"),
    };
    assert_eq!(line, 5);

    // toggle through the rendered control and check the patch
    doc.toggle_task(line, true);
    let updated = source.lock().unwrap().clone();
    let lines: Vec<&str> = updated.split('\n').collect();
    assert_eq!(lines[5], "- [x] one");
    for (i, (before, after)) in raw.split('\n').zip(&lines).enumerate() {
        if i != 5 {
            assert_eq!(before, *after);
        }
    }

    // a fresh pass over the patched text shows the checked state
    let doc2 = renderer.render(&updated, Some(&meta), RenderCallbacks::none());
    let items2 = list_items(&children(&doc2.root)[2]);
    assert!(matches!(&items2[0], RenderNode::TaskItem { checked: true, .. }));
}

#[test]
fn wiki_link_alias_and_hover_preview() {
    let mut index = NoteLinkIndex::new();
    index.add_or_update(Note::file("Intro.md", "/vault/Intro.md", None));

    let mut reader = MemoryReader::default();
    reader.insert("/vault/Intro.md", "# Intro\n\nWelcome.\n");
    let renderer = DocumentRenderer::new(&index, &reader);

    let doc = renderer.render(
        "See [[Intro|the intro]] for details.",
        None,
        RenderCallbacks::none(),
    );
    let nodes = children(&doc.root);
    let spans = match &nodes[0] {
        RenderNode::Paragraph { spans } => spans,
        other => panic!("expected paragraph, got {other:?}"),
    };
    assert_eq!(
        spans[1],
        InlineSpan::Link {
            slug: "Intro".into(),
            display: "the intro".into(),
            resolved: true,
        }
    );

    match renderer.hover_preview(&doc, "Intro") {
        Some(HoverPreview::Note { title, document }) => {
            assert_eq!(title, "Intro");
            let preview_nodes = children(&document.root);
            assert!(matches!(&preview_nodes[0], RenderNode::Heading { text, .. } if text == "Intro"));
        }
        _ => panic!("expected a rendered preview"),
    }
}

#[test]
fn unresolvable_link_previews_as_not_found() {
    let index = NoteLinkIndex::new();
    let reader = MemoryReader::default();
    let renderer = DocumentRenderer::new(&index, &reader);

    let doc = renderer.render("See [[Intro|the intro]].", None, RenderCallbacks::none());
    let spans = match &children(&doc.root)[0] {
        RenderNode::Paragraph { spans } => spans.clone(),
        other => panic!("expected paragraph, got {other:?}"),
    };
    assert!(matches!(
        &spans[1],
        InlineSpan::Link { resolved: false, display, .. } if display == "the intro"
    ));

    match renderer.hover_preview(&doc, "Intro") {
        Some(HoverPreview::NotFound) => {}
        _ => panic!("expected the not-found indicator"),
    }
}

#[test]
fn previews_never_nest_on_cyclic_links() {
    let mut index = NoteLinkIndex::new();
    index.add_or_update(Note::file("A.md", "/vault/A.md", None));
    index.add_or_update(Note::file("B.md", "/vault/B.md", None));

    let mut reader = MemoryReader::default();
    reader.insert("/vault/A.md", "Go to [[B]].\n");
    reader.insert("/vault/B.md", "Back to [[A]].\n");
    let renderer = DocumentRenderer::new(&index, &reader);

    let doc_a = renderer.render("Go to [[B]].\n", None, RenderCallbacks::none());
    let preview = match renderer.hover_preview(&doc_a, "B") {
        Some(HoverPreview::Note { document, .. }) => document,
        _ => panic!("expected preview of B"),
    };
    assert!(!preview.allows_previews());
    assert!(renderer.hover_preview(&preview, "A").is_none());
}

#[test]
fn nested_list_indentation_is_cumulative() {
    let index = NoteLinkIndex::new();
    let reader = MemoryReader::default();
    let renderer = DocumentRenderer::new(&index, &reader);

    let raw = "- a\n  - b\n    - c\n";
    let doc = renderer.render(raw, None, RenderCallbacks::none());

    let outer = &children(&doc.root)[0];
    let RenderNode::List { depth: d0, items, .. } = outer else {
        panic!("expected outer list");
    };
    assert_eq!(*d0, 0);

    let RenderNode::ListItem { text, children: kids, .. } = &items[0] else {
        panic!("expected item a");
    };
    assert_eq!(text, "a");

    let RenderNode::List { depth: d1, items: mid, .. } = &kids[0] else {
        panic!("expected nested list");
    };
    assert_eq!(*d1, 1);

    let RenderNode::ListItem { children: kids2, .. } = &mid[0] else {
        panic!("expected item b");
    };
    let RenderNode::List { depth: d2, .. } = &kids2[0] else {
        panic!("expected doubly nested list");
    };
    assert_eq!(*d2, 2);

    // indentation composes across every ancestor level
    assert_eq!(RenderNode::list_indent(*d2 + 1), 3.0 * INDENT_UNIT);
}

#[test]
fn ordered_list_seeds_counter_from_declared_start() {
    let index = NoteLinkIndex::new();
    let reader = MemoryReader::default();
    let renderer = DocumentRenderer::new(&index, &reader);

    let doc = renderer.render("3. x\n4. y\n", None, RenderCallbacks::none());
    let RenderNode::List { ordered: true, start: 3, items, .. } = &children(&doc.root)[0] else {
        panic!("expected ordered list starting at 3");
    };
    assert!(matches!(&items[0], RenderNode::ListItem { ordinal: Some(3), text, .. } if text == "x"));
    assert!(matches!(&items[1], RenderNode::ListItem { ordinal: Some(4), text, .. } if text == "y"));
}

#[test]
fn unhandled_blocks_degrade_to_spacer() {
    let index = NoteLinkIndex::new();
    let reader = MemoryReader::default();
    let renderer = DocumentRenderer::new(&index, &reader);

    let raw = "para\n\n```rust\nlet x = 1;\n```\n\n> quoted\n";
    let doc = renderer.render(raw, None, RenderCallbacks::none());
    let nodes = children(&doc.root);

    assert!(matches!(&nodes[0], RenderNode::Paragraph { .. }));
    assert!(matches!(&nodes[1], RenderNode::Spacer));
    assert!(matches!(&nodes[2], RenderNode::Spacer));
    // nothing inside the skipped blocks leaks into the tree
    assert_eq!(nodes.len(), 3);
}

#[test]
fn date_only_metadata_shows_no_badge_row() {
    let index = NoteLinkIndex::new();
    let reader = MemoryReader::default();
    let renderer = DocumentRenderer::new(&index, &reader);

    let raw = "---\ndate: 2024-03-01\n---\n# H\n";
    let meta = metadata::extract(raw).unwrap();
    let doc = renderer.render(raw, Some(&meta), RenderCallbacks::none());
    let nodes = children(&doc.root);
    assert!(matches!(&nodes[0], RenderNode::Heading { .. }));
}

#[test]
fn badge_row_orders_date_tags_aliases() {
    let index = NoteLinkIndex::new();
    let reader = MemoryReader::default();
    let renderer = DocumentRenderer::new(&index, &reader);

    let raw = "---\ndate: 2024-03-01\ntags: [t1]\naliases: [other name]\n---\nbody\n";
    let meta = metadata::extract(raw).unwrap();
    let doc = renderer.render(raw, Some(&meta), RenderCallbacks::none());

    let RenderNode::BadgeRow { badges } = &children(&doc.root)[0] else {
        panic!("expected badge row");
    };
    assert_eq!(badges.len(), 3);
    assert_eq!(badges[0].text, "01 Mar 2024");
    assert_eq!(badges[1].text, "t1");
    assert_eq!(badges[2].text, "other name");
}

#[test]
fn empty_text_renders_empty_document() {
    let index = NoteLinkIndex::new();
    let reader = MemoryReader::default();
    let renderer = DocumentRenderer::new(&index, &reader);

    let doc = renderer.render("", None, RenderCallbacks::none());
    assert!(children(&doc.root).is_empty());
}

#[test]
fn render_tree_serializes_to_json() {
    let index = NoteLinkIndex::new();
    let reader = MemoryReader::default();
    let renderer = DocumentRenderer::new(&index, &reader);

    let doc = renderer.render("# H\n\n- [ ] a\n", None, RenderCallbacks::none());
    let json = serde_json::to_value(&doc.root).unwrap();

    let first = &json["Document"]["children"][0];
    assert_eq!(first["Heading"]["text"], "H");
    let task = &json["Document"]["children"][1]["List"]["items"][0]["TaskItem"];
    assert_eq!(task["source_line_index"], 2);
    assert_eq!(task["checked"], false);
}

#[test]
fn front_matter_produces_no_visible_node() {
    let index = NoteLinkIndex::new();
    let reader = MemoryReader::default();
    let renderer = DocumentRenderer::new(&index, &reader);

    let raw = "---\ntags: [a]\n---\nbody text\n";
    let doc = renderer.render(raw, None, RenderCallbacks::none());
    let nodes = children(&doc.root);
    assert_eq!(nodes.len(), 1);
    assert!(matches!(&nodes[0], RenderNode::Paragraph { .. }));
}
