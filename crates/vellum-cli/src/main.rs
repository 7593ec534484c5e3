//! `vellum` command-line front end
//!
//! Two subcommands over a vault folder: `scan` prints the note tree,
//! `render` prints the render-node tree of one note (text or JSON).
//! Diagnostics go to stderr via `RUST_LOG`-filtered tracing; command
//! output goes to stdout.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vellum_core::NoteHandle;
use vellum_render::{DocumentRenderer, InlineSpan, RenderCallbacks, RenderNode};
use vellum_vault::{FsNoteReader, Vault};

#[derive(Parser)]
#[command(name = "vellum", version, about = "Markdown note-vault document engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a vault folder and print its note tree
    Scan {
        /// Vault folder to scan
        root: PathBuf,
    },
    /// Render one note and print its render-node tree
    Render {
        /// Vault folder the note lives in
        root: PathBuf,
        /// Note to render, by slug (file name without `.md`)
        note: String,
        /// Emit the tree as JSON instead of indented text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Scan { root } => scan(root).await,
        Command::Render { root, note, json } => render(root, &note, json).await,
    }
}

async fn scan(root: PathBuf) -> Result<()> {
    let mut vault = Vault::new();
    let tree = vault
        .open(&root)
        .await
        .with_context(|| format!("failed to open vault at {}", root.display()))?;

    print_note(&tree, 0);

    let mut tags: Vec<String> = vellum_vault::flatten(&tree)
        .iter()
        .filter_map(|n| n.metadata())
        .flat_map(|m| m.tags.clone())
        .collect();
    tags.sort();
    tags.dedup();
    println!("\n{} notes indexed, {} distinct tags", vault.index().len(), tags.len());
    Ok(())
}

fn print_note(note: &NoteHandle, depth: usize) {
    let pad = "  ".repeat(depth);
    if note.is_directory() {
        println!("{pad}{}/", note.name());
    } else {
        println!("{pad}{}", note.display_name());
    }
    for child in note.children() {
        print_note(&child, depth + 1);
    }
}

async fn render(root: PathBuf, slug: &str, json: bool) -> Result<()> {
    let mut vault = Vault::new();
    vault
        .open(&root)
        .await
        .with_context(|| format!("failed to open vault at {}", root.display()))?;

    let note = vault
        .index()
        .resolve_by_slug(slug)
        .ok_or_else(|| anyhow!("no note with slug '{slug}' in {}", root.display()))?;

    let reader = FsNoteReader;
    let raw = tokio::fs::read_to_string(note.path())
        .await
        .with_context(|| format!("failed to read {}", note.path().display()))?;
    let meta = note.metadata();

    let renderer = DocumentRenderer::new(vault.index(), &reader);
    let doc = renderer.render(&raw, meta.as_deref(), RenderCallbacks::none());

    if json {
        println!("{}", serde_json::to_string_pretty(&doc.root)?);
    } else {
        print!("{}", node_to_text(&doc.root, 0));
    }
    Ok(())
}

/// Indented single-line-per-node rendition of the tree
fn node_to_text(node: &RenderNode, depth: usize) -> String {
    let pad = "  ".repeat(depth);
    match node {
        RenderNode::Document { children } => children
            .iter()
            .map(|c| node_to_text(c, depth))
            .collect::<String>(),
        RenderNode::BadgeRow { badges } => {
            let texts: Vec<&str> = badges.iter().map(|b| b.text.as_str()).collect();
            format!("{pad}[{}]\n", texts.join("] ["))
        }
        RenderNode::Heading { level, text } => {
            format!("{pad}{} {text}\n", "#".repeat(usize::from(*level)))
        }
        RenderNode::Paragraph { spans } => {
            let mut line = pad;
            for span in spans {
                match span {
                    InlineSpan::Text(text) => line.push_str(text),
                    InlineSpan::Link { display, resolved, .. } => {
                        line.push_str(if *resolved { "[[" } else { "[[?" });
                        line.push_str(display);
                        line.push_str("]]");
                    }
                }
            }
            line.push('\n');
            line
        }
        RenderNode::List { items, .. } => items
            .iter()
            .map(|item| node_to_text(item, depth))
            .collect::<String>(),
        RenderNode::ListItem { ordinal, text, children } => {
            let marker = match ordinal {
                Some(n) => format!("{n}."),
                None => "-".to_string(),
            };
            let mut out = format!("{pad}{marker} {text}\n");
            for child in children {
                out.push_str(&node_to_text(child, depth + 1));
            }
            out
        }
        RenderNode::TaskItem { source_line_index, checked, label, children } => {
            let mark = if *checked { 'x' } else { ' ' };
            let mut out = format!("{pad}- [{mark}] {label}  (line {source_line_index})\n");
            for child in children {
                out.push_str(&node_to_text(child, depth + 1));
            }
            out
        }
        RenderNode::ThematicBreak => format!("{pad}---\n"),
        RenderNode::Spacer => "\n".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_core::NoteLinkIndex;
    use vellum_core::{EngineResult, Note, NoteReader};

    struct NoReader;
    impl NoteReader for NoReader {
        fn read_note(&self, note: &Note) -> EngineResult<String> {
            Err(vellum_core::EngineError::not_found(note.slug().to_string()))
        }
    }

    #[test]
    fn test_text_rendition_shows_task_lines() {
        let index = NoteLinkIndex::new();
        let renderer = DocumentRenderer::new(&index, &NoReader);
        let doc = renderer.render(
            "# T\n\n- [ ] a\n- [x] b\n",
            None,
            RenderCallbacks::none(),
        );

        let text = node_to_text(&doc.root, 0);
        assert_eq!(text, "# T\n- [ ] a  (line 2)\n- [x] b  (line 3)\n");
    }
}
