//! Async vault folder scanner
//!
//! Walks a folder into the in-memory note tree: subdirectories first,
//! then Markdown files, each group in case-insensitive alphabetical
//! order. Front-matter is extracted once per file during the scan so
//! the tree comes back ready for indexing. Hidden directories (the
//! `.obsidian` config folder in particular) and non-Markdown files are
//! skipped.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use tokio::fs;
use tracing::debug;

use vellum_core::{metadata, EngineError, EngineResult, Note, NoteHandle};

/// Scan `root` recursively into a directory note tree.
///
/// The returned handle is the root directory node; every `.md` file
/// below it becomes a file node with its metadata already extracted.
pub async fn scan_folder(root: &Path) -> EngineResult<NoteHandle> {
    if !fs::metadata(root).await.map(|m| m.is_dir()).unwrap_or(false) {
        return Err(EngineError::invalid_path(format!(
            "not a folder: {}",
            root.display()
        )));
    }

    let name = root
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());
    let node = Note::directory(name, root);
    scan_into(node.clone()).await?;

    debug!(root = %root.display(), notes = flatten(&node).len(), "vault scan complete");
    Ok(node)
}

/// Recursive step. Boxed because async recursion needs an indirection;
/// the handle is owned so the future is `Send` and `'static`.
fn scan_into(dir: NoteHandle) -> Pin<Box<dyn Future<Output = EngineResult<()>> + Send>> {
    Box::pin(async move {
        let mut subdirs = Vec::new();
        let mut files = Vec::new();

        let mut entries = fs::read_dir(dir.path()).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                if name.starts_with('.') {
                    continue;
                }
                subdirs.push(name);
            } else if name.to_lowercase().ends_with(".md") {
                files.push(name);
            }
        }

        subdirs.sort_by_key(|name| name.to_lowercase());
        files.sort_by_key(|name| name.to_lowercase());

        for name in subdirs {
            let path = dir.path().join(&name);
            let child = Note::directory(name, &path);
            Note::attach_child(&dir, child.clone());
            scan_into(child).await?;
        }

        for name in files {
            let path = dir.path().join(&name);
            let raw = fs::read_to_string(&path).await?;
            let child = Note::file(name, &path, metadata::extract(&raw));
            Note::attach_child(&dir, child);
        }

        Ok(())
    })
}

/// Every node under `root` (root included), depth-first in tree order
pub fn flatten(root: &NoteHandle) -> Vec<NoteHandle> {
    let mut out = Vec::new();
    let mut pending = vec![root.clone()];
    while let Some(node) = pending.pop() {
        let children = node.children();
        out.push(node);
        // reversed so the pop order matches tree order
        pending.extend(children.into_iter().rev());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn seed_vault() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std_fs::create_dir(root.join("projects")).unwrap();
        std_fs::create_dir(root.join("archive")).unwrap();
        std_fs::create_dir(root.join(".obsidian")).unwrap();
        std_fs::write(root.join(".obsidian/app.json"), "{}").unwrap();
        std_fs::write(root.join("zeta.md"), "# Zeta\n").unwrap();
        std_fs::write(root.join("Alpha.md"), "---\ntags: [greek]\n---\n# Alpha\n").unwrap();
        std_fs::write(root.join("notes.txt"), "not markdown").unwrap();
        std_fs::write(root.join("projects/plan.md"), "# Plan\n").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_directories_precede_files_alphabetically() {
        let dir = seed_vault();
        let root = scan_folder(dir.path()).await.unwrap();

        let names: Vec<String> = root
            .children()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, ["archive", "projects", "Alpha.md", "zeta.md"]);
    }

    #[tokio::test]
    async fn test_hidden_and_non_markdown_entries_skipped() {
        let dir = seed_vault();
        let root = scan_folder(dir.path()).await.unwrap();

        let all = flatten(&root);
        assert!(all.iter().all(|n| n.name() != ".obsidian"));
        assert!(all.iter().all(|n| n.name() != "notes.txt"));
    }

    #[tokio::test]
    async fn test_metadata_extracted_during_scan() {
        let dir = seed_vault();
        let root = scan_folder(dir.path()).await.unwrap();

        let alpha = root
            .children()
            .into_iter()
            .find(|c| c.name() == "Alpha.md")
            .unwrap();
        let meta = alpha.metadata().unwrap();
        assert_eq!(meta.tags, vec!["greek"]);

        let zeta = root
            .children()
            .into_iter()
            .find(|c| c.name() == "zeta.md")
            .unwrap();
        assert!(zeta.metadata().is_none());
    }

    #[tokio::test]
    async fn test_nested_files_wired_to_parents() {
        let dir = seed_vault();
        let root = scan_folder(dir.path()).await.unwrap();

        let plan = flatten(&root)
            .into_iter()
            .find(|n| n.name() == "plan.md")
            .unwrap();
        assert_eq!(plan.parent().unwrap().name(), "projects");
    }

    #[tokio::test]
    async fn test_scanning_a_file_fails() {
        let dir = seed_vault();
        let err = scan_folder(&dir.path().join("zeta.md")).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidPath(_)));
    }
}
