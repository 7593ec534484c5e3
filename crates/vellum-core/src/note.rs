//! Vault tree model
//!
//! A `Note` represents one Markdown file or directory in the vault.
//! Notes are shared as `NoteHandle` (`Arc<Note>`) so the link index and
//! the UI tree can point at the same node; the parent back-reference is
//! a `Weak` so no subtree is kept alive through it and no cycle forms.

use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use crate::metadata::Metadata;

/// Shared handle to a vault tree node
pub type NoteHandle = Arc<Note>;

/// One Markdown file or directory entry in the vault
///
/// Exactly one `Note` exists per filesystem entry. `path` is mutable
/// (renames and moves), `is_directory` is fixed at construction, and
/// `metadata` is replaced wholesale with a fresh immutable snapshot on
/// every render pass of the note's live text.
#[derive(Debug)]
pub struct Note {
    name: String,
    path: RwLock<PathBuf>,
    is_directory: bool,
    metadata: RwLock<Option<Arc<Metadata>>>,
    children: RwLock<Vec<NoteHandle>>,
    parent: RwLock<Weak<Note>>,
}

impl Note {
    /// Create a file node with its initially extracted metadata
    pub fn file(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        metadata: Option<Metadata>,
    ) -> NoteHandle {
        Arc::new(Self {
            name: name.into(),
            path: RwLock::new(path.into()),
            is_directory: false,
            metadata: RwLock::new(metadata.map(Arc::new)),
            children: RwLock::new(Vec::new()),
            parent: RwLock::new(Weak::new()),
        })
    }

    /// Create a directory node
    pub fn directory(name: impl Into<String>, path: impl Into<PathBuf>) -> NoteHandle {
        Arc::new(Self {
            name: name.into(),
            path: RwLock::new(path.into()),
            is_directory: true,
            metadata: RwLock::new(None),
            children: RwLock::new(Vec::new()),
            parent: RwLock::new(Weak::new()),
        })
    }

    /// File or directory name, including any `.md` extension
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name shown in the tree: the file name without its `.md` extension
    pub fn display_name(&self) -> &str {
        self.name.strip_suffix(".md").unwrap_or(&self.name)
    }

    /// Slug used by wiki-links: file name without extension
    pub fn slug(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.name)
    }

    /// Current absolute path
    pub fn path(&self) -> PathBuf {
        self.path.read().clone()
    }

    /// Commit a rename or move
    pub fn set_path(&self, path: impl Into<PathBuf>) {
        *self.path.write() = path.into();
    }

    /// Whether this node is a directory
    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    /// Whether this node is a Markdown file
    pub fn is_markdown(&self) -> bool {
        !self.is_directory
            && Path::new(&self.name)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
    }

    /// Latest metadata snapshot, if the note has front-matter
    pub fn metadata(&self) -> Option<Arc<Metadata>> {
        self.metadata.read().clone()
    }

    /// Replace the metadata snapshot (recomputed on every render pass)
    pub fn set_metadata(&self, metadata: Option<Metadata>) {
        *self.metadata.write() = metadata.map(Arc::new);
    }

    /// Ordered children (directories only; files have none)
    pub fn children(&self) -> Vec<NoteHandle> {
        self.children.read().clone()
    }

    /// Parent directory node, if still alive
    pub fn parent(&self) -> Option<NoteHandle> {
        self.parent.read().upgrade()
    }

    /// Append `child` under `parent`, wiring the weak back-reference
    pub fn attach_child(parent: &NoteHandle, child: NoteHandle) {
        *child.parent.write() = Arc::downgrade(parent);
        parent.children.write().push(child);
    }
}
