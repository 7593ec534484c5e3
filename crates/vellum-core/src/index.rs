//! Vault-wide wiki-link index
//!
//! Bidirectional lookup from note identifier to note handle: the slug
//! (file name without `.md`) and the canonicalized full path both map
//! to the same `NoteHandle`, case-insensitively.
//!
//! The index is an explicitly owned value, not process-wide state:
//! callers hold one per vault and inject it where resolution is
//! needed, which keeps tests isolated. Rebuilds replace the whole
//! value, so readers never observe a half-cleared index.

use std::collections::HashMap;
use std::path::{Component, Path};
use tracing::{debug, warn};

use crate::note::NoteHandle;

/// Slug and path lookup for every Markdown note in the vault
#[derive(Debug, Default)]
pub struct NoteLinkIndex {
    by_slug: HashMap<String, NoteHandle>,
    by_path: HashMap<String, NoteHandle>,
}

impl NoteLinkIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or overwrite the mappings for one note.
    ///
    /// Duplicate slugs across the vault shadow each other: the last
    /// registration wins, with a diagnostic naming both paths.
    pub fn add_or_update(&mut self, note: NoteHandle) {
        let slug_key = note.slug().to_lowercase();
        if let Some(previous) = self.by_slug.get(&slug_key) {
            if previous.path() != note.path() {
                warn!(
                    slug = %note.slug(),
                    previous = %previous.path().display(),
                    replacement = %note.path().display(),
                    "duplicate slug in vault; later note shadows earlier one"
                );
            }
        }
        self.by_path.insert(path_key(&note.path()), note.clone());
        self.by_slug.insert(slug_key, note);
    }

    /// Look up a note by slug (case-insensitive); `None` if unindexed
    pub fn resolve_by_slug(&self, slug: &str) -> Option<NoteHandle> {
        self.by_slug.get(&slug.to_lowercase()).cloned()
    }

    /// Look up a note by full path, canonicalizing first
    pub fn resolve_by_path(&self, path: &Path) -> Option<NoteHandle> {
        self.by_path.get(&path_key(path)).cloned()
    }

    /// Clear both maps and re-register every non-directory note, in
    /// the order given. No stale entries survive.
    pub fn rebuild<I>(&mut self, notes: I)
    where
        I: IntoIterator<Item = NoteHandle>,
    {
        self.by_slug.clear();
        self.by_path.clear();
        for note in notes {
            if !note.is_directory() {
                self.add_or_update(note);
            }
        }
        debug!(notes = self.by_slug.len(), "link index rebuilt");
    }

    /// Number of indexed notes
    pub fn len(&self) -> usize {
        self.by_slug.len()
    }

    /// Whether the index holds no notes
    pub fn is_empty(&self) -> bool {
        self.by_slug.is_empty()
    }
}

/// Lexical, case-folded path key.
///
/// Canonical paths are unique per entry, so path lookups are
/// collision-free. Canonicalization is purely lexical (no filesystem
/// access) so the index also works for paths that do not exist yet.
fn path_key(path: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop();
            }
            other => parts.push(other.as_os_str().to_string_lossy().to_lowercase()),
        }
    }
    parts.join("/")
}
