//! Vault lifecycle and write-back
//!
//! `Vault` owns the scanned note tree and the link index for one
//! folder. Reopening a folder rebuilds the index as a fresh value and
//! swaps it in whole, so resolution never observes a half-built index.

use std::path::Path;

use chrono::Local;
use tokio::fs;
use tracing::{debug, info};

use vellum_core::{
    apply_task_toggle, metadata, EngineError, EngineResult, Note, NoteHandle, NoteLinkIndex,
    NoteReader,
};

use crate::scanner::{flatten, scan_folder};

/// Stem given to freshly created notes before the user renames them
const NEW_NOTE_STEM: &str = "New Note";

/// One open vault folder: the note tree plus its link index
#[derive(Default)]
pub struct Vault {
    root: Option<NoteHandle>,
    index: NoteLinkIndex,
}

impl Vault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root directory node of the open folder, if any
    pub fn root(&self) -> Option<&NoteHandle> {
        self.root.as_ref()
    }

    /// Link index over every Markdown note in the open folder
    pub fn index(&self) -> &NoteLinkIndex {
        &self.index
    }

    /// Open `path` as the vault folder: scan it, then replace the link
    /// index with a freshly built one.
    pub async fn open(&mut self, path: &Path) -> EngineResult<NoteHandle> {
        let root = scan_folder(path).await?;

        let mut fresh = NoteLinkIndex::new();
        fresh.rebuild(flatten(&root));
        self.index = fresh;
        self.root = Some(root.clone());

        info!(vault = %path.display(), notes = self.index.len(), "vault opened");
        Ok(root)
    }

    /// Create a Markdown note under `parent` with starter front-matter
    /// (today's date, empty tag list) and a matching title heading.
    ///
    /// The file name is `New Note.md`, suffixed with a counter when
    /// that name is already taken.
    pub async fn create_note(&mut self, parent: &NoteHandle) -> EngineResult<NoteHandle> {
        if !parent.is_directory() {
            return Err(EngineError::invalid_path(format!(
                "cannot create a note inside a file: {}",
                parent.path().display()
            )));
        }

        let stem = self.unused_stem(parent).await?;
        let path = parent.path().join(format!("{stem}.md"));
        let today = Local::now().date_naive();
        let starter = format!("---\ndate: {today}\ntags: []\n---\n\n# {stem}\n");
        fs::write(&path, &starter).await?;

        let note = Note::file(format!("{stem}.md"), &path, metadata::extract(&starter));
        Note::attach_child(parent, note.clone());
        self.index.add_or_update(note.clone());

        debug!(note = %path.display(), "note created");
        Ok(note)
    }

    /// Patch one task line in `note`'s file and write it back.
    ///
    /// Returns the updated text so the caller can re-render without a
    /// second read.
    pub async fn toggle_task(
        &self,
        note: &NoteHandle,
        line_index: usize,
        checked: bool,
    ) -> EngineResult<String> {
        let path = note.path();
        let raw = fs::read_to_string(&path).await?;
        let updated = apply_task_toggle(&raw, line_index, checked);
        fs::write(&path, &updated).await?;

        debug!(note = %path.display(), line = line_index, checked, "task toggled");
        Ok(updated)
    }

    async fn unused_stem(&self, parent: &NoteHandle) -> EngineResult<String> {
        let dir = parent.path();
        if !fs::try_exists(dir.join(format!("{NEW_NOTE_STEM}.md"))).await? {
            return Ok(NEW_NOTE_STEM.to_string());
        }
        let mut n = 1u32;
        loop {
            let stem = format!("{NEW_NOTE_STEM} {n}");
            if !fs::try_exists(dir.join(format!("{stem}.md"))).await? {
                return Ok(stem);
            }
            n += 1;
        }
    }
}

/// Reads note text straight from the filesystem.
///
/// The renderer pulls hover-preview content through this seam; tests
/// substitute an in-memory implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsNoteReader;

impl NoteReader for FsNoteReader {
    fn read_note(&self, note: &Note) -> EngineResult<String> {
        Ok(std::fs::read_to_string(note.path())?)
    }
}
