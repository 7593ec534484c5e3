//! Seam traits between the engine crates
//!
//! Core defines the abstractions; outer crates implement them
//! (`vellum-vault` over the filesystem, tests over in-memory maps).

use crate::error::EngineResult;
use crate::note::Note;

/// Source of a note's current raw text.
///
/// The renderer uses this to fetch the target of a hover preview
/// without owning any file I/O itself.
pub trait NoteReader {
    /// Read the note's full raw Markdown text
    fn read_note(&self, note: &Note) -> EngineResult<String>;
}
