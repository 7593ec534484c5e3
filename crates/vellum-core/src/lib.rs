//! Vellum core
//!
//! Data model and source-of-truth operations for a vault of Markdown
//! notes:
//! - `Note` / `NoteHandle`: the in-memory vault tree
//! - `Metadata`: lossless, typed view of YAML front-matter
//! - `NoteLinkIndex`: vault-wide slug/path resolution for wiki-links
//! - `apply_task_toggle`: single-line, marker-preserving source patches
//!
//! Rendering lives in `vellum-render`; file I/O lives in
//! `vellum-vault`. This crate owns the seam traits between them.

pub mod editor;
pub mod error;
pub mod index;
pub mod metadata;
pub mod note;
pub mod traits;

pub use editor::apply_task_toggle;
pub use error::{EngineError, EngineResult};
pub use index::NoteLinkIndex;
pub use metadata::Metadata;
pub use note::{Note, NoteHandle};
pub use traits::NoteReader;
