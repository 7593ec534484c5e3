//! Vellum vault
//!
//! Filesystem backing for a folder of Markdown notes:
//! - `scan_folder`: async recursive scan into the in-memory note tree
//! - `Vault`: lifecycle operations (open, create, task write-back) plus
//!   the vault's link index, rebuilt wholesale on every rescan
//! - `FsNoteReader`: the read seam the renderer pulls note text through

pub mod scanner;
pub mod vault;

pub use scanner::{flatten, scan_folder};
pub use vault::{FsNoteReader, Vault};
