//! Filesystem-facing building blocks of a sync pass.
//!
//! Everything here reads the disk without following symlinks: entries are
//! identified by their [`RelativePath`] under a root, classified by
//! [`EntryKind`], and regular files are compared through their
//! [`FileFingerprint`].

mod entry_kind;
mod fingerprint;
mod links;
mod relative_path;
mod scanner;

pub use entry_kind::EntryKind;
pub use fingerprint::FileFingerprint;
pub use links::{read_link_target, replace_symlink};
pub use relative_path::RelativePath;
pub use scanner::{ScanError, TreeScanner, TreeSnapshot, is_empty_tree};
