//! Application of a [`ChangeSet`](crate::diff::ChangeSet) to the destination
//! tree.
//!
//! Removals run first, then additions, then modifications. Regular files are
//! always written through a temporary file renamed into place, so a reader of
//! the destination sees either the old or the new content.

mod atomic_copy;
mod attributes;
mod manifest;
mod report;
mod synchronizer;

pub use atomic_copy::atomic_copy_file;
pub use attributes::{copy_modified_time, copy_permissions};
pub use manifest::ChangeManifest;
pub use report::{Reporter, SyncAction, SyncSummary};
pub use synchronizer::{SyncError, Synchronizer};
