use std::fs::{self, FileType};
use std::io;
use std::path::Path;

use derive_more::Display;

/// What an entry is on disk, read without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum EntryKind {
    #[display("file")]
    RegularFile,
    #[display("dir")]
    Directory,
    #[display("link")]
    Symlink,
    #[display("other")]
    Other,
}

impl EntryKind {
    pub fn of(path: &Path) -> io::Result<Self> {
        fs::symlink_metadata(path).map(|metadata| metadata.file_type().into())
    }

    /// Like [`EntryKind::of`] but maps a missing entry to `None`.
    pub fn of_existing(path: &Path) -> io::Result<Option<Self>> {
        match Self::of(path) {
            Ok(kind) => Ok(Some(kind)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl From<FileType> for EntryKind {
    fn from(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::RegularFile
        } else {
            EntryKind::Other
        }
    }
}
