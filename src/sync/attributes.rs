use std::fs;
use std::io;
use std::path::Path;

use filetime::FileTime;

/// Copies the permission bits of `source` onto `destination`.
pub fn copy_permissions(source: &Path, destination: &Path) -> io::Result<()> {
    let permissions = fs::metadata(source)?.permissions();
    fs::set_permissions(destination, permissions)
}

/// Gives `destination` the modification time of `source`, to the nanosecond
/// where the platform allows it, so their fingerprints match afterwards.
pub fn copy_modified_time(source: &Path, destination: &Path) -> io::Result<()> {
    let metadata = fs::metadata(source)?;
    filetime::set_file_mtime(destination, FileTime::from_last_modification_time(&metadata))
}
