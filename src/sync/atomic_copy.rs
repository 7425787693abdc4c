use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu};

use crate::ext::BestEffortPathExt;

/// Prefix of the temporary files created next to their final destination.
pub const TEMP_FILE_PREFIX: &str = ".dirsync_tmp_";

/// Copies `source` to `destination` through a temporary file in the
/// destination directory, renamed over `destination` once fully written and
/// flushed. Missing parent directories are created. On failure the temporary
/// file is removed and `destination` is left as it was.
pub fn atomic_copy_file(source: &Path, destination: &Path) -> Result<(), CopyError> {
    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).context(CreateParentSnafu { path: parent })?;

    let mut reader = File::open(source).context(OpenSourceSnafu { path: source })?;
    let mut temp_file = tempfile::Builder::new()
        .prefix(TEMP_FILE_PREFIX)
        .tempfile_in(parent)
        .context(CreateTempSnafu { dir: parent })?;

    io::copy(&mut reader, temp_file.as_file_mut()).context(WriteTempSnafu { path: source })?;
    temp_file
        .as_file()
        .sync_all()
        .context(WriteTempSnafu { path: source })?;

    temp_file
        .persist(destination)
        .context(PersistSnafu { path: destination })?;
    Ok(())
}

#[derive(Debug, Snafu)]
pub enum CopyError {
    #[snafu(display("Failed to create directory {}", path.best_effort_path_display()))]
    CreateParentError { path: PathBuf, source: io::Error },
    #[snafu(display("Failed to open {} for reading", path.best_effort_path_display()))]
    OpenSourceError { path: PathBuf, source: io::Error },
    #[snafu(display("Failed to create a temporary file in {}", dir.best_effort_path_display()))]
    CreateTempError { dir: PathBuf, source: io::Error },
    #[snafu(display("Failed to copy the contents of {}", path.best_effort_path_display()))]
    WriteTempError { path: PathBuf, source: io::Error },
    #[snafu(display("Failed to move the copy into place at {}", path.best_effort_path_display()))]
    PersistError {
        path: PathBuf,
        source: tempfile::PersistError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn leftover_temp_files(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .expect("Failed to list directory")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .filter(|name| name.starts_with(TEMP_FILE_PREFIX))
            .collect()
    }

    #[test]
    fn test_copy_creates_parents() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("source.bin");
        let destination = temp_dir.path().join("out/deeper/copy.bin");
        fs::write(&source, b"\x00\x01payload").expect("Failed to write source");

        atomic_copy_file(&source, &destination).expect("Copy failed");

        assert_eq!(fs::read(&destination).unwrap(), b"\x00\x01payload");
        assert!(leftover_temp_files(destination.parent().unwrap()).is_empty());
    }

    #[test]
    fn test_copy_replaces_existing_content() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("source.txt");
        let destination = temp_dir.path().join("dest.txt");
        fs::write(&source, "new").expect("Failed to write source");
        fs::write(&destination, "old and longer").expect("Failed to write destination");

        atomic_copy_file(&source, &destination).expect("Copy failed");

        assert_eq!(fs::read_to_string(&destination).unwrap(), "new");
    }

    #[test]
    fn test_copy_of_missing_source_leaves_destination_alone() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let destination = temp_dir.path().join("dest.txt");
        fs::write(&destination, "keep me").expect("Failed to write destination");

        let result = atomic_copy_file(&temp_dir.path().join("missing"), &destination);

        assert!(matches!(result, Err(CopyError::OpenSourceError { .. })));
        assert_eq!(fs::read_to_string(&destination).unwrap(), "keep me");
        assert!(leftover_temp_files(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_copy_onto_directory_fails_without_leftovers() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("source.txt");
        let destination = temp_dir.path().join("occupied");
        fs::write(&source, "content").expect("Failed to write source");
        fs::create_dir_all(destination.join("child")).expect("Failed to create directory");

        let result = atomic_copy_file(&source, &destination);

        assert!(matches!(result, Err(CopyError::PersistError { .. })));
        assert!(destination.is_dir());
        assert!(leftover_temp_files(temp_dir.path()).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_open_reader_keeps_complete_old_content() {
        use std::io::Read;

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("source.txt");
        let destination = temp_dir.path().join("dest.txt");
        let old_content = "old content ".repeat(4096);
        fs::write(&destination, &old_content).expect("Failed to write destination");
        fs::write(&source, "new").expect("Failed to write source");
        let mut reader = fs::File::open(&destination).expect("Failed to open destination");

        atomic_copy_file(&source, &destination).expect("Copy failed");

        let mut seen = String::new();
        reader.read_to_string(&mut seen).expect("Failed to read old handle");
        assert_eq!(seen, old_content);
        assert_eq!(fs::read_to_string(&destination).unwrap(), "new");
    }
}
