use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use snafu::{ResultExt, Snafu};

use crate::ext::BestEffortPathExt;

/// Cheap stand-in for a regular file's content: two files with the same
/// modification time and size are treated as identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileFingerprint {
    pub modified_time: SystemTime,
    pub size: u64,
}

impl FileFingerprint {
    /// Compares the fingerprints of two files. Any failure to read either one
    /// counts as a difference.
    pub fn differ(left: &Path, right: &Path) -> bool {
        match (Self::try_from(left), Self::try_from(right)) {
            (Ok(left), Ok(right)) => left != right,
            _ => true,
        }
    }
}

impl TryFrom<&Path> for FileFingerprint {
    type Error = FingerprintError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let metadata = fs::symlink_metadata(path).context(PathSnafu {
            path: path.to_path_buf(),
        })?;

        if !metadata.is_file() {
            return Err(FingerprintError::NotAFileError {
                path: path.to_path_buf(),
            });
        }

        let modified_time = metadata.modified().context(PathSnafu {
            path: path.to_path_buf(),
        })?;

        Ok(FileFingerprint {
            modified_time,
            size: metadata.len(),
        })
    }
}

#[derive(Debug, Snafu)]
pub enum FingerprintError {
    #[snafu(display("Failed to read metadata of {}", path.best_effort_path_display()))]
    PathError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("{} is not a regular file", path.best_effort_path_display()))]
    NotAFileError { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::{FileTime, set_file_mtime};
    use rstest::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_file_fingerprint_from_regular_file() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        write!(temp_file, "test content").expect("Failed to write to temp file");
        temp_file.flush().expect("Failed to flush temp file");

        let fingerprint =
            FileFingerprint::try_from(temp_file.path()).expect("Failed to create fingerprint");

        assert_eq!(fingerprint.size, "test content".len() as u64);
    }

    #[test]
    fn test_file_fingerprint_from_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let result = FileFingerprint::try_from(temp_dir.path());

        match result.unwrap_err() {
            FingerprintError::NotAFileError { path } => {
                assert_eq!(path, temp_dir.path());
            }
            _ => panic!("Expected NotAFileError"),
        }
    }

    #[test]
    fn test_file_fingerprint_from_nonexistent_file() {
        let nonexistent_path = Path::new("/this/path/does/not/exist.txt");

        let result = FileFingerprint::try_from(nonexistent_path);

        match result.unwrap_err() {
            FingerprintError::PathError { path, .. } => {
                assert_eq!(path, nonexistent_path);
            }
            _ => panic!("Expected PathError"),
        }
    }

    #[rstest]
    #[case("Hello", "Hello", 0, false)]
    #[case("Hello", "Hello", 5, true)]
    #[case("Hello", "Hello!", 0, true)]
    #[case("Hello", "Jello", 0, false)]
    fn test_differ_uses_mtime_and_size_only(
        #[case] left_content: &str,
        #[case] right_content: &str,
        #[case] mtime_offset: i64,
        #[case] expected: bool,
    ) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let left = temp_dir.path().join("left");
        let right = temp_dir.path().join("right");
        fs::write(&left, left_content).expect("Failed to write left");
        fs::write(&right, right_content).expect("Failed to write right");

        let base = FileTime::from_unix_time(1_700_000_000, 0);
        set_file_mtime(&left, base).expect("Failed to set left mtime");
        set_file_mtime(
            &right,
            FileTime::from_unix_time(1_700_000_000 + mtime_offset, 0),
        )
        .expect("Failed to set right mtime");

        assert_eq!(FileFingerprint::differ(&left, &right), expected);
    }

    #[test]
    fn test_differ_when_one_side_is_missing() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");

        assert!(FileFingerprint::differ(
            temp_file.path(),
            Path::new("/this/path/does/not/exist.txt")
        ));
    }

    #[test]
    fn test_fingerprint_error_display() {
        let path_error = FingerprintError::PathError {
            path: PathBuf::from("/this/path/does/not/exist.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        let directory_error = FingerprintError::NotAFileError {
            path: PathBuf::from("/"),
        };

        assert!(format!("{}", path_error).contains("/this/path/does/not/exist.txt"));
        assert!(format!("{}", directory_error).contains("not a regular file"));
    }
}
