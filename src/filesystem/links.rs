use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::filesystem::EntryKind;

/// Literal text of a symlink, never resolved.
pub fn read_link_target(link: &Path) -> io::Result<PathBuf> {
    fs::read_link(link)
}

/// Points `link` at `target`, first removing whatever currently occupies
/// `link`. The link is briefly absent between the two steps.
pub fn replace_symlink(target: &Path, link: &Path) -> io::Result<()> {
    match EntryKind::of_existing(link)? {
        Some(EntryKind::Directory) => fs::remove_dir_all(link)?,
        Some(_) => fs::remove_file(link)?,
        None => {}
    }
    create_symlink(target, link)
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    let resolved = match link.parent() {
        Some(parent) => parent.join(target),
        None => target.to_path_buf(),
    };
    if resolved.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_replace_symlink_over_existing_link() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let link = temp_dir.path().join("link");
        std::os::unix::fs::symlink("old-target", &link).expect("Failed to create symlink");

        replace_symlink(Path::new("new-target"), &link).expect("Failed to replace symlink");

        assert_eq!(read_link_target(&link).unwrap(), PathBuf::from("new-target"));
    }

    #[test]
    fn test_replace_symlink_over_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let link = temp_dir.path().join("entry");
        fs::create_dir_all(link.join("nested")).expect("Failed to create directory");

        replace_symlink(Path::new("/absolute/target"), &link).expect("Failed to replace");

        assert_eq!(EntryKind::of(&link).unwrap(), EntryKind::Symlink);
        assert_eq!(
            read_link_target(&link).unwrap(),
            PathBuf::from("/absolute/target")
        );
    }

    #[test]
    fn test_replace_symlink_creates_dangling_link() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let link = temp_dir.path().join("dangling");

        replace_symlink(Path::new("does/not/exist"), &link).expect("Failed to create link");

        assert!(!link.exists());
        assert_eq!(EntryKind::of(&link).unwrap(), EntryKind::Symlink);
    }
}
