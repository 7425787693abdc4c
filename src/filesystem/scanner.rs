use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use snafu::Snafu;
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::ext::BestEffortPathExt;
use crate::filesystem::RelativePath;
use crate::filter::PathFilter;

/// Every visible entry under one root, keyed by relative path.
pub type TreeSnapshot = BTreeSet<RelativePath>;

/// Enumerates a tree through a [`PathFilter`].
///
/// Directories are descended into; symlinks, including symlinks to
/// directories, are reported as entries but never followed.
pub struct TreeScanner<'a> {
    filter: &'a PathFilter,
}

impl<'a> TreeScanner<'a> {
    pub fn new(filter: &'a PathFilter) -> Self {
        Self { filter }
    }

    /// Scans `root`. A missing root yields an empty snapshot, a root that
    /// exists but cannot be listed is an error. Unreadable entries further
    /// down are skipped with a warning.
    pub fn scan(&self, root: &Path) -> Result<TreeSnapshot, ScanError> {
        match fs::read_dir(root) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("{} does not exist, nothing to scan", root.display());
                return Ok(TreeSnapshot::new());
            }
            Err(source) => {
                return Err(ScanError::OpenRootError {
                    root: root.to_path_buf(),
                    source,
                });
            }
        }

        let mut snapshot = TreeSnapshot::new();
        for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };

            let Some(relative) = RelativePath::from_rooted(root, entry.path()) else {
                continue;
            };
            if self.filter.is_excluded(&relative) {
                trace!("Excluded {}", relative);
                continue;
            }
            snapshot.insert(relative);
        }

        debug!("Scanned {} entries under {}", snapshot.len(), root.display());
        Ok(snapshot)
    }
}

/// True when `root` is missing or holds no entries at all, regardless of any
/// exclude patterns.
pub fn is_empty_tree(root: &Path) -> bool {
    match fs::read_dir(root) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => true,
    }
}

#[derive(Debug, Snafu)]
pub enum ScanError {
    #[snafu(display("Cannot open {} for traversal", root.best_effort_path_display()))]
    OpenRootError { root: PathBuf, source: io::Error },
}
