use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::diff::{ChangeSet, Modification};
use crate::ext::best_effort_absolute;
use crate::filesystem::{
    EntryKind, FileFingerprint, RelativePath, TreeSnapshot, is_empty_tree, read_link_target,
};
use crate::relocate::relocated_target;

/// Canonical roots used to recognise links already rewritten by the
/// symlink relocator.
struct LinkRelocation {
    canonical_source: PathBuf,
    canonical_destination: PathBuf,
}

/// Compares two snapshots using metadata only: entry kind, (mtime, size) for
/// regular files and the literal target for symlinks. File contents are never
/// read.
pub struct DiffEngine<'a> {
    source_root: &'a Path,
    destination_root: &'a Path,
    relocation: Option<LinkRelocation>,
}

impl<'a> DiffEngine<'a> {
    pub fn new(source_root: &'a Path, destination_root: &'a Path) -> Self {
        Self {
            source_root,
            destination_root,
            relocation: None,
        }
    }

    /// With relocation on, a destination link whose target is the relocated
    /// form of the source link's target counts as unchanged.
    pub fn relocating_links(mut self, enabled: bool) -> Self {
        self.relocation = enabled.then(|| LinkRelocation {
            canonical_source: best_effort_absolute(self.source_root),
            canonical_destination: best_effort_absolute(self.destination_root),
        });
        self
    }

    /// Classifies every path of both snapshots. Must run before the
    /// destination is touched, since `initial_copy` is read from disk.
    pub fn compare(&self, source: &TreeSnapshot, destination: &TreeSnapshot) -> ChangeSet {
        let mut change_set = ChangeSet {
            initial_copy: is_empty_tree(self.destination_root),
            ..ChangeSet::default()
        };

        change_set.add = source.difference(destination).cloned().collect();
        change_set.remove = destination.difference(source).cloned().collect();

        for path in source.intersection(destination) {
            match self.classify(path) {
                Some(modification) => {
                    debug!("{} modified: {:?}", path, modification);
                    change_set.modify.insert(path.clone(), modification);
                }
                None => {
                    change_set.unchanged.insert(path.clone());
                }
            }
        }

        debug!(
            "Diff: {} to add, {} to remove, {} to modify, {} unchanged (initial copy: {})",
            change_set.add.len(),
            change_set.remove.len(),
            change_set.modify.len(),
            change_set.unchanged.len(),
            change_set.initial_copy
        );
        change_set
    }

    fn classify(&self, path: &RelativePath) -> Option<Modification> {
        let source_path = path.under(self.source_root);
        let destination_path = path.under(self.destination_root);

        let (source_kind, destination_kind) =
            match (EntryKind::of(&source_path), EntryKind::of(&destination_path)) {
                (Ok(source_kind), Ok(destination_kind)) => (source_kind, destination_kind),
                (Err(e), _) | (_, Err(e)) => {
                    warn!("Cannot read metadata for {}: {}", path, e);
                    return Some(Modification::Unreadable);
                }
            };

        if source_kind != destination_kind {
            return Some(Modification::KindChanged {
                source: source_kind,
                destination: destination_kind,
            });
        }

        match source_kind {
            EntryKind::RegularFile => FileFingerprint::differ(&source_path, &destination_path)
                .then_some(Modification::Fingerprint),
            EntryKind::Symlink => {
                match (
                    read_link_target(&source_path),
                    read_link_target(&destination_path),
                ) {
                    (Ok(source_target), Ok(destination_target)) => {
                        let same = source_target == destination_target
                            || self.is_relocated(path, &source_target, &destination_target);
                        (!same).then_some(Modification::LinkTarget)
                    }
                    _ => Some(Modification::Unreadable),
                }
            }
            EntryKind::Directory | EntryKind::Other => None,
        }
    }

    fn is_relocated(
        &self,
        path: &RelativePath,
        source_target: &Path,
        destination_target: &Path,
    ) -> bool {
        let Some(relocation) = &self.relocation else {
            return false;
        };
        let link = path.under(&relocation.canonical_destination);
        matches!(
            relocated_target(
                &link,
                source_target,
                &relocation.canonical_source,
                &relocation.canonical_destination,
            ),
            Ok(Some(relocated)) if relocated.as_path() == destination_target
        )
    }
}
