use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu};
use tracing::{debug, error, warn};

use crate::application::RuntimeConfig;
use crate::diff::{ChangeSet, DiffEngine, Modification};
use crate::ext::best_effort_absolute;
use crate::filesystem::{
    EntryKind, RelativePath, ScanError, TreeScanner, read_link_target, replace_symlink,
};
use crate::filter::PathFilter;
use crate::sync::{
    ChangeManifest, Reporter, SyncAction, SyncSummary, atomic_copy_file, copy_modified_time,
    copy_permissions,
};

/// Brings the destination tree in line with the source tree.
pub struct Synchronizer<'a> {
    config: &'a RuntimeConfig,
    filter: &'a PathFilter,
}

impl<'a> Synchronizer<'a> {
    pub fn new(config: &'a RuntimeConfig, filter: &'a PathFilter) -> Self {
        Self { config, filter }
    }

    /// Scans both trees and classifies their differences without touching
    /// the destination.
    pub fn plan(&self) -> Result<ChangeSet, SyncError> {
        let scanner = TreeScanner::new(self.filter);

        if !self.config.source.exists() {
            warn!(
                "Source {} does not exist, nothing will be added",
                self.config.source.display()
            );
        }
        let source = scanner
            .scan(&self.config.source)
            .context(ScanSourceSnafu)?;
        let destination = scanner
            .scan(&self.config.destination)
            .context(ScanDestinationSnafu)?;

        Ok(DiffEngine::new(&self.config.source, &self.config.destination)
            .relocating_links(!self.config.skip_fix_symlinks)
            .compare(&source, &destination))
    }

    /// Runs a full pass: plan, then apply.
    pub fn run(&self, reporter: &mut Reporter) -> Result<SyncSummary, SyncError> {
        let change_set = self.plan()?;
        if change_set.is_empty() {
            debug!("Destination already matches the source");
        }
        Ok(self.apply(&change_set, reporter))
    }

    /// Applies `change_set` to the destination. Failures are logged per
    /// entry and counted in the summary; nothing already applied is undone.
    pub fn apply(&self, change_set: &ChangeSet, reporter: &mut Reporter) -> SyncSummary {
        let mut pass = Pass::new(self.config, change_set.initial_copy, reporter);

        for path in &change_set.remove {
            pass.remove(path);
        }
        for (path, modification) in &change_set.modify {
            if modification.replaces_kind() {
                pass.clear_for_replacement(path, modification);
            }
        }
        for path in &change_set.add {
            pass.add(path);
        }
        for path in change_set.modified() {
            pass.modify(path);
        }
        for path in &change_set.unchanged {
            pass.refresh_directory(path);
        }

        pass.finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Applied {
    Added,
    Changed,
}

/// State of one application of a change set.
struct Pass<'p> {
    source_root: &'p Path,
    destination_root: &'p Path,
    canonical_destination: PathBuf,
    listfile: Option<&'p Path>,
    manifest: Option<ChangeManifest>,
    quiet_additions: bool,
    /// Directories whose permission bits are copied once all content is in
    /// place, so a read-only source directory can still be populated.
    directories: BTreeSet<RelativePath>,
    summary: SyncSummary,
    reporter: &'p mut Reporter,
}

impl<'p> Pass<'p> {
    fn new(config: &'p RuntimeConfig, initial_copy: bool, reporter: &'p mut Reporter) -> Self {
        if let Err(e) = fs::create_dir_all(&config.destination) {
            error!(
                "Failed to create destination {}: {}",
                config.destination.display(),
                e
            );
        }

        Self {
            source_root: &config.source,
            destination_root: &config.destination,
            canonical_destination: best_effort_absolute(&config.destination),
            listfile: config.listfile.as_deref(),
            manifest: config.listfile.as_ref().map(|_| ChangeManifest::default()),
            quiet_additions: initial_copy && !config.verbose_initial,
            directories: BTreeSet::new(),
            summary: SyncSummary::default(),
            reporter,
        }
    }

    /// The `[rm]` line is printed before the attempt, so a failed removal
    /// still shows up next to its error.
    fn remove(&mut self, path: &RelativePath) {
        let destination_path = path.under(self.destination_root);
        self.reporter.action(&SyncAction::Removed {
            path: destination_path.clone(),
        });
        match remove_entry(&destination_path) {
            Ok(()) => self.summary.removed.push(path.clone()),
            Err(e) => {
                error!("Failed to remove {}: {}", destination_path.display(), e);
                self.summary.failures += 1;
            }
        }
    }

    fn clear_for_replacement(&mut self, path: &RelativePath, modification: &Modification) {
        let destination_path = path.under(self.destination_root);
        if let Modification::KindChanged {
            source,
            destination,
        } = modification
        {
            debug!(
                "Replacing {} {} with a {}",
                destination,
                destination_path.display(),
                source
            );
        }
        if let Err(e) = remove_entry(&destination_path) {
            error!("Failed to remove {}: {}", destination_path.display(), e);
            self.summary.failures += 1;
        }
    }

    fn add(&mut self, path: &RelativePath) {
        self.apply(path, Applied::Added);
    }

    fn modify(&mut self, path: &RelativePath) {
        self.apply(path, Applied::Changed);
    }

    fn apply(&mut self, path: &RelativePath, applied: Applied) {
        let source_path = path.under(self.source_root);
        let destination_path = path.under(self.destination_root);

        let kind = match EntryKind::of(&source_path) {
            Ok(kind) => kind,
            Err(e) => {
                warn!("Skipping {}: {}", source_path.display(), e);
                self.summary.failures += 1;
                return;
            }
        };

        match kind {
            EntryKind::Directory => {
                if let Err(e) = fs::create_dir_all(&destination_path) {
                    error!(
                        "Failed to create directory {}: {}",
                        destination_path.display(),
                        e
                    );
                    self.summary.failures += 1;
                    return;
                }
                self.directories.insert(path.clone());
                self.record(path, applied, kind, destination_path, None);
            }
            EntryKind::Symlink => {
                if let Some(target) = self.link(&source_path, &destination_path) {
                    self.record(path, applied, kind, destination_path, Some(target));
                }
            }
            EntryKind::RegularFile => {
                self.copy_file(&source_path, &destination_path);
                self.record(path, applied, kind, destination_path, None);
            }
            EntryKind::Other => {
                debug!("Skipping special file {}", source_path.display());
            }
        }
    }

    /// Recreates the link at `destination` with the literal target of
    /// `source`. `None` when the source link cannot be read.
    fn link(&mut self, source: &Path, destination: &Path) -> Option<PathBuf> {
        let target = match read_link_target(source) {
            Ok(target) => target,
            Err(e) => {
                warn!("Cannot read link {}: {}", source.display(), e);
                self.summary.failures += 1;
                return None;
            }
        };

        if let Some(parent) = destination.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                debug!("Failed to create {}: {}", parent.display(), e);
            }
        }
        if let Err(e) = replace_symlink(&target, destination) {
            error!("Failed to create link {}: {}", destination.display(), e);
            self.summary.failures += 1;
        }
        Some(target)
    }

    fn copy_file(&mut self, source: &Path, destination: &Path) {
        if let Err(e) = atomic_copy_file(source, destination) {
            error!("{}", snafu::Report::from_error(e));
            self.summary.failures += 1;
            return;
        }
        if let Err(e) = copy_permissions(source, destination) {
            warn!(
                "Failed to copy permissions onto {}: {}",
                destination.display(),
                e
            );
        }
        if let Err(e) = copy_modified_time(source, destination) {
            warn!(
                "Failed to copy modification time onto {}: {}",
                destination.display(),
                e
            );
        }
    }

    /// Directories present and unchanged on both sides still get their
    /// permission bits refreshed, silently.
    fn refresh_directory(&mut self, path: &RelativePath) {
        let source_is_dir = matches!(
            EntryKind::of(&path.under(self.source_root)),
            Ok(EntryKind::Directory)
        );
        let destination_is_dir = matches!(
            EntryKind::of(&path.under(self.destination_root)),
            Ok(EntryKind::Directory)
        );
        if source_is_dir && destination_is_dir {
            self.directories.insert(path.clone());
        }
    }

    fn record(
        &mut self,
        path: &RelativePath,
        applied: Applied,
        kind: EntryKind,
        destination_path: PathBuf,
        target: Option<PathBuf>,
    ) {
        let action = match applied {
            Applied::Added => SyncAction::Added {
                kind,
                path: destination_path,
                target,
            },
            Applied::Changed => SyncAction::Changed {
                kind,
                path: destination_path,
                target,
            },
        };

        if applied == Applied::Changed || !self.quiet_additions {
            self.reporter.action(&action);
        }

        match applied {
            Applied::Added => self.summary.added.push(path.clone()),
            Applied::Changed => self.summary.changed.push(path.clone()),
        }
        if let Some(manifest) = self.manifest.as_mut() {
            manifest.record(path.under(&self.canonical_destination));
        }
    }

    fn finish(mut self) -> SyncSummary {
        // Deepest first, so a directory turning read-only does not block its
        // children
        for path in self.directories.iter().rev() {
            let destination_path = path.under(self.destination_root);
            if let Err(e) = copy_permissions(&path.under(self.source_root), &destination_path) {
                warn!(
                    "Failed to copy permissions onto {}: {}",
                    destination_path.display(),
                    e
                );
            }
        }

        if let Some(manifest) = self.manifest.take() {
            if let Some(listfile) = self.listfile {
                if let Err(e) = manifest.write_to(listfile) {
                    error!("{}", snafu::Report::from_error(e));
                }
            }
            self.summary.change_list = manifest.into_entries();
        }

        self.summary
    }
}

/// Deletes whatever sits at `path`, recursively for directories. An entry
/// that is already gone counts as removed.
fn remove_entry(path: &Path) -> io::Result<()> {
    let result = match EntryKind::of_existing(path)? {
        Some(EntryKind::Directory) => fs::remove_dir_all(path),
        Some(_) => fs::remove_file(path),
        None => Ok(()),
    };
    match result {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[derive(Debug, Snafu)]
pub enum SyncError {
    #[snafu(display("Cannot read the source tree"))]
    ScanSourceError { source: ScanError },
    #[snafu(display("Cannot read the destination tree"))]
    ScanDestinationError { source: ScanError },
}
