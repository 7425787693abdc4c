use std::io;
use std::path::{Path, PathBuf};

use snafu::Report;
use tracing::{debug, error};

use crate::application::RuntimeConfig;
use crate::ext::{best_effort_absolute, lexically_relative};
use crate::filesystem::{EntryKind, TreeScanner, read_link_target, replace_symlink};
use crate::filter::PathFilter;
use crate::sync::{Reporter, SyncAction};

/// What happened to one symlink of the destination tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelocationOutcome {
    /// The link now holds this relative target.
    Rewritten(PathBuf),
    /// The target is relative already, or resolves outside the source tree.
    SkippedOutsideTree,
    /// The link or its target could not be read or resolved.
    SkippedUnreadable,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelocationSummary {
    pub rewritten: Vec<(PathBuf, PathBuf)>,
    pub outside_tree: usize,
    pub unreadable: usize,
}

/// Turns absolute symlinks in the destination that resolve into the source
/// tree into relative links to the matching destination entry, so the
/// destination no longer depends on the source being around.
///
/// Relative links are kept verbatim, wherever they point.
pub struct SymlinkRelocator<'a> {
    source_root: &'a Path,
    destination_root: &'a Path,
    filter: &'a PathFilter,
}

impl<'a> SymlinkRelocator<'a> {
    pub fn new(config: &'a RuntimeConfig, filter: &'a PathFilter) -> Self {
        Self {
            source_root: &config.source,
            destination_root: &config.destination,
            filter,
        }
    }

    /// Walks the destination and relocates every eligible link. Roots are
    /// canonicalized once, at the start of the walk.
    pub fn run(&self, reporter: &mut Reporter) -> RelocationSummary {
        let canonical_source = best_effort_absolute(self.source_root);
        let canonical_destination = best_effort_absolute(self.destination_root);
        let mut summary = RelocationSummary::default();

        let snapshot = match TreeScanner::new(self.filter).scan(&canonical_destination) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Skipping symlink repair: {}", Report::from_error(e));
                return summary;
            }
        };

        for path in &snapshot {
            let link = path.under(&canonical_destination);
            if !matches!(EntryKind::of(&link), Ok(EntryKind::Symlink)) {
                continue;
            }

            match relocate_link(&link, &canonical_source, &canonical_destination) {
                RelocationOutcome::Rewritten(target) => {
                    reporter.action(&SyncAction::Relinked {
                        path: link.clone(),
                        target: target.clone(),
                    });
                    summary.rewritten.push((link, target));
                }
                RelocationOutcome::SkippedOutsideTree => summary.outside_tree += 1,
                RelocationOutcome::SkippedUnreadable => summary.unreadable += 1,
            }
        }

        debug!(
            "Symlink repair: {} rewritten, {} outside the source tree, {} unreadable",
            summary.rewritten.len(),
            summary.outside_tree,
            summary.unreadable
        );
        summary
    }
}

/// Relocates a single link living in the canonical destination tree.
pub fn relocate_link(
    link: &Path,
    canonical_source: &Path,
    canonical_destination: &Path,
) -> RelocationOutcome {
    let target = match read_link_target(link) {
        Ok(target) => target,
        Err(e) => {
            debug!("Cannot read link {}: {}", link.display(), e);
            return RelocationOutcome::SkippedUnreadable;
        }
    };

    let new_target =
        match relocated_target(link, &target, canonical_source, canonical_destination) {
            Ok(Some(new_target)) => new_target,
            Ok(None) => return RelocationOutcome::SkippedOutsideTree,
            Err(e) => {
                debug!(
                    "Cannot resolve {} -> {}: {}",
                    link.display(),
                    target.display(),
                    e
                );
                return RelocationOutcome::SkippedUnreadable;
            }
        };

    if let Err(e) = replace_symlink(&new_target, link) {
        error!("Failed to rewrite link {}: {}", link.display(), e);
        return RelocationOutcome::SkippedUnreadable;
    }
    RelocationOutcome::Rewritten(new_target)
}

/// The relative target a link at `link` (inside the canonical destination)
/// gets in place of `target`. `None` when `target` is relative or resolves
/// outside the source tree; an error when it cannot be resolved at all.
pub fn relocated_target(
    link: &Path,
    target: &Path,
    canonical_source: &Path,
    canonical_destination: &Path,
) -> io::Result<Option<PathBuf>> {
    if !target.is_absolute() {
        return Ok(None);
    }
    let canonical_target = target.canonicalize()?;
    Ok(relative_target(
        link,
        &canonical_target,
        canonical_source,
        canonical_destination,
    ))
}

/// Maps a canonical target inside the source tree to the equivalent path in
/// the destination, expressed relative to the link's own directory.
fn relative_target(
    link: &Path,
    canonical_target: &Path,
    canonical_source: &Path,
    canonical_destination: &Path,
) -> Option<PathBuf> {
    let inside_source = canonical_target.strip_prefix(canonical_source).ok()?;
    let destination_target = canonical_destination.join(inside_source);
    lexically_relative(&destination_target, link.parent()?)
}
