use std::collections::{BTreeMap, BTreeSet};

use crate::filesystem::{EntryKind, RelativePath};

/// Why an entry present on both sides needs to be rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modification {
    /// Regular files whose (mtime, size) differ.
    Fingerprint,
    /// Symlinks whose literal targets differ.
    LinkTarget,
    /// The destination holds a different kind of entry than the source.
    KindChanged {
        source: EntryKind,
        destination: EntryKind,
    },
    /// Metadata or a link target could not be read on either side.
    Unreadable,
}

impl Modification {
    /// True when the destination entry has to be removed before the source
    /// kind can be recreated in its place.
    pub fn replaces_kind(&self) -> bool {
        matches!(self, Modification::KindChanged { .. })
    }
}

/// Outcome of comparing a source and a destination snapshot.
///
/// The four path sets are disjoint: `add` only holds source paths, `remove`
/// only destination paths, and `modify`/`unchanged` paths present in both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub add: BTreeSet<RelativePath>,
    pub remove: BTreeSet<RelativePath>,
    pub modify: BTreeMap<RelativePath, Modification>,
    pub unchanged: BTreeSet<RelativePath>,
    /// The destination was missing or empty before this pass. Only affects
    /// how loudly additions are reported.
    pub initial_copy: bool,
}

impl ChangeSet {
    /// No entry needs to be added, removed or modified.
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty() && self.modify.is_empty()
    }

    pub fn modified(&self) -> impl Iterator<Item = &RelativePath> {
        self.modify.keys()
    }
}
