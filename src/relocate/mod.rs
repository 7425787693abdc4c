//! Rewriting of absolute symlinks that point into the source tree.

mod relocator;

pub use relocator::{SymlinkRelocator, relocated_target};
