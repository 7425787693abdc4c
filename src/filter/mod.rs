//! Exclude-pattern filtering of relative paths.

mod path_filter;
mod pattern;

pub use path_filter::{HIDDEN_ENTRY_PATTERNS, PathFilter};
pub use pattern::{Fnmatch, PatternMatcher};
