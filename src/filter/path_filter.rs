use std::fmt;

use crate::filesystem::RelativePath;
use crate::filter::{Fnmatch, PatternMatcher};

/// Patterns hiding every path component that starts with `.`, at the top
/// level and below it.
pub const HIDDEN_ENTRY_PATTERNS: [&str; 2] = ["[.]*", "*/[.]*"];

/// Hides relative paths that match any configured exclude pattern.
///
/// Each path is judged on its own: excluding `build` hides the `build`
/// entry, while `build*` hides it together with everything below.
pub struct PathFilter {
    patterns: Vec<String>,
    matcher: Box<dyn PatternMatcher>,
}

impl PathFilter {
    pub fn new(patterns: Vec<String>) -> Self {
        Self::with_matcher(patterns, Fnmatch)
    }

    pub fn with_matcher(patterns: Vec<String>, matcher: impl PatternMatcher + 'static) -> Self {
        Self {
            patterns,
            matcher: Box::new(matcher),
        }
    }

    /// A filter that hides nothing.
    pub fn allow_all() -> Self {
        Self::new(Vec::new())
    }

    pub fn is_excluded(&self, path: &RelativePath) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let normalized = path.to_slash_string();
        self.patterns
            .iter()
            .any(|pattern| self.matcher.matches(pattern, &normalized))
    }
}

impl fmt::Debug for PathFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathFilter")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn hidden_filter() -> PathFilter {
        PathFilter::new(HIDDEN_ENTRY_PATTERNS.iter().map(|p| p.to_string()).collect())
    }

    #[rstest]
    #[case(".git", true)]
    #[case(".git/config", true)]
    #[case("src/.cache", true)]
    #[case("src/.cache/blob", true)]
    #[case("src/main.rs", false)]
    #[case("lib.v1.so", false)]
    fn test_hidden_entry_patterns(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(hidden_filter().is_excluded(&RelativePath::new(path)), expected);
    }

    #[test]
    fn test_allow_all_excludes_nothing() {
        let filter = PathFilter::allow_all();
        assert!(!filter.is_excluded(&RelativePath::new(".git")));
    }

    #[test]
    fn test_matching_is_per_path() {
        let filter = PathFilter::new(vec!["build".into()]);

        assert!(filter.is_excluded(&RelativePath::new("build")));
        assert!(!filter.is_excluded(&RelativePath::new("build/out.o")));
        assert!(!filter.is_excluded(&RelativePath::new("src/build")));
    }

    #[test]
    fn test_custom_matcher_is_used() {
        let filter = PathFilter::with_matcher(vec!["tmp".into()], |pattern: &str, path: &str| {
            path.split('/').any(|component| component == pattern)
        });

        assert!(filter.is_excluded(&RelativePath::new("a/tmp/b")));
        assert!(!filter.is_excluded(&RelativePath::new("a/tmpfile")));
    }

    #[test]
    fn test_debug_lists_patterns() {
        let filter = PathFilter::new(vec!["*.o".into()]);
        assert!(format!("{:?}", filter).contains("*.o"));
    }
}
