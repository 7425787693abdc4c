use std::path::{Component, Path, PathBuf};

use derive_more::{Deref, Display, From};

/// A path relative to a tree root, used as the identity of an entry when two
/// trees are compared. Ordering is component-wise, so a directory always sorts
/// before everything beneath it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deref, From, Display)]
#[display("{}", _0.display())]
pub struct RelativePath(PathBuf);

impl RelativePath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Strips `root` from `path`; `None` when `path` is not below `root` or is
    /// the root itself.
    pub fn from_rooted(root: &Path, path: &Path) -> Option<Self> {
        let relative = path.strip_prefix(root).ok()?;
        if relative.as_os_str().is_empty() {
            return None;
        }
        Some(Self(relative.to_path_buf()))
    }

    /// Location of this entry under `root`.
    pub fn under(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }

    /// The path joined with `/` whatever the platform separator is. Exclude
    /// patterns are matched against this form.
    pub fn to_slash_string(&self) -> String {
        self.0
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy()),
                Component::ParentDir => Some("..".into()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_from_rooted() {
        let root = Path::new("/srv/tree");

        assert_eq!(
            RelativePath::from_rooted(root, Path::new("/srv/tree/a/b.txt")),
            Some(RelativePath::new("a/b.txt"))
        );
        assert_eq!(RelativePath::from_rooted(root, root), None);
        assert_eq!(
            RelativePath::from_rooted(root, Path::new("/srv/other/a")),
            None
        );
    }

    #[rstest]
    #[case("file.txt", "file.txt")]
    #[case("a/b/c", "a/b/c")]
    #[case("./a/b", "a/b")]
    fn test_to_slash_string(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(RelativePath::new(input).to_slash_string(), expected);
    }

    #[test]
    fn test_parents_sort_before_children() {
        let paths: BTreeSet<RelativePath> = ["a-b", "a/z", "a", "a.txt"]
            .into_iter()
            .map(RelativePath::new)
            .collect();

        let ordered: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
        let dir_position = ordered.iter().position(|p| p == "a").unwrap();
        let child_position = ordered.iter().position(|p| p == "a/z").unwrap();
        assert!(dir_position < child_position);
    }

    #[test]
    fn test_under_root() {
        let path = RelativePath::new("sub/file");
        assert_eq!(path.under(Path::new("/dst")), PathBuf::from("/dst/sub/file"));
    }
}
