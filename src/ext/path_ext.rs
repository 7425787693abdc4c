use std::path::{Component, Path, PathBuf};

/// Renders a path for messages, preferring its canonical form and falling back
/// to a normalized absolute path when the path does not exist (yet).
pub fn best_effort_path_display(path: &Path) -> String {
    best_effort_absolute(path).display().to_string()
}

/// Canonicalizes `path` if possible, otherwise makes it absolute against the
/// current directory and strips `.`/`..` lexically.
pub fn best_effort_absolute(path: &Path) -> PathBuf {
    if let Ok(canonical_path) = path.canonicalize() {
        return canonical_path;
    }

    let absolute_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(current_dir) => current_dir.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    normalize_path(&absolute_path)
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                }
            }
            _ => components.push(component),
        }
    }

    components.iter().collect()
}

/// Lexical relative path from `base` to `path`, without touching the
/// filesystem. Returns `None` when no such path exists (different roots, or
/// `base` climbs above its own root through `..`).
pub fn lexically_relative(path: &Path, base: &Path) -> Option<PathBuf> {
    if path.has_root() != base.has_root() {
        return None;
    }

    let mut path_components = path.components().peekable();
    let mut base_components = base.components().peekable();

    // Shared prefix
    while let (Some(a), Some(b)) = (path_components.peek(), base_components.peek()) {
        if a != b {
            break;
        }
        path_components.next();
        base_components.next();
    }

    let mut climb: isize = 0;
    for component in base_components {
        match component {
            Component::Normal(_) => climb += 1,
            Component::ParentDir => climb -= 1,
            Component::CurDir => {}
            // A leftover prefix or root means the two paths live under different roots
            Component::Prefix(_) | Component::RootDir => return None,
        }
    }
    if climb < 0 {
        return None;
    }

    let mut relative = PathBuf::new();
    for _ in 0..climb {
        relative.push(Component::ParentDir);
    }
    for component in path_components {
        relative.push(component);
    }

    if relative.as_os_str().is_empty() {
        relative.push(Component::CurDir);
    }
    Some(relative)
}

pub trait BestEffortPathExt {
    fn best_effort_path_display(&self) -> String;
}

impl BestEffortPathExt for Path {
    fn best_effort_path_display(&self) -> String {
        best_effort_path_display(self)
    }
}

impl BestEffortPathExt for PathBuf {
    fn best_effort_path_display(&self) -> String {
        best_effort_path_display(self)
    }
}
