//! Path normalization utilities
//!
//! Repository-relative paths always use '/' as separator, whatever the host OS.

use std::path::{Component, Path, PathBuf};

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Resolve `path` against `base` without touching the filesystem
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    lexical_clean(&joined)
}

/// Drop `.` components and fold `..` into their parent
pub fn lexical_clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Directory git should run in for `path`: the path itself if it is a
/// directory, otherwise its parent
pub fn working_dir_for(path: &Path) -> PathBuf {
    if path.is_dir() {
        return path.to_path_buf();
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Canonicalize when possible, falling back to the lexical form
pub fn canonical_or_clean(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| lexical_clean(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("src/main.rs")), "src/main.rs");
        assert_eq!(normalize_path(Path::new("a/b/c/d.rs")), "a/b/c/d.rs");
    }

    #[test]
    fn test_make_relative() {
        let root = Path::new("/project");
        assert_eq!(
            make_relative(Path::new("/project/src/main.rs"), root),
            Some("src/main.rs".to_string())
        );
        assert_eq!(make_relative(Path::new("/project"), root), Some(String::new()));
        assert_eq!(make_relative(Path::new("/other/file.rs"), root), None);
    }

    #[test]
    fn test_absolutize() {
        let base = Path::new("/work/repo");
        assert_eq!(
            absolutize(Path::new("src/../lib.rs"), base),
            PathBuf::from("/work/repo/lib.rs")
        );
        assert_eq!(
            absolutize(Path::new("/etc/./hosts"), base),
            PathBuf::from("/etc/hosts")
        );
    }

    #[test]
    fn test_working_dir_for() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();

        assert_eq!(working_dir_for(temp.path()), temp.path());
        assert_eq!(working_dir_for(&file), temp.path());
        assert_eq!(working_dir_for(Path::new("bare.txt")), PathBuf::from("."));
    }
}
