//! Path identity.
//!
//! Two differently spelled references to the same filesystem entry must
//! compare equal for duplicate detection and dependency chaining to work.
//! Canonicalization here is purely lexical: the path is made absolute
//! against the current working directory and `.`/`..` segments are folded.
//! Symlinks are deliberately not resolved and the path does not need to
//! exist, so destinations that will only come into being during the batch
//! can be canonicalized too.

use std::path::{Component, Path, PathBuf};

/// Canonicalize a path for identity comparison.
///
/// Relative paths are resolved against the current working directory.
/// `.` segments are dropped and `..` segments pop the preceding component;
/// `..` above the root folds into the root.
pub fn canonicalize(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                // pop() refuses to remove the root, so "/.." stays "/"
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folds_current_dir_segments() {
        assert_eq!(
            canonicalize(Path::new("/a/./b/./c")),
            PathBuf::from("/a/b/c")
        );
    }

    #[test]
    fn test_folds_parent_dir_segments() {
        assert_eq!(
            canonicalize(Path::new("/a/b/../c")),
            PathBuf::from("/a/c")
        );
    }

    #[test]
    fn test_parent_above_root_is_root() {
        assert_eq!(canonicalize(Path::new("/../etc")), PathBuf::from("/etc"));
    }

    #[test]
    fn test_relative_resolves_against_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(canonicalize(Path::new("foo/bar")), cwd.join("foo/bar"));
    }

    #[test]
    fn test_different_spellings_compare_equal() {
        assert_eq!(
            canonicalize(Path::new("/data/./x/../files/a.txt")),
            canonicalize(Path::new("/data/files/a.txt"))
        );
    }

    #[test]
    fn test_nonexistent_path_is_fine() {
        // Pure lexical normalization, no filesystem access required.
        assert_eq!(
            canonicalize(Path::new("/definitely/not/../here")),
            PathBuf::from("/definitely/here")
        );
    }
}
