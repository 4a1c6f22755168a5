//! Rename tasks.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::BatchError;
use crate::paths::canonicalize;

/// One pending rename: move `source` to `destination`.
///
/// Invariant: for any task handed to the scheduler,
/// `canonicalize(source) != canonicalize(destination)`. No-op pairs are
/// filtered out by [`build_tasks`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl Task {
    /// Create a new task.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Get a human-readable description of this task.
    pub fn description(&self) -> String {
        format!("{} -> {}", self.source.display(), self.destination.display())
    }
}

/// Pair `original[i]` with `desired[i]`, dropping pairs whose canonical
/// forms are equal.
///
/// Input order is preserved; the scheduler reorders later for safety.
///
/// # Errors
/// Returns [`BatchError::CountMismatch`] if the lists differ in length.
pub fn build_tasks(original: &[PathBuf], desired: &[PathBuf]) -> Result<Vec<Task>, BatchError> {
    if original.len() != desired.len() {
        return Err(BatchError::CountMismatch {
            expected: original.len(),
            actual: desired.len(),
        });
    }

    let tasks: Vec<Task> = original
        .iter()
        .zip(desired.iter())
        .filter(|(src, dst)| canonicalize(src) != canonicalize(dst))
        .map(|(src, dst)| Task::new(src.clone(), dst.clone()))
        .collect();

    tracing::debug!(
        input = original.len(),
        tasks = tasks.len(),
        "built task list"
    );

    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_build_pairs_by_index() {
        let tasks = build_tasks(&paths(&["/a", "/b"]), &paths(&["/x", "/y"])).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0], Task::new("/a", "/x"));
        assert_eq!(tasks[1], Task::new("/b", "/y"));
    }

    #[test]
    fn test_no_op_pairs_are_dropped() {
        let tasks = build_tasks(&paths(&["/a", "/b", "/c"]), &paths(&["/a", "/y", "/c"])).unwrap();
        assert_eq!(tasks, vec![Task::new("/b", "/y")]);
    }

    #[test]
    fn test_canonically_equal_pair_is_a_no_op() {
        // Different spelling, same file: not a rename.
        let tasks = build_tasks(&paths(&["/a/b"]), &paths(&["/a/./x/../b"])).unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_count_mismatch() {
        let err = build_tasks(&paths(&["/a", "/b", "/c"]), &paths(&["/a", "/b"])).unwrap_err();
        assert!(matches!(
            err,
            BatchError::CountMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }
}
