//! Pre-flight validation.
//!
//! Every check here runs before any filesystem mutation is attempted, so a
//! validation failure aborts the whole batch with zero side effects.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use crate::batch::task::Task;
use crate::error::BatchError;
use crate::paths::canonicalize;

/// Return the first path whose canonical form was already seen, in
/// insertion order.
///
/// O(n) time and space; touches the filesystem only through the working
/// directory lookup inside canonicalization.
pub fn find_duplicate(paths: &[PathBuf]) -> Option<PathBuf> {
    let mut seen = HashSet::with_capacity(paths.len());
    for path in paths {
        if !seen.insert(canonicalize(path)) {
            return Some(path.clone());
        }
    }
    None
}

/// Return the first task whose destination canonical form repeats.
///
/// Runs on the task list, i.e. after no-op pairs have been filtered.
pub fn find_duplicate_destination(tasks: &[Task]) -> Option<PathBuf> {
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen.insert(canonicalize(&task.destination)) {
            return Some(task.destination.clone());
        }
    }
    None
}

/// Check the original list: no duplicates, every entry present on disk.
///
/// Uses `symlink_metadata` so dangling symlinks still count as existing
/// entries (they can be renamed like anything else).
pub fn validate_sources(original: &[PathBuf]) -> Result<(), BatchError> {
    if let Some(dup) = find_duplicate(original) {
        return Err(BatchError::DuplicateSource(dup));
    }
    for path in original {
        if fs::symlink_metadata(path).is_err() {
            return Err(BatchError::SourceMissing(path.clone()));
        }
    }
    Ok(())
}

/// Validate both input lists before task construction.
///
/// Checks, in order: list lengths match, originals contain no canonical
/// duplicates, every original exists. Destination duplication is checked
/// separately on the filtered task list via [`find_duplicate_destination`].
pub fn validate_input(original: &[PathBuf], desired: &[PathBuf]) -> Result<(), BatchError> {
    if original.len() != desired.len() {
        return Err(BatchError::CountMismatch {
            expected: original.len(),
            actual: desired.len(),
        });
    }
    validate_sources(original)
}
