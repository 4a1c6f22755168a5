//! Error types for batch validation and execution.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by a rename batch.
///
/// The validation variants (`SourceMissing`, `DuplicateSource`,
/// `DuplicateDestination`, `CountMismatch`) are detected before any
/// filesystem mutation: an `Err` from batch setup means nothing was touched
/// and no rollback is needed. `RenameFailed` and `Interrupted` occur
/// mid-batch and are handled by the rollback protocol in the execution
/// engine.
#[derive(Debug, Error)]
pub enum BatchError {
    /// An original path does not exist on disk.
    #[error("source path does not exist: {}", .0.display())]
    SourceMissing(PathBuf),

    /// Two original paths resolve to the same canonical form.
    #[error("duplicate source path: {}", .0.display())]
    DuplicateSource(PathBuf),

    /// Two destinations resolve to the same canonical form.
    #[error("duplicate destination path: {}", .0.display())]
    DuplicateDestination(PathBuf),

    /// The edited list length differs from the original list length.
    #[error("path count mismatch: expected {expected}, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    /// An OS-level rename failed (permission, cross-device, destination
    /// reappeared).
    #[error("rename {} -> {} failed: {cause}", .from.display(), .to.display())]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    /// The batch was cancelled externally while renames were in flight.
    #[error("batch interrupted")]
    Interrupted,
}
