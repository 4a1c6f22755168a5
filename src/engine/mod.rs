//! Task resolution and transactional execution.
//!
//! `schedule` turns a task list into a cycle-safe, dependency-ordered plan;
//! `execute` applies it with rollback support. [`run_batch`] wires the full
//! pipeline together: validate, build, schedule, execute.

pub mod execute;
pub mod schedule;

pub use execute::*;
pub use schedule::schedule;

use std::path::PathBuf;

use crate::batch::task::build_tasks;
use crate::batch::validate::{find_duplicate_destination, validate_input};
use crate::error::BatchError;

/// Run a complete rename batch over two parallel path lists.
///
/// Validation (`Validating`), planning (`Scheduling`) and execution
/// (`Executing`) happen in sequence; any validation failure returns `Err`
/// before a single filesystem mutation, which is the `Aborted` terminal
/// state. A batch where every pair is a canonical no-op returns immediately
/// with an empty plan and zero filesystem calls.
///
/// # Errors
/// `SourceMissing`, `DuplicateSource`, `DuplicateDestination` and
/// `CountMismatch` abort the batch with zero side effects. Mid-batch rename
/// failures and interruption are reported in-band through the returned
/// [`ExecutionResult`].
pub fn run_batch(
    original: &[PathBuf],
    desired: &[PathBuf],
    config: ExecutionConfig,
    prompt: Option<PromptCallback>,
    cancel: CancelFlag,
) -> Result<ExecutionResult, BatchError> {
    validate_input(original, desired)?;

    let tasks = build_tasks(original, desired)?;
    if let Some(dup) = find_duplicate_destination(&tasks) {
        return Err(BatchError::DuplicateDestination(dup));
    }
    if tasks.is_empty() {
        tracing::info!("nothing to rename");
        return Ok(ExecutionResult::empty());
    }

    let plan = schedule(tasks);
    tracing::debug!(operations = plan.len(), "built execution plan");

    let engine = ExecutionEngine::with_cancel_flag(config, cancel);
    Ok(engine.execute(&plan, prompt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn read(path: &std::path::Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_noop_batch_touches_nothing() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a");
        fs::write(&a, "A").unwrap();

        let original = vec![a.clone()];
        let desired = vec![dir.path().join("./a")];
        let result = run_batch(
            &original,
            &desired,
            ExecutionConfig::default(),
            None,
            CancelFlag::new(),
        )
        .unwrap();

        assert!(result.success);
        assert_eq!(result.applied_count, 0);
        assert_eq!(read(&a), "A");
    }

    #[test]
    fn test_swap_scenario() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::write(&a, "A").unwrap();
        fs::write(&b, "B").unwrap();

        let original = vec![a.clone(), b.clone()];
        let desired = vec![b.clone(), a.clone()];
        let result = run_batch(
            &original,
            &desired,
            ExecutionConfig::default(),
            None,
            CancelFlag::new(),
        )
        .unwrap();

        // The file previously named "a" now answers to "b" and vice versa,
        // via exactly one extra temporary rename.
        assert!(result.success);
        assert_eq!(result.applied_count, 3);
        assert_eq!(read(&b), "A");
        assert_eq!(read(&a), "B");
    }

    #[test]
    fn test_chain_scenario() {
        let dir = tempdir().unwrap();
        let x = dir.path().join("x");
        let y = dir.path().join("y");
        let z = dir.path().join("z");
        let w = dir.path().join("w");
        fs::write(&x, "X").unwrap();
        fs::write(&y, "Y").unwrap();
        fs::write(&z, "Z").unwrap();

        let original = vec![x.clone(), y.clone(), z.clone()];
        let desired = vec![x.clone(), z.clone(), w.clone()];
        let result = run_batch(
            &original,
            &desired,
            ExecutionConfig::default(),
            None,
            CancelFlag::new(),
        )
        .unwrap();

        assert!(result.success);
        assert_eq!(result.applied_count, 2);
        assert_eq!(read(&x), "X");
        assert_eq!(read(&z), "Y");
        assert_eq!(read(&w), "Z");
    }

    #[test]
    fn test_duplicate_source_aborts_before_mutation() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::write(&a, "A").unwrap();
        fs::write(&b, "B").unwrap();

        // "a" spelled two ways resolves to the same canonical path.
        let a2 = dir.path().join("./a");
        let original = vec![a.clone(), b.clone(), a2.clone()];
        let desired = vec![
            dir.path().join("p"),
            dir.path().join("q"),
            dir.path().join("r"),
        ];
        let err = run_batch(
            &original,
            &desired,
            ExecutionConfig::default(),
            None,
            CancelFlag::new(),
        )
        .unwrap_err();

        assert!(matches!(err, BatchError::DuplicateSource(p) if p == a2));
        assert_eq!(read(&a), "A");
        assert_eq!(read(&b), "B");
        assert!(!dir.path().join("p").exists());
    }

    #[test]
    fn test_duplicate_destination_aborts_before_mutation() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::write(&a, "A").unwrap();
        fs::write(&b, "B").unwrap();

        let original = vec![a.clone(), b.clone()];
        let same = dir.path().join("same");
        let desired = vec![same.clone(), same.clone()];
        let err = run_batch(
            &original,
            &desired,
            ExecutionConfig::default(),
            None,
            CancelFlag::new(),
        )
        .unwrap_err();

        assert!(matches!(err, BatchError::DuplicateDestination(_)));
        assert_eq!(read(&a), "A");
        assert_eq!(read(&b), "B");
    }

    #[test]
    fn test_count_mismatch_aborts_with_zero_mutation() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        let c = dir.path().join("c");
        for p in [&a, &b, &c] {
            fs::write(p, "x").unwrap();
        }

        let original = vec![a.clone(), b.clone(), c.clone()];
        let desired = vec![dir.path().join("p"), dir.path().join("q")];
        let err = run_batch(
            &original,
            &desired,
            ExecutionConfig::default(),
            None,
            CancelFlag::new(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            BatchError::CountMismatch {
                expected: 3,
                actual: 2
            }
        ));
        assert!(a.exists() && b.exists() && c.exists());
    }

    #[test]
    fn test_missing_source_aborts() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");
        let err = run_batch(
            &[missing.clone()],
            &[dir.path().join("out")],
            ExecutionConfig::default(),
            None,
            CancelFlag::new(),
        )
        .unwrap_err();
        assert!(matches!(err, BatchError::SourceMissing(p) if p == missing));
    }
}
