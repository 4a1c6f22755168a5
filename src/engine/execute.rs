//! Execution engine.
//!
//! Executes an ordered plan one rename at a time, strictly in plan order,
//! and keeps a log of completed operations. On a mid-batch failure with
//! rollback enabled, or on external cancellation regardless of the flag,
//! the log is replayed most-recent-first to restore every touched path to
//! its pre-batch name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::batch::task::Task;
use crate::error::BatchError;

/// Policy for handling an already-existing destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverwritePolicy {
    /// Stop the batch (triggers rollback when enabled).
    #[default]
    Fail,
    /// Replace the existing destination.
    Overwrite,
    /// Ask the caller-supplied prompt; a decline skips the task as a no-op.
    Prompt,
}

/// Configuration for execution behavior.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionConfig {
    /// Undo completed renames when a later rename fails.
    pub rollback_on_error: bool,
    /// How to handle "destination already exists".
    pub on_destination_exists: OverwritePolicy,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            rollback_on_error: true,
            on_destination_exists: OverwritePolicy::default(),
        }
    }
}

/// Callback consulted under [`OverwritePolicy::Prompt`]; returns whether
/// the existing destination may be overwritten.
pub type PromptCallback = Box<dyn FnMut(&Task) -> bool>;

/// Cancellation signal shared with the environment (e.g. a Ctrl-C handler).
///
/// Checked before each rename; once set, the engine unwinds via rollback
/// instead of exiting mid-batch with mixed state.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a new, unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the running batch.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One applied rename, the unit of the completed log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedRename {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub applied_at: DateTime<Utc>,
}

/// Lifecycle of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchState {
    Validating,
    Scheduling,
    Executing,
    /// Terminal: the plan ran to its end (possibly stopping in place when
    /// rollback is disabled).
    Completed,
    RollingBack,
    /// Terminal: completed renames were reversed.
    RolledBack,
    /// Terminal: validation failed before any mutation.
    Aborted,
}

/// Result of executing a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// Number of renames in effect when the batch finished (0 after
    /// rollback).
    pub applied_count: usize,
    /// Whether every task was applied or deliberately skipped.
    pub success: bool,
    /// Terminal state of the batch.
    pub final_state: BatchState,
    /// Ordered human-readable progress and error messages.
    pub diagnostics: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ExecutionResult {
    /// Result for a batch with nothing to do: no plan, no filesystem calls.
    pub fn empty() -> Self {
        let now = Utc::now();
        Self {
            applied_count: 0,
            success: true,
            final_state: BatchState::Completed,
            diagnostics: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }
}

/// Executes plans sequentially with rollback support.
pub struct ExecutionEngine {
    config: ExecutionConfig,
    cancel: CancelFlag,
}

impl ExecutionEngine {
    /// Create an engine with the given configuration and a fresh cancel
    /// flag.
    pub fn new(config: ExecutionConfig) -> Self {
        Self {
            config,
            cancel: CancelFlag::new(),
        }
    }

    /// Create an engine wired to an externally owned cancel flag.
    pub fn with_cancel_flag(config: ExecutionConfig, cancel: CancelFlag) -> Self {
        Self { config, cancel }
    }

    /// Execute the plan in order.
    ///
    /// One rename is attempted at a time; the engine waits for each
    /// filesystem call before proceeding. There is no parallelism: tasks in
    /// a plan carry data dependencies that sequential order resolves.
    pub fn execute(&self, plan: &[Task], mut prompt: Option<PromptCallback>) -> ExecutionResult {
        let started_at = Utc::now();
        let mut log: Vec<CompletedRename> = Vec::new();
        let mut diagnostics: Vec<String> = Vec::new();
        let mut failure: Option<BatchError> = None;

        for task in plan {
            if self.cancel.is_cancelled() {
                failure = Some(BatchError::Interrupted);
                break;
            }

            if fs::symlink_metadata(&task.destination).is_ok() {
                match self.config.on_destination_exists {
                    OverwritePolicy::Overwrite => {}
                    OverwritePolicy::Prompt => {
                        let approved = prompt.as_mut().map(|cb| cb(task)).unwrap_or(false);
                        if !approved {
                            tracing::info!(task = %task.description(), "skipped, overwrite declined");
                            diagnostics
                                .push(format!("skipped {} (destination exists)", task.description()));
                            continue;
                        }
                    }
                    OverwritePolicy::Fail => {
                        failure = Some(BatchError::RenameFailed {
                            from: task.source.clone(),
                            to: task.destination.clone(),
                            cause: io::Error::new(
                                io::ErrorKind::AlreadyExists,
                                "destination already exists",
                            ),
                        });
                        break;
                    }
                }
            }

            match fs::rename(&task.source, &task.destination) {
                Ok(()) => {
                    tracing::info!(task = %task.description(), "renamed");
                    diagnostics.push(format!("renamed {}", task.description()));
                    log.push(CompletedRename {
                        source: task.source.clone(),
                        destination: task.destination.clone(),
                        applied_at: Utc::now(),
                    });
                }
                Err(cause) => {
                    failure = Some(BatchError::RenameFailed {
                        from: task.source.clone(),
                        to: task.destination.clone(),
                        cause,
                    });
                    break;
                }
            }
        }

        let interrupted = matches!(failure, Some(BatchError::Interrupted));
        if let Some(err) = &failure {
            tracing::warn!(error = %err, completed = log.len(), "batch stopped");
            diagnostics.push(err.to_string());
        }

        // Interruption always unwinds; an in-band failure unwinds only when
        // rollback is enabled.
        if interrupted || (failure.is_some() && self.config.rollback_on_error) {
            roll_back(&log, &mut diagnostics);
            return ExecutionResult {
                applied_count: 0,
                success: false,
                final_state: BatchState::RolledBack,
                diagnostics,
                started_at,
                finished_at: Utc::now(),
            };
        }

        ExecutionResult {
            applied_count: log.len(),
            success: failure.is_none(),
            final_state: BatchState::Completed,
            diagnostics,
            started_at,
            finished_at: Utc::now(),
        }
    }
}

/// Reverse the completed log, most recent first.
///
/// Overwrite prompts are not consulted here and a rollback failure is
/// reported but never retried or rolled back again.
fn roll_back(log: &[CompletedRename], diagnostics: &mut Vec<String>) {
    tracing::warn!(completed = log.len(), "rolling back");
    for entry in log.iter().rev() {
        match fs::rename(&entry.destination, &entry.source) {
            Ok(()) => {
                tracing::info!(
                    destination = %entry.destination.display(),
                    source = %entry.source.display(),
                    "rolled back"
                );
                diagnostics.push(format!(
                    "rolled back {} -> {}",
                    entry.destination.display(),
                    entry.source.display()
                ));
            }
            Err(err) => {
                tracing::error!(
                    destination = %entry.destination.display(),
                    source = %entry.source.display(),
                    error = %err,
                    "rollback failed"
                );
                diagnostics.push(format!(
                    "rollback of {} -> {} failed: {}",
                    entry.destination.display(),
                    entry.source.display(),
                    err
                ));
            }
        }
    }
}
