//! edmv: rename batches of files by editing their paths in a text editor.
//!
//! The caller (normally the `edmv` binary) supplies two parallel path
//! lists: the originals and the edited spellings. The library validates
//! both lists, pairs them into rename tasks, orders the tasks so that no
//! rename overwrites a file another pending task still needs, breaks
//! cyclic chains with temporary names, and executes the plan with full
//! rollback on failure or interruption.
//!
//! ```rust,ignore
//! use edmv::{run_batch, CancelFlag, ExecutionConfig};
//!
//! let result = run_batch(
//!     &original,
//!     &desired,
//!     ExecutionConfig::default(),
//!     None,
//!     CancelFlag::new(),
//! )?;
//! println!("renamed {} files", result.applied_count);
//! ```

pub mod batch;
pub mod editor;
pub mod engine;
pub mod error;
pub mod paths;

pub use batch::task::{build_tasks, Task};
pub use batch::validate::{find_duplicate, validate_input, validate_sources};
pub use editor::{edit_paths, resolve_editor, EditorError};
pub use engine::execute::{
    BatchState, CancelFlag, CompletedRename, ExecutionConfig, ExecutionEngine, ExecutionResult,
    OverwritePolicy, PromptCallback,
};
pub use engine::{run_batch, schedule};
pub use error::BatchError;
pub use paths::canonicalize;
