//! Batch construction and pre-flight validation.
//!
//! A batch starts life as two parallel path lists (original, desired).
//! `validate` rejects malformed input before anything is mutated and
//! `task` pairs the lists into rename tasks, dropping no-op pairs.

pub mod task;
pub mod validate;

pub use task::*;
pub use validate::*;
