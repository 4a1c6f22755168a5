//! Dependency scheduler.
//!
//! Renames within a batch are not independent: a task whose destination is
//! still occupied by another task's source must wait for that task to
//! vacate the path first, and cyclic chains (swap two files, rotate three)
//! cannot be executed at all without parking one file under a temporary
//! name. The scheduler turns an unordered task list into an execution plan
//! that is safe to apply strictly left to right.
//!
//! The task list is modeled as a graph with one node per task and an edge
//! from a task to the task whose source occupies its destination. Since
//! sources are unique (validated upstream), every node has at most one
//! outgoing edge, and the graph is traversed with a three-color
//! depth-first search on an explicit stack so that arbitrarily long rename
//! chains cannot exhaust the call stack.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::batch::task::Task;
use crate::paths::canonicalize;

/// Per-task state during graph traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitMark {
    /// Not reached yet.
    Unvisited,
    /// On the current traversal stack.
    InProgress,
    /// Fully ordered into the plan.
    Done,
}

/// Order a task list into a plan that is safe to execute sequentially.
///
/// Guarantees:
/// - A task whose destination is another pending task's source is emitted
///   after that task has vacated the path.
/// - Each dependency cycle is broken with exactly one temporary rename: a
///   cycle of N tasks becomes N+1 operations, with the `temp -> final`
///   completion appended after the main ordering.
pub fn schedule(mut tasks: Vec<Task>) -> Vec<Task> {
    // Canonical source path -> task index. Sources are unique, so each
    // destination maps to at most one blocking task.
    let source_index: HashMap<PathBuf, usize> = tasks
        .iter()
        .enumerate()
        .map(|(i, task)| (canonicalize(&task.source), i))
        .collect();

    // Every canonical path in the batch, for temp-name collision checks.
    let mut taken: HashSet<PathBuf> = tasks
        .iter()
        .flat_map(|task| {
            [
                canonicalize(&task.source),
                canonicalize(&task.destination),
            ]
        })
        .collect();

    let mut marks = vec![VisitMark::Unvisited; tasks.len()];
    let mut order: Vec<usize> = Vec::with_capacity(tasks.len());
    let mut deferred: Vec<Task> = Vec::new();
    let mut stack: Vec<usize> = Vec::new();

    for root in 0..tasks.len() {
        if marks[root] != VisitMark::Unvisited {
            continue;
        }
        stack.push(root);

        while let Some(&index) = stack.last() {
            match marks[index] {
                VisitMark::Done => {
                    stack.pop();
                    continue;
                }
                VisitMark::Unvisited => marks[index] = VisitMark::InProgress,
                VisitMark::InProgress => {}
            }

            let dest_key = canonicalize(&tasks[index].destination);
            match source_index.get(&dest_key).copied() {
                Some(next) if marks[next] == VisitMark::Unvisited => {
                    // The destination is still occupied by a pending task;
                    // resolve that one first.
                    stack.push(next);
                }
                Some(next) if marks[next] == VisitMark::InProgress => {
                    // The blocking task is already on the traversal path: a
                    // cycle. Park this file under a temporary name now and
                    // finish with a deferred temp -> destination rename.
                    let temp = temp_destination(&tasks[index].source, &mut taken);
                    let final_dest =
                        std::mem::replace(&mut tasks[index].destination, temp.clone());
                    tracing::debug!(
                        source = %tasks[index].source.display(),
                        temp = %temp.display(),
                        "cycle detected, inserting temporary rename"
                    );
                    deferred.push(Task::new(temp, final_dest));
                    marks[index] = VisitMark::Done;
                    stack.pop();
                    order.push(index);
                }
                _ => {
                    // Destination is free: either outside the batch or
                    // already vacated by an ordered task.
                    marks[index] = VisitMark::Done;
                    stack.pop();
                    order.push(index);
                }
            }
        }
    }

    let mut plan: Vec<Task> = order.into_iter().map(|i| tasks[i].clone()).collect();
    plan.extend(deferred);
    plan
}

/// Derive a temporary sibling name for `source` that collides with no path
/// in the current batch and nothing on disk.
///
/// The name embeds the process id plus a random token, so uniqueness holds
/// even across concurrent edmv processes in the same directory.
fn temp_destination(source: &Path, taken: &mut HashSet<PathBuf>) -> PathBuf {
    let parent = source.parent().unwrap_or(Path::new("."));
    let file_name = source
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "edmv".to_string());

    loop {
        let token = Uuid::new_v4().simple().to_string();
        let candidate = parent.join(format!(
            "{}.edmv-{}-{}",
            file_name,
            std::process::id(),
            &token[..8]
        ));
        let key = canonicalize(&candidate);
        if !taken.contains(&key) && fs::symlink_metadata(&candidate).is_err() {
            taken.insert(key);
            return candidate;
        }
    }
}
