//! Derived task view.
//!
//! # Responsibility
//! - Project a task collection into the filtered, sorted display sequence.
//! - Attach per-row display affordances for UI surfaces.
//!
//! # Invariants
//! - Projection is pure: same inputs always yield the same output.
//! - Sort is stable: incomplete before completed, then priority rank.
//! - Display order is never persisted.

use crate::model::task::{Task, TaskId};

/// Toggle action label for an incomplete task.
pub const COMPLETE_LABEL: &str = "Complete";
/// Toggle action label for a completed task.
pub const UNDO_LABEL: &str = "Undo";

/// One display row of the derived view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub task: Task,
    /// Whether this row is the task currently open in the edit buffer.
    pub editing: bool,
    /// Label for the toggle action (`Complete` or `Undo`).
    pub toggle_label: &'static str,
}

/// Filters `tasks` by `search_text` and sorts the result for display.
///
/// Matching is a case-insensitive substring check over title and
/// description. An empty search text keeps every task.
pub fn derive_view(tasks: &[Task], search_text: &str) -> Vec<Task> {
    let needle = search_text.to_lowercase();
    let mut visible: Vec<Task> = tasks
        .iter()
        .filter(|task| task.matches_lowercase(&needle))
        .cloned()
        .collect();
    // `sort_by_key` is stable, so insertion order breaks ties.
    visible.sort_by_key(|task| (task.completed, task.priority.rank()));
    visible
}

/// Builds display rows for the derived view of `tasks`.
pub fn derive_rows(tasks: &[Task], search_text: &str, editing: Option<TaskId>) -> Vec<TaskRow> {
    derive_view(tasks, search_text)
        .into_iter()
        .map(|task| TaskRow {
            editing: editing == Some(task.id),
            toggle_label: if task.completed {
                UNDO_LABEL
            } else {
                COMPLETE_LABEL
            },
            task,
        })
        .collect()
}
