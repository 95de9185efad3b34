//! Task domain model.
//!
//! # Responsibility
//! - Define the task record persisted in the task slot.
//! - Define the add-form draft and partial field patches.
//! - Validate draft input before a task is created.
//!
//! # Invariants
//! - `id` is unique within a collection and never reassigned.
//! - `completed` starts as `false` for every newly created task.
//! - Non-empty title is enforced only when a task is created.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Integer identifier assigned by [`crate::IdGenerator`] at creation.
pub type TaskId = u64;

/// Task priority.
///
/// Serialized in lowercase (`high|medium|low`) to match the persisted
/// payload shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Display rank used by the derived view: lower ranks sort first.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    /// Stable lowercase wire/display label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TaskValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(TaskValidationError::UnknownPriority(other.to_string())),
        }
    }
}

/// Validation failures for task input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty after trimming whitespace.
    EmptyTitle,
    /// Priority text is not one of `high|medium|low`.
    UnknownPriority(String),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Task title cannot be empty"),
            Self::UnknownPriority(value) => {
                write!(f, "unknown priority `{value}`; expected high|medium|low")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
///
/// Every field is required when decoding persisted data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub completed: bool,
}

impl Task {
    /// Creates an incomplete task from a validated draft.
    ///
    /// # Errors
    /// - Returns [`TaskValidationError::EmptyTitle`] when the draft title is
    ///   blank after trimming.
    pub fn from_draft(id: TaskId, draft: &TaskDraft) -> Result<Self, TaskValidationError> {
        draft.validate()?;
        Ok(Self {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            priority: draft.priority,
            completed: false,
        })
    }

    /// Flips the completion flag. Symmetric: completed tasks can be undone.
    pub fn toggle_completed(&mut self) {
        self.completed = !self.completed;
    }

    /// Returns whether this task may enter edit mode.
    pub fn is_editable(&self) -> bool {
        !self.completed
    }

    /// Merges partial field changes into this task.
    pub fn apply_patch(&mut self, patch: &TaskPatch) {
        patch.apply_to(&mut self.title, &mut self.description, &mut self.priority);
    }

    /// Case-insensitive containment check over title and description.
    ///
    /// `needle_lower` must already be lowercased; an empty needle matches.
    pub(crate) fn matches_lowercase(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.description.to_lowercase().contains(needle_lower)
    }
}

/// In-progress values for a not-yet-created task (the add form).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

impl TaskDraft {
    /// Creates a draft with the given title and default description/priority.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Checks creation-time invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// Merges partial field changes into this draft.
    pub fn apply_patch(&mut self, patch: &TaskPatch) {
        patch.apply_to(&mut self.title, &mut self.description, &mut self.priority);
    }

    /// Resets the draft back to `{title:"", description:"", priority:medium}`.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Partial field changes; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
}

impl TaskPatch {
    pub fn title(value: impl Into<String>) -> Self {
        Self {
            title: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn description(value: impl Into<String>) -> Self {
        Self {
            description: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn priority(value: Priority) -> Self {
        Self {
            priority: Some(value),
            ..Self::default()
        }
    }

    /// Returns whether this patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.priority.is_none()
    }

    /// Overwrites each field this patch carries.
    fn apply_to(&self, title: &mut String, description: &mut String, priority: &mut Priority) {
        if let Some(value) = &self.title {
            title.clone_from(value);
        }
        if let Some(value) = &self.description {
            description.clone_from(value);
        }
        if let Some(value) = self.priority {
            *priority = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Priority, Task, TaskDraft, TaskPatch, TaskValidationError};

    #[test]
    fn priority_rank_orders_high_before_low() {
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
    }

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!(" HIGH ".parse::<Priority>(), Ok(Priority::High));
        assert_eq!(
            "urgent".parse::<Priority>(),
            Err(TaskValidationError::UnknownPriority("urgent".to_string()))
        );
    }

    #[test]
    fn draft_validation_rejects_whitespace_title() {
        let draft = TaskDraft::titled(" \t ");
        assert_eq!(draft.validate(), Err(TaskValidationError::EmptyTitle));
    }

    #[test]
    fn draft_and_task_merge_patches_the_same_way() {
        let patch = TaskPatch {
            title: Some("new title".to_string()),
            description: None,
            priority: Some(Priority::High),
        };
        let mut draft = TaskDraft {
            title: "old".to_string(),
            description: "keep me".to_string(),
            priority: Priority::Low,
        };
        let mut task = Task::from_draft(1, &draft).unwrap();

        draft.apply_patch(&patch);
        task.apply_patch(&patch);

        assert_eq!(draft.title, "new title");
        assert_eq!(draft.description, "keep me");
        assert_eq!(draft.priority, Priority::High);
        assert_eq!(
            (task.title.as_str(), task.description.as_str(), task.priority),
            (draft.title.as_str(), draft.description.as_str(), draft.priority)
        );
    }

    #[test]
    fn patch_only_touches_provided_fields() {
        let mut task = Task::from_draft(7, &TaskDraft::titled("write docs")).unwrap();
        task.apply_patch(&TaskPatch::priority(Priority::Low));

        assert_eq!(task.title, "write docs");
        assert_eq!(task.priority, Priority::Low);
        assert!(!task.completed);
    }
}
