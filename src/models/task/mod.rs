//! Task model.
//!
//! An actionable item under a goal. Dragging a task onto the grid promotes
//! it to an Event that keeps a `task_id` back-reference.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A task belonging to exactly one goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub goal_id: String,
}

impl Task {
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_fields(&self.name, &self.goal_id)
    }
}

/// A task as submitted for creation, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub name: String,
    pub goal_id: String,
}

impl TaskDraft {
    pub fn new(name: impl Into<String>, goal_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            goal_id: goal_id.into(),
        }
    }

    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_fields(&self.name, &self.goal_id)
    }

    pub fn into_task(self, id: impl Into<String>) -> Task {
        Task {
            id: id.into(),
            name: self.name,
            goal_id: self.goal_id,
        }
    }
}

fn validate_fields(name: &str, goal_id: &str) -> Result<(), TaskValidationError> {
    if name.trim().is_empty() {
        return Err(TaskValidationError::EmptyName);
    }
    if goal_id.trim().is_empty() {
        return Err(TaskValidationError::MissingGoal);
    }
    Ok(())
}

/// Validation errors for Task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyName,
    MissingGoal,
}

impl fmt::Display for TaskValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Task name cannot be empty"),
            Self::MissingGoal => write!(f, "Task must belong to a goal"),
        }
    }
}

impl std::error::Error for TaskValidationError {}
