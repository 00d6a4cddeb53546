//! Goal model.
//!
//! Top-level user objective grouping tasks. The color is an opaque token
//! resolved to display metadata by the presentation layer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A user goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub name: String,
    /// Display color token (e.g. "bg-goal-fit"); opaque to the core.
    pub color: String,
}

impl Goal {
    pub fn validate(&self) -> Result<(), GoalValidationError> {
        validate_name(&self.name)
    }
}

/// A goal as submitted for creation, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalDraft {
    pub name: String,
    pub color: String,
}

impl GoalDraft {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }

    pub fn validate(&self) -> Result<(), GoalValidationError> {
        validate_name(&self.name)
    }

    pub fn into_goal(self, id: impl Into<String>) -> Goal {
        Goal {
            id: id.into(),
            name: self.name,
            color: self.color,
        }
    }
}

fn validate_name(name: &str) -> Result<(), GoalValidationError> {
    if name.trim().is_empty() {
        return Err(GoalValidationError::EmptyName);
    }
    Ok(())
}

/// Validation errors for Goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyName,
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Goal name cannot be empty"),
        }
    }
}

impl std::error::Error for GoalValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_valid() {
        let draft = GoalDraft::new("Be fit", "bg-goal-fit");
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_draft_empty_name() {
        let draft = GoalDraft::new("  ", "bg-goal-fit");
        assert_eq!(draft.validate(), Err(GoalValidationError::EmptyName));
    }

    #[test]
    fn test_into_goal() {
        let goal = GoalDraft::new("Academics", "bg-goal-academics").into_goal("g1");
        assert_eq!(goal.id, "g1");
        assert_eq!(goal.name, "Academics");
        assert!(goal.validate().is_ok());
    }
}
