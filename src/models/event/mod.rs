//! Event model.
//!
//! A scheduled occurrence on the weekly grid with a fixed category set and
//! optional back-references to the goal/task it came from. Back-references
//! are never enforced as foreign keys: goals and tasks can be deleted
//! independently and events keep dangling ids.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Fixed category set for events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Exercise,
    Eating,
    Work,
    Relax,
    Family,
    Social,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 6] = [
        Category::Exercise,
        Category::Eating,
        Category::Work,
        Category::Relax,
        Category::Family,
        Category::Social,
    ];

    /// Lowercase wire name used by the persistence layer.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Exercise => "exercise",
            Category::Eating => "eating",
            Category::Work => "work",
            Category::Relax => "relax",
            Category::Family => "family",
            Category::Social => "social",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = EventValidationError;

    /// Unrecognized values are rejected at the boundary, not silently kept.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exercise" => Ok(Category::Exercise),
            "eating" => Ok(Category::Eating),
            "work" => Ok(Category::Work),
            "relax" => Ok(Category::Relax),
            "family" => Ok(Category::Family),
            "social" => Ok(Category::Social),
            other => Err(EventValidationError::UnknownCategory(other.to_string())),
        }
    }
}

/// A scheduled event with a stored identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Goal this event contributes to, if any. May dangle.
    pub goal_id: Option<String>,
    /// Task this event was promoted from, if any. May dangle.
    pub task_id: Option<String>,
    /// User who created the record, when an identity was available.
    pub created_by: Option<String>,
}

impl Event {
    /// Validate the stored record. Same rules as the draft.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        validate_fields(&self.title, self.start, self.end)
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// An event as submitted for creation: everything except the id, which the
/// persistence layer assigns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub category: Category,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub goal_id: Option<String>,
    pub task_id: Option<String>,
    pub created_by: Option<String>,
}

impl EventDraft {
    /// Create a draft with required fields; optional references start empty.
    pub fn new(
        title: impl Into<String>,
        category: Category,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            title: title.into(),
            category,
            start,
            end,
            goal_id: None,
            task_id: None,
            created_by: None,
        }
    }

    /// Set the goal back-reference.
    pub fn with_goal(mut self, goal_id: impl Into<String>) -> Self {
        self.goal_id = Some(goal_id.into());
        self
    }

    /// Set the task back-reference.
    pub fn with_task(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    pub fn validate(&self) -> Result<(), EventValidationError> {
        validate_fields(&self.title, self.start, self.end)
    }

    /// Attach the stored id, producing the full record.
    pub fn into_event(self, id: impl Into<String>) -> Event {
        Event {
            id: id.into(),
            title: self.title,
            category: self.category,
            start: self.start,
            end: self.end,
            goal_id: self.goal_id,
            task_id: self.task_id,
            created_by: self.created_by,
        }
    }
}

fn validate_fields(
    title: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<(), EventValidationError> {
    if title.trim().is_empty() {
        return Err(EventValidationError::EmptyTitle);
    }
    // Strictly positive duration; zero-length events are rejected too.
    if end <= start {
        return Err(EventValidationError::EndNotAfterStart);
    }
    Ok(())
}

/// Validation errors for Event / EventDraft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    EmptyTitle,
    EndNotAfterStart,
    UnknownCategory(String),
}

impl fmt::Display for EventValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Event title cannot be empty"),
            Self::EndNotAfterStart => write!(f, "Event end time must be after start time"),
            Self::UnknownCategory(value) => write!(f, "Unknown event category '{}'", value),
        }
    }
}

impl std::error::Error for EventValidationError {}
