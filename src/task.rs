//! Task model and field validation.
//!
//! The store owns `Task` invariants: a title is never empty or
//! whitespace-only, `priority` is always one of the three levels, and
//! `id`/`created_at` are assigned once at creation. The API layer funnels
//! raw request fields through the validators here before anything reaches
//! the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 200;
/// Maximum description length in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Task priority level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Numeric rank used for priority sorting: high > medium > low.
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ValidationError(
                "Priority must be one of: low, medium, high".to_string(),
            )),
        }
    }
}

/// A request field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// A validated candidate for creation. The store assigns `id` and
/// `created_at`.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub completed: bool,
}

/// A validated partial update. `None` leaves the field unchanged;
/// `description: Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}

/// Validate a (possibly missing) title. Trims surrounding whitespace.
pub fn validate_title(raw: Option<&str>) -> Result<String, ValidationError> {
    let title = raw.map(str::trim).unwrap_or_default();
    if title.is_empty() {
        return Err(ValidationError("Title is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError(format!(
            "Title cannot exceed {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(title.to_string())
}

/// Validate an optional description. Blank input normalizes to `None`.
pub fn validate_description(raw: Option<&str>) -> Result<Option<String>, ValidationError> {
    let description = raw.map(str::trim).unwrap_or_default();
    if description.is_empty() {
        return Ok(None);
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError(format!(
            "Description cannot exceed {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(Some(description.to_string()))
}
