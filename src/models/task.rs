use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::not_blank;

/// Represents a task entity as stored by the service and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// The title of the task.
    pub title: String,
    /// The list the task belongs to. Ownership is inherited from the list.
    #[serde(rename = "_listId")]
    pub list_id: Uuid,
    /// Whether the task has been checked off.
    pub completed: bool,
    /// Timestamp of when the task was created.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Input structure for creating a task.
#[derive(Debug, Deserialize, Validate)]
pub struct NewTask {
    /// The title of the task.
    /// Must be between 1 and 200 characters and not only whitespace.
    #[validate(length(min = 1, max = 200), custom = "not_blank")]
    pub title: String,
}

/// Input structure for `PATCH` on a task.
///
/// Only `title` and `completed` are writable; any other field in the body is
/// ignored, so a task can never be moved to another list this way.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200), custom = "not_blank")]
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl Task {
    /// Creates a new, not yet completed `Task` in `list_id`.
    pub fn new(input: NewTask, list_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title.trim().to_string(),
            list_id,
            completed: false,
            created_at: Utc::now(),
        }
    }
}

impl TaskUpdate {
    /// Returns the update with its title trimmed.
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.map(|title| title.trim().to_string()),
            completed: self.completed,
        }
    }
}
