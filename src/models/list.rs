use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::not_blank;

/// A named collection of tasks owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct List {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    /// Owner of the list; only this user can read or change it.
    #[serde(rename = "_userId")]
    pub user_id: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Request body for creating a list.
#[derive(Debug, Deserialize, Validate)]
pub struct NewList {
    /// Between 1 and 200 characters, not only whitespace. Stored trimmed.
    #[validate(length(min = 1, max = 200), custom = "not_blank")]
    pub title: String,
}

/// Request body for `PATCH /lists/{id}`. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListUpdate {
    #[validate(length(min = 1, max = 200), custom = "not_blank")]
    pub title: Option<String>,
}

impl List {
    pub fn new(input: NewList, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title.trim().to_string(),
            user_id,
            created_at: Utc::now(),
        }
    }
}

impl ListUpdate {
    /// Returns the update with its title trimmed.
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.map(|title| title.trim().to_string()),
        }
    }
}
