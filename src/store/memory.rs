use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Store;
use crate::error::AppError;
use crate::models::{normalize_email, List, ListUpdate, Session, Task, TaskUpdate, User};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    sessions: Vec<Session>,
    lists: Vec<List>,
    tasks: Vec<Task>,
}

/// `Store` held entirely in process memory.
///
/// Rows are kept in insertion order, which is the order listings return them in.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::BadRequest("Email already registered".into()));
        }
        tables.users.push(user.clone());
        Ok(user.clone())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = normalize_email(email);
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn insert_session(&self, session: &Session) -> Result<(), AppError> {
        self.tables.write().await.sessions.push(session.clone());
        Ok(())
    }

    async fn find_session(&self, user_id: Uuid, token: &str) -> Result<Option<Session>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .sessions
            .iter()
            .find(|s| s.user_id == user_id && s.token == token)
            .cloned())
    }

    async fn delete_session(&self, user_id: Uuid, token: &str) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.sessions.len();
        tables
            .sessions
            .retain(|s| !(s.user_id == user_id && s.token == token));
        Ok(tables.sessions.len() < before)
    }

    async fn delete_expired_sessions(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.sessions.len();
        tables
            .sessions
            .retain(|s| !(s.user_id == user_id && s.has_expired(now)));
        Ok((before - tables.sessions.len()) as u64)
    }

    async fn lists_for_user(&self, user_id: Uuid) -> Result<Vec<List>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .lists
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_list(&self, list: &List) -> Result<List, AppError> {
        self.tables.write().await.lists.push(list.clone());
        Ok(list.clone())
    }

    async fn find_list(&self, list_id: Uuid, user_id: Uuid) -> Result<Option<List>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .lists
            .iter()
            .find(|l| l.id == list_id && l.user_id == user_id)
            .cloned())
    }

    async fn update_list(
        &self,
        list_id: Uuid,
        user_id: Uuid,
        update: &ListUpdate,
    ) -> Result<Option<List>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(list) = tables
            .lists
            .iter_mut()
            .find(|l| l.id == list_id && l.user_id == user_id)
        else {
            return Ok(None);
        };
        if let Some(title) = &update.title {
            list.title = title.clone();
        }
        Ok(Some(list.clone()))
    }

    async fn delete_list(
        &self,
        list_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<(List, u64)>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(position) = tables
            .lists
            .iter()
            .position(|l| l.id == list_id && l.user_id == user_id)
        else {
            return Ok(None);
        };
        let list = tables.lists.remove(position);
        let before = tables.tasks.len();
        tables.tasks.retain(|t| t.list_id != list_id);
        let removed_tasks = (before - tables.tasks.len()) as u64;
        Ok(Some((list, removed_tasks)))
    }

    async fn tasks_in_list(&self, list_id: Uuid) -> Result<Vec<Task>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .iter()
            .filter(|t| t.list_id == list_id)
            .cloned()
            .collect())
    }

    async fn find_task(&self, task_id: Uuid, list_id: Uuid) -> Result<Option<Task>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .iter()
            .find(|t| t.id == task_id && t.list_id == list_id)
            .cloned())
    }

    async fn insert_task(&self, task: &Task) -> Result<Task, AppError> {
        self.tables.write().await.tasks.push(task.clone());
        Ok(task.clone())
    }

    async fn update_task(
        &self,
        task_id: Uuid,
        list_id: Uuid,
        update: &TaskUpdate,
    ) -> Result<Option<Task>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(task) = tables
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id && t.list_id == list_id)
        else {
            return Ok(None);
        };
        if let Some(title) = &update.title {
            task.title = title.clone();
        }
        if let Some(completed) = update.completed {
            task.completed = completed;
        }
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, task_id: Uuid, list_id: Uuid) -> Result<Option<Task>, AppError> {
        let mut tables = self.tables.write().await;
        let position = tables
            .tasks
            .iter()
            .position(|t| t.id == task_id && t.list_id == list_id);
        Ok(position.map(|index| tables.tasks.remove(index)))
    }
}
