//! Persistence for users, sessions, lists and tasks.
//!
//! Handlers only ever see `web::Data<dyn Store>`; `PgStore` backs a real
//! deployment and `MemoryStore` is used when no database is configured.
//! Every lookup that touches a list or a task carries the id of the owning
//! user or list so a caller can never reach another user's rows.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;
use crate::models::{List, ListUpdate, Session, Task, TaskUpdate, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Fails with `AppError::BadRequest` when the email is already registered.
    async fn insert_user(&self, user: &User) -> Result<User, AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, AppError>;

    async fn insert_session(&self, session: &Session) -> Result<(), AppError>;
    async fn find_session(&self, user_id: Uuid, token: &str) -> Result<Option<Session>, AppError>;
    /// Returns whether a session was removed.
    async fn delete_session(&self, user_id: Uuid, token: &str) -> Result<bool, AppError>;
    /// Removes every session of `user_id` that has expired at `now`.
    async fn delete_expired_sessions(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError>;

    async fn lists_for_user(&self, user_id: Uuid) -> Result<Vec<List>, AppError>;
    async fn insert_list(&self, list: &List) -> Result<List, AppError>;
    async fn find_list(&self, list_id: Uuid, user_id: Uuid) -> Result<Option<List>, AppError>;
    async fn update_list(
        &self,
        list_id: Uuid,
        user_id: Uuid,
        update: &ListUpdate,
    ) -> Result<Option<List>, AppError>;
    /// Removes the list and all of its tasks, returning the list and the
    /// number of tasks removed with it.
    async fn delete_list(
        &self,
        list_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<(List, u64)>, AppError>;

    async fn tasks_in_list(&self, list_id: Uuid) -> Result<Vec<Task>, AppError>;
    async fn find_task(&self, task_id: Uuid, list_id: Uuid) -> Result<Option<Task>, AppError>;
    async fn insert_task(&self, task: &Task) -> Result<Task, AppError>;
    async fn update_task(
        &self,
        task_id: Uuid,
        list_id: Uuid,
        update: &TaskUpdate,
    ) -> Result<Option<Task>, AppError>;
    async fn delete_task(&self, task_id: Uuid, list_id: Uuid) -> Result<Option<Task>, AppError>;
}

/// Opens the store selected by `config`, running migrations for Postgres.
pub async fn connect(config: &Config) -> Result<Arc<dyn Store>, AppError> {
    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, config.database_max_connections).await?;
            store.migrate().await?;
            log::info!("Connected to Postgres");
            Ok(Arc::new(store))
        }
        None => {
            log::warn!("DATABASE_URL is not set; data is kept in memory and lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
