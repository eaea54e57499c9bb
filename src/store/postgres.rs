use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::Store;
use crate::error::AppError;
use crate::models::{normalize_email, List, ListUpdate, Session, Task, TaskUpdate, User};

const USER_COLUMNS: &str = "id, email, password_hash, created_at";
const LIST_COLUMNS: &str = "id, title, user_id, created_at";
const TASK_COLUMNS: &str = "id, title, list_id, completed, created_at";

/// `Store` backed by a Postgres connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations under `migrations/`.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: &User) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, email, password_hash, created_at) VALUES ($1, $2, $3, $4) \
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::BadRequest(_) => AppError::BadRequest("Email already registered".into()),
            other => other,
        })
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_session(&self, session: &Session) -> Result<(), AppError> {
        sqlx::query("INSERT INTO sessions (user_id, token, expires_at) VALUES ($1, $2, $3)")
            .bind(session.user_id)
            .bind(&session.token)
            .bind(session.expires_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_session(&self, user_id: Uuid, token: &str) -> Result<Option<Session>, AppError> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT user_id, token, expires_at FROM sessions WHERE user_id = $1 AND token = $2",
        )
        .bind(user_id)
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    async fn delete_session(&self, user_id: Uuid, token: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1 AND token = $2")
            .bind(user_id)
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired_sessions(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1 AND expires_at <= $2")
            .bind(user_id)
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn lists_for_user(&self, user_id: Uuid) -> Result<Vec<List>, AppError> {
        let lists = sqlx::query_as::<_, List>(&format!(
            "SELECT {} FROM lists WHERE user_id = $1 ORDER BY created_at, id",
            LIST_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(lists)
    }

    async fn insert_list(&self, list: &List) -> Result<List, AppError> {
        let list = sqlx::query_as::<_, List>(&format!(
            "INSERT INTO lists (id, title, user_id, created_at) VALUES ($1, $2, $3, $4) \
             RETURNING {}",
            LIST_COLUMNS
        ))
        .bind(list.id)
        .bind(&list.title)
        .bind(list.user_id)
        .bind(list.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(list)
    }

    async fn find_list(&self, list_id: Uuid, user_id: Uuid) -> Result<Option<List>, AppError> {
        let list = sqlx::query_as::<_, List>(&format!(
            "SELECT {} FROM lists WHERE id = $1 AND user_id = $2",
            LIST_COLUMNS
        ))
        .bind(list_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(list)
    }

    async fn update_list(
        &self,
        list_id: Uuid,
        user_id: Uuid,
        update: &ListUpdate,
    ) -> Result<Option<List>, AppError> {
        let list = sqlx::query_as::<_, List>(&format!(
            "UPDATE lists SET title = COALESCE($1, title) WHERE id = $2 AND user_id = $3 \
             RETURNING {}",
            LIST_COLUMNS
        ))
        .bind(&update.title)
        .bind(list_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(list)
    }

    async fn delete_list(
        &self,
        list_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<(List, u64)>, AppError> {
        let mut tx = self.pool.begin().await?;

        let list = sqlx::query_as::<_, List>(&format!(
            "SELECT {} FROM lists WHERE id = $1 AND user_id = $2 FOR UPDATE",
            LIST_COLUMNS
        ))
        .bind(list_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(list) = list else {
            return Ok(None);
        };

        let removed_tasks = sqlx::query("DELETE FROM tasks WHERE list_id = $1")
            .bind(list_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM lists WHERE id = $1")
            .bind(list_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some((list, removed_tasks)))
    }

    async fn tasks_in_list(&self, list_id: Uuid) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE list_id = $1 ORDER BY created_at, id",
            TASK_COLUMNS
        ))
        .bind(list_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn find_task(&self, task_id: Uuid, list_id: Uuid) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1 AND list_id = $2",
            TASK_COLUMNS
        ))
        .bind(task_id)
        .bind(list_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn insert_task(&self, task: &Task) -> Result<Task, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (id, title, list_id, completed, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(task.id)
        .bind(&task.title)
        .bind(task.list_id)
        .bind(task.completed)
        .bind(task.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(task)
    }

    async fn update_task(
        &self,
        task_id: Uuid,
        list_id: Uuid,
        update: &TaskUpdate,
    ) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET title = COALESCE($1, title), completed = COALESCE($2, completed) \
             WHERE id = $3 AND list_id = $4 RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(&update.title)
        .bind(update.completed)
        .bind(task_id)
        .bind(list_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn delete_task(&self, task_id: Uuid, list_id: Uuid) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "DELETE FROM tasks WHERE id = $1 AND list_id = $2 RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(task_id)
        .bind(list_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }
}
