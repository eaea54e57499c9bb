use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::AppError;

/// A refresh token issued to a user together with the moment it stops working.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Fails when `now + ttl` falls outside the representable date range.
    pub fn new(user_id: Uuid, token: String, ttl: Duration) -> Result<Self, AppError> {
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::InternalServerError("Session lifetime out of range".into()))?;
        Ok(Self {
            user_id,
            token,
            expires_at,
        })
    }

    /// A session is expired from the instant `expires_at` is reached.
    pub fn has_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
