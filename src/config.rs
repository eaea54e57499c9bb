use chrono::{Duration, Utc};
use std::env;
use std::str::FromStr;

use crate::error::AppError;

pub struct Config {
    /// Postgres connection string; the in-memory store is used when absent.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub access_token_ttl_secs: i64,
    pub session_ttl_days: i64,
    pub bcrypt_cost: u32,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| AppError::ConfigError("JWT_SECRET must be set".into()))?;

        let allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:4200".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            server_port: parse_or(&lookup, "SERVER_PORT", 3000)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            jwt_secret,
            access_token_ttl_secs: ttl_or(
                &lookup,
                "ACCESS_TOKEN_TTL_SECS",
                15 * 60,
                Duration::try_seconds,
            )?,
            session_ttl_days: ttl_or(&lookup, "SESSION_TTL_DAYS", 10, Duration::try_days)?,
            bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", 10)?,
            allowed_origins,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::ConfigError(format!("{} must be a number", key))),
        None => Ok(default),
    }
}

/// Parses a lifetime that must be positive and must still yield a valid
/// expiry date when added to the current time.
fn ttl_or<F>(
    lookup: &F,
    key: &str,
    default: i64,
    to_duration: fn(i64) -> Option<Duration>,
) -> Result<i64, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(lookup, key, default)?;
    to_duration(value)
        .filter(|ttl| *ttl > Duration::zero())
        .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
        .map(|_| value)
        .ok_or_else(|| AppError::ConfigError(format!("{} is out of range", key)))
}
