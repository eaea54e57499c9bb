pub mod extractors;
pub mod middleware;
pub mod password;
pub mod session;
pub mod token;

use chrono::Duration;
use jsonwebtoken::{DecodingKey, EncodingKey};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::Config;
use crate::error::AppError;

// Re-export necessary items
pub use extractors::{AuthenticatedUserId, VerifiedSession};
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use session::{generate_refresh_token, issue_tokens, AuthTokens};
pub use token::{generate_access_token, verify_access_token, Claims};

/// Header carrying the short-lived JWT, in requests and in responses.
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";
/// Header carrying the refresh token of a session.
pub const REFRESH_TOKEN_HEADER: &str = "x-refresh-token";
/// Header naming the user a refresh token belongs to.
pub const USER_ID_HEADER: &str = "_id";

/// Signing keys and lifetimes shared by every auth operation.
#[derive(Clone)]
pub struct AuthSettings {
    pub encoding_key: EncodingKey,
    pub decoding_key: DecodingKey,
    pub access_token_ttl: Duration,
    pub session_ttl: Duration,
    pub bcrypt_cost: u32,
}

impl AuthSettings {
    pub fn new(
        secret: &str,
        access_token_ttl: Duration,
        session_ttl: Duration,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_ttl,
            session_ttl,
            bcrypt_cost,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let access_token_ttl = Duration::try_seconds(config.access_token_ttl_secs)
            .ok_or_else(|| AppError::ConfigError("ACCESS_TOKEN_TTL_SECS is out of range".into()))?;
        let session_ttl = Duration::try_days(config.session_ttl_days)
            .ok_or_else(|| AppError::ConfigError("SESSION_TTL_DAYS is out of range".into()))?;

        Ok(Self::new(
            &config.jwt_secret,
            access_token_ttl,
            session_ttl,
            config.bcrypt_cost,
        ))
    }
}

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address.
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Represents the payload for a signup request.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Email address for the new account. Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// Password for the new account.
    /// Must be at least 8 characters long.
    #[validate(length(min = 8))]
    pub password: String,
}

/// Body returned by the access-token refresh endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_login_request_validation() {
        let valid_login = LoginRequest {
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid_login.validate().is_ok());

        let invalid_email_login = LoginRequest {
            email: "testexample.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(invalid_email_login.validate().is_err());
    }

    #[test]
    fn test_signup_request_validation() {
        let valid_signup = SignupRequest {
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid_signup.validate().is_ok());

        let short_password = SignupRequest {
            email: "test@example.com".to_string(),
            password: "1234567".to_string(),
        };
        assert!(short_password.validate().is_err());

        let invalid_email = SignupRequest {
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
        };
        assert!(invalid_email.validate().is_err());
    }

    #[test]
    fn test_settings_from_config() {
        let config = Config::from_lookup(|key| match key {
            "JWT_SECRET" => Some("secret".to_string()),
            "ACCESS_TOKEN_TTL_SECS" => Some("60".to_string()),
            _ => None,
        })
        .unwrap();
        let settings = AuthSettings::from_config(&config).unwrap();

        assert_eq!(settings.access_token_ttl, Duration::seconds(60));
        assert_eq!(settings.session_ttl, Duration::days(10));
        assert_eq!(settings.bcrypt_cost, 10);
    }

    #[test]
    fn test_settings_from_config_rejects_unrepresentable_ttl() {
        let mut config = Config::from_lookup(|key| match key {
            "JWT_SECRET" => Some("secret".to_string()),
            _ => None,
        })
        .unwrap();
        config.access_token_ttl_secs = i64::MAX;

        assert!(matches!(
            AuthSettings::from_config(&config),
            Err(AppError::ConfigError(_))
        ));
    }
}
