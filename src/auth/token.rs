use crate::auth::AuthSettings;
use crate::error::AppError;
use jsonwebtoken::{decode, encode, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the claims encoded within an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the id of the user it was issued to.
    pub sub: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Generates a signed access token for `user_id`.
///
/// The token expires `settings.access_token_ttl` after issue.
///
/// # Returns
/// The JWT string, or `AppError::InternalServerError` if encoding fails.
pub fn generate_access_token(user_id: Uuid, settings: &AuthSettings) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expiration = now
        .checked_add_signed(settings.access_token_ttl)
        .ok_or_else(|| AppError::InternalServerError("Token expiry out of range".into()))?;

    let claims = Claims {
        sub: user_id,
        iat: now.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    };

    encode(&Header::default(), &claims, &settings.encoding_key)
        .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
}

/// Verifies an access token and decodes its claims.
///
/// Signature and expiry are checked.
/// Returns `AppError::Unauthorized` if the token is malformed, its signature
/// is invalid, or it has expired.
pub fn verify_access_token(token: &str, settings: &AuthSettings) -> Result<Claims, AppError> {
    let data = decode::<Claims>(token, &settings.decoding_key, &Validation::default())?;
    Ok(data.claims)
}
