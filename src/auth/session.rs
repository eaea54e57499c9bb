use chrono::Utc;
use rand::RngCore;

use crate::auth::{token::generate_access_token, AuthSettings};
use crate::error::AppError;
use crate::models::{Session, User};
use crate::store::Store;

/// Number of random bytes in a refresh token before hex encoding.
const REFRESH_TOKEN_BYTES: usize = 64;

/// The pair of credentials handed to a client after signup or login.
#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Returns a new refresh token: 64 random bytes as lowercase hex.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Opens a new session for `user` and mints an access token for it.
///
/// Sessions of `user` that have already expired are removed first.
pub async fn issue_tokens(
    store: &dyn Store,
    user: &User,
    settings: &AuthSettings,
) -> Result<AuthTokens, AppError> {
    let pruned = store.delete_expired_sessions(user.id, Utc::now()).await?;
    if pruned > 0 {
        log::debug!("Pruned {} expired sessions for user {}", pruned, user.id);
    }

    let session = Session::new(user.id, generate_refresh_token(), settings.session_ttl)?;
    store.insert_session(&session).await?;

    let access_token = generate_access_token(user.id, settings)?;
    Ok(AuthTokens {
        access_token,
        refresh_token: session.token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_access_token;
    use crate::store::MemoryStore;
    use chrono::Duration;

    #[test]
    fn test_refresh_tokens_are_long_and_unique() {
        let first = generate_refresh_token();
        let second = generate_refresh_token();

        assert_eq!(first.len(), 128);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }

    #[actix_rt::test]
    async fn test_issue_tokens_stores_session_and_prunes_expired() {
        let store = MemoryStore::new();
        let settings = AuthSettings::new("secret", Duration::minutes(15), Duration::days(10), 4);
        let user = store
            .insert_user(&User::new("tokens@example.com", "hash".into()))
            .await
            .unwrap();
        store
            .insert_session(&Session::new(user.id, "old".into(), Duration::seconds(-5)).unwrap())
            .await
            .unwrap();

        let tokens = issue_tokens(&store, &user, &settings).await.unwrap();

        let session = store
            .find_session(user.id, &tokens.refresh_token)
            .await
            .unwrap()
            .expect("session should be stored");
        assert!(!session.has_expired(Utc::now()));
        assert!(store.find_session(user.id, "old").await.unwrap().is_none());

        let claims = verify_access_token(&tokens.access_token, &settings).unwrap();
        assert_eq!(claims.sub, user.id);
    }
}
