use actix_web::dev::Payload;
use actix_web::{web, Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use chrono::Utc;
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::{Claims, REFRESH_TOKEN_HEADER, USER_ID_HEADER};
use crate::error::AppError;
use crate::models::User;
use crate::store::Store;

/// Extracts the authenticated user's ID from request extensions.
///
/// Intended for routes behind `AuthMiddleware`, which validates the access
/// token and inserts its `Claims`. Without them the extractor fails with
/// `AppError::Unauthorized`.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUserId(pub Uuid);

impl FromRequest for AuthenticatedUserId {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(AuthenticatedUserId(claims.sub))),
            None => {
                let err = AppError::Unauthorized(
                    "User ID not found in request. Ensure AuthMiddleware is active.".to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}

/// A live session proven by the `x-refresh-token` and `_id` headers.
#[derive(Debug, Clone)]
pub struct VerifiedSession {
    pub user: User,
    pub refresh_token: String,
}

fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .filter(|value| !value.is_empty())
}

impl FromRequest for VerifiedSession {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let store = req.app_data::<web::Data<dyn Store>>().cloned();
        let refresh_token = header_value(req, REFRESH_TOKEN_HEADER);
        let user_id = header_value(req, USER_ID_HEADER);

        Box::pin(async move {
            let store = store
                .ok_or_else(|| AppError::InternalServerError("Store not configured".into()))?;

            let (Some(refresh_token), Some(user_id)) = (refresh_token, user_id) else {
                return Err(AppError::Unauthorized(
                    "Missing refresh token or user id".into(),
                )
                .into());
            };
            let user_id = Uuid::parse_str(&user_id)
                .map_err(|_| AppError::Unauthorized("Malformed user id".into()))?;

            let not_found = || {
                AppError::Unauthorized(
                    "User not found. Make sure that the refresh token and user id are correct"
                        .into(),
                )
            };
            let session = store
                .find_session(user_id, &refresh_token)
                .await?
                .ok_or_else(not_found)?;
            let user = store
                .find_user_by_id(user_id)
                .await?
                .ok_or_else(not_found)?;

            if session.has_expired(Utc::now()) {
                return Err(AppError::Unauthorized(
                    "Refresh token has expired or the session is invalid.".into(),
                )
                .into());
            }

            Ok::<_, ActixError>(VerifiedSession {
                user,
                refresh_token,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Session;
    use crate::store::MemoryStore;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::Duration;
    use std::sync::Arc;

    #[actix_rt::test]
    async fn test_authenticated_user_id_extractor_success() {
        let req = test::TestRequest::default().to_http_request();
        let user_id = Uuid::new_v4();
        req.extensions_mut().insert(Claims {
            sub: user_id,
            iat: 0,
            exp: 0,
        });

        let mut payload = Payload::None;
        let extracted_id = AuthenticatedUserId::from_request(&req, &mut payload).await;
        assert_eq!(extracted_id.unwrap().0, user_id);
    }

    #[actix_rt::test]
    async fn test_authenticated_user_id_extractor_failure() {
        let req = test::TestRequest::default().to_http_request();

        let mut payload = Payload::None;
        let err = AuthenticatedUserId::from_request(&req, &mut payload)
            .await
            .unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    async fn seeded_store(ttl: Duration) -> (web::Data<dyn Store>, User, String) {
        let store = MemoryStore::new();
        let user = store
            .insert_user(&User::new("session@example.com", "hash".into()))
            .await
            .unwrap();
        let token = "refresh".to_string();
        store
            .insert_session(&Session::new(user.id, token.clone(), ttl).unwrap())
            .await
            .unwrap();
        let store: Arc<dyn Store> = Arc::new(store);
        (web::Data::from(store), user, token)
    }

    async fn extract(
        store: web::Data<dyn Store>,
        headers: &[(&str, String)],
    ) -> Result<VerifiedSession, ActixError> {
        let mut request = test::TestRequest::default().app_data(store);
        for (name, value) in headers {
            request = request.insert_header((*name, value.clone()));
        }
        let req = request.to_http_request();
        VerifiedSession::from_request(&req, &mut Payload::None).await
    }

    #[actix_rt::test]
    async fn test_verified_session_success() {
        let (store, user, token) = seeded_store(Duration::days(1)).await;

        let session = extract(
            store,
            &[
                (REFRESH_TOKEN_HEADER, token.clone()),
                (USER_ID_HEADER, user.id.to_string()),
            ],
        )
        .await
        .unwrap();

        assert_eq!(session.user.id, user.id);
        assert_eq!(session.refresh_token, token);
    }

    #[actix_rt::test]
    async fn test_verified_session_rejections() {
        let (store, user, token) = seeded_store(Duration::days(1)).await;

        let cases = vec![
            (vec![], "no headers"),
            (vec![(REFRESH_TOKEN_HEADER, token.clone())], "missing user id"),
            (
                vec![
                    (REFRESH_TOKEN_HEADER, token.clone()),
                    (USER_ID_HEADER, "not-a-uuid".to_string()),
                ],
                "malformed user id",
            ),
            (
                vec![
                    (REFRESH_TOKEN_HEADER, "wrong".to_string()),
                    (USER_ID_HEADER, user.id.to_string()),
                ],
                "unknown token",
            ),
            (
                vec![
                    (REFRESH_TOKEN_HEADER, token.clone()),
                    (USER_ID_HEADER, Uuid::new_v4().to_string()),
                ],
                "token of another user",
            ),
        ];

        for (headers, description) in cases {
            let err = extract(store.clone(), &headers).await.unwrap_err();
            assert_eq!(
                err.error_response().status(),
                StatusCode::UNAUTHORIZED,
                "case: {}",
                description
            );
        }
    }

    #[actix_rt::test]
    async fn test_expired_session_is_rejected() {
        let (store, user, token) = seeded_store(Duration::seconds(-1)).await;

        let err = extract(
            store,
            &[
                (REFRESH_TOKEN_HEADER, token),
                (USER_ID_HEADER, user.id.to_string()),
            ],
        )
        .await
        .unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }
}
