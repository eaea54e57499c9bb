#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use chrono::Duration;
use serde_json::json;
use std::sync::Arc;
use tasklists::auth::{AuthSettings, ACCESS_TOKEN_HEADER, REFRESH_TOKEN_HEADER};
use tasklists::cors::cors;
use tasklists::routes;
use tasklists::store::{MemoryStore, Store};
use uuid::Uuid;

pub const FRONTEND_ORIGIN: &str = "http://localhost:4200";

// Helper struct to hold auth details
pub struct TestUser {
    pub id: Uuid,
    pub access_token: String,
    pub refresh_token: String,
}

/// Minimum bcrypt cost keeps the suite fast.
pub fn settings() -> AuthSettings {
    AuthSettings::new(
        "integration-test-secret",
        Duration::minutes(15),
        Duration::days(10),
        4,
    )
}

pub fn memory_store() -> Arc<dyn Store> {
    Arc::new(MemoryStore::new())
}

pub async fn init_app(
    store: Arc<dyn Store>,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(web::Data::from(store))
            .app_data(web::Data::new(settings()))
            .wrap(cors(&[FRONTEND_ORIGIN.to_string()]))
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await
}

fn header(resp: &ServiceResponse<impl MessageBody>, name: &str) -> Option<String> {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Signs a user up (or logs in with `path = "/users/login"`) and returns the
/// issued credentials.
pub async fn authenticate(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    path: &str,
    email: &str,
    password: &str,
) -> Result<TestUser, String> {
    let req = test::TestRequest::post()
        .uri(path)
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let access_token = header(&resp, ACCESS_TOKEN_HEADER);
    let refresh_token = header(&resp, REFRESH_TOKEN_HEADER);
    let body = test::read_body(resp).await;

    if !status.is_success() {
        return Err(format!(
            "Failed to authenticate at {}. Status: {}. Body: {}",
            path,
            status,
            String::from_utf8_lossy(&body)
        ));
    }

    let user: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| format!("Failed to parse user body: {}", e))?;
    let id = user["_id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .ok_or_else(|| format!("User body without _id: {}", user))?;

    Ok(TestUser {
        id,
        access_token: access_token.ok_or("missing x-access-token header")?,
        refresh_token: refresh_token.ok_or("missing x-refresh-token header")?,
    })
}

pub async fn signup(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
) -> TestUser {
    authenticate(app, "/users", email, "Password123!")
        .await
        .unwrap_or_else(|e| panic!("{}", e))
}
