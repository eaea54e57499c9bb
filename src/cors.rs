use actix_cors::Cors;

use crate::auth::{ACCESS_TOKEN_HEADER, REFRESH_TOKEN_HEADER, USER_ID_HEADER};

const ALLOWED_METHODS: [&str; 7] = ["GET", "POST", "HEAD", "OPTIONS", "PUT", "PATCH", "DELETE"];

/// Builds the CORS policy for the single-page frontend.
///
/// The token headers are exposed so the browser client can read freshly
/// issued tokens. An origin of `*` allows any origin.
pub fn cors(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(ALLOWED_METHODS)
        .allowed_headers([
            "Origin",
            "X-Requested-With",
            "Content-Type",
            "Accept",
            ACCESS_TOKEN_HEADER,
            REFRESH_TOKEN_HEADER,
            USER_ID_HEADER,
        ])
        .expose_headers([ACCESS_TOKEN_HEADER, REFRESH_TOKEN_HEADER])
        .max_age(3600);

    for origin in allowed_origins {
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else {
            cors = cors.allowed_origin(origin);
        }
    }
    cors
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::header, test, web, App, HttpResponse};

    #[actix_rt::test]
    async fn test_preflight_from_allowed_origin() {
        let app = test::init_service(
            App::new()
                .wrap(cors(&["http://localhost:4200".to_string()]))
                .route("/lists", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/lists")
            .insert_header((header::ORIGIN, "http://localhost:4200"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "x-access-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("http://localhost:4200")
        );
    }

    #[actix_rt::test]
    async fn test_token_headers_are_exposed() {
        let app = test::init_service(
            App::new()
                .wrap(cors(&["http://localhost:4200".to_string()]))
                .route("/lists", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/lists")
            .insert_header((header::ORIGIN, "http://localhost:4200"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        let exposed = resp
            .headers()
            .get(header::ACCESS_CONTROL_EXPOSE_HEADERS)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        assert!(exposed.contains(ACCESS_TOKEN_HEADER));
        assert!(exposed.contains(REFRESH_TOKEN_HEADER));
    }
}
