pub mod health;
pub mod lists;
pub mod tasks;
pub mod users;

use actix_web::{
    error::{JsonPayloadError, PathError},
    web, HttpRequest,
};

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Mounts every route: `/health`, the public `/users` scope and the
/// access-token protected `/lists` scope (lists and their tasks).
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(health::health)
        .service(
            web::scope("/users")
                .service(users::signup)
                .service(users::login)
                .service(users::refresh_access_token)
                .service(users::end_session),
        )
        .service(
            web::scope("/lists")
                .wrap(AuthMiddleware)
                .service(lists::get_lists)
                .service(lists::create_list)
                .service(lists::update_list)
                .service(lists::delete_list)
                .service(tasks::get_tasks)
                .service(tasks::get_task)
                .service(tasks::create_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}

/// Renders JSON body errors (missing fields, bad syntax) as `AppError::BadRequest`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        AppError::BadRequest(err.to_string()).into()
    })
}

/// Renders unparsable path segments (such as a malformed id) as `AppError::NotFound`.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, _req: &HttpRequest| {
        AppError::NotFound(err.to_string()).into()
    })
}
