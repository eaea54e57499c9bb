use actix_web::{middleware::Logger, web, App, HttpServer};
use std::io;

use tasklists::{auth::AuthSettings, config::Config, cors::cors, routes, store, AppError};

fn to_io_error(error: AppError) -> io::Error {
    io::Error::new(io::ErrorKind::Other, error.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(to_io_error)?;
    let store = web::Data::from(store::connect(&config).await.map_err(to_io_error)?);
    let settings = web::Data::new(AuthSettings::from_config(&config).map_err(to_io_error)?);
    let allowed_origins = config.allowed_origins.clone();

    log::info!("Starting server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(settings.clone())
            .wrap(cors(&allowed_origins))
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
