#![doc = "The `tasklists` library crate."]
#![doc = ""]
#![doc = "Models, persistence, authentication, routing and error handling for the task"]
#![doc = "list API. The binary (`main.rs`) reads the configuration, opens the store and"]
#![doc = "serves `routes::config` behind the CORS policy from `cors`."]

pub mod auth;
pub mod config;
pub mod cors;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

pub use crate::error::AppError;
