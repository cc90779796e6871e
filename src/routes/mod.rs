// src/routes/mod.rs
pub mod account_routes;
pub mod auth_routes;
pub mod event_routes;
pub mod volunteer_routes;

use crate::models::ServiceError;
use actix_web::{error, web};

// Malformed bodies and query strings surface as validation errors
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        error::Error::from(ServiceError::Validation(format!("Invalid request body: {}", err)))
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        error::Error::from(ServiceError::Validation(format!("Invalid query: {}", err)))
    })
}

// Mount every resource under /api
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(
            web::scope("/api")
                .configure(auth_routes::init_routes)
                .configure(event_routes::init_routes)
                .configure(volunteer_routes::init_routes)
                .configure(account_routes::init_routes),
        );
}
