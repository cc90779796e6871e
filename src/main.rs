//Third-party-dependencies
use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{error, info};

// Crate imports:
use csn_service::config::AppConfig;
use csn_service::services::account_service;
use csn_service::utils::auth_middleware::Authentication;
use csn_service::{routes, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(|e| {
        error!("❌ Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let state = AppState::new(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    if let Some(bootstrap) = state.config.admin.clone() {
        account_service::ensure_admin(&state, &bootstrap)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    }

    let address = state.config.bind_address();
    let allowed_origin = state.config.allowed_origin.clone();
    let state = web::Data::new(state);

    info!("Server started at {}", address);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&allowed_origin)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .app_data(state.clone())
            .wrap(Authentication)
            .wrap(cors)
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .bind(address)?
    .run()
    .await
}
