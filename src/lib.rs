// csn-service/src/lib.rs
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

#[cfg(test)]
mod tests;

use config::AppConfig;
use models::ServiceError;
use utils::DocumentStore;

// Shared with every handler through web::Data
pub struct AppState {
    pub config: AppConfig,
    pub store: DocumentStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, ServiceError> {
        let store = DocumentStore::open(config.storage_dir.clone())?;
        Ok(Self { config, store })
    }
}
