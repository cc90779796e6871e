// csn-service/src/services/mod.rs
pub mod access_guard;
pub mod account_service;
pub mod event_service;
pub mod volunteer_service;
