// csn-service/src/models/mod.rs
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derive_more::Display;
use serde_json::json;

pub mod account;
pub use account::*;

pub mod event;
pub use event::*;

pub mod volunteer;
pub use volunteer::*;

// Errors surfaced by services and handlers
#[derive(Debug, Display, PartialEq)]
pub enum ServiceError {
    #[display(fmt = "{}", _0)]
    Validation(String),
    #[display(fmt = "Email already registered")]
    DuplicateEmail,
    #[display(fmt = "{}", _0)]
    NotFound(String),
    #[display(fmt = "Invalid password")]
    InvalidCredential,
    #[display(fmt = "Token is not valid")]
    Unauthenticated,
    #[display(fmt = "{}", _0)]
    Forbidden(String),
    #[display(fmt = "Volunteer already assigned to this event")]
    AlreadyAssigned,
    #[display(fmt = "Event is full")]
    EventFull,
    #[display(fmt = "Server error")]
    Unexpected,
}

impl std::error::Error for ServiceError {}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_)
            | ServiceError::DuplicateEmail
            | ServiceError::InvalidCredential
            | ServiceError::AlreadyAssigned
            | ServiceError::EventFull => StatusCode::BAD_REQUEST,
            ServiceError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Unexpected displays a fixed message, so nothing internal leaks here
        HttpResponse::build(self.status_code()).json(json!({ "msg": self.to_string() }))
    }
}
