use crate::models::{Actor, ActorKind, Claims, ServiceError};
use actix_web::{HttpMessage, HttpRequest};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use lazy_static::lazy_static;
use log::{debug, error};
use regex::Regex;

pub mod document_store;
pub use document_store::DocumentStore;

// JWT utility functions
pub mod jwt {
    use super::*;

    // Tokens are valid for one hour
    pub const TOKEN_TTL_SECS: i64 = 3600;

    // Generate a token embedding the actor kind and id
    pub fn generate_token(kind: ActorKind, id: &str, secret: &str) -> Result<String, ServiceError> {
        generate_token_with_ttl(kind, id, secret, Duration::seconds(TOKEN_TTL_SECS))
    }

    pub(crate) fn generate_token_with_ttl(
        kind: ActorKind,
        id: &str,
        secret: &str,
        ttl: Duration,
    ) -> Result<String, ServiceError> {
        let now = Utc::now();
        let claims = Claims {
            sub: id.to_string(),
            kind,
            exp: (now + ttl).timestamp().max(0) as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .map_err(|e| {
            error!("❌ Failed to sign token: {:?}", e);
            ServiceError::Unexpected
        })
    }

    // Validate signature and expiry, returning the embedded claims
    pub fn decode_token(token: &str, secret: &str) -> Result<Claims, ServiceError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &DecodingKey::from_secret(secret.as_ref()), &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Token rejected: {:?}", e);
                ServiceError::Unauthenticated
            })
    }

    // Extract JWT from Authorization header
    pub fn extract_token_from_header(auth_header: &str) -> Result<String, ServiceError> {
        match auth_header.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(ServiceError::Unauthenticated),
        }
    }
}

// Password utility functions
pub mod password {
    use super::*;

    // Hash a password using bcrypt
    pub fn hash_password(password: &str) -> Result<String, ServiceError> {
        hash(password, DEFAULT_COST).map_err(|e| {
            error!("❌ Failed to hash password: {:?}", e);
            ServiceError::Unexpected
        })
    }

    // Verify a password against a hash
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServiceError> {
        verify(password, hash).map_err(|e| {
            error!("❌ Failed to verify password: {:?}", e);
            ServiceError::Unexpected
        })
    }
}

// Input validation helpers
pub mod validation {
    use super::*;

    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    }

    pub fn normalize_email(email: &str) -> Result<String, ServiceError> {
        let email = email.trim().to_lowercase();
        if !EMAIL_RE.is_match(&email) {
            return Err(ServiceError::Validation("Invalid email format".to_string()));
        }
        Ok(email)
    }

    // A present, non-blank string field
    pub fn required(value: Option<&String>, field: &str) -> Result<String, ServiceError> {
        match value.map(|v| v.trim()) {
            Some(v) if !v.is_empty() => Ok(v.to_string()),
            _ => Err(ServiceError::Validation(format!("{} is required", field))),
        }
    }

    // Partial updates ignore blank strings
    pub fn present(value: &Option<String>) -> Option<String> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

// Actor resolved by the authentication middleware, if any
pub fn current_actor(req: &HttpRequest) -> Result<Actor, ServiceError> {
    req.extensions()
        .get::<Actor>()
        .cloned()
        .ok_or(ServiceError::Unauthenticated)
}

// Middleware resolving bearer tokens into request identities
pub mod auth_middleware {
    use crate::services::access_guard;
    use crate::AppState;
    use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
    use actix_web::http::header;
    use actix_web::{web, Error, HttpMessage};
    use futures::future::{ok, Ready};
    use log::debug;
    use std::future::Future;
    use std::pin::Pin;

    // Attaches an `Actor` to requests carrying a valid token. Requests without
    // one pass through untouched; handlers that need identity reject them.
    pub struct Authentication;

    impl<S, B> Transform<S, ServiceRequest> for Authentication
    where
        S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
        S::Future: 'static,
        B: 'static,
    {
        type Response = ServiceResponse<B>;
        type Error = Error;
        type Transform = AuthenticationMiddleware<S>;
        type InitError = ();
        type Future = Ready<Result<Self::Transform, Self::InitError>>;

        fn new_transform(&self, service: S) -> Self::Future {
            ok(AuthenticationMiddleware { service })
        }
    }

    pub struct AuthenticationMiddleware<S> {
        service: S,
    }

    impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
    where
        S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
        S::Future: 'static,
        B: 'static,
    {
        type Response = ServiceResponse<B>;
        type Error = Error;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

        forward_ready!(service);

        fn call(&self, req: ServiceRequest) -> Self::Future {
            let auth_header = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);

            if let (Some(auth_header), Some(state)) = (auth_header, req.app_data::<web::Data<AppState>>()) {
                match access_guard::authenticate(state, Some(auth_header.as_str())) {
                    Ok(actor) => {
                        debug!("🔐 Authenticated {} {}", actor.kind, actor.id());
                        req.extensions_mut().insert(actor);
                    }
                    Err(e) => debug!("Ignoring invalid credentials on {}: {}", req.path(), e),
                }
            }

            let fut = self.service.call(req);
            Box::pin(async move { fut.await })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trips_actor_reference() {
        let token = jwt::generate_token(ActorKind::Organization, "org-7", SECRET).unwrap();
        let claims = jwt::decode_token(&token, SECRET).unwrap();
        assert_eq!(claims.kind, ActorKind::Organization);
        assert_eq!(claims.sub, "org-7");
        assert_eq!(claims.exp - claims.iat, jwt::TOKEN_TTL_SECS as usize);
    }

    #[test]
    fn expired_or_foreign_tokens_are_rejected() {
        let expired =
            jwt::generate_token_with_ttl(ActorKind::User, "u-1", SECRET, Duration::seconds(-30)).unwrap();
        assert_eq!(jwt::decode_token(&expired, SECRET), Err(ServiceError::Unauthenticated));

        let foreign = jwt::generate_token(ActorKind::User, "u-1", "other-secret").unwrap();
        assert_eq!(jwt::decode_token(&foreign, SECRET), Err(ServiceError::Unauthenticated));

        assert_eq!(jwt::decode_token("not-a-jwt", SECRET), Err(ServiceError::Unauthenticated));
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(jwt::extract_token_from_header("Bearer abc").unwrap(), "abc");
        assert!(jwt::extract_token_from_header("Token abc").is_err());
        assert!(jwt::extract_token_from_header("Bearer ").is_err());
    }

    #[test]
    fn emails_are_normalized_and_checked() {
        assert_eq!(
            validation::normalize_email("  Ada@Example.ORG ").unwrap(),
            "ada@example.org"
        );
        assert!(validation::normalize_email("not-an-email").is_err());
        assert!(validation::normalize_email("a@b").is_err());
    }

    #[test]
    fn passwords_verify_against_their_hash() {
        let hashed = password::hash_password("s3cret!").unwrap();
        assert_ne!(hashed, "s3cret!");
        assert!(password::verify_password("s3cret!", &hashed).unwrap());
        assert!(!password::verify_password("wrong", &hashed).unwrap());
    }
}
