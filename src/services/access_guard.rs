// csn-service/src/services/access_guard.rs
use crate::models::{Account, Actor, ActorKind, ServiceError};
use crate::utils::jwt;
use crate::AppState;
use log::{debug, warn};

// Resolve an Authorization header value back to a live account
pub fn authenticate(state: &AppState, auth_header: Option<&str>) -> Result<Actor, ServiceError> {
    let auth_header = auth_header.ok_or(ServiceError::Unauthenticated)?;
    let token = jwt::extract_token_from_header(auth_header)?;
    let claims = jwt::decode_token(&token, &state.config.jwt_secret)?;

    let account: Account = state
        .store
        .get(claims.kind.collection(), &claims.sub)?
        .ok_or_else(|| {
            debug!("Token refers to missing {} {}", claims.kind, claims.sub);
            ServiceError::Unauthenticated
        })?;

    if account.kind() != claims.kind {
        warn!("⚠️ Token kind {} does not match stored account {}", claims.kind, account.id);
        return Err(ServiceError::Unauthenticated);
    }

    Ok(Actor {
        kind: claims.kind,
        account,
    })
}

pub fn require_role(actor: &Actor, allowed: &[ActorKind]) -> Result<(), ServiceError> {
    if allowed.contains(&actor.kind) {
        return Ok(());
    }

    debug!("{} {} denied, needs one of {:?}", actor.kind, actor.id(), allowed);
    Err(ServiceError::Forbidden(format!(
        "Access denied for {} accounts",
        actor.kind
    )))
}

// The account itself, or any admin
pub fn require_self_or_admin(actor: &Actor, kind: ActorKind, id: &str) -> Result<(), ServiceError> {
    if actor.kind == ActorKind::Admin || actor.is(kind, id) {
        return Ok(());
    }

    Err(ServiceError::Forbidden(
        "Not authorized to access this account".to_string(),
    ))
}
