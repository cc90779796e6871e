use crate::models::{ActorKind, PublicAccount, ServiceError};
use crate::services::access_guard::require_role;
use crate::services::account_service;
use crate::utils::current_actor;
use crate::AppState;
use actix_web::{delete, get, web, HttpRequest, HttpResponse};
use log::{error, info};
use serde_json::json;

fn parse_kind(kind: &str) -> Result<ActorKind, ServiceError> {
    kind.parse::<ActorKind>().map_err(|e| {
        error!("❌ {}", e);
        ServiceError::Validation(e)
    })
}

#[get("/users/profile")]
async fn user_profile(req: HttpRequest) -> Result<HttpResponse, ServiceError> {
    let actor = current_actor(&req)?;
    require_role(&actor, &[ActorKind::User])?;

    Ok(HttpResponse::Ok().json(json!({
        "msg": "Welcome to the user profile",
        "user": actor.account.public()
    })))
}

#[get("/organizations/profile")]
async fn organization_profile(req: HttpRequest) -> Result<HttpResponse, ServiceError> {
    let actor = current_actor(&req)?;
    require_role(&actor, &[ActorKind::Organization])?;
    Ok(HttpResponse::Ok().json(actor.account.public()))
}

// Admin overview of every account of one kind
#[get("/admin/accounts/{kind}")]
async fn list_accounts(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let actor = current_actor(&req)?;
    require_role(&actor, &[ActorKind::Admin])?;
    let kind = parse_kind(&path.into_inner())?;

    info!("📋 Admin {} listing {} accounts", actor.id(), kind);

    let accounts = account_service::list_accounts(&state.store, kind)?;
    let public: Vec<PublicAccount> = accounts.iter().map(PublicAccount::from).collect();
    Ok(HttpResponse::Ok().json(public))
}

#[delete("/admin/accounts/{kind}/{account_id}")]
async fn delete_account(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ServiceError> {
    let actor = current_actor(&req)?;
    require_role(&actor, &[ActorKind::Admin])?;
    let (kind, account_id) = path.into_inner();
    let kind = parse_kind(&kind)?;

    info!("🗑️ Admin {} deleting {} {}", actor.id(), kind, account_id);

    account_service::delete_account(&state.store, kind, &account_id)?;

    Ok(HttpResponse::Ok().json(json!({
        "msg": format!("{} deleted successfully", kind),
        "id": account_id
    })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(user_profile)
        .service(organization_profile)
        .service(list_accounts)
        .service(delete_account);
}
