use crate::models::{ActorKind, Credentials, RegisterRequest, ServiceError};
use crate::services::access_guard::require_role;
use crate::services::account_service;
use crate::utils::current_actor;
use crate::AppState;
use actix_web::error::BlockingError;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use log::{debug, error, info};
use serde_json::json;

// Map a failed blocking task (panic or cancellation) to a server error
fn blocking_failed(e: BlockingError) -> ServiceError {
    error!("❌ Blocking task failed: {:?}", e);
    ServiceError::Unexpected
}

// bcrypt and the store lock run on the blocking pool, not the worker thread
async fn register_as(
    state: web::Data<AppState>,
    kind: ActorKind,
    request: RegisterRequest,
) -> Result<HttpResponse, ServiceError> {
    info!(
        "📝 Register {} request for email: {}",
        kind,
        request.email.as_deref().unwrap_or("<missing>")
    );

    let account = web::block(move || account_service::register(&state, kind, &request))
        .await
        .map_err(blocking_failed)??;

    Ok(HttpResponse::Created().json(json!({
        "msg": format!("{} registered successfully", kind),
        "account": account.public()
    })))
}

async fn login_as(
    state: web::Data<AppState>,
    kind: ActorKind,
    credentials: Credentials,
) -> Result<HttpResponse, ServiceError> {
    info!("🔑 Login {} request for email: {}", kind, credentials.email);

    let response = web::block(move || account_service::login(&state, kind, &credentials))
        .await
        .map_err(blocking_failed)??;

    // Token in headers as well as response body
    Ok(HttpResponse::Ok()
        .append_header(("Authorization", format!("Bearer {}", response.token)))
        .json(response))
}

#[post("/auth/registerUser")]
async fn register_user(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ServiceError> {
    register_as(state, ActorKind::User, body.into_inner()).await
}

#[post("/auth/registerVolunteer")]
async fn register_volunteer(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ServiceError> {
    register_as(state, ActorKind::Volunteer, body.into_inner()).await
}

#[post("/auth/registerOrganization")]
async fn register_organization(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ServiceError> {
    register_as(state, ActorKind::Organization, body.into_inner()).await
}

// Further admins can only be created by an existing admin
#[post("/auth/registerAdmin")]
async fn register_admin(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ServiceError> {
    let actor = current_actor(&req)?;
    require_role(&actor, &[ActorKind::Admin])?;
    register_as(state, ActorKind::Admin, body.into_inner()).await
}

#[post("/auth/loginUser")]
async fn login_user(state: web::Data<AppState>, body: web::Json<Credentials>) -> Result<HttpResponse, ServiceError> {
    login_as(state, ActorKind::User, body.into_inner()).await
}

#[post("/auth/loginVolunteer")]
async fn login_volunteer(
    state: web::Data<AppState>,
    body: web::Json<Credentials>,
) -> Result<HttpResponse, ServiceError> {
    login_as(state, ActorKind::Volunteer, body.into_inner()).await
}

#[post("/auth/loginOrganization")]
async fn login_organization(
    state: web::Data<AppState>,
    body: web::Json<Credentials>,
) -> Result<HttpResponse, ServiceError> {
    login_as(state, ActorKind::Organization, body.into_inner()).await
}

#[post("/auth/loginAdmin")]
async fn login_admin(state: web::Data<AppState>, body: web::Json<Credentials>) -> Result<HttpResponse, ServiceError> {
    login_as(state, ActorKind::Admin, body.into_inner()).await
}

// Current actor's account (requires authentication)
#[get("/auth/me")]
async fn me(req: HttpRequest) -> Result<HttpResponse, ServiceError> {
    debug!("👤 Get current account request");

    let actor = current_actor(&req)?;
    Ok(HttpResponse::Ok().json(actor.account.public()))
}

// Register all auth routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register_user)
        .service(register_volunteer)
        .service(register_organization)
        .service(register_admin)
        .service(login_user)
        .service(login_volunteer)
        .service(login_organization)
        .service(login_admin)
        .service(me);
}
