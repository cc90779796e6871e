use crate::models::{ActorKind, AvailabilityUpdate, PublicAccount, ServiceError, VolunteerQuery, VolunteerUpdate};
use crate::services::access_guard::require_role;
use crate::services::{account_service, volunteer_service};
use crate::utils::current_actor;
use crate::AppState;
use actix_web::{delete, get, put, web, HttpRequest, HttpResponse};
use log::info;
use serde_json::json;

// Organizations and admins browse volunteers, optionally by skill
#[get("/volunteers")]
async fn list_volunteers(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<VolunteerQuery>,
) -> Result<HttpResponse, ServiceError> {
    let actor = current_actor(&req)?;
    info!("📋 Listing volunteers (skill: {:?})", query.skill);

    let volunteers = volunteer_service::list_volunteers(&state.store, &actor, query.skill.as_deref())?;
    let public: Vec<PublicAccount> = volunteers.iter().map(PublicAccount::from).collect();

    info!("✅ Found {} volunteers", public.len());
    Ok(HttpResponse::Ok().json(public))
}

#[get("/volunteers/dashboard/{volunteer_id}")]
async fn dashboard(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let actor = current_actor(&req)?;
    let summary = volunteer_service::dashboard(&state.store, &path.into_inner(), &actor)?;
    Ok(HttpResponse::Ok().json(summary))
}

#[get("/volunteers/tasks/{volunteer_id}")]
async fn tasks(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let actor = current_actor(&req)?;
    let assigned = volunteer_service::tasks(&state.store, &path.into_inner(), &actor)?;
    Ok(HttpResponse::Ok().json(assigned))
}

#[get("/volunteers/messages/{volunteer_id}")]
async fn messages(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let actor = current_actor(&req)?;
    let notices = volunteer_service::messages(&state.store, &path.into_inner(), &actor)?;
    Ok(HttpResponse::Ok().json(notices))
}

#[get("/volunteers/{volunteer_id}")]
async fn get_volunteer(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    current_actor(&req)?;
    let volunteer = volunteer_service::get_volunteer(&state.store, &path.into_inner())?;
    Ok(HttpResponse::Ok().json(volunteer.public()))
}

#[put("/volunteers/profile/{volunteer_id}")]
async fn update_profile(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<VolunteerUpdate>,
) -> Result<HttpResponse, ServiceError> {
    let actor = current_actor(&req)?;
    let volunteer = volunteer_service::update_volunteer(&state.store, &path.into_inner(), &body, &actor)?;
    Ok(HttpResponse::Ok().json(volunteer.public()))
}

#[put("/volunteers/availability/{volunteer_id}")]
async fn update_availability(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<AvailabilityUpdate>,
) -> Result<HttpResponse, ServiceError> {
    let actor = current_actor(&req)?;
    let volunteer = volunteer_service::update_availability(&state.store, &path.into_inner(), &body, &actor)?;

    Ok(HttpResponse::Ok().json(json!({
        "msg": "Availability updated successfully",
        "volunteer": volunteer.public()
    })))
}

#[put("/volunteers/{volunteer_id}")]
async fn update_volunteer(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<VolunteerUpdate>,
) -> Result<HttpResponse, ServiceError> {
    let actor = current_actor(&req)?;
    let volunteer = volunteer_service::update_volunteer(&state.store, &path.into_inner(), &body, &actor)?;
    Ok(HttpResponse::Ok().json(volunteer.public()))
}

// Hard delete, admins only
#[delete("/volunteers/{volunteer_id}")]
async fn delete_volunteer(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let actor = current_actor(&req)?;
    require_role(&actor, &[ActorKind::Admin])?;

    let volunteer_id = path.into_inner();
    account_service::delete_account(&state.store, ActorKind::Volunteer, &volunteer_id)?;

    Ok(HttpResponse::Ok().json(json!({
        "msg": "Volunteer deleted successfully"
    })))
}

// Register all volunteer routes; fixed segments before the {volunteer_id} catch-all
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_volunteers)
        .service(dashboard)
        .service(tasks)
        .service(messages)
        .service(get_volunteer)
        .service(update_profile)
        .service(update_availability)
        .service(update_volunteer)
        .service(delete_volunteer);
}
