use crate::models::{
    AssignVolunteerRequest, CreateEventRequest, EventFilter, RosterStatusUpdate, ServiceError,
    UpdateEventRequest,
};
use crate::services::event_service;
use crate::utils::current_actor;
use crate::AppState;
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use log::{error, info};
use serde_json::json;

// Create event (organizations only)
#[post("/events")]
async fn create_event(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<CreateEventRequest>,
) -> Result<HttpResponse, ServiceError> {
    let actor = current_actor(&req)?;
    info!("📝 Create event request from {} {}", actor.kind, actor.id());

    let event = event_service::create_event(&state.store, &actor, &body)?;
    let details = event_service::with_details(&state.store, vec![event])?;

    Ok(HttpResponse::Created().json(&details[0]))
}

#[get("/events")]
async fn list_events(
    state: web::Data<AppState>,
    filter: web::Query<EventFilter>,
) -> Result<HttpResponse, ServiceError> {
    info!("📋 Listing events with filter: {:?}", filter);

    let events = event_service::list_events(&state.store, &filter)?;
    Ok(HttpResponse::Ok().json(event_service::with_details(&state.store, events)?))
}

#[get("/events/organizer/{organizer_id}")]
async fn events_by_organizer(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    current_actor(&req)?;
    let filter = EventFilter {
        organizer_id: Some(path.into_inner()),
        ..Default::default()
    };

    let events = event_service::list_events(&state.store, &filter)?;
    Ok(HttpResponse::Ok().json(event_service::with_details(&state.store, events)?))
}

#[get("/events/volunteer/{volunteer_id}")]
async fn events_by_volunteer(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    current_actor(&req)?;
    let events = event_service::events_for_volunteer(&state.store, &path.into_inner())?;
    Ok(HttpResponse::Ok().json(event_service::with_details(&state.store, events)?))
}

#[get("/events/{event_id}")]
async fn get_event(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ServiceError> {
    let event_id = path.into_inner();
    info!("🔍 Fetching event: {}", event_id);

    let event = event_service::get_event(&state.store, &event_id).map_err(|e| {
        error!("❌ Event not found: {}", event_id);
        e
    })?;
    let details = event_service::with_details(&state.store, vec![event])?;

    Ok(HttpResponse::Ok().json(&details[0]))
}

#[put("/events/{event_id}")]
async fn update_event(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateEventRequest>,
) -> Result<HttpResponse, ServiceError> {
    let actor = current_actor(&req)?;
    let event_id = path.into_inner();
    info!("🔄 Updating event: {}", event_id);

    let event = event_service::update_event(&state.store, &event_id, &body, &actor)?;
    let details = event_service::with_details(&state.store, vec![event])?;

    Ok(HttpResponse::Ok().json(&details[0]))
}

#[delete("/events/{event_id}")]
async fn delete_event(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let actor = current_actor(&req)?;
    let event_id = path.into_inner();
    info!("🗑️ Deleting event: {}", event_id);

    event_service::delete_event(&state.store, &event_id, &actor)?;

    Ok(HttpResponse::Ok().json(json!({
        "msg": "Event deleted successfully",
        "eventId": event_id
    })))
}

#[post("/events/{event_id}/assign-volunteer")]
async fn assign_volunteer(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<AssignVolunteerRequest>,
) -> Result<HttpResponse, ServiceError> {
    let actor = current_actor(&req)?;
    let event_id = path.into_inner();
    let volunteer_id = body
        .volunteer_id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ServiceError::Validation("volunteerId is required".to_string()))?;

    info!("👥 Assigning volunteer: {} to event: {}", volunteer_id, event_id);

    let event = event_service::assign_volunteer(&state.store, &event_id, volunteer_id, &actor)?;
    let details = event_service::with_details(&state.store, vec![event])?;

    Ok(HttpResponse::Ok().json(&details[0]))
}

#[delete("/events/{event_id}/remove-volunteer/{volunteer_id}")]
async fn remove_volunteer(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ServiceError> {
    let actor = current_actor(&req)?;
    let (event_id, volunteer_id) = path.into_inner();
    info!("🗑️ Removing volunteer: {} from event: {}", volunteer_id, event_id);

    event_service::remove_volunteer(&state.store, &event_id, &volunteer_id, &actor)?;

    Ok(HttpResponse::Ok().json(json!({
        "msg": "Volunteer removed from event successfully"
    })))
}

#[put("/events/{event_id}/volunteers/{volunteer_id}/status")]
async fn update_roster_status(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    body: web::Json<RosterStatusUpdate>,
) -> Result<HttpResponse, ServiceError> {
    let actor = current_actor(&req)?;
    let (event_id, volunteer_id) = path.into_inner();
    info!("🔄 Setting volunteer {} on event {} to {:?}", volunteer_id, event_id, body.status);

    let event =
        event_service::update_roster_status(&state.store, &event_id, &volunteer_id, body.status, &actor)?;
    let details = event_service::with_details(&state.store, vec![event])?;

    Ok(HttpResponse::Ok().json(&details[0]))
}

// Register all event routes; fixed segments before the {event_id} catch-all
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_event)
        .service(list_events)
        .service(events_by_organizer)
        .service(events_by_volunteer)
        .service(get_event)
        .service(update_event)
        .service(delete_event)
        .service(assign_volunteer)
        .service(remove_volunteer)
        .service(update_roster_status);
}
