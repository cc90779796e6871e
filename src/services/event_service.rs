// csn-service/src/services/event_service.rs
use crate::models::{
    Account, AccountSummary, Actor, ActorKind, CreateEventRequest, Event, EventDetails, EventFilter,
    RosterEntryDetails, RosterStatus, ServiceError, UpdateEventRequest, DEFAULT_MAX_VOLUNTEERS,
};
use crate::models::parse_date;
use crate::services::access_guard::require_role;
use crate::utils::validation::{present, required};
use crate::utils::DocumentStore;
use chrono::Utc;
use log::{debug, error, info};
use std::collections::HashMap;
use uuid::Uuid;

pub const EVENTS: &str = "events";

fn event_not_found() -> ServiceError {
    ServiceError::NotFound("Event not found".to_string())
}

// Admins, or the organization that owns the event
fn can_manage(actor: &Actor, event: &Event) -> bool {
    actor.kind == ActorKind::Admin || actor.is(ActorKind::Organization, &event.organizer_id)
}

// Managers of the event, or a volunteer acting on their own entry
fn can_change_roster(actor: &Actor, event: &Event, volunteer_id: &str) -> bool {
    can_manage(actor, event) || actor.is(ActorKind::Volunteer, volunteer_id)
}

fn validate_capacity(max_volunteers: u32) -> Result<u32, ServiceError> {
    if max_volunteers == 0 {
        return Err(ServiceError::Validation(
            "maxVolunteers must be at least 1".to_string(),
        ));
    }
    Ok(max_volunteers)
}

pub fn get_event(store: &DocumentStore, id: &str) -> Result<Event, ServiceError> {
    store.get(EVENTS, id)?.ok_or_else(event_not_found)
}

// Organizations only; the caller becomes the immutable owner
pub fn create_event(
    store: &DocumentStore,
    actor: &Actor,
    request: &CreateEventRequest,
) -> Result<Event, ServiceError> {
    require_role(actor, &[ActorKind::Organization]).map_err(|_| {
        ServiceError::Forbidden("Only organizations can create events".to_string())
    })?;

    let title = required(request.title.as_ref(), "title")?;
    let description = required(request.description.as_ref(), "description")?;
    let location = required(request.location.as_ref(), "location")?;
    let date = parse_date(&required(request.date.as_ref(), "date")?)?;
    let max_volunteers = validate_capacity(request.max_volunteers.unwrap_or(DEFAULT_MAX_VOLUNTEERS))?;

    let now = Utc::now();
    let event = Event {
        id: Uuid::new_v4().to_string(),
        title,
        description,
        date,
        location,
        organizer_id: actor.id().to_string(),
        max_volunteers,
        roster: Vec::new(),
        skills_required: request.skills_required.clone().unwrap_or_default(),
        status: request.status.unwrap_or_default(),
        priority: request.priority.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };

    store.save(EVENTS, &event.id, &event)?;
    info!("✅ Event {} created by organization {}", event.id, event.organizer_id);
    Ok(event)
}

// Apply only the fields present in the request
pub fn update_event(
    store: &DocumentStore,
    id: &str,
    request: &UpdateEventRequest,
    actor: &Actor,
) -> Result<Event, ServiceError> {
    let _guard = store.lock()?;
    let mut event = get_event(store, id)?;

    if !can_manage(actor, &event) {
        error!("❌ {} {} may not update event {}", actor.kind, actor.id(), id);
        return Err(ServiceError::Forbidden(
            "Not authorized to update this event".to_string(),
        ));
    }

    if let Some(title) = present(&request.title) {
        event.title = title;
    }
    if let Some(description) = present(&request.description) {
        event.description = description;
    }
    if let Some(date) = present(&request.date) {
        event.date = parse_date(&date)?;
    }
    if let Some(location) = present(&request.location) {
        event.location = location;
    }
    if let Some(max_volunteers) = request.max_volunteers {
        let max_volunteers = validate_capacity(max_volunteers)?;
        if (max_volunteers as usize) < event.roster.len() {
            return Err(ServiceError::Validation(format!(
                "maxVolunteers cannot be lower than the {} volunteers already assigned",
                event.roster.len()
            )));
        }
        event.max_volunteers = max_volunteers;
    }
    if let Some(skills) = &request.skills_required {
        event.skills_required = skills.clone();
    }
    if let Some(priority) = request.priority {
        event.priority = priority;
    }
    if let Some(status) = request.status {
        event.status = status;
    }
    event.updated_at = Utc::now();

    store.save(EVENTS, &event.id, &event)?;
    info!("✅ Event {} updated", event.id);
    Ok(event)
}

pub fn delete_event(store: &DocumentStore, id: &str, actor: &Actor) -> Result<(), ServiceError> {
    let _guard = store.lock()?;
    let event = get_event(store, id)?;

    if !can_manage(actor, &event) {
        error!("❌ {} {} may not delete event {}", actor.kind, actor.id(), id);
        return Err(ServiceError::Forbidden(
            "Not authorized to delete this event".to_string(),
        ));
    }

    store.delete(EVENTS, id)?;
    info!("🗑️ Event {} deleted", id);
    Ok(())
}

// All matching events, newest date first. Unpaginated.
pub fn list_events(store: &DocumentStore, filter: &EventFilter) -> Result<Vec<Event>, ServiceError> {
    let mut events: Vec<Event> = store
        .list::<Event>(EVENTS)?
        .into_iter()
        .filter(|event| filter.matches(event))
        .collect();
    events.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(events)
}

pub fn events_for_volunteer(store: &DocumentStore, volunteer_id: &str) -> Result<Vec<Event>, ServiceError> {
    Ok(list_events(store, &EventFilter::default())?
        .into_iter()
        .filter(|event| event.has_volunteer(volunteer_id))
        .collect())
}

// Add a volunteer to the roster. Runs entirely under the store lock, so the
// duplicate and capacity checks cannot race with another assignment.
pub fn assign_volunteer(
    store: &DocumentStore,
    event_id: &str,
    volunteer_id: &str,
    actor: &Actor,
) -> Result<Event, ServiceError> {
    let _guard = store.lock()?;
    let mut event = get_event(store, event_id)?;

    if store
        .get::<Account>(ActorKind::Volunteer.collection(), volunteer_id)?
        .is_none()
    {
        return Err(ServiceError::NotFound("Volunteer not found".to_string()));
    }

    if !can_change_roster(actor, &event, volunteer_id) {
        return Err(ServiceError::Forbidden(
            "Not authorized to assign volunteers to this event".to_string(),
        ));
    }

    event.add_to_roster(volunteer_id).map_err(|e| {
        debug!("Assignment of {} to {} refused: {}", volunteer_id, event_id, e);
        e
    })?;
    event.updated_at = Utc::now();
    store.save(EVENTS, &event.id, &event)?;

    info!(
        "✅ Volunteer {} assigned to event {} ({}/{})",
        volunteer_id,
        event.id,
        event.roster.len(),
        event.max_volunteers
    );
    Ok(event)
}

// Idempotent: removing a volunteer who is not rostered changes nothing
pub fn remove_volunteer(
    store: &DocumentStore,
    event_id: &str,
    volunteer_id: &str,
    actor: &Actor,
) -> Result<(), ServiceError> {
    let _guard = store.lock()?;
    let mut event = get_event(store, event_id)?;

    if !can_change_roster(actor, &event, volunteer_id) {
        return Err(ServiceError::Forbidden(
            "Not authorized to remove volunteers from this event".to_string(),
        ));
    }

    if event.remove_from_roster(volunteer_id) {
        event.updated_at = Utc::now();
        store.save(EVENTS, &event.id, &event)?;
        info!("✅ Volunteer {} removed from event {}", volunteer_id, event.id);
    } else {
        debug!("Volunteer {} was not on event {}", volunteer_id, event.id);
    }
    Ok(())
}

// Any status may be written; transitions are not enforced
pub fn update_roster_status(
    store: &DocumentStore,
    event_id: &str,
    volunteer_id: &str,
    status: RosterStatus,
    actor: &Actor,
) -> Result<Event, ServiceError> {
    let _guard = store.lock()?;
    let mut event = get_event(store, event_id)?;

    if !can_manage(actor, &event) {
        return Err(ServiceError::Forbidden(
            "Not authorized to update this event".to_string(),
        ));
    }

    let entry = event
        .roster
        .iter_mut()
        .find(|entry| entry.volunteer_id == volunteer_id)
        .ok_or_else(|| ServiceError::NotFound("Volunteer is not assigned to this event".to_string()))?;
    entry.status = status;
    event.updated_at = Utc::now();

    store.save(EVENTS, &event.id, &event)?;
    info!("✅ Volunteer {} on event {} is now {:?}", volunteer_id, event.id, status);
    Ok(event)
}

// Caller must already hold the store lock
pub(crate) fn strip_volunteer_from_rosters(store: &DocumentStore, volunteer_id: &str) -> Result<usize, ServiceError> {
    let mut touched = 0;
    for mut event in store.list::<Event>(EVENTS)? {
        if event.remove_from_roster(volunteer_id) {
            event.updated_at = Utc::now();
            store.save(EVENTS, &event.id, &event)?;
            touched += 1;
        }
    }
    Ok(touched)
}

// Lookup tables for resolving organizer and volunteer references
pub struct Directory {
    organizations: HashMap<String, AccountSummary>,
    volunteers: HashMap<String, AccountSummary>,
}

impl Directory {
    pub fn load(store: &DocumentStore) -> Result<Self, ServiceError> {
        let index = |kind: ActorKind| -> Result<HashMap<String, AccountSummary>, ServiceError> {
            Ok(store
                .list::<Account>(kind.collection())?
                .into_iter()
                .map(|account| (account.id.clone(), account.summary()))
                .collect())
        };

        Ok(Self {
            organizations: index(ActorKind::Organization)?,
            volunteers: index(ActorKind::Volunteer)?,
        })
    }

    pub fn organizer(&self, id: &str) -> Option<AccountSummary> {
        self.organizations.get(id).cloned()
    }

    pub fn details(&self, event: Event) -> EventDetails {
        let roster = event
            .roster
            .into_iter()
            .map(|entry| RosterEntryDetails {
                volunteer: self.volunteers.get(&entry.volunteer_id).cloned(),
                volunteer_id: entry.volunteer_id,
                status: entry.status,
            })
            .collect();

        EventDetails {
            organizer: self.organizer(&event.organizer_id),
            id: event.id,
            title: event.title,
            description: event.description,
            date: event.date,
            location: event.location,
            organizer_id: event.organizer_id,
            max_volunteers: event.max_volunteers,
            roster,
            skills_required: event.skills_required,
            status: event.status,
            priority: event.priority,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

pub fn with_details(store: &DocumentStore, events: Vec<Event>) -> Result<Vec<EventDetails>, ServiceError> {
    let directory = Directory::load(store)?;
    Ok(events.into_iter().map(|event| directory.details(event)).collect())
}
