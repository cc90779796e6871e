// csn-service/src/services/volunteer_service.rs
use crate::models::{
    parse_date, Account, Actor, ActorKind, AvailabilityDate, AvailabilityUpdate, DashboardStats,
    DashboardVolunteer, EventStatus, Profile, RosterStatus, ServiceError, UpcomingEvent,
    VolunteerDashboard, VolunteerMessage, VolunteerTask, VolunteerUpdate, DASHBOARD_UPCOMING_LIMIT,
    HOURS_PER_COMPLETED_EVENT,
};
use crate::services::access_guard::{require_role, require_self_or_admin};
use crate::services::account_service::{find_by_email, get_account};
use crate::services::event_service::{events_for_volunteer, Directory};
use crate::utils::validation::{normalize_email, present};
use crate::utils::DocumentStore;
use chrono::Utc;
use log::{error, info};

fn volunteer(store: &DocumentStore, id: &str) -> Result<Account, ServiceError> {
    get_account(store, ActorKind::Volunteer, id)
}

// Dashboards and task lists are visible to the volunteer, admins and organizations
fn require_viewer(actor: &Actor, volunteer_id: &str) -> Result<(), ServiceError> {
    if actor.kind == ActorKind::Organization {
        return Ok(());
    }
    require_self_or_admin(actor, ActorKind::Volunteer, volunteer_id)
}

pub fn list_volunteers(
    store: &DocumentStore,
    actor: &Actor,
    skill: Option<&str>,
) -> Result<Vec<Account>, ServiceError> {
    require_role(actor, &[ActorKind::Organization, ActorKind::Admin])?;

    let skill = skill.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());
    let mut volunteers: Vec<Account> = store
        .list::<Account>(ActorKind::Volunteer.collection())?
        .into_iter()
        .filter(|account| match (&skill, account.volunteer_profile()) {
            (None, _) => true,
            (Some(wanted), Some(profile)) => profile
                .skills
                .iter()
                .any(|s| s.to_lowercase().contains(wanted.as_str())),
            (Some(_), None) => false,
        })
        .collect();
    volunteers.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(volunteers)
}

pub fn get_volunteer(store: &DocumentStore, id: &str) -> Result<Account, ServiceError> {
    volunteer(store, id)
}

// Partial profile update; an email change must stay unique among volunteers
pub fn update_volunteer(
    store: &DocumentStore,
    id: &str,
    update: &VolunteerUpdate,
    actor: &Actor,
) -> Result<Account, ServiceError> {
    require_self_or_admin(actor, ActorKind::Volunteer, id)?;

    let _guard = store.lock()?;
    let mut account = volunteer(store, id)?;

    if let Some(email) = present(&update.email) {
        let email = normalize_email(&email)?;
        if email != account.email {
            if find_by_email(store, ActorKind::Volunteer, &email)?.is_some() {
                error!("❌ Email already in use: {}", email);
                return Err(ServiceError::DuplicateEmail);
            }
            account.email = email;
        }
    }
    if let Some(name) = present(&update.name) {
        account.name = name;
    }
    if let Some(contact_number) = present(&update.contact_number) {
        account.contact_number = Some(contact_number);
    }
    if let Some(address) = present(&update.address) {
        account.address = Some(address);
    }

    if let Profile::Volunteer(profile) = &mut account.profile {
        if let Some(age) = update.age {
            profile.age = age;
        }
        if let Some(skills) = &update.skills {
            profile.skills = skills.clone();
        }
        if let Some(availability) = present(&update.availability) {
            profile.availability = Some(availability);
        }
        if let Some(picture) = present(&update.profile_picture) {
            profile.profile_picture = Some(picture);
        }
    }
    account.updated_at = Utc::now();

    store.save(ActorKind::Volunteer.collection(), &account.id, &account)?;
    info!("✅ Volunteer {} updated", account.id);
    Ok(account)
}

// Replace the availability calendar with the selected dates
pub fn update_availability(
    store: &DocumentStore,
    id: &str,
    update: &AvailabilityUpdate,
    actor: &Actor,
) -> Result<Account, ServiceError> {
    require_self_or_admin(actor, ActorKind::Volunteer, id)?;

    let selected = update
        .selected_dates
        .as_ref()
        .ok_or_else(|| ServiceError::Validation("Selected dates are required".to_string()))?;
    let dates = selected
        .iter()
        .map(|date| {
            parse_date(date).map(|date| AvailabilityDate {
                date,
                is_available: true,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let _guard = store.lock()?;
    let mut account = volunteer(store, id)?;
    if let Profile::Volunteer(profile) = &mut account.profile {
        profile.availability_dates = dates;
        profile.availability = Some("Custom dates selected".to_string());
    }
    account.updated_at = Utc::now();

    store.save(ActorKind::Volunteer.collection(), &account.id, &account)?;
    info!("✅ Availability updated for volunteer {}", account.id);
    Ok(account)
}

pub fn dashboard(store: &DocumentStore, id: &str, actor: &Actor) -> Result<VolunteerDashboard, ServiceError> {
    require_viewer(actor, id)?;
    let account = volunteer(store, id)?;
    let events = events_for_volunteer(store, id)?;
    let directory = Directory::load(store)?;

    let mut completed_events = 0;
    let mut pending_events = 0;
    for event in &events {
        match event.roster_entry(id).map(|entry| entry.status) {
            Some(RosterStatus::Completed) => completed_events += 1,
            Some(RosterStatus::Pending) => pending_events += 1,
            _ => {}
        }
    }

    let now = Utc::now();
    let mut upcoming: Vec<_> = events
        .iter()
        .filter(|event| event.date >= now && event.status == EventStatus::Upcoming)
        .collect();
    upcoming.sort_by(|a, b| a.date.cmp(&b.date));

    let upcoming_events = upcoming
        .into_iter()
        .take(DASHBOARD_UPCOMING_LIMIT)
        .map(|event| UpcomingEvent {
            id: event.id.clone(),
            title: event.title.clone(),
            date: event.date,
            location: event.location.clone(),
            organizer: directory.organizer(&event.organizer_id),
            priority: event.priority,
        })
        .collect();

    let profile = account.volunteer_profile();
    Ok(VolunteerDashboard {
        volunteer: DashboardVolunteer {
            name: account.name.clone(),
            email: account.email.clone(),
            skills: profile.map(|p| p.skills.clone()).unwrap_or_default(),
            profile_picture: profile.and_then(|p| p.profile_picture.clone()),
        },
        upcoming_events,
        stats: DashboardStats {
            total_events: completed_events + pending_events,
            completed_events,
            pending_events,
            total_hours: completed_events as u32 * HOURS_PER_COMPLETED_EVENT,
        },
    })
}

// Assigned events projected with the volunteer's own roster status, newest first
pub fn tasks(store: &DocumentStore, id: &str, actor: &Actor) -> Result<Vec<VolunteerTask>, ServiceError> {
    require_viewer(actor, id)?;
    volunteer(store, id)?;
    let directory = Directory::load(store)?;

    Ok(events_for_volunteer(store, id)?
        .into_iter()
        .map(|event| VolunteerTask {
            status: event.roster_entry(id).map(|entry| entry.status).unwrap_or_default(),
            organizer: directory.organizer(&event.organizer_id),
            id: event.id,
            title: event.title,
            description: event.description,
            date: event.date,
            location: event.location,
            event_status: event.status,
            priority: event.priority,
            skills_required: event.skills_required,
        })
        .collect())
}

// One assignment notice per rostered event, most recently created first
pub fn messages(store: &DocumentStore, id: &str, actor: &Actor) -> Result<Vec<VolunteerMessage>, ServiceError> {
    require_viewer(actor, id)?;
    volunteer(store, id)?;

    let mut events = events_for_volunteer(store, id)?;
    events.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(events
        .into_iter()
        .map(|event| VolunteerMessage {
            title: format!("Event: {}", event.title),
            message: format!(
                "You have been assigned to \"{}\" scheduled for {}",
                event.title,
                event.date.format("%a %b %d %Y")
            ),
            message_type: "event_assignment".to_string(),
            date: event.created_at,
            is_read: false,
            id: event.id,
        })
        .collect())
}
