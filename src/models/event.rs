// csn-service/src/models/event.rs
use crate::models::{AccountSummary, ServiceError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_VOLUNTEERS: u32 = 10;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RosterStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub volunteer_id: String,
    #[serde(default)]
    pub status: RosterStatus,
}

// Persisted event document, owned by one organization
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub organizer_id: String,
    pub max_volunteers: u32,
    #[serde(default)]
    pub roster: Vec<RosterEntry>,
    #[serde(default)]
    pub skills_required: Vec<String>,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn has_volunteer(&self, volunteer_id: &str) -> bool {
        self.roster.iter().any(|entry| entry.volunteer_id == volunteer_id)
    }

    pub fn is_full(&self) -> bool {
        self.roster.len() >= self.max_volunteers as usize
    }

    pub fn roster_entry(&self, volunteer_id: &str) -> Option<&RosterEntry> {
        self.roster.iter().find(|entry| entry.volunteer_id == volunteer_id)
    }

    // Append a pending entry, keeping ids unique and the roster within capacity
    pub fn add_to_roster(&mut self, volunteer_id: &str) -> Result<(), ServiceError> {
        if self.has_volunteer(volunteer_id) {
            return Err(ServiceError::AlreadyAssigned);
        }
        if self.is_full() {
            return Err(ServiceError::EventFull);
        }

        self.roster.push(RosterEntry {
            volunteer_id: volunteer_id.to_string(),
            status: RosterStatus::Pending,
        });
        Ok(())
    }

    // Returns whether an entry was removed
    pub fn remove_from_roster(&mut self, volunteer_id: &str) -> bool {
        let before = self.roster.len();
        self.roster.retain(|entry| entry.volunteer_id != volunteer_id);
        self.roster.len() != before
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub max_volunteers: Option<u32>,
    pub skills_required: Option<Vec<String>>,
    pub priority: Option<Priority>,
    pub status: Option<EventStatus>,
}

// Partial update: only the fields present are applied
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub max_volunteers: Option<u32>,
    pub skills_required: Option<Vec<String>>,
    pub priority: Option<Priority>,
    pub status: Option<EventStatus>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventFilter {
    pub status: Option<EventStatus>,
    pub priority: Option<Priority>,
    #[serde(alias = "organizer")]
    pub organizer_id: Option<String>,
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        self.status.map_or(true, |status| event.status == status)
            && self.priority.map_or(true, |priority| event.priority == priority)
            && self
                .organizer_id
                .as_deref()
                .map_or(true, |organizer| event.organizer_id == organizer)
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AssignVolunteerRequest {
    pub volunteer_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct RosterStatusUpdate {
    pub status: RosterStatus,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntryDetails {
    pub volunteer_id: String,
    pub status: RosterStatus,
    pub volunteer: Option<AccountSummary>,
}

// Event with its organizer and rostered volunteers resolved
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub organizer_id: String,
    pub organizer: Option<AccountSummary>,
    pub max_volunteers: u32,
    pub roster: Vec<RosterEntryDetails>,
    pub skills_required: Vec<String>,
    pub status: EventStatus,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Accepts RFC 3339 timestamps or plain calendar dates (midnight UTC)
pub fn parse_date(value: &str) -> Result<DateTime<Utc>, ServiceError> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
        .ok_or_else(|| ServiceError::Validation(format!("Invalid date: {}", value)))
}
