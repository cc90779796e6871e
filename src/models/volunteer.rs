// csn-service/src/models/volunteer.rs
use crate::models::{AccountSummary, EventStatus, Priority, RosterStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Hours credited per completed event on the dashboard
pub const HOURS_PER_COMPLETED_EVENT: u32 = 4;
pub const DASHBOARD_UPCOMING_LIMIT: usize = 5;

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub age: Option<u32>,
    pub skills: Option<Vec<String>>,
    pub availability: Option<String>,
    pub profile_picture: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityUpdate {
    pub selected_dates: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct VolunteerQuery {
    pub skill: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingEvent {
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub organizer: Option<AccountSummary>,
    pub priority: Priority,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_events: usize,
    pub completed_events: usize,
    pub pending_events: usize,
    pub total_hours: u32,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DashboardVolunteer {
    pub name: String,
    pub email: String,
    pub skills: Vec<String>,
    pub profile_picture: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerDashboard {
    pub volunteer: DashboardVolunteer,
    pub upcoming_events: Vec<UpcomingEvent>,
    pub stats: DashboardStats,
}

// An assigned event seen from the volunteer's side
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerTask {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub organizer: Option<AccountSummary>,
    pub status: RosterStatus,
    pub event_status: EventStatus,
    pub priority: Priority,
    pub skills_required: Vec<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerMessage {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub date: DateTime<Utc>,
    pub is_read: bool,
}
