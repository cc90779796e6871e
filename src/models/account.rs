// csn-service/src/models/account.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// The four kinds of actor a token can carry
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    User,
    Volunteer,
    Organization,
    Admin,
}

impl ActorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorKind::User => "user",
            ActorKind::Volunteer => "volunteer",
            ActorKind::Organization => "organization",
            ActorKind::Admin => "admin",
        }
    }

    // Store collection holding accounts of this kind
    pub fn collection(&self) -> &'static str {
        match self {
            ActorKind::User => "users",
            ActorKind::Volunteer => "volunteers",
            ActorKind::Organization => "organizations",
            ActorKind::Admin => "admins",
        }
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" | "users" => Ok(ActorKind::User),
            "volunteer" | "volunteers" => Ok(ActorKind::Volunteer),
            "organization" | "organizations" | "organisation" | "organisations" => {
                Ok(ActorKind::Organization)
            }
            "admin" | "admins" => Ok(ActorKind::Admin),
            other => Err(format!("Unknown account kind: {}", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityDate {
    pub date: DateTime<Utc>,
    pub is_available: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerProfile {
    pub age: u32,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub availability_dates: Vec<AvailabilityDate>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationProfile {
    #[serde(default)]
    pub website: Option<String>,
}

// Kind-specific account data, tagged by actor kind
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Profile {
    User,
    Volunteer(VolunteerProfile),
    Organization(OrganizationProfile),
    Admin,
}

impl Profile {
    pub fn kind(&self) -> ActorKind {
        match self {
            Profile::User => ActorKind::User,
            Profile::Volunteer(_) => ActorKind::Volunteer,
            Profile::Organization(_) => ActorKind::Organization,
            Profile::Admin => ActorKind::Admin,
        }
    }
}

// Persisted account record
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub profile: Profile,
}

impl Account {
    pub fn kind(&self) -> ActorKind {
        self.profile.kind()
    }

    pub fn volunteer_profile(&self) -> Option<&VolunteerProfile> {
        match &self.profile {
            Profile::Volunteer(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn public(&self) -> PublicAccount {
        PublicAccount::from(self)
    }

    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            skills: self.volunteer_profile().map(|p| p.skills.clone()),
        }
    }
}

// Account as returned to clients: everything except the password hash
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PublicAccount {
    pub id: String,
    pub name: String,
    pub email: String,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub profile: Profile,
}

impl From<&Account> for PublicAccount {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            name: account.name.clone(),
            email: account.email.clone(),
            contact_number: account.contact_number.clone(),
            address: account.address.clone(),
            created_at: account.created_at,
            updated_at: account.updated_at,
            profile: account.profile.clone(),
        }
    }
}

// Short form embedded in event responses
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
}

// Registration body shared by every kind; which fields are required depends on the kind
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub age: Option<u32>,
    pub skills: Option<Vec<String>>,
    pub availability: Option<String>,
    pub profile_picture: Option<String>,
    pub website: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub token: String,
    pub kind: ActorKind,
    pub id: String,
}

// JWT claims: the actor reference plus timing
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub kind: ActorKind,
    pub exp: usize,
    pub iat: usize,
}

// Identity attached to a request once its token has been resolved
#[derive(Debug, Clone)]
pub struct Actor {
    pub kind: ActorKind,
    pub account: Account,
}

impl Actor {
    pub fn id(&self) -> &str {
        &self.account.id
    }

    pub fn is(&self, kind: ActorKind, id: &str) -> bool {
        self.kind == kind && self.account.id == id
    }
}
