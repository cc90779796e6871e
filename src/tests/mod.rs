// Shared fixtures for service and HTTP tests
use crate::config::AppConfig;
use crate::models::{
    Account, Actor, ActorKind, OrganizationProfile, Profile, VolunteerProfile,
};
use crate::utils::jwt;
use crate::AppState;
use actix_web::web;
use chrono::Utc;
use std::fs;
use std::ops::Deref;
use uuid::Uuid;

// Build an app over a TestState, wired like main
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state.data.clone())
                .wrap(crate::utils::auth_middleware::Authentication)
                .configure(crate::routes::configure),
        )
        .await
    };
}

mod auth_tests;

pub(crate) const TEST_SECRET: &str = "test-secret";

pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        storage_dir: std::env::temp_dir().join(format!("csn-test-{}", Uuid::new_v4())),
        jwt_secret: TEST_SECRET.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        allowed_origin: "http://localhost:3000".to_string(),
        admin: None,
    }
}

// Fresh state over an empty store directory, removed again on drop
pub(crate) struct TestState {
    pub data: web::Data<AppState>,
}

impl Deref for TestState {
    type Target = AppState;

    fn deref(&self) -> &AppState {
        &self.data
    }
}

impl Drop for TestState {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(self.data.store.root());
    }
}

pub(crate) fn test_state() -> TestState {
    TestState {
        data: web::Data::new(AppState::new(test_config()).unwrap()),
    }
}

// Write an account straight to the store, skipping bcrypt
pub(crate) fn seed_account(state: &AppState, kind: ActorKind, email: &str) -> Actor {
    let profile = match kind {
        ActorKind::User => Profile::User,
        ActorKind::Admin => Profile::Admin,
        ActorKind::Organization => Profile::Organization(OrganizationProfile::default()),
        ActorKind::Volunteer => Profile::Volunteer(VolunteerProfile {
            age: 30,
            skills: vec!["First Aid".to_string()],
            availability: None,
            availability_dates: Vec::new(),
            profile_picture: None,
            is_active: true,
            last_login: None,
        }),
    };

    let now = Utc::now();
    let account = Account {
        id: Uuid::new_v4().to_string(),
        name: email.split('@').next().unwrap_or(email).to_string(),
        email: email.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        contact_number: Some("0770000000".to_string()),
        address: Some("Colombo".to_string()),
        created_at: now,
        updated_at: now,
        profile,
    };
    state.store.save(kind.collection(), &account.id, &account).unwrap();

    Actor { kind, account }
}

pub(crate) fn bearer(actor: &Actor) -> (&'static str, String) {
    let token = jwt::generate_token(actor.kind, actor.id(), TEST_SECRET).unwrap();
    ("Authorization", format!("Bearer {}", token))
}
