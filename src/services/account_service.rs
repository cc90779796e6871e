// csn-service/src/services/account_service.rs
use crate::config::AdminBootstrap;
use crate::models::{
    Account, ActorKind, Credentials, LoginResponse, OrganizationProfile, Profile, RegisterRequest,
    ServiceError, VolunteerProfile,
};
use crate::services::event_service;
use crate::utils::validation::{normalize_email, present, required};
use crate::utils::{jwt, password, DocumentStore};
use crate::AppState;
use chrono::Utc;
use log::{error, info};
use uuid::Uuid;

// Build the kind-specific part of an account from a registration body
fn profile_for(kind: ActorKind, request: &RegisterRequest) -> Result<Profile, ServiceError> {
    match kind {
        ActorKind::User => Ok(Profile::User),
        ActorKind::Admin => Ok(Profile::Admin),
        ActorKind::Organization => Ok(Profile::Organization(OrganizationProfile {
            website: present(&request.website),
        })),
        ActorKind::Volunteer => {
            let age = request
                .age
                .ok_or_else(|| ServiceError::Validation("age is required".to_string()))?;
            Ok(Profile::Volunteer(VolunteerProfile {
                age,
                skills: request.skills.clone().unwrap_or_default(),
                availability: present(&request.availability),
                availability_dates: Vec::new(),
                profile_picture: present(&request.profile_picture),
                is_active: true,
                last_login: None,
            }))
        }
    }
}

pub fn find_by_email(
    store: &DocumentStore,
    kind: ActorKind,
    email: &str,
) -> Result<Option<Account>, ServiceError> {
    store.find(kind.collection(), |account: &Account| account.email == email)
}

pub fn get_account(store: &DocumentStore, kind: ActorKind, id: &str) -> Result<Account, ServiceError> {
    store
        .get(kind.collection(), id)?
        .ok_or_else(|| ServiceError::NotFound(format!("{} not found", capitalize(kind.as_str()))))
}

pub fn list_accounts(store: &DocumentStore, kind: ActorKind) -> Result<Vec<Account>, ServiceError> {
    let mut accounts: Vec<Account> = store.list(kind.collection())?;
    accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(accounts)
}

// Create an account of the given kind; the password is only ever stored hashed
pub fn register(state: &AppState, kind: ActorKind, request: &RegisterRequest) -> Result<Account, ServiceError> {
    let name = required(request.name.as_ref(), "name")?;
    let email = normalize_email(&required(request.email.as_ref(), "email")?)?;
    let plaintext = request
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ServiceError::Validation("password is required".to_string()))?;

    let (contact_number, address) = match kind {
        ActorKind::Volunteer | ActorKind::Organization => (
            Some(required(request.contact_number.as_ref(), "contactNumber")?),
            Some(required(request.address.as_ref(), "address")?),
        ),
        _ => (present(&request.contact_number), present(&request.address)),
    };
    let profile = profile_for(kind, request)?;

    // Hash outside the store lock, bcrypt is slow on purpose
    let password_hash = password::hash_password(plaintext)?;

    let now = Utc::now();
    let account = Account {
        id: Uuid::new_v4().to_string(),
        name,
        email,
        password_hash,
        contact_number,
        address,
        created_at: now,
        updated_at: now,
        profile,
    };

    let _guard = state.store.lock()?;
    if find_by_email(&state.store, kind, &account.email)?.is_some() {
        error!("❌ {} email already registered: {}", kind, account.email);
        return Err(ServiceError::DuplicateEmail);
    }
    state.store.save(kind.collection(), &account.id, &account)?;

    info!("✅ Registered {} {}", kind, account.id);
    Ok(account)
}

// Verify credentials and issue a token for the matching account
pub fn login(state: &AppState, kind: ActorKind, credentials: &Credentials) -> Result<LoginResponse, ServiceError> {
    let email = credentials.email.trim().to_lowercase();

    let account = find_by_email(&state.store, kind, &email)?.ok_or_else(|| {
        error!("❌ No {} with email: {}", kind, email);
        ServiceError::NotFound("Invalid email".to_string())
    })?;

    if !password::verify_password(&credentials.password, &account.password_hash)? {
        error!("❌ Invalid password for {} {}", kind, account.id);
        return Err(ServiceError::InvalidCredential);
    }

    if kind == ActorKind::Volunteer {
        record_last_login(&state.store, &account.id)?;
    }

    let token = jwt::generate_token(kind, &account.id, &state.config.jwt_secret)?;
    info!("✅ {} logged in: {}", capitalize(kind.as_str()), account.id);

    Ok(LoginResponse {
        token,
        kind,
        id: account.id,
    })
}

fn record_last_login(store: &DocumentStore, volunteer_id: &str) -> Result<(), ServiceError> {
    let _guard = store.lock()?;
    let mut account: Account = match store.get(ActorKind::Volunteer.collection(), volunteer_id)? {
        Some(account) => account,
        None => return Ok(()),
    };

    if let Profile::Volunteer(profile) = &mut account.profile {
        profile.last_login = Some(Utc::now());
    }
    store.save(ActorKind::Volunteer.collection(), &account.id, &account)
}

// Hard delete; volunteers are also dropped from every roster
pub fn delete_account(store: &DocumentStore, kind: ActorKind, id: &str) -> Result<(), ServiceError> {
    let _guard = store.lock()?;
    get_account(store, kind, id)?;

    // Rosters are cleaned before the account itself goes
    if kind == ActorKind::Volunteer {
        let touched = event_service::strip_volunteer_from_rosters(store, id)?;
        info!("Removed volunteer {} from {} rosters", id, touched);
    }

    store.delete(kind.collection(), id)?;
    info!("🗑️ Deleted {} {}", kind, id);
    Ok(())
}

// Make sure the configured admin account exists
pub fn ensure_admin(state: &AppState, bootstrap: &AdminBootstrap) -> Result<Account, ServiceError> {
    let email = normalize_email(&bootstrap.email)?;
    if bootstrap.password.is_empty() {
        error!("❌ Refusing to bootstrap admin {} without a password", email);
        return Err(ServiceError::Validation("Admin password must not be empty".to_string()));
    }

    if let Some(id) = &bootstrap.id {
        if let Some(existing) = state.store.get::<Account>(ActorKind::Admin.collection(), id)? {
            return Ok(existing);
        }
    }
    if let Some(existing) = find_by_email(&state.store, ActorKind::Admin, &email)? {
        return Ok(existing);
    }

    let now = Utc::now();
    let account = Account {
        id: bootstrap
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        name: "Administrator".to_string(),
        email,
        password_hash: password::hash_password(&bootstrap.password)?,
        contact_number: None,
        address: None,
        created_at: now,
        updated_at: now,
        profile: Profile::Admin,
    };

    let _guard = state.store.lock()?;
    state
        .store
        .save(ActorKind::Admin.collection(), &account.id, &account)?;

    info!("✅ Bootstrap admin created: {}", account.id);
    Ok(account)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::test_state;

    fn volunteer_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some("Nimal".to_string()),
            email: Some(email.to_string()),
            password: Some("Passw0rd!".to_string()),
            contact_number: Some("0711111111".to_string()),
            address: Some("Kandy".to_string()),
            age: Some(24),
            skills: Some(vec!["cooking".to_string()]),
            ..Default::default()
        }
    }

    #[test]
    fn register_then_login_yields_token_for_same_actor() {
        let state = test_state();
        let account = register(&state, ActorKind::Volunteer, &volunteer_request("Nimal@Mail.com")).unwrap();
        assert_eq!(account.email, "nimal@mail.com");
        assert_ne!(account.password_hash, "Passw0rd!");

        let response = login(
            &state,
            ActorKind::Volunteer,
            &Credentials {
                email: "nimal@mail.com".to_string(),
                password: "Passw0rd!".to_string(),
            },
        )
        .unwrap();

        let claims = jwt::decode_token(&response.token, &state.config.jwt_secret).unwrap();
        assert_eq!(claims.kind, ActorKind::Volunteer);
        assert_eq!(claims.sub, account.id);

        let stored = get_account(&state.store, ActorKind::Volunteer, &account.id).unwrap();
        assert!(stored.volunteer_profile().unwrap().last_login.is_some());
    }

    #[test]
    fn duplicate_email_is_rejected_per_kind() {
        let state = test_state();
        register(&state, ActorKind::Volunteer, &volunteer_request("dup@mail.com")).unwrap();

        let again = register(&state, ActorKind::Volunteer, &volunteer_request("DUP@mail.com"));
        assert_eq!(again.unwrap_err(), ServiceError::DuplicateEmail);

        // Same email under another kind is a separate identity
        let as_user = RegisterRequest {
            name: Some("Nimal".to_string()),
            email: Some("dup@mail.com".to_string()),
            password: Some("pw".to_string()),
            ..Default::default()
        };
        assert!(register(&state, ActorKind::User, &as_user).is_ok());
    }

    #[test]
    fn wrong_password_and_unknown_email_fail_distinctly() {
        let state = test_state();
        register(&state, ActorKind::Volunteer, &volunteer_request("kamal@mail.com")).unwrap();

        let wrong = login(
            &state,
            ActorKind::Volunteer,
            &Credentials {
                email: "kamal@mail.com".to_string(),
                password: "nope".to_string(),
            },
        );
        assert_eq!(wrong.unwrap_err(), ServiceError::InvalidCredential);

        let unknown = login(
            &state,
            ActorKind::Volunteer,
            &Credentials {
                email: "ghost@mail.com".to_string(),
                password: "nope".to_string(),
            },
        );
        assert!(matches!(unknown, Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn volunteer_registration_requires_profile_fields() {
        let state = test_state();
        let mut request = volunteer_request("young@mail.com");
        request.age = None;
        assert!(matches!(
            register(&state, ActorKind::Volunteer, &request),
            Err(ServiceError::Validation(_))
        ));

        let mut request = volunteer_request("young@mail.com");
        request.address = Some("   ".to_string());
        assert!(matches!(
            register(&state, ActorKind::Volunteer, &request),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn bootstrap_admin_is_created_once() {
        let state = test_state();
        let bootstrap = AdminBootstrap {
            id: Some("ADM001002".to_string()),
            email: "admin@csn.org".to_string(),
            password: "root-pass".to_string(),
        };

        let first = ensure_admin(&state, &bootstrap).unwrap();
        let second = ensure_admin(&state, &bootstrap).unwrap();
        assert_eq!(first.id, "ADM001002");
        assert_eq!(second.id, first.id);
        assert_eq!(list_accounts(&state.store, ActorKind::Admin).unwrap().len(), 1);

        let response = login(
            &state,
            ActorKind::Admin,
            &Credentials {
                email: "admin@csn.org".to_string(),
                password: "root-pass".to_string(),
            },
        )
        .unwrap();
        assert_eq!(response.id, "ADM001002");
    }

    #[test]
    fn bootstrap_admin_needs_a_password() {
        let state = test_state();
        let bootstrap = AdminBootstrap {
            id: None,
            email: "admin@csn.org".to_string(),
            password: String::new(),
        };

        assert!(matches!(
            ensure_admin(&state, &bootstrap),
            Err(ServiceError::Validation(_))
        ));
        assert!(list_accounts(&state.store, ActorKind::Admin).unwrap().is_empty());

        let login_attempt = login(
            &state,
            ActorKind::Admin,
            &Credentials {
                email: "admin@csn.org".to_string(),
                password: String::new(),
            },
        );
        assert!(matches!(login_attempt, Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn unreadable_stored_account_blocks_registration() {
        let state = test_state();
        let dir = state.store.root().join(ActorKind::Volunteer.collection());
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("legacy.json"),
            r#"{"id": "legacy", "name": "Old", "email": "taken@mail.com", "kind": "volunteer"}"#,
        )
        .unwrap();

        let result = register(&state, ActorKind::Volunteer, &volunteer_request("taken@mail.com"));
        assert_eq!(result.unwrap_err(), ServiceError::Unexpected);
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);
    }

    #[test]
    fn failed_roster_cleanup_keeps_the_volunteer() {
        let state = test_state();
        let volunteer = register(&state, ActorKind::Volunteer, &volunteer_request("stays@mail.com")).unwrap();

        let events_dir = state.store.root().join(event_service::EVENTS);
        std::fs::create_dir_all(&events_dir).unwrap();
        std::fs::write(events_dir.join("broken.json"), "{ not an event").unwrap();

        let result = delete_account(&state.store, ActorKind::Volunteer, &volunteer.id);
        assert_eq!(result.unwrap_err(), ServiceError::Unexpected);
        assert!(get_account(&state.store, ActorKind::Volunteer, &volunteer.id).is_ok());

        std::fs::remove_file(events_dir.join("broken.json")).unwrap();
        delete_account(&state.store, ActorKind::Volunteer, &volunteer.id).unwrap();
        assert!(matches!(
            delete_account(&state.store, ActorKind::Volunteer, &volunteer.id),
            Err(ServiceError::NotFound(_))
        ));
    }
}
