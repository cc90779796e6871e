// csn-service/src/config.rs
use log::warn;
use std::env;
use std::path::PathBuf;

const DEV_JWT_SECRET: &str = "csn_development_secret_key";

// Credentials for the admin account ensured at startup
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub id: Option<String>,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_dir: PathBuf,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub allowed_origin: String,
    pub admin: Option<AdminBootstrap>,
}

impl AppConfig {
    // Read configuration from the process environment (after .env has been loaded)
    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                warn!("⚠️ JWT_SECRET not set, using development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let port = match env::var("PORT") {
            Ok(port) => port
                .parse::<u16>()
                .map_err(|e| format!("Invalid PORT '{}': {}", port, e))?,
            Err(_) => 5500,
        };

        let admin = admin_bootstrap(
            env::var("ADMIN_EMAIL").ok(),
            env::var("ADMIN_PASSWORD").ok(),
            env::var("ADMIN_ID").ok(),
        )?;

        Ok(Self {
            storage_dir: env::var("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./storage")),
            jwt_secret,
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            allowed_origin: env::var("ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            admin,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Both ADMIN_EMAIL and ADMIN_PASSWORD are needed; a blank password is a misconfiguration
fn admin_bootstrap(
    email: Option<String>,
    password: Option<String>,
    id: Option<String>,
) -> Result<Option<AdminBootstrap>, String> {
    match (email, password) {
        (Some(_), Some(password)) if password.is_empty() => {
            Err("ADMIN_PASSWORD must not be empty".to_string())
        }
        (Some(email), Some(password)) => Ok(Some(AdminBootstrap {
            id: id.filter(|id| !id.is_empty()),
            email,
            password,
        })),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_bootstrap_rejects_blank_password() {
        let result = admin_bootstrap(Some("admin@csn.org".to_string()), Some(String::new()), None);
        assert!(result.is_err());
    }

    #[test]
    fn admin_bootstrap_needs_email_and_password() {
        assert!(admin_bootstrap(Some("admin@csn.org".to_string()), None, None)
            .unwrap()
            .is_none());

        let admin = admin_bootstrap(
            Some("admin@csn.org".to_string()),
            Some("root-pass".to_string()),
            Some(String::new()),
        )
        .unwrap()
        .unwrap();
        assert_eq!(admin.email, "admin@csn.org");
        assert_eq!(admin.id, None);
    }
}
