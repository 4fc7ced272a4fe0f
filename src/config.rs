//! Startup configuration, loaded from the environment once at process start.

use ulid::Ulid;

/// Default shared login password, matching the system this replaces.
const DEFAULT_LOGIN_PASSWORD: &str = "secret";

/// Secrets the auth service needs, resolved at startup.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Process-wide token signing key
    pub jwt_secret: String,
    /// Shared login password checked against every login attempt
    pub login_password: String,
}

impl AuthConfig {
    /// Read secrets from the environment.
    ///
    /// When `PHONEBOOK_JWT_SECRET` is unset a random per-process key is
    /// generated: tokens then stay valid only for the lifetime of this
    /// process, which is fine for one-shot CLI use but a served instance
    /// should set the variable explicitly.
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("PHONEBOOK_JWT_SECRET")
            .unwrap_or_else(|_| format!("ephemeral-{}", Ulid::new()));
        let login_password =
            std::env::var("PHONEBOOK_PASSWORD").unwrap_or_else(|_| DEFAULT_LOGIN_PASSWORD.into());
        Self {
            jwt_secret,
            login_password,
        }
    }
}
