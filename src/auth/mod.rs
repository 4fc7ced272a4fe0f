//! Auth Service: shared-secret login and signed session tokens.
//!
//! `login` verifies a username/password pair and issues a signed JWT carrying
//! the username and user id. `resolve_identity` verifies a presented token and
//! recovers that identity; an absent or invalid token yields `None` rather
//! than an error, since missing identity only matters to protected mutations.
//!
//! The password check compares against a single process-wide secret, not a
//! per-user credential. That is a deliberate carry-over from the system this
//! replaces, kept as-is; see DESIGN.md.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ulid::Ulid;

use crate::schema::UserId;
use crate::store::{Store, StoreError};

/// Token lifetime. The signing library insists on an expiry claim; thirty
/// days keeps tokens usable across a demo session without being eternal.
const TOKEN_TTL_DAYS: i64 = 30;

/// Claims embedded in a session token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id as a ULID string
    sub: String,
    username: String,
    /// Expiry, seconds since the epoch
    exp: i64,
}

/// The identity recovered from a verified session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub user_id: UserId,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("wrong credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Issues and verifies session tokens.
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    login_password: String,
}

impl AuthService {
    /// Build the service from the process-wide signing secret and the shared
    /// login password, both loaded from configuration at startup.
    pub fn new(jwt_secret: &str, login_password: impl Into<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            login_password: login_password.into(),
        }
    }

    /// Verify a username/password pair and issue a signed token.
    ///
    /// Fails with [`AuthError::InvalidCredentials`] when the user does not
    /// exist or the password does not match the shared secret.
    pub fn login(
        &self,
        store: &dyn Store,
        username: &str,
        password: &str,
    ) -> Result<String, AuthError> {
        let user = store.find_user_by_username(username)?;
        let user = match user {
            Some(user) if password == self.login_password => user,
            _ => return Err(AuthError::InvalidCredentials),
        };

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            exp: (Utc::now() + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        debug!(username = %user.username, "issued session token");
        Ok(token)
    }

    /// Verify a token and recover the embedded identity.
    ///
    /// Any verification failure (bad signature, expired, malformed claims)
    /// yields `None`.
    pub fn resolve_identity(&self, token: &str) -> Option<Identity> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default()).ok()?;
        let user_id = data.claims.sub.parse::<Ulid>().ok()?;
        Some(Identity {
            username: data.claims.username,
            user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::User;
    use crate::store::SledStore;

    fn fixture() -> (AuthService, SledStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SledStore::open(dir.path().join("db")).unwrap();
        let auth = AuthService::new("test-signing-key", "secret");
        (auth, store, dir)
    }

    #[test]
    fn login_roundtrip() {
        let (auth, store, _dir) = fixture();
        let alice = store.insert_user(User::new("alice", None)).unwrap();

        let token = auth.login(&store, "alice", "secret").unwrap();
        let identity = auth.resolve_identity(&token).unwrap();
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.user_id, alice.id);
    }

    #[test]
    fn wrong_password_is_invalid_credentials() {
        let (auth, store, _dir) = fixture();
        store.insert_user(User::new("alice", None)).unwrap();

        let err = auth.login(&store, "alice", "wrong").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(err.to_string(), "wrong credentials");
    }

    #[test]
    fn unknown_user_is_invalid_credentials() {
        let (auth, store, _dir) = fixture();
        let err = auth.login(&store, "nobody", "secret").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn garbage_token_resolves_to_none() {
        let (auth, _store, _dir) = fixture();
        assert!(auth.resolve_identity("not-a-token").is_none());
    }

    #[test]
    fn token_signed_with_other_key_is_rejected() {
        let (auth, store, _dir) = fixture();
        store.insert_user(User::new("alice", None)).unwrap();
        let token = auth.login(&store, "alice", "secret").unwrap();

        let other = AuthService::new("different-key", "secret");
        assert!(other.resolve_identity(&token).is_none());
    }
}
