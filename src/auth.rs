//! Admin authentication: static credentials and a time-limited session marker.
//!
//! The marker lives in an `actix-session` cookie whose content is encrypted and
//! authenticated with the server key, so clients cannot mint or extend it.
//! Expiry is still checked lazily on every validation.

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::{time, Key, SameSite};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Name of the cookie carrying the session.
pub const SESSION_COOKIE: &str = "auth-session";
/// Entry inside the session holding the [`AuthSession`].
const SESSION_ENTRY: &str = "auth";
/// Validity window of a session marker.
pub const SESSION_TTL_HOURS: i64 = 24;

pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "password123";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum AuthError {
    #[error("Authentication required")]
    MissingSession,
    #[error("Session expired")]
    Expired,
    #[error("Invalid session")]
    Invalid,
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// The single admin credential pair.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

impl Credentials {
    /// Exact string equality on both fields.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Proof of a successful login.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub id: String,
    pub username: String,
    /// Milliseconds since the Unix epoch.
    pub expires_at: i64,
}

impl AuthSession {
    pub fn issue(username: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            expires_at: (now + Duration::hours(SESSION_TTL_HOURS)).timestamp_millis(),
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() < self.expires_at
    }
}

/// Validate an optional marker at `now`.
pub fn check_marker(marker: Option<AuthSession>, now: DateTime<Utc>) -> Result<AuthSession, AuthError> {
    let marker = marker.ok_or(AuthError::MissingSession)?;
    if marker.username.is_empty() {
        return Err(AuthError::Invalid);
    }
    if !marker.is_valid_at(now) {
        return Err(AuthError::Expired);
    }
    Ok(marker)
}

/// Session gate for admin-only handlers.
pub fn require_admin(session: &Session) -> Result<AuthSession, AuthError> {
    let marker = session
        .get::<AuthSession>(SESSION_ENTRY)
        .map_err(|_| AuthError::Invalid)?;
    let result = check_marker(marker, Utc::now());
    if result == Err(AuthError::Expired) {
        session.remove(SESSION_ENTRY);
    }
    result
}

/// Store a fresh marker in the session, rotating the session cookie.
pub fn start_session(session: &Session, username: &str) -> Result<AuthSession, actix_session::SessionInsertError> {
    let marker = AuthSession::issue(username, Utc::now());
    session.renew();
    session.insert(SESSION_ENTRY, &marker)?;
    Ok(marker)
}

/// Session middleware: encrypted cookie, HttpOnly, SameSite=Strict, 24h max age.
pub fn session_middleware(key: Key, secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_string())
        .cookie_secure(secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Strict)
        .cookie_content_security(CookieContentSecurity::Private)
        .session_lifecycle(
            PersistentSession::default().session_ttl(time::Duration::hours(SESSION_TTL_HOURS)),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_require_exact_match() {
        let creds = Credentials {
            username: "coach".into(),
            password: "s3cret".into(),
        };
        assert!(creds.verify("coach", "s3cret"));
        assert!(!creds.verify("Coach", "s3cret"));
        assert!(!creds.verify("coach", "s3cret "));
        assert!(!creds.is_default());
        assert!(Credentials::default().is_default());
    }

    #[test]
    fn marker_valid_for_24_hours() {
        let now = Utc::now();
        let marker = AuthSession::issue("admin", now);
        assert!(marker.is_valid_at(now));
        assert!(marker.is_valid_at(now + Duration::hours(23)));
        assert!(!marker.is_valid_at(now + Duration::hours(24)));
    }

    #[test]
    fn expired_marker_is_rejected() {
        let now = Utc::now();
        let marker = AuthSession::issue("admin", now - Duration::hours(25));
        assert_eq!(check_marker(Some(marker), now), Err(AuthError::Expired));
    }

    #[test]
    fn missing_and_malformed_markers_rejected() {
        let now = Utc::now();
        assert_eq!(check_marker(None, now), Err(AuthError::MissingSession));
        let mut marker = AuthSession::issue("admin", now);
        marker.username.clear();
        assert_eq!(check_marker(Some(marker), now), Err(AuthError::Invalid));
    }

    #[test]
    fn marker_serializes_like_the_cookie_payload() {
        let marker = AuthSession {
            id: "1".into(),
            username: "admin".into(),
            expires_at: 42,
        };
        let json = serde_json::to_value(&marker).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "1", "username": "admin", "expiresAt": 42 }));
    }
}
