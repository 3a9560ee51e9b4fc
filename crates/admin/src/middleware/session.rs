//! Session middleware configuration for admin.
//!
//! Bounded in-memory sessions with stricter settings than the storefront
//! (SameSite=Strict, 24hr expiry). Expired sessions are evicted.

use ark_core::BackendCookie;
use tower_sessions::{Expiry, Session, SessionManagerLayer, session};
use tower_sessions_moka_store::MokaStore;

use crate::config::AdminConfig;
use crate::models::session_keys;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "ark_admin_session";

/// Session expiry time in seconds (24 hours - stricter than storefront).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Most admin sessions kept at once.
pub const SESSION_CAPACITY: u64 = 1_000;

/// Session store that drops expired and least recently used sessions.
#[must_use]
pub fn session_store() -> MokaStore {
    MokaStore::new(Some(SESSION_CAPACITY))
}

/// Create the session layer with a bounded in-memory store.
#[must_use]
pub fn create_session_layer(config: &AdminConfig) -> SessionManagerLayer<MokaStore> {
    SessionManagerLayer::new(session_store())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        // SameSite=Strict for admin (stricter than storefront's Lax)
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}

/// Cookies the backend issued for this admin (empty if none).
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn load_backend_cookie(session: &Session) -> Result<BackendCookie, session::Error> {
    Ok(session
        .get::<BackendCookie>(session_keys::BACKEND_COOKIE)
        .await?
        .unwrap_or_default())
}

/// Persist the backend cookie jar, dropping the key once it is empty.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_backend_cookie(
    session: &Session,
    jar: &BackendCookie,
) -> Result<(), session::Error> {
    if jar.is_empty() {
        session
            .remove::<BackendCookie>(session_keys::BACKEND_COOKIE)
            .await?;
        return Ok(());
    }
    session.insert(session_keys::BACKEND_COOKIE, jar).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use tower_sessions::SessionStore;
    use tower_sessions::cookie::time::{Duration, OffsetDateTime};
    use tower_sessions::session::{Id, Record};

    use super::*;

    fn record(expires_in: Duration) -> Record {
        Record {
            id: Id::default(),
            data: HashMap::new(),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_live_session_is_kept() {
        let store = session_store();
        let live = record(Duration::hours(1));
        store.save(&live).await.unwrap();

        assert_eq!(store.load(&live.id).await.unwrap().map(|r| r.id), Some(live.id));
    }

    #[tokio::test]
    async fn test_expired_session_is_dropped() {
        let store = session_store();
        let stale = record(Duration::seconds(-60));
        store.save(&stale).await.unwrap();

        assert!(store.load(&stale.id).await.unwrap().is_none());
    }
}
