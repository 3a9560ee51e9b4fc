//! Session middleware configuration and typed session accessors.
//!
//! Sessions are held in a bounded in-memory cache owned by the server
//! process. Entries are evicted when they expire or when the cache is full.
//! A restart logs every shopper out and empties their carts.

use ark_core::BackendCookie;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tower_sessions::{Expiry, Session, SessionManagerLayer, session};
use tower_sessions_moka_store::MokaStore;

use crate::config::StorefrontConfig;
use crate::models::{Cart, Wishlist, session_keys};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "ark_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Most sessions kept at once; the least recently used go first.
pub const SESSION_CAPACITY: u64 = 100_000;

/// Session store that drops expired and least recently used sessions.
#[must_use]
pub fn session_store() -> MokaStore {
    MokaStore::new(Some(SESSION_CAPACITY))
}

/// Create the session layer with a bounded in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaStore> {
    SessionManagerLayer::new(session_store())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

async fn load_or_default<T>(session: &Session, key: &str) -> Result<T, session::Error>
where
    T: DeserializeOwned + Default,
{
    Ok(session.get::<T>(key).await?.unwrap_or_default())
}

async fn store<T: Serialize + Sync>(
    session: &Session,
    key: &str,
    value: &T,
) -> Result<(), session::Error> {
    session.insert(key, value).await
}

/// The browser's cart (empty if none yet).
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn load_cart(session: &Session) -> Result<Cart, session::Error> {
    load_or_default(session, session_keys::CART).await
}

/// Replace the browser's cart.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), session::Error> {
    store(session, session_keys::CART, cart).await
}

/// The browser's wishlist (empty if none yet).
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn load_wishlist(session: &Session) -> Result<Wishlist, session::Error> {
    load_or_default(session, session_keys::WISHLIST).await
}

/// Replace the browser's wishlist.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_wishlist(session: &Session, wishlist: &Wishlist) -> Result<(), session::Error> {
    store(session, session_keys::WISHLIST, wishlist).await
}

/// Cookies the backend issued for this browser.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn load_backend_cookie(session: &Session) -> Result<BackendCookie, session::Error> {
    load_or_default(session, session_keys::BACKEND_COOKIE).await
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
    store(session, session_keys::BACKEND_COOKIE, jar).await
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
