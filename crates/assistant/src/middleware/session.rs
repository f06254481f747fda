//! Session middleware configuration.
//!
//! Sessions live in memory: the demo has no database and a restart signs
//! everyone out.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::AssistantConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "sm_session";

/// Create the session layer with an in-memory store.
///
/// Sessions expire after the configured idle time, the same window after
/// which swipe state is dropped.
#[must_use]
pub fn create_session_layer(config: &AssistantConfig) -> SessionManagerLayer<MemoryStore> {
    let idle_secs = i64::try_from(config.session_idle.as_secs()).unwrap_or(i64::MAX);

    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(idle_secs),
        ))
        .with_secure(config.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
