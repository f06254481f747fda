//! HTTP route handlers for the assistant.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                               - Health check
//!
//! # Auth
//! POST /auth/customer/login                  - Shopper sign-in {identifier}
//! POST /auth/associate/login                 - Associate sign-in {email}
//! POST /auth/logout                          - Sign out
//! GET  /auth/me                              - Signed-in principal
//!
//! # Associate dashboard (requires associate)
//! GET  /api/customers/active                 - In-store customers with match cards
//! GET  /api/customers/lookup?q=              - Find by id, email or phone
//! GET  /api/customers/{id}                   - Customer profile
//! GET  /api/customers/{id}/recommendations   - Recommendations (?cap=&ranking=)
//!
//! # Shopper app (requires customer)
//! GET    /api/me                             - Own profile
//! GET    /api/discover                       - Current card (opens a session)
//! POST   /api/discover/command               - {command}
//! POST   /api/discover/key                   - {key}
//! POST   /api/discover/gesture               - {phase, x}
//! DELETE /api/discover                       - Close the session
//! GET    /api/favorites                      - Liked and disliked products
//! ```

pub mod associate;
pub mod auth;
pub mod discover;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/customer/login", post(auth::customer_login))
        .route("/associate/login", post(auth::associate_login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the associate dashboard routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/active", get(associate::active))
        .route("/lookup", get(associate::lookup))
        .route("/{id}", get(associate::show))
        .route("/{id}/recommendations", get(associate::recommendations))
}

/// Create the swipe-to-discover routes router.
pub fn discover_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(discover::show).delete(discover::close))
        .route("/command", post(discover::command))
        .route("/key", post(discover::key))
        .route("/gesture", post(discover::gesture))
}

/// Create all routes for the assistant.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_routes())
        .nest("/api/customers", customer_routes())
        .nest("/api/discover", discover_routes())
        .route("/api/me", get(discover::me))
        .route("/api/favorites", get(discover::favorites))
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
