//! Shopper route handlers: profile, swipe-to-discover and favorites.
//!
//! All handlers require a signed-in customer. The swipe session opens on
//! first use and lives until it is closed, the shopper signs out, or the
//! login goes idle.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use style_mingle_core::swipe::{Key, SwipeCommand};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireCustomer;
use crate::routes::associate::CustomerProfile;
use crate::services::{DiscoverReply, Favorites, GestureInput, GesturePhase};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CommandBody {
    pub command: SwipeCommand,
}

#[derive(Debug, Deserialize)]
pub struct KeyBody {
    /// DOM key name (`ArrowLeft`) or a single character.
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct GestureBody {
    pub phase: GesturePhase,
    /// Pointer x coordinate; required for `start` and `move`.
    pub x: Option<f64>,
}

impl GestureBody {
    fn into_input(self) -> Result<GestureInput> {
        let x = || {
            self.x
                .filter(|x| x.is_finite())
                .ok_or_else(|| AppError::BadRequest("x is required for start and move".to_string()))
        };
        Ok(match self.phase {
            GesturePhase::Start => GestureInput::Start(x()?),
            GesturePhase::Move => GestureInput::Move(x()?),
            GesturePhase::End => GestureInput::End,
            GesturePhase::Cancel => GestureInput::Cancel,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct Closed {
    pub closed: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// The signed-in shopper's own profile.
pub async fn me(RequireCustomer { customer, .. }: RequireCustomer) -> Json<CustomerProfile> {
    Json(CustomerProfile::from(&customer))
}

/// Current card and session state.
pub async fn show(
    State(state): State<AppState>,
    RequireCustomer { login, .. }: RequireCustomer,
) -> Result<Json<DiscoverReply>> {
    Ok(Json(state.discover().view(login).await?))
}

/// Run a swipe command.
pub async fn command(
    State(state): State<AppState>,
    RequireCustomer { customer, login }: RequireCustomer,
    Json(body): Json<CommandBody>,
) -> Result<Json<DiscoverReply>> {
    let command = format!("{:?}", body.command);
    add_breadcrumb(
        "discover",
        "Swipe command",
        &[("customer", customer.id.as_str()), ("command", &command)],
    );
    Ok(Json(state.discover().command(login, body.command).await?))
}

/// Run the command bound to a key.
pub async fn key(
    State(state): State<AppState>,
    RequireCustomer { login, .. }: RequireCustomer,
    Json(body): Json<KeyBody>,
) -> Result<Json<DiscoverReply>> {
    let key = body.key.parse::<Key>().map_err(AppError::BadRequest)?;
    Ok(Json(state.discover().key(login, key).await?))
}

/// Feed pointer input to the swipe gesture.
pub async fn gesture(
    State(state): State<AppState>,
    RequireCustomer { login, .. }: RequireCustomer,
    Json(body): Json<GestureBody>,
) -> Result<Json<DiscoverReply>> {
    let input = body.into_input()?;
    Ok(Json(state.discover().gesture(login, input).await?))
}

/// Close the swipe session, cancelling any pending decision.
pub async fn close(
    State(state): State<AppState>,
    RequireCustomer { login, .. }: RequireCustomer,
) -> Json<Closed> {
    Json(Closed {
        closed: state.discover().close(login).await,
    })
}

/// Liked and disliked products of this login.
pub async fn favorites(
    State(state): State<AppState>,
    RequireCustomer { login, .. }: RequireCustomer,
) -> Json<Favorites> {
    Json(state.discover().favorites(login).await)
}
