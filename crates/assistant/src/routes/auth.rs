//! Sign-in route handlers.
//!
//! Demo sign-in only: shoppers identify with email or phone, associates with
//! their work email. There are no passwords.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use uuid::Uuid;

use style_mingle_core::{AuthContext, LookupError, Principal, Role};

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{CurrentPrincipal, SessionPrincipal, clear_principal, set_principal};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Shopper sign-in body.
#[derive(Debug, Deserialize)]
pub struct CustomerLogin {
    /// Email address or phone number.
    pub identifier: String,
}

/// Associate sign-in body.
#[derive(Debug, Deserialize)]
pub struct AssociateLogin {
    pub email: String,
}

/// The signed-in principal as shown to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalView {
    pub role: Role,
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loyalty_points: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_location: Option<String>,
}

impl From<&Principal> for PrincipalView {
    fn from(principal: &Principal) -> Self {
        let (id, store_location) = match principal {
            Principal::Customer(c) => (c.id.to_string(), None),
            Principal::SalesAssociate(a) => (a.id.to_string(), Some(a.store_location.clone())),
        };
        Self {
            role: principal.role(),
            id,
            name: principal.display_name().to_string(),
            loyalty_points: principal.loyalty_points(),
            store_location,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Sign a shopper in by email or phone.
pub async fn customer_login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CustomerLogin>,
) -> Result<Json<PrincipalView>> {
    let ctx = AuthContext::login_customer(state.catalog(), &body.identifier)
        .map_err(login_failed)?;
    begin(&state, &session, &ctx).await
}

/// Sign an associate in by email.
pub async fn associate_login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AssociateLogin>,
) -> Result<Json<PrincipalView>> {
    let ctx = AuthContext::login_associate(state.catalog(), &body.email).map_err(login_failed)?;
    begin(&state, &session, &ctx).await
}

/// Sign out and drop any swipe state of this login.
pub async fn logout(State(state): State<AppState>, session: Session) -> Result<StatusCode> {
    if let Some(previous) = clear_principal(&session).await? {
        state.discover().end_login(previous.login).await;
        tracing::info!(principal = ?previous.principal, "Signed out");
    }
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// Who is signed in.
pub async fn me(CurrentPrincipal(current): CurrentPrincipal) -> Result<Json<PrincipalView>> {
    current
        .map(|(principal, _)| Json(PrincipalView::from(&principal)))
        .ok_or_else(|| AppError::Unauthorized("not signed in".to_string()))
}

// =============================================================================
// Helpers
// =============================================================================

async fn begin(
    state: &AppState,
    session: &Session,
    ctx: &AuthContext,
) -> Result<Json<PrincipalView>> {
    // Signing in over an existing login ends it.
    if let Some(previous) = clear_principal(session).await? {
        state.discover().end_login(previous.login).await;
    }

    let principal = ctx.principal();
    let stored = SessionPrincipal {
        principal: principal.key(),
        login: Uuid::new_v4(),
    };
    set_principal(session, &stored).await?;

    let (id, email) = match principal {
        Principal::Customer(c) => (c.id.to_string(), c.email.as_str()),
        Principal::SalesAssociate(a) => (a.id.to_string(), a.email.as_str()),
    };
    set_sentry_user(&id, Some(email));

    Ok(Json(PrincipalView::from(principal)))
}

/// Unknown identifiers are a failed sign-in, not a missing resource.
fn login_failed(err: LookupError) -> AppError {
    match err {
        LookupError::EmptyIdentifier => AppError::BadRequest(err.to_string()),
        LookupError::NotFound(_) => AppError::Unauthorized("no account matches".to_string()),
    }
}
