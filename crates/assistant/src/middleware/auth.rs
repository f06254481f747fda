//! Authentication extractors.
//!
//! The session stores a [`SessionPrincipal`]: who signed in and the id of
//! this particular login. Extractors resolve it against the catalog on every
//! request, so a principal removed from the catalog is signed out.

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use uuid::Uuid;

use style_mingle_core::{Customer, Principal, PrincipalKey, SalesAssociate};

use crate::error::AppError;
use crate::state::AppState;

/// Session key for the signed-in principal.
pub const PRINCIPAL_KEY: &str = "principal";

/// Session-stored identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPrincipal {
    pub principal: PrincipalKey,
    /// Fresh per login; keys the shopper's swipe state.
    pub login: Uuid,
}

async fn session_principal(parts: &Parts) -> Result<Option<SessionPrincipal>, AppError> {
    let Some(session) = parts.extensions.get::<Session>() else {
        return Ok(None);
    };
    Ok(session.get::<SessionPrincipal>(PRINCIPAL_KEY).await?)
}

async fn resolve(parts: &Parts, state: &AppState) -> Result<Option<(Principal, Uuid)>, AppError> {
    let Some(stored) = session_principal(parts).await? else {
        return Ok(None);
    };
    match stored.principal.resolve(state.catalog()) {
        Ok(principal) => Ok(Some((principal, stored.login))),
        Err(e) => {
            tracing::warn!(error = %e, "Session principal no longer in catalog");
            Ok(None)
        }
    }
}

/// Extractor for the optional signed-in principal and its login id.
pub struct CurrentPrincipal(pub Option<(Principal, Uuid)>);

impl FromRequestParts<AppState> for CurrentPrincipal {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Self(resolve(parts, state).await?))
    }
}

/// Extractor that requires a signed-in shopper.
///
/// Rejects with 401 when nobody is signed in and 403 for associates.
pub struct RequireCustomer {
    pub customer: Customer,
    pub login: Uuid,
}

impl FromRequestParts<AppState> for RequireCustomer {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match resolve(parts, state).await? {
            Some((Principal::Customer(customer), login)) => Ok(Self { customer, login }),
            Some((Principal::SalesAssociate(_), _)) => {
                Err(AppError::Forbidden("customer sign-in required".to_string()))
            }
            None => Err(AppError::Unauthorized("not signed in".to_string())),
        }
    }
}

/// Extractor that requires a signed-in sales associate.
///
/// Rejects with 401 when nobody is signed in and 403 for shoppers.
pub struct RequireAssociate(pub SalesAssociate);

impl FromRequestParts<AppState> for RequireAssociate {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match resolve(parts, state).await? {
            Some((Principal::SalesAssociate(associate), _)) => Ok(Self(associate)),
            Some((Principal::Customer(_), _)) => {
                Err(AppError::Forbidden("sales associate sign-in required".to_string()))
            }
            None => Err(AppError::Unauthorized("not signed in".to_string())),
        }
    }
}

/// Store the principal in the session, rotating the session id.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_principal(
    session: &Session,
    principal: &SessionPrincipal,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(PRINCIPAL_KEY, principal).await
}

/// Remove the principal from the session (logout), returning it.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_principal(
    session: &Session,
) -> Result<Option<SessionPrincipal>, tower_sessions::session::Error> {
    let previous = session.remove::<SessionPrincipal>(PRINCIPAL_KEY).await?;
    session.flush().await?;
    Ok(previous)
}
