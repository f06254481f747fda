//! Swipe session replay.
//!
//! Runs a list of key presses against a fresh session over the whole
//! catalog and reports where it ended up. Decisions apply immediately;
//! there is no settle delay outside the HTTP service.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use style_mingle_core::swipe::{
    Key, Outcome, SessionState, SwipeCommand, SwipeEvent, SwipeSession, key_command,
};
use style_mingle_core::{CustomerId, ProductId};

use super::{CommandError, open_catalog};

/// One replayed key.
#[derive(Debug, Serialize)]
pub struct Step {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<SwipeCommand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    pub cursor: usize,
}

/// Final state of a replay.
#[derive(Debug, Serialize)]
pub struct Replay {
    pub customer: CustomerId,
    pub steps: Vec<Step>,
    pub state: SessionState,
    pub cursor: usize,
    pub liked: Vec<ProductId>,
    pub disliked: Vec<ProductId>,
    /// Number of favorites toasts the shopper would have seen.
    pub favorites_added: usize,
}

/// Replay `keys` for the customer matching `identifier`.
///
/// A fresh sign-in has no earlier decisions, so the deck is the whole
/// catalog whoever the customer is. The identifier only has to resolve.
///
/// # Errors
///
/// Returns an error if the catalog is invalid, nothing matches, or a key
/// cannot be parsed.
pub fn replay(
    file: Option<&Path>,
    identifier: &str,
    keys: &[String],
) -> Result<Replay, CommandError> {
    let parsed = keys
        .iter()
        .map(|raw| {
            raw.trim()
                .parse::<Key>()
                .map(|key| (raw.trim().to_string(), key))
                .map_err(CommandError::InvalidArgument)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let catalog = open_catalog(file)?;
    let customer = catalog.find_customer(identifier)?;
    let mut session = SwipeSession::new(catalog.list_products().to_vec());

    let toasts = Arc::new(Mutex::new(0_usize));
    let counter = Arc::clone(&toasts);
    session.subscribe(move |event| {
        if let SwipeEvent::AddedToFavorites(product) = event {
            tracing::info!(product = %product.id, "Added to favorites");
            *counter.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        }
    });

    let steps = parsed
        .into_iter()
        .map(|(key, parsed_key)| {
            let command = key_command(parsed_key);
            let outcome = command.map(|command| session.apply(command));
            Step {
                key,
                command,
                outcome,
                cursor: session.cursor(),
            }
        })
        .collect();

    let decisions = session.decisions();
    let favorites_added = *toasts.lock().unwrap_or_else(PoisonError::into_inner);
    Ok(Replay {
        customer: customer.id.clone(),
        steps,
        state: session.state(),
        cursor: session.cursor(),
        liked: decisions.liked.iter().map(|p| p.id.clone()).collect(),
        disliked: decisions.disliked.iter().map(|p| p.id.clone()).collect(),
        favorites_added,
    })
}
