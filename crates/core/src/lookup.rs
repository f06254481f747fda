//! Customer lookup by id, email or phone.
//!
//! Associates search with whatever the customer gives them, so one
//! identifier string is tried as an id first, then as an email, then as a
//! phone number. Because the catalog guarantees every identifier belongs to
//! at most one customer, the first hit is the only hit.

use thiserror::Error;
use tracing::debug;

use crate::catalog::{Catalog, Customer, SalesAssociate};
use crate::types::{Email, Phone};

/// Errors from customer and associate lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Nothing matched the identifier.
    #[error("no match for {0:?}")]
    NotFound(String),

    /// The identifier was empty after trimming.
    #[error("identifier cannot be empty")]
    EmptyIdentifier,
}

impl Catalog {
    /// Find a customer by id, email or phone.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::EmptyIdentifier`] for blank input and
    /// [`LookupError::NotFound`] when nothing matches.
    pub fn find_customer(&self, identifier: &str) -> Result<&Customer, LookupError> {
        let identifier = non_empty(identifier)?;

        let found = self
            .customer_by_key(identifier)
            .or_else(|| self.customer_by_email(identifier))
            .or_else(|| self.customer_by_phone(identifier));

        debug!(identifier, found = found.is_some(), "Customer lookup");
        found.ok_or_else(|| LookupError::NotFound(identifier.to_owned()))
    }

    /// Customer login: matches email or phone only, never the internal id.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] when the identifier is blank or unknown.
    pub fn login_customer(&self, identifier: &str) -> Result<&Customer, LookupError> {
        let identifier = non_empty(identifier)?;

        self.customer_by_email(identifier)
            .or_else(|| self.customer_by_phone(identifier))
            .ok_or_else(|| LookupError::NotFound(identifier.to_owned()))
    }

    /// Associate login by email.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] when the email is blank or unknown.
    pub fn login_associate(&self, email: &str) -> Result<&SalesAssociate, LookupError> {
        let raw = non_empty(email)?;
        let email = Email::parse(raw).map_err(|_| LookupError::NotFound(raw.to_owned()))?;

        self.list_associates()
            .iter()
            .find(|a| a.email == email)
            .ok_or_else(|| LookupError::NotFound(raw.to_owned()))
    }

    fn customer_by_email(&self, identifier: &str) -> Option<&Customer> {
        let email = Email::parse(identifier).ok()?;
        self.customer_by_key(email.as_str())
            .filter(|c| c.email == email)
    }

    fn customer_by_phone(&self, identifier: &str) -> Option<&Customer> {
        let phone = Phone::parse(identifier).ok()?;
        self.customer_by_key(phone.digits())
            .filter(|c| c.phone == phone)
    }
}

fn non_empty(identifier: &str) -> Result<&str, LookupError> {
    let trimmed = identifier.trim();
    if trimmed.is_empty() {
        Err(LookupError::EmptyIdentifier)
    } else {
        Ok(trimmed)
    }
}
