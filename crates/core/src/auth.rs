//! Who is using the app.
//!
//! The demo has no real authentication: a shopper signs in with their email
//! or phone and an associate with their work email. The signed-in party is a
//! [`Principal`], held in an explicit [`AuthContext`] that login creates and
//! logout consumes.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Customer, SalesAssociate};
use crate::lookup::LookupError;
use crate::types::{AssociateId, CustomerId};

/// Role of a signed-in principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    SalesAssociate,
}

/// A signed-in party.
#[derive(Debug, Clone, PartialEq)]
pub enum Principal {
    Customer(Customer),
    SalesAssociate(SalesAssociate),
}

impl Principal {
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Customer(_) => Role::Customer,
            Self::SalesAssociate(_) => Role::SalesAssociate,
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Customer(c) => &c.name,
            Self::SalesAssociate(a) => &a.name,
        }
    }

    /// Loyalty balance; associates have none.
    #[must_use]
    pub const fn loyalty_points(&self) -> Option<u32> {
        match self {
            Self::Customer(c) => Some(c.loyalty_points),
            Self::SalesAssociate(_) => None,
        }
    }

    /// Compact, serializable reference to this principal.
    #[must_use]
    pub fn key(&self) -> PrincipalKey {
        match self {
            Self::Customer(c) => PrincipalKey::Customer(c.id.clone()),
            Self::SalesAssociate(a) => PrincipalKey::SalesAssociate(a.id.clone()),
        }
    }
}

/// A principal by id, small enough to keep in a session cookie store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "role", content = "id")]
pub enum PrincipalKey {
    Customer(CustomerId),
    SalesAssociate(AssociateId),
}

impl PrincipalKey {
    /// Resolve against the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotFound`] if the id no longer exists.
    pub fn resolve(&self, catalog: &Catalog) -> Result<Principal, LookupError> {
        match self {
            Self::Customer(id) => catalog
                .customer(id)
                .cloned()
                .map(Principal::Customer)
                .ok_or_else(|| LookupError::NotFound(id.to_string())),
            Self::SalesAssociate(id) => catalog
                .associate(id)
                .cloned()
                .map(Principal::SalesAssociate)
                .ok_or_else(|| LookupError::NotFound(id.to_string())),
        }
    }
}

/// The signed-in principal of one client.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthContext {
    principal: Principal,
}

impl AuthContext {
    /// Sign a shopper in by email or phone.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if no customer matches.
    pub fn login_customer(catalog: &Catalog, identifier: &str) -> Result<Self, LookupError> {
        let customer = catalog.login_customer(identifier)?;
        tracing::info!(customer = %customer.id, "Customer signed in");
        Ok(Self {
            principal: Principal::Customer(customer.clone()),
        })
    }

    /// Sign an associate in by email.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if no associate matches.
    pub fn login_associate(catalog: &Catalog, email: &str) -> Result<Self, LookupError> {
        let associate = catalog.login_associate(email)?;
        tracing::info!(associate = %associate.id, "Sales associate signed in");
        Ok(Self {
            principal: Principal::SalesAssociate(associate.clone()),
        })
    }

    #[must_use]
    pub const fn principal(&self) -> &Principal {
        &self.principal
    }

    #[must_use]
    pub const fn customer(&self) -> Option<&Customer> {
        match &self.principal {
            Principal::Customer(c) => Some(c),
            Principal::SalesAssociate(_) => None,
        }
    }

    #[must_use]
    pub const fn associate(&self) -> Option<&SalesAssociate> {
        match &self.principal {
            Principal::SalesAssociate(a) => Some(a),
            Principal::Customer(_) => None,
        }
    }

    /// Sign out, handing back the principal.
    #[must_use]
    pub fn logout(self) -> Principal {
        tracing::info!(role = ?self.principal.role(), "Signed out");
        self.principal
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_login_and_logout() {
        let catalog = Catalog::seed().unwrap();
        let ctx = AuthContext::login_customer(&catalog, "555-123-4567").unwrap();
        assert_eq!(ctx.principal().role(), Role::Customer);
        assert_eq!(ctx.principal().loyalty_points(), Some(2450));
        assert!(ctx.associate().is_none());

        let principal = ctx.logout();
        assert_eq!(principal.display_name(), "Emma Wilson");
    }

    #[test]
    fn test_associate_login() {
        let catalog = Catalog::seed().unwrap();
        let ctx = AuthContext::login_associate(&catalog, "marcus.johnson@retailco.com").unwrap();
        assert_eq!(ctx.principal().role(), Role::SalesAssociate);
        assert_eq!(ctx.principal().loyalty_points(), None);
        assert!(ctx.customer().is_none());
    }

    #[test]
    fn test_login_rejects_unknown() {
        let catalog = Catalog::seed().unwrap();
        assert!(AuthContext::login_customer(&catalog, "nobody@example.com").is_err());
        assert!(AuthContext::login_associate(&catalog, "nobody@retailco.com").is_err());
    }

    #[test]
    fn test_principal_key_round_trip() {
        let catalog = Catalog::seed().unwrap();
        let ctx = AuthContext::login_associate(&catalog, "sophia.lee@retailco.com").unwrap();
        let key = ctx.principal().key();

        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, r#"{"role":"sales_associate","id":"sa-001"}"#);
        let back: PrincipalKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back.resolve(&catalog).unwrap(), *ctx.principal());
    }
}
