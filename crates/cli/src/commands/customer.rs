//! Customer lookup commands.

use std::path::Path;

use style_mingle_assistant::routes::associate::CustomerProfile;

use super::{CommandError, open_catalog};

/// Find a customer by id, email or phone.
///
/// # Errors
///
/// Returns an error if the catalog is invalid or nothing matches.
pub fn find(file: Option<&Path>, identifier: &str) -> Result<CustomerProfile, CommandError> {
    let catalog = open_catalog(file)?;
    let customer = catalog.find_customer(identifier)?;
    tracing::info!(customer = %customer.id, "Customer found");
    Ok(CustomerProfile::from(customer))
}
