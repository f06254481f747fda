//! Catalog inspection commands.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use style_mingle_core::Catalog;

use super::{CommandError, open_catalog};

/// Summary of a valid catalog.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogReport {
    pub customers: usize,
    pub products: usize,
    pub associates: usize,
    pub active_associates: usize,
    pub on_sale: usize,
    pub out_of_stock: usize,
    /// Product count per category.
    pub categories: BTreeMap<String, usize>,
}

impl From<&Catalog> for CatalogReport {
    fn from(catalog: &Catalog) -> Self {
        let products = catalog.list_products();
        let mut categories = BTreeMap::new();
        for product in products {
            *categories.entry(product.category.clone()).or_insert(0) += 1;
        }

        Self {
            customers: catalog.list_customers().len(),
            products: products.len(),
            associates: catalog.list_associates().len(),
            active_associates: catalog
                .list_associates()
                .iter()
                .filter(|a| a.active_status)
                .count(),
            on_sale: products.iter().filter(|p| p.is_on_sale()).count(),
            out_of_stock: products.iter().filter(|p| !p.in_stock).count(),
            categories,
        }
    }
}

/// Load and validate a catalog.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read or fails validation.
pub fn validate(file: Option<&Path>) -> Result<CatalogReport, CommandError> {
    let catalog = open_catalog(file)?;
    let report = CatalogReport::from(&catalog);
    tracing::info!(
        customers = report.customers,
        products = report.products,
        "Catalog is valid"
    );
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_bundled_catalog() {
        let report = validate(None).unwrap();
        assert_eq!(report.customers, 2);
        assert_eq!(report.products, 10);
        assert_eq!(report.associates, 3);
        assert_eq!(report.active_associates, 2);
        assert_eq!(report.categories.values().sum::<usize>(), 10);
    }

    #[test]
    fn test_validate_missing_file() {
        let err = validate(Some(Path::new("/nonexistent/catalog.json"))).unwrap_err();
        assert!(matches!(err, CommandError::Catalog(_)));
    }
}
