//! In-memory catalog store.
//!
//! A [`Catalog`] holds the customers, products and sales associates loaded
//! once at process start. It is immutable after construction, so it can be
//! shared behind an `Arc` and read from any number of tasks without locking.
//!
//! Construction validates the document:
//! - product ids are unique
//! - every customer identifier (id, email, phone) belongs to one customer
//! - associate ids and emails are unique
//! - a sale price never exceeds the regular price
//! - purchase quantities are at least one
//! - a purchase total written in the document matches its items
//! - purchase totals and lifetime spend fit in a decimal

mod models;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use models::{Customer, Product, Purchase, PurchaseItem, SalesAssociate};

use crate::types::{AssociateId, CustomerId, Price, ProductId, PurchaseId};

/// The demo catalog shipped with the crate.
const SEED_CATALOG: &str = include_str!("seed.json");

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid catalog YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("duplicate product id {0}")]
    DuplicateProduct(ProductId),

    #[error("identifier {identifier:?} is shared by customers {first} and {second}")]
    DuplicateIdentifier {
        identifier: String,
        first: CustomerId,
        second: CustomerId,
    },

    #[error("duplicate sales associate {0}")]
    DuplicateAssociate(String),

    #[error("product {product}: sale price {sale} is above price {price}")]
    SaleAbovePrice {
        product: ProductId,
        price: Price,
        sale: Price,
    },

    #[error("purchase {purchase}: item {item} has zero quantity")]
    InvalidQuantity { purchase: PurchaseId, item: String },

    #[error("purchase {purchase}: total is too large")]
    TotalOverflow { purchase: PurchaseId },

    #[error("customer {customer}: lifetime spend is too large")]
    SpendOverflow { customer: CustomerId },

    #[error("purchase {purchase}: recorded total {recorded} does not match items total {computed}")]
    TotalMismatch {
        purchase: PurchaseId,
        recorded: Price,
        computed: Price,
    },
}

/// Serialized form of a catalog (JSON or YAML).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub associates: Vec<SalesAssociate>,
}

/// Validated, immutable catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    customers: Vec<Customer>,
    products: Vec<Product>,
    associates: Vec<SalesAssociate>,
    product_index: HashMap<ProductId, usize>,
    /// Every id, email and phone digit string, mapped to its customer.
    customer_keys: HashMap<String, usize>,
}

impl Catalog {
    /// Validate a document and build the catalog.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] found.
    pub fn from_document(doc: CatalogDocument) -> Result<Self, CatalogError> {
        let CatalogDocument {
            customers,
            products,
            associates,
        } = doc;

        let mut product_index = HashMap::with_capacity(products.len());
        for (idx, product) in products.iter().enumerate() {
            if product_index.insert(product.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
            if let Some(sale) = product.sale_price.filter(|&sale| sale > product.price) {
                return Err(CatalogError::SaleAbovePrice {
                    product: product.id.clone(),
                    price: product.price,
                    sale,
                });
            }
        }

        let mut customer_keys: HashMap<String, usize> = HashMap::new();
        for (idx, customer) in customers.iter().enumerate() {
            let keys = [
                customer.id.as_str().to_owned(),
                customer.email.as_str().to_owned(),
                customer.phone.digits().to_owned(),
            ];
            for key in keys {
                match customer_keys.get(&key) {
                    Some(&owner) if owner != idx => {
                        return Err(CatalogError::DuplicateIdentifier {
                            identifier: key,
                            first: customers
                                .get(owner)
                                .map_or_else(|| customer.id.clone(), |c| c.id.clone()),
                            second: customer.id.clone(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        customer_keys.insert(key, idx);
                    }
                }
            }
            for purchase in &customer.purchase_history {
                validate_purchase(purchase)?;
            }
            if customer.checked_total_spend().is_none() {
                return Err(CatalogError::SpendOverflow {
                    customer: customer.id.clone(),
                });
            }
        }

        let mut associate_keys = HashSet::new();
        for associate in &associates {
            for key in [associate.id.as_str(), associate.email.as_str()] {
                if !associate_keys.insert(key) {
                    return Err(CatalogError::DuplicateAssociate(key.to_owned()));
                }
            }
        }

        debug!(
            customers = customers.len(),
            products = products.len(),
            associates = associates.len(),
            "Catalog validated"
        );

        Ok(Self {
            customers,
            products,
            associates,
            product_index,
            customer_keys,
        })
    }

    /// Parse and validate a JSON catalog document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Self::from_document(serde_json::from_str(json)?)
    }

    /// Parse and validate a YAML catalog document.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or fails validation.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        Self::from_document(serde_yaml::from_str(yaml)?)
    }

    /// The bundled demo catalog.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled document is corrupt.
    pub fn seed() -> Result<Self, CatalogError> {
        Self::from_json_str(SEED_CATALOG)
    }

    /// All customers, in catalog order.
    #[must_use]
    pub fn list_customers(&self) -> &[Customer] {
        &self.customers
    }

    /// All products, in catalog order.
    #[must_use]
    pub fn list_products(&self) -> &[Product] {
        &self.products
    }

    /// All sales associates, in catalog order.
    #[must_use]
    pub fn list_associates(&self) -> &[SalesAssociate] {
        &self.associates
    }

    /// Product by id.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.product_index
            .get(id)
            .and_then(|&idx| self.products.get(idx))
    }

    /// Customer by id (not email or phone; see `find_customer`).
    #[must_use]
    pub fn customer(&self, id: &CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|c| &c.id == id)
    }

    /// Sales associate by id.
    #[must_use]
    pub fn associate(&self, id: &AssociateId) -> Option<&SalesAssociate> {
        self.associates.iter().find(|a| &a.id == id)
    }

    /// Customers shown as "currently in store" on the associate dashboard.
    #[must_use]
    pub fn active_customers(&self, limit: usize) -> &[Customer] {
        self.customers
            .get(..limit.min(self.customers.len()))
            .unwrap_or_default()
    }

    /// Products still to be swiped: the catalog minus `excluded`, in
    /// catalog order.
    #[must_use]
    pub fn discover_snapshot(&self, excluded: &HashSet<ProductId>) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| !excluded.contains(&p.id))
            .cloned()
            .collect()
    }

    pub(crate) fn customer_by_key(&self, key: &str) -> Option<&Customer> {
        self.customer_keys
            .get(key)
            .and_then(|&idx| self.customers.get(idx))
    }
}

fn validate_purchase(purchase: &Purchase) -> Result<(), CatalogError> {
    if let Some(item) = purchase.items.iter().find(|item| item.quantity == 0) {
        return Err(CatalogError::InvalidQuantity {
            purchase: purchase.id.clone(),
            item: item.id.to_string(),
        });
    }

    let computed = purchase
        .checked_total()
        .ok_or_else(|| CatalogError::TotalOverflow {
            purchase: purchase.id.clone(),
        })?;
    match purchase.recorded_total {
        Some(recorded) if recorded != computed => Err(CatalogError::TotalMismatch {
            purchase: purchase.id.clone(),
            recorded,
            computed,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product_json(id: &str, extra: &str) -> String {
        format!(
            r#"{{"id": "{id}", "name": "{id}", "category": "Tops", "price": "20.00",
                "sizes": ["S"], "inStock": true, "tags": [], "rating": 4.0{extra}}}"#
        )
    }

    #[test]
    fn test_seed_loads() {
        let catalog = Catalog::seed().unwrap();
        assert_eq!(catalog.list_customers().len(), 2);
        assert_eq!(catalog.list_products().len(), 10);
        assert_eq!(catalog.list_associates().len(), 3);
    }

    #[test]
    fn test_seed_totals_are_consistent() {
        let catalog = Catalog::seed().unwrap();
        let emma = catalog.customer(&CustomerId::new("cust-001")).unwrap();
        assert_eq!(emma.total_spend(), Price::from_cents(24497).unwrap());
        assert_eq!(emma.last_purchase().unwrap().to_string(), "2023-04-15");
    }

    #[test]
    fn test_product_lookup_by_id() {
        let catalog = Catalog::seed().unwrap();
        let coat = catalog.product(&ProductId::new("prod-003")).unwrap();
        assert_eq!(coat.name, "Wool Blend Overcoat");
        assert_eq!(coat.discount_percent(), Some(25));
        assert!(catalog.product(&ProductId::new("prod-999")).is_none());
    }

    #[test]
    fn test_rejects_duplicate_product() {
        let json = format!(
            r#"{{"products": [{}, {}]}}"#,
            product_json("p1", ""),
            product_json("p1", "")
        );
        assert!(matches!(
            Catalog::from_json_str(&json),
            Err(CatalogError::DuplicateProduct(_))
        ));
    }

    #[test]
    fn test_rejects_sale_above_price() {
        let json = format!(
            r#"{{"products": [{}]}}"#,
            product_json("p1", r#", "salePrice": "25.00""#)
        );
        assert!(matches!(
            Catalog::from_json_str(&json),
            Err(CatalogError::SaleAbovePrice { .. })
        ));
    }

    #[test]
    fn test_rejects_shared_email() {
        let json = r#"{"customers": [
            {"id": "c1", "name": "A", "email": "same@x.com", "phone": "555-000-0001"},
            {"id": "c2", "name": "B", "email": "SAME@x.com", "phone": "555-000-0002"}
        ]}"#;
        assert!(matches!(
            Catalog::from_json_str(json),
            Err(CatalogError::DuplicateIdentifier { .. })
        ));
    }

    #[test]
    fn test_rejects_id_equal_to_other_customers_phone_digits() {
        let json = r#"{"customers": [
            {"id": "c1", "name": "A", "email": "a@x.com", "phone": "555-000-0001"},
            {"id": "5550000001", "name": "B", "email": "b@x.com", "phone": "555-000-0002"}
        ]}"#;
        assert!(matches!(
            Catalog::from_json_str(json),
            Err(CatalogError::DuplicateIdentifier { .. })
        ));
    }

    #[test]
    fn test_rejects_total_mismatch() {
        let json = r#"{"customers": [{
            "id": "c1", "name": "A", "email": "a@x.com", "phone": "555-000-0001",
            "purchaseHistory": [{"id": "pur-1", "date": "2023-01-01", "total": "99.00",
                "items": [{"id": "i1", "name": "Tee", "category": "Tops", "size": "S",
                           "price": "10.00", "quantity": 2}]}]
        }]}"#;
        let err = Catalog::from_json_str(json).unwrap_err();
        assert!(matches!(err, CatalogError::TotalMismatch { .. }));
        assert!(err.to_string().contains("$20.00"));
    }

    #[test]
    fn test_rejects_line_total_overflow() {
        let json = r#"{"customers": [{
            "id": "c1", "name": "A", "email": "a@x.com", "phone": "555-000-0001",
            "purchaseHistory": [{"id": "pur-1", "date": "2023-01-01",
                "items": [{"id": "i1", "name": "Tee", "category": "Tops", "size": "S",
                           "price": "79000000000000000000000000000", "quantity": 4000000000}]}]
        }]}"#;
        let err = Catalog::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::TotalOverflow { ref purchase } if purchase.as_str() == "pur-1"
        ));
    }

    #[test]
    fn test_rejects_lifetime_spend_overflow() {
        let purchase = |id: &str| {
            format!(
                r#"{{"id": "{id}", "date": "2023-01-01",
                    "items": [{{"id": "i-{id}", "name": "Coat", "category": "Outerwear", "size": "M",
                               "price": "50000000000000000000000000000", "quantity": 1}}]}}"#
            )
        };
        let json = format!(
            r#"{{"customers": [{{
                "id": "c1", "name": "A", "email": "a@x.com", "phone": "555-000-0001",
                "purchaseHistory": [{}, {}]
            }}]}}"#,
            purchase("pur-1"),
            purchase("pur-2")
        );
        assert!(matches!(
            Catalog::from_json_str(&json),
            Err(CatalogError::SpendOverflow { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_quantity() {
        let json = r#"{"customers": [{
            "id": "c1", "name": "A", "email": "a@x.com", "phone": "555-000-0001",
            "purchaseHistory": [{"id": "pur-1", "date": "2023-01-01",
                "items": [{"id": "i1", "name": "Tee", "category": "Tops", "size": "S",
                           "price": "10.00", "quantity": 0}]}]
        }]}"#;
        assert!(matches!(
            Catalog::from_json_str(json),
            Err(CatalogError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn test_yaml_document() {
        let yaml = r#"
products:
  - id: p1
    name: Linen Shirt
    category: Tops
    price: "45.00"
    sizes: [M]
    inStock: true
    tags: [Summer]
    rating: 4.2
"#;
        let catalog = Catalog::from_yaml_str(yaml).unwrap();
        assert_eq!(catalog.list_products().len(), 1);
    }

    #[test]
    fn test_discover_snapshot_excludes_decided() {
        let catalog = Catalog::seed().unwrap();
        let excluded: HashSet<ProductId> =
            [ProductId::new("prod-001"), ProductId::new("prod-005")].into();
        let snapshot = catalog.discover_snapshot(&excluded);
        assert_eq!(snapshot.len(), 8);
        assert_eq!(snapshot[0].id.as_str(), "prod-002");
        assert!(snapshot.iter().all(|p| !excluded.contains(&p.id)));
    }

    #[test]
    fn test_active_customers_clamps() {
        let catalog = Catalog::seed().unwrap();
        assert_eq!(catalog.active_customers(1).len(), 1);
        assert_eq!(catalog.active_customers(10).len(), 2);
    }
}
