//! Catalog entities: products, customers, purchases and sales associates.
//!
//! All of these are immutable once a [`Catalog`](super::Catalog) is built.
//! Field names follow the camelCase used by catalog documents.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{
    AssociateId, CustomerId, Email, Phone, Price, ProductId, PurchaseId, PurchaseItemId,
};

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    /// Present when the product is discounted. Never above `price`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Price>,
    #[serde(default)]
    pub sizes: BTreeSet<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub image_url: String,
    pub in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_count: Option<u32>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub rating: f64,
}

impl Product {
    /// Whether the product is currently discounted.
    #[must_use]
    pub const fn is_on_sale(&self) -> bool {
        self.sale_price.is_some()
    }

    /// The price a customer pays today.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        self.sale_price.unwrap_or(self.price)
    }

    /// Whole-percent discount, if on sale.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        self.sale_price
            .and_then(|sale| self.price.discount_percent_to(sale))
    }

    /// Whether any of `sizes` is offered.
    #[must_use]
    pub fn offers_any_size(&self, sizes: &BTreeSet<String>) -> bool {
        !self.sizes.is_disjoint(sizes)
    }

    /// Number of tags shared with `styles`.
    #[must_use]
    pub fn tag_overlap(&self, styles: &BTreeSet<String>) -> usize {
        self.tags.intersection(styles).count()
    }
}

/// One line of a purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    pub id: PurchaseItemId,
    pub name: String,
    pub category: String,
    pub size: String,
    #[serde(default)]
    pub color: String,
    pub price: Price,
    pub quantity: u32,
    #[serde(default)]
    pub image_url: String,
}

impl PurchaseItem {
    /// `price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

/// A past purchase.
///
/// The total is always computed from the items. A total written in a catalog
/// document is kept only so the catalog loader can reject documents where it
/// disagrees with the items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: PurchaseId,
    pub date: NaiveDate,
    pub items: Vec<PurchaseItem>,
    #[serde(default)]
    pub store_location: String,
    #[serde(rename = "total", default, skip_serializing)]
    pub(crate) recorded_total: Option<Price>,
}

impl Purchase {
    /// Build a purchase from its items.
    #[must_use]
    pub fn new(
        id: PurchaseId,
        date: NaiveDate,
        items: Vec<PurchaseItem>,
        store_location: impl Into<String>,
    ) -> Self {
        Self {
            id,
            date,
            items,
            store_location: store_location.into(),
            recorded_total: None,
        }
    }

    /// Sum of `price × quantity` over all items.
    ///
    /// Saturates on overflow; catalogs reject such purchases at load.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(PurchaseItem::line_total).sum()
    }

    /// Like [`total`](Self::total), but `None` on overflow.
    #[must_use]
    pub fn checked_total(&self) -> Option<Price> {
        self.items.iter().try_fold(Price::ZERO, |acc, item| {
            acc.checked_add(item.price.checked_mul(item.quantity)?)
        })
    }

    /// Total number of units bought.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |acc, item| acc.saturating_add(item.quantity))
    }
}

/// A store customer and their style profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: Email,
    pub phone: Phone,
    #[serde(default)]
    pub loyalty_points: u32,
    #[serde(default)]
    pub preferred_sizes: BTreeSet<String>,
    #[serde(default)]
    pub preferred_categories: BTreeSet<String>,
    /// Style names; also matched against product tags.
    #[serde(default)]
    pub favorite_styles: BTreeSet<String>,
    #[serde(default)]
    pub purchase_history: Vec<Purchase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Customer {
    /// Lifetime spend across the purchase history.
    #[must_use]
    pub fn total_spend(&self) -> Price {
        self.purchase_history.iter().map(Purchase::total).sum()
    }

    /// Like [`total_spend`](Self::total_spend), but `None` on overflow.
    #[must_use]
    pub fn checked_total_spend(&self) -> Option<Price> {
        self.purchase_history
            .iter()
            .try_fold(Price::ZERO, |acc, purchase| {
                acc.checked_add(purchase.checked_total()?)
            })
    }

    /// Date of the most recent purchase.
    #[must_use]
    pub fn last_purchase(&self) -> Option<NaiveDate> {
        self.purchase_history.iter().map(|p| p.date).max()
    }

    /// First letter of each word in the name, e.g. `EW` for Emma Wilson.
    #[must_use]
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .collect()
    }
}

/// A sales associate working the floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesAssociate {
    pub id: AssociateId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub store_location: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default = "default_active")]
    pub active_status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

const fn default_active() -> bool {
    true
}
