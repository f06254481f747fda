//! Recommendation selector.
//!
//! Maps a customer's style profile onto the catalog:
//!
//! 1. **Candidates**: the product's category is one the customer prefers,
//!    or one of its tags is among the customer's favorite styles.
//! 2. **Availability**: the product is in stock and offered in at least one
//!    of the customer's sizes.
//! 3. **Ordering**: see [`Ranking`].
//! 4. **Cap**: at most `cap` products are returned.
//!
//! Selection is pure and deterministic, so it is safe to call concurrently
//! against a shared catalog.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Customer, Product};
use crate::lookup::LookupError;
use crate::types::CustomerId;

/// Cap used by the associate dashboard feed.
pub const DASHBOARD_CAP: usize = 5;

/// Cap used by the compact customer match card.
pub const MATCH_CARD_CAP: usize = 4;

const TAG_WEIGHT: f64 = 2.0;
const CATEGORY_WEIGHT: f64 = 3.0;

/// How qualifying products are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ranking {
    /// Keep catalog order.
    CatalogOrder,
    /// Highest [`affinity_score`] first; ties keep catalog order.
    #[default]
    Scored,
}

impl std::str::FromStr for Ranking {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "catalog" | "catalog_order" => Ok(Self::CatalogOrder),
            "scored" | "score" => Ok(Self::Scored),
            other => Err(format!("unknown ranking {other:?} (expected scored or catalog)")),
        }
    }
}

/// Parameters of one selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendOptions {
    pub cap: usize,
    pub ranking: Ranking,
}

impl RecommendOptions {
    /// Options with the given cap and default ranking.
    #[must_use]
    pub fn with_cap(cap: usize) -> Self {
        Self {
            cap,
            ranking: Ranking::default(),
        }
    }
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self::with_cap(DASHBOARD_CAP)
    }
}

/// Whether `product` passes both the candidate and availability filters.
#[must_use]
pub fn qualifies(customer: &Customer, product: &Product) -> bool {
    let candidate = customer.preferred_categories.contains(&product.category)
        || product.tag_overlap(&customer.favorite_styles) > 0;
    let available = product.in_stock && product.offers_any_size(&customer.preferred_sizes);
    candidate && available
}

/// Affinity of a customer for a product:
/// `2 × shared style tags + 3 × category match + rating`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn affinity_score(customer: &Customer, product: &Product) -> f64 {
    let tags = product.tag_overlap(&customer.favorite_styles) as f64;
    let category = if customer.preferred_categories.contains(&product.category) {
        1.0
    } else {
        0.0
    };
    TAG_WEIGHT.mul_add(tags, CATEGORY_WEIGHT.mul_add(category, product.rating))
}

/// Select recommendations for `customer` from `products`.
#[must_use]
pub fn select<'a>(
    customer: &Customer,
    products: &'a [Product],
    options: RecommendOptions,
) -> Vec<&'a Product> {
    let mut picked: Vec<(usize, &Product)> = products
        .iter()
        .enumerate()
        .filter(|(_, p)| qualifies(customer, p))
        .collect();

    if options.ranking == Ranking::Scored {
        picked.sort_by(|(ia, a), (ib, b)| {
            affinity_score(customer, b)
                .total_cmp(&affinity_score(customer, a))
                .then_with(|| ia.cmp(ib))
        });
    }

    picked
        .into_iter()
        .take(options.cap)
        .map(|(_, p)| p)
        .collect()
}

impl Catalog {
    /// Recommendations for the customer with `customer_id`.
    ///
    /// Callers that prefer the silent-empty policy can use
    /// `unwrap_or_default()` on the result.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotFound`] for an unknown customer.
    pub fn recommend(
        &self,
        customer_id: &CustomerId,
        options: RecommendOptions,
    ) -> Result<Vec<&Product>, LookupError> {
        let customer = self
            .customer(customer_id)
            .ok_or_else(|| LookupError::NotFound(customer_id.to_string()))?;
        Ok(select(customer, self.list_products(), options))
    }
}
