//! Recommendation commands.

use std::path::Path;

use serde::Serialize;

use style_mingle_core::recommend::{affinity_score, select};
use style_mingle_core::{CustomerId, Price, ProductId, Ranking, RecommendOptions};

use super::{CommandError, open_catalog};

/// One recommended product with its score.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pick {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<u32>,
    pub score: f64,
}

/// Recommendations for one customer.
#[derive(Debug, Serialize)]
pub struct RecommendationList {
    pub customer: CustomerId,
    pub name: String,
    pub ranking: Ranking,
    pub cap: usize,
    pub picks: Vec<Pick>,
}

/// Recommend products for the customer matching `identifier`.
///
/// # Errors
///
/// Returns an error if the catalog is invalid, nothing matches, or the cap
/// is zero.
pub fn run(
    file: Option<&Path>,
    identifier: &str,
    cap: usize,
    ranking: Ranking,
) -> Result<RecommendationList, CommandError> {
    if cap == 0 {
        return Err(CommandError::InvalidArgument("cap must be at least 1".to_string()));
    }

    let catalog = open_catalog(file)?;
    let customer = catalog.find_customer(identifier)?;
    let picks = select(
        customer,
        catalog.list_products(),
        RecommendOptions { cap, ranking },
    )
    .into_iter()
    .map(|product| Pick {
        id: product.id.clone(),
        name: product.name.clone(),
        category: product.category.clone(),
        price: product.effective_price(),
        discount_percent: product.discount_percent(),
        score: affinity_score(customer, product),
    })
    .collect::<Vec<_>>();

    tracing::info!(customer = %customer.id, picks = picks.len(), ?ranking, "Recommendations");
    Ok(RecommendationList {
        customer: customer.id.clone(),
        name: customer.name.clone(),
        ranking,
        cap,
        picks,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ids(list: &RecommendationList) -> Vec<&str> {
        list.picks.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_catalog_order_for_emma() {
        let list = run(None, "cust-001", 5, Ranking::CatalogOrder).unwrap();
        assert_eq!(ids(&list), ["prod-001", "prod-004", "prod-008"]);
    }

    #[test]
    fn test_scored_picks_are_descending() {
        let list = run(None, "james.chen@example.com", 5, Ranking::Scored).unwrap();
        assert!(!list.picks.is_empty());
        assert!(list.picks.windows(2).all(|w| match w {
            [a, b] => a.score >= b.score,
            _ => true,
        }));
    }

    #[test]
    fn test_zero_cap_is_rejected() {
        let err = run(None, "cust-001", 0, Ranking::Scored).unwrap_err();
        assert!(matches!(err, CommandError::InvalidArgument(_)));
    }
}
