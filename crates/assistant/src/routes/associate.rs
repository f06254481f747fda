//! Associate dashboard route handlers.
//!
//! All handlers require a signed-in sales associate.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use style_mingle_core::{
    CustomerId, DASHBOARD_CAP, MATCH_CARD_CAP, Price, Product, Ranking, RecommendOptions,
    catalog::Customer,
};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAssociate;
use crate::state::AppState;

/// Customers shown as currently in store.
pub const IN_STORE_CUSTOMERS: usize = 2;

// =============================================================================
// Query Types
// =============================================================================

/// Query for the in-store list.
#[derive(Debug, Deserialize)]
pub struct ActiveQuery {
    pub limit: Option<usize>,
}

/// Query for a customer lookup.
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    /// Id, email or phone.
    #[serde(default)]
    pub q: String,
}

/// Query for recommendations.
#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub cap: Option<usize>,
    pub ranking: Option<String>,
}

// =============================================================================
// Response Types
// =============================================================================

/// Customer profile with derived figures.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    #[serde(flatten)]
    pub customer: Customer,
    pub initials: String,
    pub total_spend: Price,
    pub last_purchase: Option<NaiveDate>,
}

impl From<&Customer> for CustomerProfile {
    fn from(customer: &Customer) -> Self {
        Self {
            initials: customer.initials(),
            total_spend: customer.total_spend(),
            last_purchase: customer.last_purchase(),
            customer: customer.clone(),
        }
    }
}

/// Dashboard card for an in-store customer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCard {
    pub id: CustomerId,
    pub name: String,
    pub initials: String,
    pub loyalty_points: u32,
    pub matches: Vec<Product>,
}

/// A recommendation list.
#[derive(Debug, Serialize)]
pub struct Recommendations {
    pub customer: CustomerId,
    pub ranking: Ranking,
    pub cap: usize,
    pub products: Vec<Product>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Customers currently in store, each with a few matching products.
pub async fn active(
    State(state): State<AppState>,
    RequireAssociate(_): RequireAssociate,
    Query(query): Query<ActiveQuery>,
) -> Json<Vec<MatchCard>> {
    let catalog = state.catalog();
    let cards = catalog
        .active_customers(query.limit.unwrap_or(IN_STORE_CUSTOMERS))
        .iter()
        .map(|customer| MatchCard {
            id: customer.id.clone(),
            name: customer.name.clone(),
            initials: customer.initials(),
            loyalty_points: customer.loyalty_points,
            matches: style_mingle_core::recommend::select(
                customer,
                catalog.list_products(),
                RecommendOptions::with_cap(MATCH_CARD_CAP),
            )
            .into_iter()
            .cloned()
            .collect(),
        })
        .collect();
    Json(cards)
}

/// Find a customer by id, email or phone.
pub async fn lookup(
    State(state): State<AppState>,
    RequireAssociate(associate): RequireAssociate,
    Query(query): Query<LookupQuery>,
) -> Result<Json<CustomerProfile>> {
    let customer = state.catalog().find_customer(&query.q)?;
    add_breadcrumb(
        "associate",
        "Customer lookup",
        &[("associate", associate.id.as_str()), ("customer", customer.id.as_str())],
    );
    Ok(Json(CustomerProfile::from(customer)))
}

/// Customer profile by id.
pub async fn show(
    State(state): State<AppState>,
    RequireAssociate(_): RequireAssociate,
    Path(id): Path<String>,
) -> Result<Json<CustomerProfile>> {
    let customer = state
        .catalog()
        .customer(&CustomerId::new(id.as_str()))
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;
    Ok(Json(CustomerProfile::from(customer)))
}

/// Recommended products for a customer.
pub async fn recommendations(
    State(state): State<AppState>,
    RequireAssociate(_): RequireAssociate,
    Path(id): Path<String>,
    Query(query): Query<RecommendQuery>,
) -> Result<Json<Recommendations>> {
    let ranking = match query.ranking.as_deref() {
        Some(raw) => raw.parse::<Ranking>().map_err(AppError::BadRequest)?,
        None => Ranking::default(),
    };
    let options = RecommendOptions {
        cap: query.cap.unwrap_or(DASHBOARD_CAP),
        ranking,
    };

    let customer = CustomerId::new(id);
    let products = state
        .catalog()
        .recommend(&customer, options)?
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(Recommendations {
        customer,
        ranking: options.ranking,
        cap: options.cap,
        products,
    }))
}
