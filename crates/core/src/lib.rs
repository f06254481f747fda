//! Style Mingle Core - catalog, recommendation and swipe engine.
//!
//! This crate provides the domain logic shared by all Style Mingle components:
//! - `assistant` - HTTP service for the associate dashboard and shopper app
//! - `cli` - Command-line tools for inspecting catalogs and replaying swipes
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no network, no
//! runtime, no global state. Catalog documents are parsed from strings; the
//! caller decides where they come from.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, phones and prices
//! - [`catalog`] - Validated in-memory catalog store
//! - [`lookup`] - Customer lookup and demo login
//! - [`recommend`] - Recommendation selector
//! - [`swipe`] - Swipe session state machine and gesture interpreter
//! - [`auth`] - Signed-in principal and auth context

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod catalog;
pub mod lookup;
pub mod recommend;
pub mod swipe;
pub mod types;

pub use auth::{AuthContext, Principal, PrincipalKey, Role};
pub use catalog::{Catalog, CatalogDocument, CatalogError, Customer, Product, Purchase, SalesAssociate};
pub use lookup::LookupError;
pub use recommend::{DASHBOARD_CAP, MATCH_CARD_CAP, Ranking, RecommendOptions};
pub use types::*;
