//! Business logic services.
//!
//! Services hold state that outlives a single request. Handlers in
//! `routes` stay thin and call into them.

pub mod discover;

pub use discover::{
    DiscoverError, DiscoverReply, DiscoverService, DiscoverView, Favorites, GestureInput,
    GesturePhase,
};
