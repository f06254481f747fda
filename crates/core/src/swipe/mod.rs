//! Swipe-to-discover engine.
//!
//! A [`SwipeSession`] walks a fixed snapshot of products one card at a time
//! and records a Like or Dislike per product. A [`GestureInterpreter`] turns
//! raw drag and keyboard input into [`SwipeCommand`]s for the session.
//!
//! ```text
//!             like / dislike / next / previous
//!            ┌──────────┐
//!            ▼          │
//!        Browsing ──────┘
//!            │  like / dislike on the last card
//!            ▼
//!        Exhausted ── restart ──▶ Browsing (cursor 0, decisions kept)
//! ```

mod gesture;
mod session;

use serde::{Deserialize, Serialize};

use crate::catalog::Product;

pub use gesture::{GestureConfig, GestureConfigError, GestureInterpreter, Key, key_command};
pub use session::{CommitTicket, Decisions, SubscriptionId, SwipeSession};

/// A verdict recorded against one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Liked,
    Disliked,
}

impl Decision {
    /// The swipe direction that produces this decision.
    #[must_use]
    pub const fn direction(self) -> SwipeDirection {
        match self {
            Self::Liked => SwipeDirection::Right,
            Self::Disliked => SwipeDirection::Left,
        }
    }
}

/// Horizontal direction of a card swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Discrete commands understood by a [`SwipeSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeCommand {
    Like,
    Dislike,
    Next,
    Previous,
    Restart,
}

impl SwipeCommand {
    /// The decision this command records, if any.
    #[must_use]
    pub const fn decision(self) -> Option<Decision> {
        match self {
            Self::Like => Some(Decision::Liked),
            Self::Dislike => Some(Decision::Disliked),
            Self::Next | Self::Previous | Self::Restart => None,
        }
    }
}

impl std::str::FromStr for SwipeCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            "next" => Ok(Self::Next),
            "previous" | "prev" => Ok(Self::Previous),
            "restart" => Ok(Self::Restart),
            other => Err(format!("unknown swipe command {other:?}")),
        }
    }
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// A card is in focus.
    Browsing,
    /// The cursor has moved past the last card.
    Exhausted,
}

/// Result of sending a command to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum Outcome {
    Applied,
    Ignored(IgnoreReason),
}

impl Outcome {
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Why a command left the session unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// The session is exhausted; only `restart` does anything.
    EmptySession,
    /// Navigation would leave `[0, len)`; the cursor is clamped.
    AtBoundary,
    /// A decided card is still settling.
    Settling,
    /// The commit ticket was cancelled or superseded.
    Cancelled,
    /// The session was torn down.
    Disposed,
}

/// Events published to session subscribers, in the order they happen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "product")]
pub enum SwipeEvent {
    Liked(Product),
    Disliked(Product),
    /// Acknowledgement shown to the shopper. Sent for likes only.
    AddedToFavorites(Product),
    /// The last card was decided.
    Exhausted,
}
