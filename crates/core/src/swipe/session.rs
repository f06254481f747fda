//! Swipe session state machine.

use std::fmt;

use tracing::{debug, trace};

use super::{Decision, IgnoreReason, Outcome, SessionState, SwipeCommand, SwipeDirection, SwipeEvent};
use crate::catalog::Product;
use crate::types::ProductId;

type Listener = Box<dyn FnMut(&SwipeEvent) + Send>;

/// Handle returned by [`SwipeSession::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Cancellation token for one deferred decision.
///
/// Issued by [`SwipeSession::begin_commit`] and redeemed by
/// [`SwipeSession::finish_commit`]. A ticket only commits while it is the
/// session's current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct CommitTicket {
    generation: u64,
    decision: Decision,
}

impl CommitTicket {
    /// The decision this ticket will record.
    pub const fn decision(&self) -> Decision {
        self.decision
    }
}

/// Liked and disliked products, each in decision order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Decisions<'a> {
    pub liked: Vec<&'a Product>,
    pub disliked: Vec<&'a Product>,
}

/// A directional traversal over a fixed product snapshot.
///
/// Invariants:
/// - `0 <= cursor <= items.len()`
/// - every decided id belongs to `items`
/// - `decisions.len() <= furthest cursor reached`
pub struct SwipeSession {
    items: Vec<Product>,
    cursor: usize,
    furthest: usize,
    /// Insertion order is decision order; one entry per product.
    decisions: Vec<(ProductId, Decision)>,
    pending: Option<SwipeDirection>,
    in_flight: Option<u64>,
    generation: u64,
    disposed: bool,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl SwipeSession {
    /// Start a session over `items`.
    #[must_use]
    pub fn new(items: Vec<Product>) -> Self {
        debug!(items = items.len(), "Swipe session started");
        Self {
            items,
            cursor: 0,
            furthest: 0,
            decisions: Vec::new(),
            pending: None,
            in_flight: None,
            generation: 0,
            disposed: false,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// The fixed item snapshot.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        if self.cursor >= self.items.len() {
            SessionState::Exhausted
        } else {
            SessionState::Browsing
        }
    }

    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self.state(), SessionState::Exhausted)
    }

    /// The card in focus, `None` once exhausted.
    #[must_use]
    pub fn current_item(&self) -> Option<&Product> {
        self.items.get(self.cursor)
    }

    /// Direction the focused card is leaning, during a drag or a settle.
    #[must_use]
    pub const fn pending_direction(&self) -> Option<SwipeDirection> {
        self.pending
    }

    /// Whether a decided card is waiting for [`finish_commit`](Self::finish_commit).
    #[must_use]
    pub const fn is_settling(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Number of recorded decisions.
    #[must_use]
    pub fn decision_count(&self) -> usize {
        self.decisions.len()
    }

    /// Recorded decision for `id`, if any.
    #[must_use]
    pub fn decision_for(&self, id: &ProductId) -> Option<Decision> {
        self.decisions
            .iter()
            .find(|(decided, _)| decided == id)
            .map(|&(_, decision)| decision)
    }

    /// Decided product ids with their decisions, in decision order.
    pub fn decided(&self) -> impl Iterator<Item = (&ProductId, Decision)> {
        self.decisions.iter().map(|(id, decision)| (id, *decision))
    }

    /// Liked and disliked products.
    #[must_use]
    pub fn decisions(&self) -> Decisions<'_> {
        let mut out = Decisions::default();
        for (id, decision) in &self.decisions {
            let Some(product) = self.items.iter().find(|p| &p.id == id) else {
                continue;
            };
            match decision {
                Decision::Liked => out.liked.push(product),
                Decision::Disliked => out.disliked.push(product),
            }
        }
        out
    }

    /// Items in the snapshot without a decision.
    #[must_use]
    pub fn undecided_items(&self) -> Vec<&Product> {
        self.items
            .iter()
            .filter(|p| self.decision_for(&p.id).is_none())
            .collect()
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    /// Register a listener for [`SwipeEvent`]s.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&SwipeEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: &SwipeEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    pub fn like(&mut self) -> Outcome {
        self.apply(SwipeCommand::Like)
    }

    pub fn dislike(&mut self) -> Outcome {
        self.apply(SwipeCommand::Dislike)
    }

    pub fn next(&mut self) -> Outcome {
        self.apply(SwipeCommand::Next)
    }

    pub fn previous(&mut self) -> Outcome {
        self.apply(SwipeCommand::Previous)
    }

    pub fn restart(&mut self) -> Outcome {
        self.apply(SwipeCommand::Restart)
    }

    /// Apply a command immediately.
    pub fn apply(&mut self, command: SwipeCommand) -> Outcome {
        if self.disposed {
            return Outcome::Ignored(IgnoreReason::Disposed);
        }
        if self.in_flight.is_some() {
            return Outcome::Ignored(IgnoreReason::Settling);
        }

        let outcome = match command {
            SwipeCommand::Like => self.decide(Decision::Liked),
            SwipeCommand::Dislike => self.decide(Decision::Disliked),
            SwipeCommand::Next => self.step_forward(),
            SwipeCommand::Previous => self.step_back(),
            SwipeCommand::Restart => {
                self.cursor = 0;
                debug!(decisions = self.decisions.len(), "Swipe session restarted");
                Outcome::Applied
            }
        };

        if outcome.is_applied() {
            self.pending = None;
        }
        trace!(?command, ?outcome, cursor = self.cursor, "Swipe command");
        outcome
    }

    /// Show a drag preview on the focused card. Ignored while settling or
    /// exhausted.
    pub fn preview(&mut self, direction: Option<SwipeDirection>) {
        if self.disposed || self.in_flight.is_some() || self.is_exhausted() {
            return;
        }
        self.pending = direction;
    }

    /// Start a deferred decision on the focused card.
    ///
    /// The card leans in the decision's direction until the ticket is
    /// redeemed with [`finish_commit`](Self::finish_commit). Returns `None`
    /// if the session is disposed, exhausted, or already settling.
    pub fn begin_commit(&mut self, decision: Decision) -> Option<CommitTicket> {
        if self.disposed || self.in_flight.is_some() || self.is_exhausted() {
            return None;
        }
        self.generation += 1;
        self.in_flight = Some(self.generation);
        self.pending = Some(decision.direction());
        Some(CommitTicket {
            generation: self.generation,
            decision,
        })
    }

    /// Record the decision of a ticket from [`begin_commit`](Self::begin_commit).
    pub fn finish_commit(&mut self, ticket: CommitTicket) -> Outcome {
        if self.disposed {
            return Outcome::Ignored(IgnoreReason::Disposed);
        }
        if self.in_flight != Some(ticket.generation) {
            return Outcome::Ignored(IgnoreReason::Cancelled);
        }
        self.in_flight = None;
        self.pending = None;
        self.decide(ticket.decision)
    }

    /// Drop any outstanding ticket and drag preview.
    pub fn cancel_pending(&mut self) {
        if self.in_flight.take().is_some() {
            debug!("Pending swipe commit cancelled");
        }
        self.generation += 1;
        self.pending = None;
    }

    /// Tear the session down. Every later command and ticket is ignored.
    pub fn dispose(&mut self) {
        self.cancel_pending();
        self.disposed = true;
        self.listeners.clear();
        debug!(decisions = self.decisions.len(), "Swipe session disposed");
    }

    fn decide(&mut self, decision: Decision) -> Outcome {
        let Some(product) = self.items.get(self.cursor).cloned() else {
            return Outcome::Ignored(IgnoreReason::EmptySession);
        };

        // Last decision wins and moves to the end of decision order.
        self.decisions.retain(|(id, _)| id != &product.id);
        self.decisions.push((product.id.clone(), decision));
        self.cursor += 1;
        self.furthest = self.furthest.max(self.cursor);

        debug!(product = %product.id, ?decision, "Swipe decision");
        match decision {
            Decision::Liked => {
                self.emit(&SwipeEvent::Liked(product.clone()));
                self.emit(&SwipeEvent::AddedToFavorites(product));
            }
            Decision::Disliked => self.emit(&SwipeEvent::Disliked(product)),
        }
        if self.is_exhausted() {
            self.emit(&SwipeEvent::Exhausted);
        }
        Outcome::Applied
    }

    fn step_forward(&mut self) -> Outcome {
        if self.is_exhausted() {
            return Outcome::Ignored(IgnoreReason::EmptySession);
        }
        if self.cursor + 1 < self.items.len() {
            self.cursor += 1;
            self.furthest = self.furthest.max(self.cursor);
            Outcome::Applied
        } else {
            Outcome::Ignored(IgnoreReason::AtBoundary)
        }
    }

    fn step_back(&mut self) -> Outcome {
        if self.is_exhausted() {
            return Outcome::Ignored(IgnoreReason::EmptySession);
        }
        if self.cursor > 0 {
            self.cursor -= 1;
            Outcome::Applied
        } else {
            Outcome::Ignored(IgnoreReason::AtBoundary)
        }
    }

    #[cfg(test)]
    const fn furthest(&self) -> usize {
        self.furthest
    }
}

impl fmt::Debug for SwipeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwipeSession")
            .field("items", &self.items.len())
            .field("cursor", &self.cursor)
            .field("decisions", &self.decisions)
            .field("pending", &self.pending)
            .field("settling", &self.in_flight.is_some())
            .field("disposed", &self.disposed)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
