//! Swipe-to-discover sessions, one per shopper login.
//!
//! Each login gets a [`DiscoverHandle`] in a `moka` cache keyed by the login
//! id. The handle owns at most one open [`SwipeSession`]; closing it archives
//! its decisions so the next session skips products already decided.
//!
//! Like and dislike settle: the card leans immediately and the decision
//! commits after the configured delay on a spawned task. The task holds only
//! a `Weak` handle and a commit ticket, so closing the session, logging out,
//! or idle eviction all cancel it.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};
use uuid::Uuid;

use style_mingle_core::catalog::{Catalog, Product};
use style_mingle_core::swipe::{
    CommitTicket, GestureConfig, GestureInterpreter, IgnoreReason, Key, Outcome, SessionState,
    SwipeCommand, SwipeDirection, SwipeEvent, SwipeSession, key_command,
};
use style_mingle_core::types::ProductId;

/// Most logins kept at once.
const MAX_LOGINS: u64 = 10_000;

/// Errors from the discover service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DiscoverError {
    /// The login ended while the request was in flight.
    #[error("discover session has ended")]
    Closed,
}

/// Pointer input for the swipe gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureInput {
    Start(f64),
    Move(f64),
    End,
    Cancel,
}

/// Phase names accepted over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase {
    Start,
    Move,
    End,
    Cancel,
}

/// Where a shopper is in their current session.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoverView {
    pub state: SessionState,
    pub cursor: usize,
    pub total: usize,
    pub current: Option<Product>,
    pub pending_direction: Option<SwipeDirection>,
    pub settling: bool,
    pub liked: usize,
    pub disliked: usize,
}

/// Reply to every discover call.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoverReply {
    /// Command derived from the input, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<SwipeCommand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    pub session: DiscoverView,
    /// Events raised since the previous reply, oldest first.
    pub events: Vec<SwipeEvent>,
}

/// Everything a login has liked and disliked, in decision order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Favorites {
    pub liked: Vec<Product>,
    pub disliked: Vec<Product>,
}

impl Favorites {
    fn ids(&self) -> HashSet<ProductId> {
        self.liked
            .iter()
            .chain(&self.disliked)
            .map(|p| p.id.clone())
            .collect()
    }

    fn absorb(&mut self, session: &SwipeSession) {
        let decisions = session.decisions();
        self.liked.extend(decisions.liked.into_iter().cloned());
        self.disliked.extend(decisions.disliked.into_iter().cloned());
    }
}

/// Swipe state of one login.
pub struct DiscoverHandle {
    inner: Mutex<DiscoverInner>,
}

#[derive(Default)]
struct DiscoverInner {
    open: Option<OpenSession>,
    /// Decisions from sessions that were closed.
    archive: Favorites,
    /// Incremented per opened session; settle tasks carry the value they
    /// were scheduled under.
    epoch: u64,
    disposed: bool,
}

struct OpenSession {
    swipe: SwipeSession,
    gestures: GestureInterpreter,
    events: mpsc::UnboundedReceiver<SwipeEvent>,
    settle: Option<JoinHandle<()>>,
    epoch: u64,
}

impl OpenSession {
    fn new(items: Vec<Product>, gesture: GestureConfig, epoch: u64) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        let mut swipe = SwipeSession::new(items);
        swipe.subscribe(move |event| {
            let _ = tx.send(event.clone());
        });
        Self {
            swipe,
            gestures: GestureInterpreter::new(gesture),
            events,
            settle: None,
            epoch,
        }
    }

    fn view(&self) -> DiscoverView {
        let decisions = self.swipe.decisions();
        DiscoverView {
            state: self.swipe.state(),
            cursor: self.swipe.cursor(),
            total: self.swipe.len(),
            current: self.swipe.current_item().cloned(),
            pending_direction: self.swipe.pending_direction(),
            settling: self.swipe.is_settling(),
            liked: decisions.liked.len(),
            disliked: decisions.disliked.len(),
        }
    }

    fn reply(&mut self, command: Option<SwipeCommand>, outcome: Option<Outcome>) -> DiscoverReply {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        DiscoverReply {
            command,
            outcome,
            session: self.view(),
            events,
        }
    }

    fn shutdown(mut self) {
        if let Some(task) = self.settle.take() {
            task.abort();
        }
        self.swipe.dispose();
    }
}

impl DiscoverHandle {
    fn new() -> Self {
        Self {
            inner: Mutex::new(DiscoverInner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DiscoverInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the login behind this handle has ended.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.lock().disposed
    }

    /// Tear everything down and refuse further use. Idempotent.
    pub fn dispose(&self) {
        let mut inner = self.lock();
        inner.disposed = true;
        if let Some(open) = inner.open.take() {
            open.shutdown();
            debug!("Discover session disposed");
        }
    }

    /// Commit a settled decision, unless its session has since been closed.
    fn settle(&self, epoch: u64, ticket: CommitTicket) {
        let mut inner = self.lock();
        let Some(open) = inner.open.as_mut().filter(|open| open.epoch == epoch) else {
            debug!(decision = ?ticket.decision(), "Settle for closed session dropped");
            return;
        };
        open.settle = None;
        let outcome = open.swipe.finish_commit(ticket);
        debug!(decision = ?ticket.decision(), ?outcome, "Swipe settled");
    }
}

/// Registry of discover sessions.
pub struct DiscoverService {
    catalog: Arc<Catalog>,
    gesture: GestureConfig,
    settle_delay: Duration,
    sessions: Cache<Uuid, Arc<DiscoverHandle>>,
}

impl DiscoverService {
    /// Create a registry that drops logins idle for `idle`.
    #[must_use]
    pub fn new(
        catalog: Arc<Catalog>,
        gesture: GestureConfig,
        settle_delay: Duration,
        idle: Duration,
    ) -> Self {
        let sessions = Cache::builder()
            .max_capacity(MAX_LOGINS)
            .time_to_idle(idle)
            .eviction_listener(|login: Arc<Uuid>, handle: Arc<DiscoverHandle>, cause| {
                debug!(%login, ?cause, "Discover state evicted");
                handle.dispose();
            })
            .build();

        Self {
            catalog,
            gesture,
            settle_delay,
            sessions,
        }
    }

    async fn handle(&self, login: Uuid) -> Arc<DiscoverHandle> {
        self.sessions
            .get_with(login, async { Arc::new(DiscoverHandle::new()) })
            .await
    }

    /// Open a session if none is open, snapshotting the catalog minus
    /// products already decided under this login.
    fn ensure_open<'a>(
        &self,
        inner: &'a mut DiscoverInner,
    ) -> Result<&'a mut OpenSession, DiscoverError> {
        if inner.disposed {
            return Err(DiscoverError::Closed);
        }
        if inner.open.is_none() {
            let items = self.catalog.discover_snapshot(&inner.archive.ids());
            inner.epoch += 1;
            debug!(items = items.len(), epoch = inner.epoch, "Discover session opened");
            inner.open = Some(OpenSession::new(items, self.gesture, inner.epoch));
        }
        inner.open.as_mut().ok_or(DiscoverError::Closed)
    }

    /// Run a command. Like and dislike settle unless the delay is zero.
    fn run(&self, handle: &Arc<DiscoverHandle>, open: &mut OpenSession, command: SwipeCommand) -> Outcome {
        let Some(decision) = command.decision().filter(|_| !self.settle_delay.is_zero()) else {
            return open.swipe.apply(command);
        };

        let Some(ticket) = open.swipe.begin_commit(decision) else {
            let reason = if open.swipe.is_settling() {
                IgnoreReason::Settling
            } else {
                IgnoreReason::EmptySession
            };
            return Outcome::Ignored(reason);
        };

        let weak = Arc::downgrade(handle);
        let epoch = open.epoch;
        let delay = self.settle_delay;
        open.settle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(handle) = weak.upgrade() {
                handle.settle(epoch, ticket);
            }
        }));
        Outcome::Applied
    }

    /// Current session view, opening a session if needed.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoverError::Closed`] if the login ended concurrently.
    #[instrument(skip(self))]
    pub async fn view(&self, login: Uuid) -> Result<DiscoverReply, DiscoverError> {
        let handle = self.handle(login).await;
        let mut inner = handle.lock();
        let open = self.ensure_open(&mut inner)?;
        Ok(open.reply(None, None))
    }

    /// Send a discrete command.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoverError::Closed`] if the login ended concurrently.
    #[instrument(skip(self))]
    pub async fn command(
        &self,
        login: Uuid,
        command: SwipeCommand,
    ) -> Result<DiscoverReply, DiscoverError> {
        let handle = self.handle(login).await;
        let mut inner = handle.lock();
        let open = self.ensure_open(&mut inner)?;
        let outcome = self.run(&handle, open, command);
        debug!(?command, ?outcome, "Discover command");
        Ok(open.reply(Some(command), Some(outcome)))
    }

    /// Translate a key press and run its command. Unbound keys do nothing.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoverError::Closed`] if the login ended concurrently.
    #[instrument(skip(self))]
    pub async fn key(&self, login: Uuid, key: Key) -> Result<DiscoverReply, DiscoverError> {
        let handle = self.handle(login).await;
        let mut inner = handle.lock();
        let open = self.ensure_open(&mut inner)?;
        let command = key_command(key);
        let outcome = command.map(|command| self.run(&handle, open, command));
        Ok(open.reply(command, outcome))
    }

    /// Feed pointer input to the gesture interpreter.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoverError::Closed`] if the login ended concurrently.
    #[instrument(skip(self))]
    pub async fn gesture(
        &self,
        login: Uuid,
        input: GestureInput,
    ) -> Result<DiscoverReply, DiscoverError> {
        let handle = self.handle(login).await;
        let mut inner = handle.lock();
        let open = self.ensure_open(&mut inner)?;
        let command = match input {
            GestureInput::Start(x) => {
                open.gestures.touch_start(x);
                None
            }
            GestureInput::Move(x) => {
                open.gestures.touch_move(x, &mut open.swipe);
                None
            }
            GestureInput::End => open.gestures.touch_end(&mut open.swipe),
            GestureInput::Cancel => {
                open.gestures.touch_cancel(&mut open.swipe);
                None
            }
        };
        let outcome = command.map(|command| self.run(&handle, open, command));
        Ok(open.reply(command, outcome))
    }

    /// Close the open session, cancelling any settle in progress. Its
    /// decisions are kept. Returns `false` if no session was open.
    #[instrument(skip(self))]
    pub async fn close(&self, login: Uuid) -> bool {
        let Some(handle) = self.sessions.get(&login).await else {
            return false;
        };
        let mut inner = handle.lock();
        let Some(open) = inner.open.take() else {
            return false;
        };
        inner.archive.absorb(&open.swipe);
        open.shutdown();
        debug!(
            liked = inner.archive.liked.len(),
            disliked = inner.archive.disliked.len(),
            "Discover session closed"
        );
        true
    }

    /// Liked and disliked products across all sessions of this login.
    pub async fn favorites(&self, login: Uuid) -> Favorites {
        let Some(handle) = self.sessions.get(&login).await else {
            return Favorites::default();
        };
        let inner = handle.lock();
        let mut favorites = inner.archive.clone();
        if let Some(open) = &inner.open {
            favorites.absorb(&open.swipe);
        }
        favorites
    }

    /// Forget a login entirely.
    #[instrument(skip(self))]
    pub async fn end_login(&self, login: Uuid) {
        if let Some(handle) = self.sessions.remove(&login).await {
            handle.dispose();
        }
    }
}
