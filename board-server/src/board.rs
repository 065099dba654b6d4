//! Shared board state.
//!
//! One [`SharedBoard`] backs the whole server. REST handlers and every
//! WebSocket connection mutate it through [`SharedBoard::add`] and
//! [`SharedBoard::clear`], which also broadcast the change to all open push
//! channels.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use board_core::{BoardStore, DrawAction, ServerFrame};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::metrics;

/// Broadcast buffer per subscriber before it starts lagging.
const BROADCAST_CAPACITY: usize = 1024;

/// Where a board change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A push channel connection.
    Socket(Uuid),
    /// A REST request.
    Http,
}

/// A change broadcast to push channel connections.
#[derive(Debug, Clone)]
pub struct BoardEvent {
    /// Who made the change.
    pub origin: Origin,
    /// Frame to forward to subscribers of its topic.
    pub frame: ServerFrame,
}

/// Thread-safe board plus its broadcast channel.
#[derive(Clone)]
pub struct SharedBoard {
    store: Arc<RwLock<BoardStore>>,
    events: broadcast::Sender<BoardEvent>,
}

impl SharedBoard {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(BROADCAST_CAPACITY)
    }

    /// Create an empty board whose subscribers may fall `capacity` events
    /// behind before they lag.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity);
        Self {
            store: Arc::new(RwLock::new(BoardStore::new())),
            events,
        }
    }

    /// Append an action and broadcast it. A clear action clears the board.
    pub fn add(&self, action: DrawAction, origin: Origin) {
        if action.is_clear() {
            self.clear(origin);
            return;
        }

        let len = {
            let mut store = self.write();
            store.append(action.clone());
            store.len()
        };
        metrics::set_board_actions(len);

        self.broadcast(BoardEvent {
            origin,
            frame: ServerFrame::Action { action },
        });
    }

    /// Drop every action and broadcast the clear.
    pub fn clear(&self, origin: Origin) {
        self.write().reset(Vec::new());
        metrics::record_clear();
        metrics::set_board_actions(0);
        tracing::info!(?origin, "Board cleared");

        self.broadcast(BoardEvent {
            origin,
            frame: ServerFrame::Cleared,
        });
    }

    /// Current board, in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<DrawAction> {
        self.read().snapshot_for_render().to_vec()
    }

    /// Number of actions on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the board is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Receive every change made from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.events.subscribe()
    }

    /// Whether the store lock is usable.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        !self.store.is_poisoned()
    }

    fn broadcast(&self, event: BoardEvent) {
        // No open push channels is fine
        let receivers = self.events.send(event).unwrap_or(0);
        tracing::trace!(receivers, "Board event broadcast");
    }

    fn read(&self) -> RwLockReadGuard<'_, BoardStore> {
        self.store.read().unwrap_or_else(|poisoned| {
            tracing::error!("Board lock poisoned, continuing with last state");
            PoisonError::into_inner(poisoned)
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, BoardStore> {
        self.store.write().unwrap_or_else(|poisoned| {
            tracing::error!("Board lock poisoned, continuing with last state");
            PoisonError::into_inner(poisoned)
        })
    }
}

impl Default for SharedBoard {
    fn default() -> Self {
        Self::new()
    }
}
