//! Transport Selector.
//!
//! Routes each outgoing action to the push channel when Connected and to the
//! pull fallback otherwise. Nothing is cached: a send that fails is logged
//! and forgotten, the next stroke or poll carries fresh state.

use std::sync::Arc;

use board_core::{ConnectionState, DrawAction};

use crate::http::PullTransport;
use crate::push::PushLink;

/// Where an outgoing action went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Published on the push channel.
    Push,
    /// Sent as one fallback request.
    Pull,
}

/// Per-action transport router.
#[derive(Clone)]
pub struct TransportSelector {
    pull: Arc<dyn PullTransport>,
}

impl TransportSelector {
    /// Create a selector using `pull` as the fallback.
    #[must_use]
    pub fn new(pull: Arc<dyn PullTransport>) -> Self {
        Self { pull }
    }

    /// Pick a route for the current connection state.
    #[must_use]
    pub fn select(state: ConnectionState, link: Option<&PushLink>) -> Route {
        match (state, link) {
            (ConnectionState::Connected, Some(_)) => Route::Push,
            _ => Route::Pull,
        }
    }

    /// Send a draw action.
    pub fn dispatch(
        &self,
        action: &DrawAction,
        state: ConnectionState,
        link: Option<&PushLink>,
    ) -> Route {
        let route = Self::select(state, link);
        match (route, link) {
            (Route::Push, Some(link)) => {
                if let Err(e) = link.publish_draw(action) {
                    tracing::warn!(error = %e, "Dropping action, push publish failed");
                }
            }
            _ => {
                let pull = Arc::clone(&self.pull);
                let action = action.clone();
                tokio::spawn(async move {
                    if let Err(e) = pull.post_action(&action).await {
                        tracing::warn!(error = %e, "Fallback draw request failed");
                    }
                });
            }
        }
        route
    }

    /// Send a clear command.
    pub fn dispatch_clear(&self, state: ConnectionState, link: Option<&PushLink>) -> Route {
        let route = Self::select(state, link);
        match (route, link) {
            (Route::Push, Some(link)) => {
                if let Err(e) = link.publish_clear() {
                    tracing::warn!(error = %e, "Dropping clear, push publish failed");
                }
            }
            _ => {
                let pull = Arc::clone(&self.pull);
                tokio::spawn(async move {
                    if let Err(e) = pull.post_clear().await {
                        tracing::warn!(error = %e, "Fallback clear request failed");
                    }
                });
            }
        }
        route
    }
}
