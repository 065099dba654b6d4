//! Render collaborator.
//!
//! The engine never draws. It tells a [`RenderSink`] what changed and leaves
//! pixels to whoever hosts it.

use board_core::{ConnectionState, DrawAction};
use tokio::sync::mpsc;

/// Receives paint instructions from the sync engine.
pub trait RenderSink: Send {
    /// Paint one action on top of what is already shown.
    fn incremental(&mut self, action: &DrawAction);

    /// Discard everything shown and paint `actions` in order.
    fn full_repaint(&mut self, actions: &[DrawAction]);

    /// The push channel state changed.
    fn connection_status_changed(&mut self, state: ConnectionState);
}

/// A paint instruction captured by [`ChannelRenderSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    /// See [`RenderSink::incremental`].
    Incremental(DrawAction),
    /// See [`RenderSink::full_repaint`].
    FullRepaint(Vec<DrawAction>),
    /// See [`RenderSink::connection_status_changed`].
    Status(ConnectionState),
}

/// Forwards paint instructions over a channel, for hosts that render on
/// another thread.
#[derive(Debug, Clone)]
pub struct ChannelRenderSink {
    tx: mpsc::UnboundedSender<RenderEvent>,
}

impl ChannelRenderSink {
    /// Create a sink and the receiver its events arrive on.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RenderEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn forward(&self, event: RenderEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("Render receiver dropped");
        }
    }
}

impl RenderSink for ChannelRenderSink {
    fn incremental(&mut self, action: &DrawAction) {
        self.forward(RenderEvent::Incremental(action.clone()));
    }

    fn full_repaint(&mut self, actions: &[DrawAction]) {
        self.forward(RenderEvent::FullRepaint(actions.to_vec()));
    }

    fn connection_status_changed(&mut self, state: ConnectionState) {
        self.forward(RenderEvent::Status(state));
    }
}

/// Logs paint instructions instead of drawing them.
#[derive(Debug, Default)]
pub struct TracingRenderSink {
    painted: usize,
}

impl TracingRenderSink {
    /// Create a sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Actions currently shown.
    #[must_use]
    pub fn painted(&self) -> usize {
        self.painted
    }
}

impl RenderSink for TracingRenderSink {
    fn incremental(&mut self, action: &DrawAction) {
        self.painted += 1;
        tracing::info!(
            x = action.x,
            y = action.y,
            color = %action.color,
            painted = self.painted,
            "Paint action"
        );
    }

    fn full_repaint(&mut self, actions: &[DrawAction]) {
        self.painted = actions.len();
        tracing::info!(painted = self.painted, "Full repaint");
    }

    fn connection_status_changed(&mut self, state: ConnectionState) {
        tracing::info!(state = %state, label = state.label(), "Connection status");
    }
}
