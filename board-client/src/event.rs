//! Named events consumed by the sync loop.
//!
//! Every source of change (pointer samples, the push channel, the fallback
//! poller, timers) reaches the engine as an [`EngineEvent`] on one queue, so
//! the board and the connection state are only ever touched by the task that
//! drains it.

use std::time::Instant;

use board_core::DrawAction;
use tokio::sync::mpsc;

use crate::push::PushLink;

/// Sender half of the engine queue.
pub type EventSender = mpsc::UnboundedSender<EngineEvent>;
/// Receiver half of the engine queue.
pub type EventReceiver = mpsc::UnboundedReceiver<EngineEvent>;

/// Everything the sync loop reacts to.
#[derive(Debug)]
pub enum EngineEvent {
    /// A pointer/touch sample while the user is drawing.
    Pointer {
        /// X position in canvas coordinates.
        x: f64,
        /// Y position in canvas coordinates.
        y: f64,
        /// When the sample was taken.
        at: Instant,
    },
    /// The user asked to clear the board.
    ClearRequested,
    /// The user asked for a fresh snapshot.
    ReloadRequested,
    /// Push channel handshake and subscriptions completed.
    PushReady {
        /// Connection attempt this link belongs to.
        generation: u64,
        /// Outbound side of the channel.
        link: PushLink,
    },
    /// Push channel handshake failed or timed out.
    PushFailed {
        /// Connection attempt that failed.
        generation: u64,
        /// Failure description.
        error: String,
    },
    /// An established push channel dropped.
    PushLost {
        /// Connection attempt that dropped.
        generation: u64,
        /// Failure description.
        reason: String,
    },
    /// Board topic broadcast.
    PushAction {
        /// Connection attempt the frame arrived on.
        generation: u64,
        /// The broadcast action.
        action: DrawAction,
    },
    /// Clear topic broadcast.
    PushClear {
        /// Connection attempt the frame arrived on.
        generation: u64,
    },
    /// Full board from a poll, the initial load or a manual reload.
    Snapshot(Vec<DrawAction>),
    /// The fixed reconnect backoff elapsed.
    RetryDue {
        /// Connection attempt whose failure scheduled the retry.
        generation: u64,
    },
    /// Periodic reconnect check.
    Watchdog,
    /// The session color has been resolved.
    ColorResolved(String),
    /// Stop the engine.
    Shutdown,
}

impl EngineEvent {
    /// Short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pointer { .. } => "pointer",
            Self::ClearRequested => "clear_requested",
            Self::ReloadRequested => "reload_requested",
            Self::PushReady { .. } => "push_ready",
            Self::PushFailed { .. } => "push_failed",
            Self::PushLost { .. } => "push_lost",
            Self::PushAction { .. } => "push_action",
            Self::PushClear { .. } => "push_clear",
            Self::Snapshot(_) => "snapshot",
            Self::RetryDue { .. } => "retry_due",
            Self::Watchdog => "watchdog",
            Self::ColorResolved(_) => "color_resolved",
            Self::Shutdown => "shutdown",
        }
    }
}
