//! # Connection Manager
//!
//! Owns the push channel lifecycle.
//!
//! ```text
//!                 connect()
//!  Disconnected ─────────────► Connecting
//!       ▲  ▲                       │
//!       │  └── failure / timeout ──┤
//!       │                          │ handshake + subscriptions
//!       └──── transport error ─ Connected
//! ```
//!
//! While Disconnected the fallback poller runs and a single retry is
//! pending. Retries use a fixed interval and never stop. A watchdog tick
//! reconnects whenever the manager sits Disconnected with nothing pending.
//!
//! All work that waits on the network or a timer runs in spawned tasks that
//! report back through the engine queue; the manager itself only changes
//! state when the engine hands it an event.

use std::sync::Arc;
use std::time::Duration;

use board_core::ConnectionState;
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::event::{EngineEvent, EventSender};
use crate::http::PullTransport;
use crate::push::{InboundStream, PushConnector, PushInbound, PushLink};
use crate::ClientError;

/// Timing knobs of the manager.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionTimings {
    /// Fixed delay before a reconnect attempt.
    pub reconnect_interval: Duration,
    /// Fallback poll period.
    pub poll_interval: Duration,
}

/// Push channel lifecycle owner.
pub struct ConnectionManager {
    state: ConnectionState,
    generation: u64,
    link: Option<PushLink>,
    connector: Option<Arc<dyn PushConnector>>,
    pull: Arc<dyn PullTransport>,
    events: EventSender,
    timings: ConnectionTimings,
    session_task: Option<JoinHandle<()>>,
    poller: Option<JoinHandle<()>>,
    retry: Option<JoinHandle<()>>,
    watchdog: Option<JoinHandle<()>>,
}

impl ConnectionManager {
    /// Create a manager in the Disconnected state.
    ///
    /// Without a connector the manager runs polling-only.
    #[must_use]
    pub fn new(
        connector: Option<Arc<dyn PushConnector>>,
        pull: Arc<dyn PullTransport>,
        events: EventSender,
        timings: ConnectionTimings,
    ) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            generation: 0,
            link: None,
            connector,
            pull,
            events,
            timings,
            session_task: None,
            poller: None,
            retry: None,
            watchdog: None,
        }
    }

    /// Current connection state.
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// Current connection attempt number.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Outbound side of the push channel, present only while Connected.
    #[must_use]
    pub fn link(&self) -> Option<&PushLink> {
        self.link.as_ref()
    }

    /// Whether the fallback poller is running.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        is_running(self.poller.as_ref())
    }

    /// Whether a reconnect attempt is scheduled.
    #[must_use]
    pub fn retry_pending(&self) -> bool {
        is_running(self.retry.as_ref())
    }

    /// Whether push frames from `generation` should reach the board.
    #[must_use]
    pub fn accepts_inbound(&self, generation: u64) -> bool {
        self.state == ConnectionState::Connected && generation == self.generation
    }

    /// Start a connection attempt.
    ///
    /// No-op unless Disconnected. In polling-only mode this just makes sure
    /// the poller runs.
    pub fn connect(&mut self) {
        if self.state != ConnectionState::Disconnected {
            tracing::debug!(state = %self.state, "Connect ignored, attempt already active");
            return;
        }

        let Some(connector) = self.connector.clone() else {
            self.start_poller();
            return;
        };

        self.cancel_retry();
        self.generation += 1;
        self.state = ConnectionState::Connecting;

        let generation = self.generation;
        let events = self.events.clone();
        tracing::info!(generation, "Connecting push channel");

        self.session_task = Some(tokio::spawn(async move {
            match connector.connect().await {
                Ok(session) => {
                    if events
                        .send(EngineEvent::PushReady {
                            generation,
                            link: session.link,
                        })
                        .is_err()
                    {
                        return;
                    }
                    forward_inbound(generation, session.inbound, &events).await;
                }
                Err(err) => {
                    let _ = events.send(EngineEvent::PushFailed {
                        generation,
                        error: err.to_string(),
                    });
                }
            }
        }));
    }

    /// Handshake completed for `generation`.
    pub fn on_ready(&mut self, generation: u64, link: PushLink) {
        if generation != self.generation || self.state != ConnectionState::Connecting {
            tracing::debug!(generation, current = self.generation, "Dropping stale push link");
            return;
        }

        self.state = ConnectionState::Connected;
        self.link = Some(link);
        self.stop_poller();
        self.cancel_retry();
        tracing::info!(generation, "Push channel connected");
    }

    /// The attempt or channel for `generation` failed.
    pub fn on_failure(&mut self, generation: u64, reason: &str) {
        if generation != self.generation || self.state == ConnectionState::Disconnected {
            tracing::debug!(generation, current = self.generation, "Ignoring stale failure");
            return;
        }

        tracing::warn!(
            generation,
            reason = %reason,
            retry_in_ms = self.timings.reconnect_interval.as_millis(),
            "Push channel unavailable, falling back to polling"
        );

        self.state = ConnectionState::Disconnected;
        self.link = None;
        if let Some(task) = self.session_task.take() {
            task.abort();
        }
        self.start_poller();
        self.schedule_retry();
    }

    /// The backoff scheduled after the failure of `generation` elapsed.
    pub fn on_retry_due(&mut self, generation: u64) {
        if generation != self.generation {
            return;
        }
        self.retry = None;
        self.connect();
    }

    /// Periodic safety net: reconnect if idle and Disconnected.
    pub fn on_watchdog(&mut self) {
        if self.state == ConnectionState::Disconnected && !self.retry_pending() {
            tracing::debug!("Watchdog triggering reconnect");
            self.connect();
        }
    }

    /// Start the periodic watchdog. Idempotent.
    pub fn start_watchdog(&mut self) {
        if is_running(self.watchdog.as_ref()) || self.connector.is_none() {
            return;
        }
        let events = self.events.clone();
        let period = self.timings.reconnect_interval;
        self.watchdog = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // Skip the immediate first tick
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if events.send(EngineEvent::Watchdog).is_err() {
                    break;
                }
            }
        }));
    }

    /// Stop every background task and drop the link.
    pub fn shutdown(&mut self) {
        self.state = ConnectionState::Disconnected;
        self.link = None;
        for task in [
            self.session_task.take(),
            self.poller.take(),
            self.retry.take(),
            self.watchdog.take(),
        ]
        .into_iter()
        .flatten()
        {
            task.abort();
        }
    }

    fn start_poller(&mut self) {
        if self.is_polling() {
            return;
        }

        let pull = Arc::clone(&self.pull);
        let events = self.events.clone();
        let period = self.timings.poll_interval;
        tracing::info!(interval_ms = period.as_millis(), "Starting fallback poller");

        self.poller = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match pull.fetch_snapshot().await {
                    Ok(snapshot) => {
                        if events.send(EngineEvent::Snapshot(snapshot)).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "Fallback poll failed");
                    }
                }
            }
        }));
    }

    fn stop_poller(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.abort();
            tracing::info!("Stopped fallback poller");
        }
    }

    fn schedule_retry(&mut self) {
        if self.retry_pending() {
            return;
        }
        let events = self.events.clone();
        let generation = self.generation;
        let delay = self.timings.reconnect_interval;
        self.retry = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(EngineEvent::RetryDue { generation });
        }));
    }

    fn cancel_retry(&mut self) {
        if let Some(retry) = self.retry.take() {
            retry.abort();
        }
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn is_running(task: Option<&JoinHandle<()>>) -> bool {
    task.is_some_and(|t| !t.is_finished())
}

/// Forward inbound broadcasts to the engine until the channel ends.
async fn forward_inbound(generation: u64, mut inbound: InboundStream, events: &EventSender) {
    let reason = loop {
        match inbound.next().await {
            Some(Ok(PushInbound::Action(action))) => {
                if events
                    .send(EngineEvent::PushAction { generation, action })
                    .is_err()
                {
                    return;
                }
            }
            Some(Ok(PushInbound::Clear)) => {
                if events.send(EngineEvent::PushClear { generation }).is_err() {
                    return;
                }
            }
            Some(Err(ClientError::Json(e))) => {
                tracing::warn!(generation, error = %e, "Discarding malformed push frame");
            }
            Some(Err(e)) => break e.to_string(),
            None => break "connection closed".to_string(),
        }
    };

    let _ = events.send(EngineEvent::PushLost { generation, reason });
}
