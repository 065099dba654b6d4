//! # Sync Engine
//!
//! One engine per session. It owns the board, the connection manager, the
//! input throttle and the session color, and it is the only place any of
//! them change. Everything else posts [`EngineEvent`]s to its queue.
//!
//! ## Event handling
//!
//! | Event                 | Effect                                          |
//! |-----------------------|-------------------------------------------------|
//! | local pointer sample  | throttle, append, incremental paint, dispatch   |
//! | push action           | append + incremental paint (clear: blank board) |
//! | push clear            | blank board, full repaint                       |
//! | snapshot              | reset, full repaint                             |
//! | push ready/failed/lost| connection transition, status notification     |

use std::sync::Arc;
use std::time::Instant;

use board_core::{BoardStore, ConnectionState, DrawAction, InputThrottle};

use crate::connection::{ConnectionManager, ConnectionTimings};
use crate::event::{EngineEvent, EventReceiver, EventSender};
use crate::http::{resolve_user_color, HttpPullTransport, PullTransport};
use crate::push::{PushConnector, WsPushConnector};
use crate::render::RenderSink;
use crate::transport::{Route, TransportSelector};
use crate::{ClientConfig, ClientResult};

/// Color used until the session color is resolved.
pub const DEFAULT_COLOR: &str = "#000000";

/// Cloneable handle for posting input to a running engine.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: EventSender,
}

impl EngineHandle {
    /// Post a pointer sample taken now.
    pub fn pointer(&self, x: f64, y: f64) -> bool {
        self.pointer_at(x, y, Instant::now())
    }

    /// Post a pointer sample taken at `at`.
    pub fn pointer_at(&self, x: f64, y: f64, at: Instant) -> bool {
        self.post(EngineEvent::Pointer { x, y, at })
    }

    /// Ask the engine to clear the board.
    pub fn clear(&self) -> bool {
        self.post(EngineEvent::ClearRequested)
    }

    /// Ask the engine to reload the full board.
    pub fn reload(&self) -> bool {
        self.post(EngineEvent::ReloadRequested)
    }

    /// Stop the engine.
    pub fn shutdown(&self) -> bool {
        self.post(EngineEvent::Shutdown)
    }

    /// Returns false once the engine is gone.
    fn post(&self, event: EngineEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Client-side synchronization engine.
pub struct SyncEngine {
    board: BoardStore,
    connection: ConnectionManager,
    selector: TransportSelector,
    pull: Arc<dyn PullTransport>,
    throttle: InputThrottle,
    color: String,
    renderer: Box<dyn RenderSink>,
    status: ConnectionState,
    started: bool,
    events_tx: EventSender,
    events_rx: EventReceiver,
}

impl SyncEngine {
    /// Create an engine over the given transports.
    ///
    /// The push connector is ignored when `config.push_enabled` is false.
    #[must_use]
    pub fn new(
        config: &ClientConfig,
        pull: Arc<dyn PullTransport>,
        push: Option<Arc<dyn PushConnector>>,
        renderer: Box<dyn RenderSink>,
    ) -> Self {
        let (events_tx, events_rx) = tokio::sync::mpsc::unbounded_channel();
        let push = if config.push_enabled { push } else { None };
        let timings = ConnectionTimings {
            reconnect_interval: config.reconnect_interval,
            poll_interval: config.poll_interval,
        };

        Self {
            board: BoardStore::new(),
            connection: ConnectionManager::new(push, Arc::clone(&pull), events_tx.clone(), timings),
            selector: TransportSelector::new(Arc::clone(&pull)),
            pull,
            throttle: InputThrottle::new(config.throttle_window),
            color: DEFAULT_COLOR.to_string(),
            renderer,
            status: ConnectionState::Disconnected,
            started: false,
            events_tx,
            events_rx,
        }
    }

    /// Create an engine speaking HTTP and WebSocket to `config.server_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_http(config: &ClientConfig, renderer: Box<dyn RenderSink>) -> ClientResult<Self> {
        let pull: Arc<dyn PullTransport> = Arc::new(HttpPullTransport::new(config)?);
        let push: Option<Arc<dyn PushConnector>> = if config.push_enabled {
            Some(Arc::new(WsPushConnector::new(
                config.ws_url.clone(),
                config.handshake_timeout,
            )))
        } else {
            None
        };
        Ok(Self::new(config, pull, push, renderer))
    }

    /// Handle for posting input from other tasks.
    #[must_use]
    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            tx: self.events_tx.clone(),
        }
    }

    /// The local board.
    #[must_use]
    pub fn board(&self) -> &BoardStore {
        &self.board
    }

    /// Current push channel state.
    #[must_use]
    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// The connection manager.
    #[must_use]
    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    /// Session color stamped on local actions.
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Kick off the session: color lookup, initial load, first connection
    /// attempt and the watchdog. Idempotent.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        let pull = Arc::clone(&self.pull);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let color = resolve_user_color(pull.as_ref()).await;
            let _ = events.send(EngineEvent::ColorResolved(color));
        });

        self.request_snapshot();
        self.connection.start_watchdog();
        self.connection.connect();

        self.status = self.connection.state();
        self.renderer.connection_status_changed(self.status);
        tracing::info!(state = %self.status, "Sync engine started");
    }

    /// Start if needed and process events until [`EngineEvent::Shutdown`].
    pub async fn run(mut self) {
        self.start();
        while self.next_event().await {}
        self.connection.shutdown();
        tracing::info!("Sync engine stopped");
    }

    /// Wait for and handle one event. Returns false on shutdown.
    pub async fn next_event(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => self.handle_event(event),
            None => false,
        }
    }

    /// Handle one event. Returns false on shutdown.
    pub fn handle_event(&mut self, event: EngineEvent) -> bool {
        tracing::trace!(event = event.name(), "Engine event");

        match event {
            EngineEvent::Pointer { x, y, at } => {
                self.submit_local_action(x, y, at);
            }
            EngineEvent::ClearRequested => self.submit_clear(),
            EngineEvent::ReloadRequested => self.request_snapshot(),
            EngineEvent::PushReady { generation, link } => {
                self.connection.on_ready(generation, link);
                // Changes made while the channel was down only reach us by snapshot
                if generation > 1 && self.connection.state().is_connected() {
                    self.request_snapshot();
                }
            }
            EngineEvent::PushFailed {
                generation,
                error: reason,
            }
            | EngineEvent::PushLost { generation, reason } => {
                self.connection.on_failure(generation, &reason);
            }
            EngineEvent::PushAction { generation, action } => {
                if self.connection.accepts_inbound(generation) {
                    self.apply_remote_action(action);
                } else {
                    tracing::debug!(generation, "Dropping action from stale push channel");
                }
            }
            EngineEvent::PushClear { generation } => {
                if self.connection.accepts_inbound(generation) {
                    self.apply_remote_clear();
                } else {
                    tracing::debug!(generation, "Dropping clear from stale push channel");
                }
            }
            EngineEvent::Snapshot(actions) => self.apply_snapshot(actions),
            EngineEvent::RetryDue { generation } => self.connection.on_retry_due(generation),
            EngineEvent::Watchdog => self.connection.on_watchdog(),
            EngineEvent::ColorResolved(color) => {
                tracing::info!(color = %color, "Session color resolved");
                self.color = color;
            }
            EngineEvent::Shutdown => return false,
        }

        self.notify_if_changed();
        true
    }

    /// Accept a local sample: throttle, then paint, then send.
    ///
    /// The action is appended and painted before it is handed to a
    /// transport, so the local user never waits on the network. Returns the
    /// action, or `None` if the throttle dropped the sample.
    pub fn submit_local_action(&mut self, x: f64, y: f64, at: Instant) -> Option<DrawAction> {
        if !self.throttle.try_accept(at) {
            return None;
        }

        let action = DrawAction::point(x, y, self.color.clone());
        self.board.append(action.clone());
        self.renderer.incremental(&action);

        let route = self.selector.dispatch(
            &action,
            self.connection.state(),
            self.connection.link(),
        );
        tracing::trace!(?route, "Local action dispatched");
        Some(action)
    }

    /// Clear locally and tell everyone else.
    pub fn submit_clear(&mut self) {
        self.board.append(DrawAction::clear());
        self.renderer.full_repaint(self.board.snapshot_for_render());

        let route = self
            .selector
            .dispatch_clear(self.connection.state(), self.connection.link());
        tracing::info!(via_push = route == Route::Push, "Board cleared locally");
    }

    /// Fetch the full board once, in the background.
    pub fn request_snapshot(&self) {
        let pull = Arc::clone(&self.pull);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            match pull.fetch_snapshot().await {
                Ok(actions) => {
                    let _ = events.send(EngineEvent::Snapshot(actions));
                }
                Err(e) => tracing::warn!(error = %e, "Snapshot request failed"),
            }
        });
    }

    fn apply_remote_action(&mut self, action: DrawAction) {
        if action.is_clear() {
            self.apply_remote_clear();
            return;
        }
        self.renderer.incremental(&action);
        self.board.append(action);
    }

    fn apply_remote_clear(&mut self) {
        self.board.reset(Vec::new());
        self.renderer.full_repaint(&[]);
    }

    fn apply_snapshot(&mut self, actions: Vec<DrawAction>) {
        tracing::debug!(actions = actions.len(), "Applying snapshot");
        self.board.reset(actions);
        self.renderer.full_repaint(self.board.snapshot_for_render());
    }

    fn notify_if_changed(&mut self) {
        let state = self.connection.state();
        if state != self.status {
            self.status = state;
            self.renderer.connection_status_changed(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SERVER_URL;
    use crate::push::PushInbound;
    use crate::render::{ChannelRenderSink, RenderEvent};
    use crate::testing::{MockPull, MockPush};
    use crate::ClientError;
    use board_core::ClientFrame;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn config() -> ClientConfig {
        ClientConfig::new(DEFAULT_SERVER_URL).expect("config")
    }

    fn engine_with(
        push: Option<&MockPush>,
        pull: &MockPull,
    ) -> (SyncEngine, UnboundedReceiver<RenderEvent>) {
        let (sink, rx) = ChannelRenderSink::channel();
        let engine = SyncEngine::new(
            &config(),
            pull.shared(),
            push.map(MockPush::connector),
            Box::new(sink),
        );
        (engine, rx)
    }

    async fn step_until(engine: &mut SyncEngine, done: impl Fn(&SyncEngine) -> bool) {
        for _ in 0..64 {
            if done(&*engine) {
                return;
            }
            assert!(engine.next_event().await, "engine stopped");
        }
        panic!("condition not reached");
    }

    /// Let background tasks finish, then handle everything they posted.
    async fn settle(engine: &mut SyncEngine) {
        tokio::time::sleep(Duration::from_millis(1)).await;
        while let Ok(event) = engine.events_rx.try_recv() {
            assert!(engine.handle_event(event), "engine stopped");
        }
    }

    async fn connected(
        push: &MockPush,
        pull: &MockPull,
    ) -> (SyncEngine, UnboundedReceiver<RenderEvent>) {
        let (mut engine, render) = engine_with(Some(push), pull);
        engine.start();
        step_until(&mut engine, |e| {
            e.connection_state() == ConnectionState::Connected
        })
        .await;
        settle(&mut engine).await;
        (engine, render)
    }

    fn drain(render: &mut UnboundedReceiver<RenderEvent>) -> Vec<RenderEvent> {
        let mut events = Vec::new();
        while let Ok(event) = render.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn handshake_connects_and_no_poll_while_connected() {
        let pull = MockPull::new();
        let push = MockPush::new();
        let (mut engine, _render) = engine_with(Some(&push), &pull);

        engine.start();
        assert_eq!(engine.connection_state(), ConnectionState::Connecting);

        step_until(&mut engine, |e| {
            e.connection_state() == ConnectionState::Connected
        })
        .await;
        assert!(!engine.connection().is_polling());

        tokio::time::sleep(Duration::from_secs(20)).await;
        // Only the initial load
        assert_eq!(pull.snapshot_fetches(), 1);
        assert_eq!(push.connects(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn transport_error_falls_back_to_single_poller() {
        let pull = MockPull::new();
        let push = MockPush::new();
        let (mut engine, mut render) = connected(&push, &pull).await;
        drain(&mut render);

        push.drop_connection();
        step_until(&mut engine, |e| {
            e.connection_state() == ConnectionState::Disconnected
        })
        .await;

        assert!(engine.connection().is_polling());
        assert!(engine.connection().retry_pending());
        assert!(drain(&mut render).contains(&RenderEvent::Status(ConnectionState::Disconnected)));

        let before = pull.snapshot_fetches();
        tokio::time::sleep(Duration::from_millis(5500)).await;
        assert_eq!(pull.snapshot_fetches(), before + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reconnects_after_fixed_interval() {
        let pull = MockPull::new();
        let push = MockPush::new();
        push.fail_next(1);
        let (mut engine, _render) = engine_with(Some(&push), &pull);

        engine.start();
        step_until(&mut engine, |e| e.connection().retry_pending()).await;
        assert_eq!(engine.connection_state(), ConnectionState::Disconnected);

        step_until(&mut engine, |e| {
            e.connection_state() == ConnectionState::Connected
        })
        .await;
        assert_eq!(push.connects(), 2);
        assert!(!engine.connection().is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn reconnect_catches_up_with_snapshot() {
        let pull = MockPull::new();
        let push = MockPush::new();
        let (mut engine, mut render) = connected(&push, &pull).await;

        push.drop_connection();
        step_until(&mut engine, |e| {
            e.connection_state() == ConnectionState::Disconnected
        })
        .await;

        // Drawn by someone else before the next poll tick
        let missed = vec![DrawAction::point(4.0, 4.0, "#444444")];
        pull.set_snapshot(missed.clone());
        let before = pull.snapshot_fetches();

        step_until(&mut engine, |e| {
            e.connection_state() == ConnectionState::Connected
        })
        .await;
        settle(&mut engine).await;

        assert_eq!(pull.snapshot_fetches(), before + 1);
        assert_eq!(engine.board().snapshot_for_render(), missed.as_slice());
        assert!(drain(&mut render).contains(&RenderEvent::FullRepaint(missed)));
    }

    #[tokio::test(start_paused = true)]
    async fn throttle_dispatches_one_of_ten_samples() {
        let pull = MockPull::new();
        let (mut engine, _render) = engine_with(None, &pull);
        let base = Instant::now();

        let accepted = (0..10u32)
            .filter_map(|i| {
                engine.submit_local_action(
                    f64::from(i),
                    0.0,
                    base + Duration::from_micros(500 * u64::from(i)),
                )
            })
            .count();

        assert_eq!(accepted, 1);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(pull.posted().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn throttle_applies_on_push_route() {
        let pull = MockPull::new();
        let push = MockPush::new();
        let (mut engine, _render) = connected(&push, &pull).await;
        let handle = engine.handle();
        let base = Instant::now();

        for i in 0..10u32 {
            assert!(handle.pointer_at(1.0, 1.0, base + Duration::from_micros(500 * u64::from(i))));
        }
        for _ in 0..10 {
            assert!(engine.next_event().await);
        }

        let draws = push
            .published()
            .into_iter()
            .filter(|f| matches!(f, ClientFrame::Draw { .. }))
            .count();
        assert_eq!(draws, 1);
        assert!(pull.posted().is_empty());
    }

    struct OrderSink {
        push: MockPush,
        sent_before_paint: Arc<Mutex<Vec<usize>>>,
    }

    impl RenderSink for OrderSink {
        fn incremental(&mut self, _action: &DrawAction) {
            let sent = self.push.published().len();
            self.sent_before_paint.lock().expect("lock").push(sent);
        }
        fn full_repaint(&mut self, _actions: &[DrawAction]) {}
        fn connection_status_changed(&mut self, _state: ConnectionState) {}
    }

    #[tokio::test(start_paused = true)]
    async fn local_action_paints_before_sending() {
        let pull = MockPull::new();
        let push = MockPush::new();
        let sent_before_paint = Arc::new(Mutex::new(Vec::new()));
        let sink = OrderSink {
            push: push.clone(),
            sent_before_paint: Arc::clone(&sent_before_paint),
        };
        let mut engine = SyncEngine::new(
            &config(),
            pull.shared(),
            Some(push.connector()),
            Box::new(sink),
        );
        engine.start();
        step_until(&mut engine, |e| {
            e.connection_state() == ConnectionState::Connected
        })
        .await;
        settle(&mut engine).await;

        let action = engine
            .submit_local_action(10.0, 20.0, Instant::now())
            .expect("accepted");

        assert_eq!(*sent_before_paint.lock().expect("lock"), vec![0]);
        assert_eq!(push.published(), vec![ClientFrame::Draw { action: action.clone() }]);
        assert_eq!(engine.board().snapshot_for_render(), &[action]);
    }

    #[tokio::test(start_paused = true)]
    async fn local_action_uses_resolved_color() {
        let pull = MockPull::new();
        pull.set_color("#123456");
        let (mut engine, _render) = engine_with(None, &pull);
        assert_eq!(engine.color(), DEFAULT_COLOR);

        engine.start();
        step_until(&mut engine, |e| e.color() == "#123456").await;

        let action = engine
            .submit_local_action(1.0, 1.0, Instant::now())
            .expect("accepted");
        assert_eq!(action.color, "#123456");
    }

    #[tokio::test(start_paused = true)]
    async fn inbound_actions_paint_in_arrival_order() {
        let pull = MockPull::new();
        let push = MockPush::new();
        let (mut engine, mut render) = connected(&push, &pull).await;
        drain(&mut render);

        let first = DrawAction::point(1.0, 1.0, "#ff0000");
        let second = DrawAction::point(2.0, 2.0, "#00ff00");
        push.inject(Ok(PushInbound::Action(first.clone())));
        push.inject(Ok(PushInbound::Action(second.clone())));
        step_until(&mut engine, |e| e.board().len() == 2).await;

        assert_eq!(
            drain(&mut render),
            vec![
                RenderEvent::Incremental(first.clone()),
                RenderEvent::Incremental(second.clone())
            ]
        );
        assert_eq!(engine.board().snapshot_for_render(), &[first, second]);
    }

    #[tokio::test(start_paused = true)]
    async fn inbound_clear_blanks_board() {
        let pull = MockPull::new();
        let push = MockPush::new();
        let (mut engine, mut render) = connected(&push, &pull).await;

        push.inject(Ok(PushInbound::Action(DrawAction::point(1.0, 1.0, "#ff0000"))));
        step_until(&mut engine, |e| e.board().len() == 1).await;
        drain(&mut render);

        push.inject(Ok(PushInbound::Clear));
        step_until(&mut engine, |e| e.board().is_empty()).await;
        assert_eq!(drain(&mut render), vec![RenderEvent::FullRepaint(vec![])]);
    }

    #[tokio::test(start_paused = true)]
    async fn inbound_clear_flag_blanks_board() {
        let pull = MockPull::new();
        let push = MockPush::new();
        let (mut engine, mut render) = connected(&push, &pull).await;

        push.inject(Ok(PushInbound::Action(DrawAction::point(1.0, 1.0, "#ff0000"))));
        step_until(&mut engine, |e| e.board().len() == 1).await;
        drain(&mut render);

        push.inject(Ok(PushInbound::Action(DrawAction::clear())));
        step_until(&mut engine, |e| e.board().is_empty()).await;
        assert_eq!(drain(&mut render), vec![RenderEvent::FullRepaint(vec![])]);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_frame_changes_nothing() {
        let pull = MockPull::new();
        let push = MockPush::new();
        let (mut engine, _render) = connected(&push, &pull).await;

        let bad = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        push.inject(Err(ClientError::Json(bad)));
        push.inject(Ok(PushInbound::Action(DrawAction::point(3.0, 4.0, "#0000ff"))));
        step_until(&mut engine, |e| e.board().len() == 1).await;

        assert_eq!(engine.connection_state(), ConnectionState::Connected);
        assert_eq!(engine.connection().generation(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_generation_frames_are_dropped() {
        let pull = MockPull::new();
        let push = MockPush::new();
        let (mut engine, _render) = connected(&push, &pull).await;

        assert!(engine.handle_event(EngineEvent::PushAction {
            generation: 99,
            action: DrawAction::point(1.0, 1.0, "#ff0000"),
        }));
        assert!(engine.handle_event(EngineEvent::PushClear { generation: 99 }));
        assert!(engine.board().is_empty());
        assert_eq!(engine.board().clear_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_resets_board() {
        let pull = MockPull::new();
        let (mut engine, mut render) = engine_with(None, &pull);
        engine
            .submit_local_action(0.0, 0.0, Instant::now())
            .expect("accepted");
        drain(&mut render);

        let snapshot = vec![
            DrawAction::point(5.0, 5.0, "#aaaaaa"),
            DrawAction::point(6.0, 6.0, "#bbbbbb"),
        ];
        assert!(engine.handle_event(EngineEvent::Snapshot(snapshot.clone())));

        assert_eq!(engine.board().snapshot_for_render(), snapshot.as_slice());
        assert_eq!(drain(&mut render), vec![RenderEvent::FullRepaint(snapshot)]);
    }

    #[tokio::test(start_paused = true)]
    async fn local_clear_is_optimistic() {
        let pull = MockPull::new();
        let push = MockPush::new();
        let (mut engine, mut render) = connected(&push, &pull).await;
        engine
            .submit_local_action(0.0, 0.0, Instant::now())
            .expect("accepted");
        let _ = push.published();
        drain(&mut render);

        assert!(engine.handle().clear());
        assert!(engine.next_event().await);

        assert!(engine.board().is_empty());
        assert_eq!(drain(&mut render), vec![RenderEvent::FullRepaint(vec![])]);
        assert_eq!(push.published(), vec![ClientFrame::Clear]);
    }

    #[tokio::test(start_paused = true)]
    async fn polling_only_engine_stays_disconnected() {
        let pull = MockPull::new();
        let push = MockPush::new();
        let (sink, _render) = ChannelRenderSink::channel();
        let mut engine = SyncEngine::new(
            &config().with_push_enabled(false),
            pull.shared(),
            Some(push.connector()),
            Box::new(sink),
        );

        engine.start();
        tokio::time::sleep(Duration::from_millis(5500)).await;
        assert_eq!(engine.connection_state(), ConnectionState::Disconnected);
        assert!(engine.connection().is_polling());
        assert_eq!(push.connects(), 0);
        // Initial load plus one poll
        assert_eq!(pull.snapshot_fetches(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn reload_fetches_snapshot() {
        let pull = MockPull::new();
        pull.set_snapshot(vec![DrawAction::point(7.0, 7.0, "#777777")]);
        let (mut engine, _render) = engine_with(None, &pull);

        assert!(engine.handle().reload());
        step_until(&mut engine, |e| e.board().len() == 1).await;
        assert_eq!(pull.snapshot_fetches(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_ends_run() {
        let pull = MockPull::new();
        let push = MockPush::new();
        let (engine, _render) = engine_with(Some(&push), &pull);
        let handle = engine.handle();

        let task = tokio::spawn(engine.run());
        assert!(handle.shutdown());
        task.await.expect("engine task");
        assert!(!handle.pointer(0.0, 0.0));
    }
}
