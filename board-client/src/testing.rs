//! In-memory transports for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use board_core::{ClientFrame, DrawAction};
use futures::channel::mpsc as fmpsc;
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::http::PullTransport;
use crate::push::{PushConnector, PushInbound, PushLink, PushSession};
use crate::{ClientError, ClientResult};

#[derive(Default)]
struct PullInner {
    snapshot: Mutex<Vec<DrawAction>>,
    posted: Mutex<Vec<DrawAction>>,
    fetches: AtomicUsize,
    clears: AtomicUsize,
    color: Mutex<Option<String>>,
}

/// Pull transport that records every request.
#[derive(Clone, Default)]
pub(crate) struct MockPull {
    inner: Arc<PullInner>,
}

impl MockPull {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn shared(&self) -> Arc<dyn PullTransport> {
        Arc::new(self.clone())
    }

    pub(crate) fn set_snapshot(&self, actions: Vec<DrawAction>) {
        *self.inner.snapshot.lock().expect("lock") = actions;
    }

    pub(crate) fn set_color(&self, color: &str) {
        *self.inner.color.lock().expect("lock") = Some(color.to_string());
    }

    pub(crate) fn snapshot_fetches(&self) -> usize {
        self.inner.fetches.load(Ordering::SeqCst)
    }

    pub(crate) fn posted(&self) -> Vec<DrawAction> {
        self.inner.posted.lock().expect("lock").clone()
    }

    pub(crate) fn clears(&self) -> usize {
        self.inner.clears.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PullTransport for MockPull {
    async fn fetch_snapshot(&self) -> ClientResult<Vec<DrawAction>> {
        self.inner.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.inner.snapshot.lock().expect("lock").clone())
    }

    async fn post_action(&self, action: &DrawAction) -> ClientResult<()> {
        self.inner.posted.lock().expect("lock").push(action.clone());
        Ok(())
    }

    async fn post_clear(&self) -> ClientResult<()> {
        self.inner.clears.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn random_color(&self) -> ClientResult<String> {
        self.inner
            .color
            .lock()
            .expect("lock")
            .clone()
            .ok_or(ClientError::Status(500))
    }
}

type InboundTx = fmpsc::UnboundedSender<ClientResult<PushInbound>>;

#[derive(Default)]
struct PushInner {
    connects: AtomicUsize,
    failures_left: AtomicUsize,
    frames: Mutex<Option<mpsc::UnboundedReceiver<ClientFrame>>>,
    inbound: Mutex<Option<InboundTx>>,
}

/// Push connector whose sessions are driven by the test.
#[derive(Clone, Default)]
pub(crate) struct MockPush {
    inner: Arc<PushInner>,
}

impl MockPush {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn connector(&self) -> Arc<dyn PushConnector> {
        Arc::new(self.clone())
    }

    /// Make the next `n` connection attempts fail.
    pub(crate) fn fail_next(&self, n: usize) {
        self.inner.failures_left.store(n, Ordering::SeqCst);
    }

    pub(crate) fn connects(&self) -> usize {
        self.inner.connects.load(Ordering::SeqCst)
    }

    /// Deliver an inbound item on the latest session.
    pub(crate) fn inject(&self, item: ClientResult<PushInbound>) {
        if let Some(tx) = self.inner.inbound.lock().expect("lock").as_ref() {
            let _ = tx.unbounded_send(item);
        }
    }

    /// End the latest session's inbound stream, as a dropped socket would.
    pub(crate) fn drop_connection(&self) {
        self.inner.inbound.lock().expect("lock").take();
    }

    /// Frames published on the latest session so far.
    pub(crate) fn published(&self) -> Vec<ClientFrame> {
        let mut guard = self.inner.frames.lock().expect("lock");
        let mut frames = Vec::new();
        if let Some(rx) = guard.as_mut() {
            while let Ok(frame) = rx.try_recv() {
                frames.push(frame);
            }
        }
        frames
    }
}

#[async_trait]
impl PushConnector for MockPush {
    async fn connect(&self) -> ClientResult<PushSession> {
        self.inner.connects.fetch_add(1, Ordering::SeqCst);

        let failing = self
            .inner
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(ClientError::Handshake("mock refused".to_string()));
        }

        let (link, frames) = PushLink::channel();
        let (inbound_tx, inbound_rx) = fmpsc::unbounded();
        *self.inner.frames.lock().expect("lock") = Some(frames);
        *self.inner.inbound.lock().expect("lock") = Some(inbound_tx);

        Ok(PushSession {
            link,
            inbound: inbound_rx.boxed(),
        })
    }
}
