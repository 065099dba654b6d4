//! # Push Channel
//!
//! Persistent WebSocket connection carrying board broadcasts.
//!
//! ## Handshake
//!
//! ```text
//! client                         server
//!   |  ---- WebSocket upgrade ---->  |
//!   |  <--- welcome ---------------  |
//!   |  ---- subscribe board ------>  |
//!   |  ---- subscribe clear ------>  |
//!   |  <--- subscribed board ------  |
//!   |  <--- subscribed clear ------  |
//! ```
//!
//! Once both subscriptions are acknowledged the channel is split into a
//! [`PushLink`] for fire-and-forget publishing and an inbound stream of
//! [`PushInbound`] items.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use board_core::{ClientFrame, DrawAction, ServerFrame, Topic};
use futures::stream::{self, BoxStream};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use crate::{ClientError, ClientResult};

/// Broadcast received on an established push channel.
#[derive(Debug, Clone, PartialEq)]
pub enum PushInbound {
    /// Board topic: one action.
    Action(DrawAction),
    /// Clear topic.
    Clear,
}

/// Inbound items. `Err(ClientError::Json(_))` marks a single malformed frame;
/// any other error ends the channel.
pub type InboundStream = BoxStream<'static, ClientResult<PushInbound>>;

/// An established, subscribed push channel.
pub struct PushSession {
    /// Outbound side.
    pub link: PushLink,
    /// Inbound side.
    pub inbound: InboundStream,
}

/// Outbound side of a push channel.
///
/// Publishing never waits for the network and expects no acknowledgement.
#[derive(Debug, Clone)]
pub struct PushLink {
    outbound: mpsc::UnboundedSender<ClientFrame>,
}

impl PushLink {
    /// Create a link and the receiver its frames arrive on.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ClientFrame>) {
        let (outbound, rx) = mpsc::unbounded_channel();
        (Self { outbound }, rx)
    }

    /// Publish to the "draw" destination.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::LinkClosed`] if the writer has shut down.
    pub fn publish_draw(&self, action: &DrawAction) -> ClientResult<()> {
        self.publish(ClientFrame::Draw {
            action: action.clone(),
        })
    }

    /// Publish to the "clear" destination.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::LinkClosed`] if the writer has shut down.
    pub fn publish_clear(&self) -> ClientResult<()> {
        self.publish(ClientFrame::Clear)
    }

    /// Whether the writer has shut down.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.outbound.is_closed()
    }

    fn publish(&self, frame: ClientFrame) -> ClientResult<()> {
        self.outbound
            .send(frame)
            .map_err(|_| ClientError::LinkClosed)
    }
}

/// Opens push channels.
#[async_trait]
pub trait PushConnector: Send + Sync + 'static {
    /// Connect, complete the handshake and subscribe to every topic.
    async fn connect(&self) -> ClientResult<PushSession>;
}

/// [`PushConnector`] over `tokio-tungstenite`.
#[derive(Debug, Clone)]
pub struct WsPushConnector {
    url: Url,
    handshake_timeout: Duration,
}

impl WsPushConnector {
    /// Create a connector for the given WebSocket URL.
    #[must_use]
    pub fn new(url: Url, handshake_timeout: Duration) -> Self {
        Self {
            url,
            handshake_timeout,
        }
    }

    async fn handshake(&self) -> ClientResult<PushSession> {
        let (ws_stream, _) = connect_async(self.url.as_str()).await?;
        let (mut write, mut read) = ws_stream.split();

        match next_frame(&mut read).await? {
            ServerFrame::Welcome { version } => {
                tracing::debug!(server_version = %version, "Push channel welcome received");
            }
            other => {
                return Err(ClientError::Handshake(format!(
                    "expected welcome, got {other:?}"
                )))
            }
        }

        for topic in Topic::ALL {
            let frame = ClientFrame::Subscribe { topic }.to_json()?;
            write.send(Message::Text(frame)).await?;
        }

        // Broadcasts may interleave with the acknowledgements; keep them.
        let mut pending: HashSet<Topic> = Topic::ALL.into_iter().collect();
        let mut early = Vec::new();
        while !pending.is_empty() {
            match next_frame(&mut read).await? {
                ServerFrame::Subscribed { topic } => {
                    pending.remove(&topic);
                }
                ServerFrame::Action { action } => early.push(Ok(PushInbound::Action(action))),
                ServerFrame::Cleared => early.push(Ok(PushInbound::Clear)),
                ServerFrame::Error { code, message } => {
                    return Err(ClientError::Handshake(format!("{code}: {message}")));
                }
                ServerFrame::Welcome { .. } => {
                    return Err(ClientError::Handshake("duplicate welcome".to_string()));
                }
            }
        }

        let (link, mut outbound_rx) = PushLink::channel();
        tokio::spawn(async move {
            while let Some(frame) = outbound_rx.recv().await {
                let text = match frame.to_json() {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to encode push frame");
                        continue;
                    }
                };
                if let Err(e) = write.send(Message::Text(text)).await {
                    tracing::warn!(error = %e, "Push channel write failed");
                    break;
                }
            }
            let _ = write.close().await;
            tracing::debug!("Push channel writer stopped");
        });

        let inbound = stream::iter(early)
            .chain(read.filter_map(|msg| async move { inbound_item(msg) }))
            .boxed();

        Ok(PushSession { link, inbound })
    }
}

#[async_trait]
impl PushConnector for WsPushConnector {
    async fn connect(&self) -> ClientResult<PushSession> {
        let limit = self.handshake_timeout;
        match tokio::time::timeout(limit, self.handshake()).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::HandshakeTimeout(
                u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            )),
        }
    }
}

/// Read the next text frame during the handshake.
async fn next_frame<S>(read: &mut S) -> ClientResult<ServerFrame>
where
    S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        match read.next().await {
            Some(Ok(Message::Text(text))) => return Ok(ServerFrame::from_json(&text)?),
            Some(Ok(Message::Close(_))) | None => {
                return Err(ClientError::Handshake(
                    "connection closed during handshake".to_string(),
                ))
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => return Err(e.into()),
        }
    }
}

fn inbound_item(
    msg: Result<Message, tokio_tungstenite::tungstenite::Error>,
) -> Option<ClientResult<PushInbound>> {
    match msg {
        Ok(Message::Text(text)) => match ServerFrame::from_json(&text) {
            Ok(ServerFrame::Action { action }) => Some(Ok(PushInbound::Action(action))),
            Ok(ServerFrame::Cleared) => Some(Ok(PushInbound::Clear)),
            Ok(ServerFrame::Error { code, message }) => {
                tracing::warn!(code = %code, message = %message, "Push channel error frame");
                None
            }
            Ok(other) => {
                tracing::debug!(frame = ?other, "Ignoring control frame");
                None
            }
            Err(e) => Some(Err(e.into())),
        },
        Ok(_) => None,
        Err(e) => Some(Err(e.into())),
    }
}
