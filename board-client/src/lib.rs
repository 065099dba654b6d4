//! # Shared Board Client
//!
//! Keeps a local copy of the shared drawing board in sync with the board
//! server.
//!
//! A persistent push channel (WebSocket) carries broadcasts while it is up.
//! Whenever it is down the engine polls the REST API and sends each local
//! action as its own request, and it keeps trying to reconnect on a fixed
//! interval. Local strokes are painted before they are sent.
//!
//! ## Architecture
//!
//! ```text
//! pointer ─► EngineHandle ─┐
//!                          ▼
//!   push reader ──► [ EngineEvent queue ] ◄── poller / retry / watchdog
//!                          │
//!                          ▼
//!                     SyncEngine ── BoardStore
//!                     │        │
//!           RenderSink ◄        ► TransportSelector ─► PushLink | PullTransport
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use board_client::{ClientConfig, SyncEngine, TracingRenderSink};
//!
//! # async fn demo() -> Result<(), board_client::ClientError> {
//! let config = ClientConfig::from_env()?;
//! let engine = SyncEngine::with_http(&config, Box::new(TracingRenderSink::new()))?;
//! let handle = engine.handle();
//! tokio::spawn(engine.run());
//!
//! handle.pointer(10.0, 20.0);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod connection;
pub mod engine;
pub mod error;
pub mod event;
pub mod http;
pub mod push;
pub mod render;
pub mod transport;

#[cfg(test)]
mod testing;

pub use config::ClientConfig;
pub use connection::{ConnectionManager, ConnectionTimings};
pub use engine::{EngineHandle, SyncEngine};
pub use error::{ClientError, ClientResult};
pub use event::EngineEvent;
pub use http::{resolve_user_color, HttpPullTransport, PullTransport};
pub use push::{PushConnector, PushInbound, PushLink, PushSession, WsPushConnector};
pub use render::{ChannelRenderSink, RenderEvent, RenderSink, TracingRenderSink};
pub use transport::{Route, TransportSelector};
