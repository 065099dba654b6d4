//! Sync engine configuration.

use std::time::Duration;

use board_core::throttle::DEFAULT_THROTTLE_WINDOW;
use url::Url;

use crate::{ClientError, ClientResult};

/// Default server address.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";
/// Default fixed delay between reconnection attempts.
pub const DEFAULT_RECONNECT_INTERVAL: Duration = Duration::from_millis(3000);
/// Default fallback poll period while the push channel is down.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);
/// Default limit for the push channel handshake.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_millis(5000);
/// Default per-request HTTP timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(5000);

/// Configuration for one sync engine instance.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// HTTP base URL of the board server.
    pub server_url: Url,
    /// WebSocket URL of the push channel.
    pub ws_url: Url,
    /// Minimum spacing between accepted local samples.
    pub throttle_window: Duration,
    /// Fixed delay between reconnection attempts.
    pub reconnect_interval: Duration,
    /// Poll period of the fallback poller.
    pub poll_interval: Duration,
    /// Limit for welcome + subscription acknowledgements.
    pub handshake_timeout: Duration,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    /// When false the engine runs polling-only.
    pub push_enabled: bool,
}

impl ClientConfig {
    /// Create a configuration for the given server with default timings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the URL is malformed or not
    /// `http`/`https`.
    pub fn new(server_url: &str) -> ClientResult<Self> {
        let server_url =
            Url::parse(server_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        let ws_url = derive_ws_url(&server_url)?;

        Ok(Self {
            server_url,
            ws_url,
            throttle_window: DEFAULT_THROTTLE_WINDOW,
            reconnect_interval: DEFAULT_RECONNECT_INTERVAL,
            poll_interval: DEFAULT_POLL_INTERVAL,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            push_enabled: true,
        })
    }

    /// Create a configuration from environment variables or defaults.
    ///
    /// Environment variables:
    /// - `BOARD_SERVER_URL`: server base URL (default: `http://127.0.0.1:8080`)
    /// - `BOARD_THROTTLE_MS`: input throttle window (default: 20)
    /// - `BOARD_RECONNECT_MS`: reconnect interval (default: 3000)
    /// - `BOARD_POLL_MS`: fallback poll interval (default: 5000)
    /// - `BOARD_HANDSHAKE_TIMEOUT_MS`: handshake timeout (default: 5000)
    /// - `BOARD_PUSH_ENABLED`: `false` for polling-only mode (default: true)
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `BOARD_SERVER_URL` is malformed.
    pub fn from_env() -> ClientResult<Self> {
        let server_url =
            std::env::var("BOARD_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        let mut config = Self::new(&server_url)?;

        if let Some(ms) = env_millis("BOARD_THROTTLE_MS") {
            config.throttle_window = ms;
        }
        if let Some(ms) = env_millis("BOARD_RECONNECT_MS") {
            config.reconnect_interval = ms;
        }
        if let Some(ms) = env_millis("BOARD_POLL_MS") {
            config.poll_interval = ms;
        }
        if let Some(ms) = env_millis("BOARD_HANDSHAKE_TIMEOUT_MS") {
            config.handshake_timeout = ms;
        }
        if let Some(enabled) = std::env::var("BOARD_PUSH_ENABLED")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.push_enabled = enabled;
        }

        Ok(config)
    }

    /// Set the input throttle window.
    #[must_use]
    pub fn with_throttle_window(mut self, window: Duration) -> Self {
        self.throttle_window = window;
        self
    }

    /// Set the reconnect interval.
    #[must_use]
    pub fn with_reconnect_interval(mut self, interval: Duration) -> Self {
        self.reconnect_interval = interval;
        self
    }

    /// Set the fallback poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the handshake timeout.
    #[must_use]
    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Enable or disable the push channel.
    #[must_use]
    pub fn with_push_enabled(mut self, enabled: bool) -> Self {
        self.push_enabled = enabled;
        self
    }

    /// Resolve an API path against the server URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the path cannot be joined.
    pub fn api_url(&self, path: &str) -> ClientResult<Url> {
        self.server_url
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))
    }
}

fn env_millis(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_millis)
}

fn derive_ws_url(server_url: &Url) -> ClientResult<Url> {
    let scheme = match server_url.scheme() {
        "http" => "ws",
        "https" => "wss",
        other => {
            return Err(ClientError::InvalidUrl(format!(
                "unsupported scheme {other}"
            )))
        }
    };

    let mut ws_url = server_url.clone();
    ws_url
        .set_scheme(scheme)
        .map_err(|()| ClientError::InvalidUrl(format!("cannot use scheme {scheme}")))?;
    ws_url.set_path("/ws");
    ws_url.set_query(None);
    Ok(ws_url)
}
