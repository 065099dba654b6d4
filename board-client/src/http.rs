//! Pull fallback transport over the board server's REST API.
//!
//! Speaks to four endpoints:
//!
//! - `GET  /api/board`       full snapshot
//! - `POST /api/draw`        one action per request
//! - `POST /api/clear`       clear command
//! - `GET  /api/randomColor` session color

use async_trait::async_trait;
use board_core::{is_hex_color, random_color, ColorResponse, DrawAction};
use reqwest::{Client, Response};
use url::Url;

use crate::{ClientConfig, ClientError, ClientResult};

/// Request/response transport used while the push channel is unavailable.
#[async_trait]
pub trait PullTransport: Send + Sync + 'static {
    /// Fetch the full board.
    async fn fetch_snapshot(&self) -> ClientResult<Vec<DrawAction>>;

    /// Send a single action.
    async fn post_action(&self, action: &DrawAction) -> ClientResult<()>;

    /// Send a clear command.
    async fn post_clear(&self) -> ClientResult<()>;

    /// Ask the server for a session color.
    async fn random_color(&self) -> ClientResult<String>;
}

/// [`PullTransport`] backed by `reqwest`.
#[derive(Clone)]
pub struct HttpPullTransport {
    http: Client,
    board_url: Url,
    draw_url: Url,
    clear_url: Url,
    color_url: Url,
}

impl HttpPullTransport {
    /// Create a transport for the configured server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if an endpoint URL cannot be built.
    /// Returns [`ClientError::Http`] if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("board-client/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            // Proxy detection is not needed for a board server and can stall startup
            .no_proxy()
            .build()?;

        Ok(Self {
            http,
            board_url: config.api_url("/api/board")?,
            draw_url: config.api_url("/api/draw")?,
            clear_url: config.api_url("/api/clear")?,
            color_url: config.api_url("/api/randomColor")?,
        })
    }

    fn check_status(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ClientError::Status(status.as_u16()))
        }
    }
}

#[async_trait]
impl PullTransport for HttpPullTransport {
    async fn fetch_snapshot(&self) -> ClientResult<Vec<DrawAction>> {
        let response = self.http.get(self.board_url.clone()).send().await?;
        let body = Self::check_status(response)?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn post_action(&self, action: &DrawAction) -> ClientResult<()> {
        let response = self
            .http
            .post(self.draw_url.clone())
            .json(action)
            .send()
            .await?;
        Self::check_status(response)?;
        Ok(())
    }

    async fn post_clear(&self) -> ClientResult<()> {
        let response = self.http.post(self.clear_url.clone()).send().await?;
        Self::check_status(response)?;
        Ok(())
    }

    async fn random_color(&self) -> ClientResult<String> {
        let response = self.http.get(self.color_url.clone()).send().await?;
        let body = Self::check_status(response)?.text().await?;
        let parsed: ColorResponse = serde_json::from_str(&body)?;
        Ok(parsed.color)
    }
}

/// Resolve the session color, synthesizing one locally when the server
/// cannot provide a usable value.
pub async fn resolve_user_color(pull: &dyn PullTransport) -> String {
    match pull.random_color().await {
        Ok(color) if is_hex_color(&color) => color,
        Ok(color) => {
            tracing::warn!(color = %color, "Server color is not #RRGGBB, using local fallback");
            random_color()
        }
        Err(err) => {
            tracing::warn!(error = %err, "Failed to fetch random color, using local fallback");
            random_color()
        }
    }
}
