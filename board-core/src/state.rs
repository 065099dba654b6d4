//! Push channel connection state.

use serde::{Deserialize, Serialize};

/// Connection status of the push channel.
///
/// Drives which transport outgoing actions take. There is no terminal
/// state: a client cycles through these for as long as it runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    /// No push channel; the polling fallback carries traffic.
    #[default]
    Disconnected,
    /// Handshake in progress.
    Connecting,
    /// Handshake and subscriptions complete.
    Connected,
}

impl ConnectionState {
    /// Whether the push channel is usable.
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Human-readable status label for indicators.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Disconnected => "Disconnected",
            Self::Connecting => "Connecting…",
            Self::Connected => "Connected",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        };
        f.write_str(name)
    }
}
