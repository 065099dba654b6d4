//! # Wire Protocol
//!
//! Frames exchanged on the push channel plus the REST payloads that are not
//! plain [`DrawAction`]s. Every frame is a JSON text message tagged by
//! `type`.
//!
//! ### Client -> Server
//!
//! - `{"type": "subscribe", "topic": "board"}`
//! - `{"type": "subscribe", "topic": "clear"}`
//! - `{"type": "draw", "action": {"x": 1, "y": 2, "color": "#ff0000", "clear": false}}`
//! - `{"type": "clear"}`
//!
//! ### Server -> Client
//!
//! - `{"type": "welcome", "version": "..."}`
//! - `{"type": "subscribed", "topic": "board"}`
//! - `{"type": "action", "action": {...}}` (board topic)
//! - `{"type": "cleared"}` (clear topic)
//! - `{"type": "error", "code": "...", "message": "..."}`

use serde::{Deserialize, Serialize};

use crate::{BoardResult, DrawAction};

/// Broadcast streams a client can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Every accepted draw action.
    Board,
    /// Board clear notifications.
    Clear,
}

impl Topic {
    /// All topics a fully synchronized client needs.
    pub const ALL: [Topic; 2] = [Topic::Board, Topic::Clear];
}

/// Client-to-server push channel frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Subscribe to a broadcast topic.
    Subscribe {
        /// Topic to subscribe to.
        topic: Topic,
    },
    /// Publish a draw action to the "draw" destination.
    Draw {
        /// The action, in the same shape as the pull path.
        action: DrawAction,
    },
    /// Publish to the "clear" destination.
    Clear,
}

/// Server-to-client push channel frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// Sent once when the socket opens.
    Welcome {
        /// Server version.
        version: String,
    },
    /// Acknowledges a subscription.
    Subscribed {
        /// Topic now active for this connection.
        topic: Topic,
    },
    /// Board topic broadcast.
    Action {
        /// The broadcast action.
        action: DrawAction,
    },
    /// Clear topic broadcast.
    Cleared,
    /// Rejected frame.
    Error {
        /// Machine-readable code.
        code: String,
        /// Human-readable message.
        message: String,
    },
}

impl ClientFrame {
    /// Serialize to a text frame.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> BoardResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a text frame.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed or unknown frames.
    pub fn from_json(json: &str) -> BoardResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl ServerFrame {
    /// Serialize to a text frame.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> BoardResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a text frame.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed or unknown frames.
    pub fn from_json(json: &str) -> BoardResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The topic a broadcast frame belongs to, if any.
    #[must_use]
    pub const fn topic(&self) -> Option<Topic> {
        match self {
            Self::Action { .. } => Some(Topic::Board),
            Self::Cleared => Some(Topic::Clear),
            Self::Welcome { .. } | Self::Subscribed { .. } | Self::Error { .. } => None,
        }
    }
}

/// Body of `GET /api/randomColor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorResponse {
    /// Assigned color, `#RRGGBB`.
    pub color: String,
}
