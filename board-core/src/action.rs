//! Draw actions shared by every transport.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::BoardResult;

/// A single board action: either a colored point or a full-board clear.
///
/// The JSON shape is identical on the push channel and the pull fallback:
/// `{"x": 10.0, "y": 20.0, "color": "#ff0000", "clear": false}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawAction {
    /// X position in canvas coordinates.
    pub x: f64,
    /// Y position in canvas coordinates.
    pub y: f64,
    /// Point color, `#RRGGBB`. Ignored for clears.
    #[serde(default)]
    pub color: String,
    /// Whether this action clears the whole board.
    #[serde(default)]
    pub clear: bool,
}

impl DrawAction {
    /// Create a colored point action.
    ///
    /// Coordinates outside the canvas are accepted as-is; clipping is left to
    /// the renderer.
    #[must_use]
    pub fn point(x: f64, y: f64, color: impl Into<String>) -> Self {
        Self {
            x,
            y,
            color: color.into(),
            clear: false,
        }
    }

    /// Create a clear command.
    #[must_use]
    pub fn clear() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            color: String::new(),
            clear: true,
        }
    }

    /// Whether this action is a clear command.
    #[must_use]
    pub const fn is_clear(&self) -> bool {
        self.clear
    }

    /// Serialize to the wire representation.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> BoardResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse an action from its wire representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not a JSON object of the action shape.
    pub fn from_json(json: &str) -> BoardResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Generate a pseudo-random `#rrggbb` color.
///
/// Used whenever the server cannot hand out a color.
#[must_use]
pub fn random_color() -> String {
    let value: u32 = rand::thread_rng().gen_range(0..=0x00FF_FFFF);
    format!("#{value:06x}")
}

/// Check that `color` has the `#RRGGBB` shape (either hex case).
#[must_use]
pub fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}
