//! Prometheus metrics for board-server.
//!
//! Provides metrics collection and a Prometheus-compatible `/metrics` endpoint.

use metrics::{counter, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

// Metric names as constants for consistency
const ACTIONS_TOTAL: &str = "board_actions_total";
const CLEARS_TOTAL: &str = "board_clears_total";
const BOARD_ACTIONS: &str = "board_actions_current";
const WS_CONNECTIONS_ACTIVE: &str = "board_ws_connections_active";
const WS_MESSAGES_TOTAL: &str = "board_ws_messages_total";
const MALFORMED_FRAMES_TOTAL: &str = "board_malformed_frames_total";

/// Initialize metrics and return the Prometheus handle.
///
/// # Errors
///
/// Returns an error if the Prometheus recorder cannot be installed
/// (e.g., if another recorder is already installed).
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Record an accepted draw action.
///
/// # Arguments
///
/// * `transport` - "push" or "pull"
pub fn record_action(transport: &str) {
    counter!(ACTIONS_TOTAL, "transport" => transport.to_string()).increment(1);
}

/// Record a board clear.
pub fn record_clear() {
    counter!(CLEARS_TOTAL).increment(1);
}

/// Update the number of actions on the board.
#[allow(clippy::cast_precision_loss)]
pub fn set_board_actions(count: usize) {
    gauge!(BOARD_ACTIONS).set(count as f64);
}

/// Increment active WebSocket connections.
pub fn inc_ws_connections() {
    gauge!(WS_CONNECTIONS_ACTIVE).increment(1.0);
}

/// Decrement active WebSocket connections.
pub fn dec_ws_connections() {
    gauge!(WS_CONNECTIONS_ACTIVE).decrement(1.0);
}

/// Record a WebSocket frame.
///
/// # Arguments
///
/// * `direction` - "inbound" or "outbound"
/// * `msg_type` - Frame type (e.g., "subscribe", "draw", "action")
pub fn record_ws_message(direction: &str, msg_type: &str) {
    counter!(
        WS_MESSAGES_TOTAL,
        "direction" => direction.to_string(),
        "type" => msg_type.to_string()
    )
    .increment(1);
}

/// Record a push channel frame that failed to parse.
pub fn record_malformed_frame() {
    counter!(MALFORMED_FRAMES_TOTAL).increment(1);
}
