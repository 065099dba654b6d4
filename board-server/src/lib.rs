//! # Board Server Library
//!
//! Shared board state, the REST API, and the WebSocket push channel.
//! This library is used by both the binary and integration tests.
//!
//! ## Endpoints
//!
//! | Method | Path               | Purpose                        |
//! |--------|--------------------|--------------------------------|
//! | GET    | `/api/board`       | full snapshot                  |
//! | POST   | `/api/draw`        | append one action (201)        |
//! | POST   | `/api/clear`       | clear the board                |
//! | GET    | `/api/randomColor` | session color                  |
//! | GET    | `/ws`              | push channel                   |
//! | GET    | `/health/*`        | liveness / readiness probes    |

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use axum::{
    routing::{get, post},
    Router,
};

pub mod board;
pub mod health;
pub mod metrics;
pub mod routes;
pub mod sync;

pub use board::{BoardEvent, Origin, SharedBoard};

/// Shared application state.
#[derive(Clone, Default)]
pub struct AppState {
    /// The one board every client draws on.
    pub board: SharedBoard,
}

impl AppState {
    /// Create state with an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Build the application router without transport layers.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check endpoints (Kubernetes probes)
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/health", get(health::readiness))
        .route("/ws", get(sync::websocket_handler))
        .route("/api/board", get(routes::get_board))
        .route("/api/draw", post(routes::post_draw))
        .route("/api/clear", post(routes::post_clear))
        .route("/api/randomColor", get(routes::random_color))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use board_core::DrawAction;
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn draw_then_board() {
        let state = AppState::new();
        let app = router(state.clone());

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/draw")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r##"{"x":10,"y":20,"color":"#ff0000","clear":false}"##,
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(Request::get("/api/board").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!([{"x": 10.0, "y": 20.0, "color": "#ff0000", "clear": false}])
        );
        assert_eq!(state.board.len(), 1);
    }

    #[tokio::test]
    async fn clear_empties_board() {
        let state = AppState::new();
        state
            .board
            .add(DrawAction::point(1.0, 1.0, "#000000"), Origin::Http);

        let response = router(state.clone())
            .oneshot(Request::post("/api/clear").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.board.is_empty());
    }

    #[tokio::test]
    async fn malformed_draw_is_rejected() {
        let state = AppState::new();
        let response = router(state.clone())
            .oneshot(
                Request::post("/api/draw")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{\"x\": \"left\"}"))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert!(response.status().is_client_error());
        assert!(state.board.is_empty());
    }

    #[tokio::test]
    async fn random_color_shape() {
        let response = router(AppState::new())
            .oneshot(
                Request::get("/api/randomColor")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let color = body["color"].as_str().expect("color string");
        assert!(board_core::is_hex_color(color));
    }
}
