//! REST API route handlers.
//!
//! The pull fallback path: full snapshot, one action per request, clear, and
//! a server-assigned session color.

use axum::{extract::State, http::StatusCode, Json};
use board_core::{ColorResponse, DrawAction};
use rand::Rng;

use crate::board::Origin;
use crate::metrics::record_action;
use crate::AppState;

/// `GET /api/board`: every action on the board, in order.
#[tracing::instrument(name = "get_board", skip(state))]
pub async fn get_board(State(state): State<AppState>) -> Json<Vec<DrawAction>> {
    Json(state.board.snapshot())
}

/// `POST /api/draw`: append one action.
#[tracing::instrument(name = "post_draw", skip(state, action))]
pub async fn post_draw(State(state): State<AppState>, Json(action): Json<DrawAction>) -> StatusCode {
    record_action("pull");
    state.board.add(action, Origin::Http);
    StatusCode::CREATED
}

/// `POST /api/clear`: clear the board.
#[tracing::instrument(name = "post_clear", skip(state))]
pub async fn post_clear(State(state): State<AppState>) -> StatusCode {
    state.board.clear(Origin::Http);
    StatusCode::OK
}

/// `GET /api/randomColor`: a random `#RRGGBB` color.
#[tracing::instrument(name = "random_color")]
pub async fn random_color() -> Json<ColorResponse> {
    Json(ColorResponse {
        color: server_color(),
    })
}

/// Uppercase `#RRGGBB` over the full 24-bit range.
#[must_use]
pub fn server_color() -> String {
    let value: u32 = rand::thread_rng().gen_range(0..=0x00FF_FFFF);
    format!("#{value:06X}")
}
