//! Request/response routes

use super::AppState;
use super::messages::{ActionCommand, ActionResponse, ResetResponse};
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use std::sync::Arc;
use tracing::{debug, info};

/// `POST /action`
///
/// The body is read raw so that a missing content type or malformed JSON
/// still runs the default command instead of failing extraction.
pub(super) async fn action(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Json<ActionResponse> {
    let cmd = ActionCommand::from_body(&body, state.command_defaults());
    let transition = state.apply(cmd);
    debug!(
        "Action v={:.3} w={:.3} -> reward={:.3} done={} step={}",
        cmd.linear, cmd.angular, transition.reward, transition.done, transition.info.steps
    );
    Json(ActionResponse::from(transition))
}

/// `POST /reset`
pub(super) async fn reset(State(state): State<Arc<AppState>>) -> Json<ResetResponse> {
    state.reset();
    info!("Episode reset");
    Json(ResetResponse { ok: true })
}

/// `GET /health`
pub(super) async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
