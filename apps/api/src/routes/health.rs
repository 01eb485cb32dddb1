use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version, the active submission backend and open wizard count.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "intake-api",
        "submission_backend": state.wizard.backend(),
        "active_wizards": state.wizard.store().len().await,
    }))
}
