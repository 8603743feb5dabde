use axum::{extract::State, response::Json};
use serde_json::{Value, json};

use crate::state::AppState;

/// GET /health
///
/// `users` is `null` when the token cache cannot be listed.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let users = state.tokens.users().await.ok().map(|users| users.len());

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "users": users,
        "pending_sign_ins": state.sessions.pending().await,
        "sync_interval_secs": state.config.sync_interval.as_secs(),
    }))
}
