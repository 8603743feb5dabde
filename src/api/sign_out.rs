use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    api::{session_id, with_cookie},
    state::AppState,
    utils, warning,
};

pub async fn sign_out(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(session_id) = session_id(&headers) {
        state.sessions.end(&session_id).await;
        if let Err(e) = state.tokens.delete(&session_id).await {
            warning!("Failed to delete cached token for {}: {}", session_id, e);
        }
    }

    with_cookie(
        Redirect::to("/").into_response(),
        &utils::expired_session_cookie(),
    )
}
