use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::{api::signed_in_client, error::Result, spotify::SpotifyApi, state::AppState};

const DEFAULT_PLAYLIST_NAME: &str = "Test Robo Playlist";

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistParams {
    pub name: Option<String>,
}

/// GET /playlists
pub async fn playlists(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let Some(client) = signed_in_client(&state, &headers).await? else {
        return Ok(Redirect::to("/").into_response());
    };

    let page = client.current_user_playlists().await?;
    Ok(Json(page).into_response())
}

/// GET /create_playlist
pub async fn create_playlist(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CreatePlaylistParams>,
) -> Result<Response> {
    let Some(client) = signed_in_client(&state, &headers).await? else {
        return Ok(Redirect::to("/").into_response());
    };

    let name = params
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PLAYLIST_NAME.to_string());

    let me = client.current_user().await?;
    let playlist = client
        .create_playlist(&me.id, &name, state.config.public_playlists, "")
        .await?;
    Ok(Json(playlist).into_response())
}
