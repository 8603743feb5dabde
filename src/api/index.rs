use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    api::{escape_html, session_id, with_cookie},
    error::{Error, Result},
    spotify::{self, SpotifyApi},
    state::AppState,
    utils, warning,
};

pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response> {
    let (session_id, is_new) = match session_id(&headers) {
        Some(id) => (id, false),
        None => (utils::generate_session_id(), true),
    };

    let response = if let Some(code) = params.get("code") {
        complete_sign_in(&state, &session_id, code, params.get("state")).await
    } else {
        if let Some(error) = params.get("error") {
            warning!("Sign-in for {} was not completed: {}", session_id, error);
            state.sessions.end(&session_id).await;
        }
        status_page(&state, &session_id).await?
    };

    if is_new {
        return Ok(with_cookie(response, &utils::session_cookie(&session_id)));
    }
    Ok(response)
}

/// Exchanges the authorization code and caches the token under the session.
async fn complete_sign_in(
    state: &AppState,
    session_id: &str,
    code: &str,
    returned_state: Option<&String>,
) -> Response {
    let sign_in = state.sessions.take(session_id).await;

    let Some(sign_in) = sign_in.filter(|p| returned_state.is_some_and(|s| *s == p.state)) else {
        warning!("Discarding callback without a matching sign-in for {}", session_id);
        return Redirect::to("/").into_response();
    };

    let exchange = spotify::auth::exchange_code_pkce(
        &state.http,
        &state.config,
        code,
        &sign_in.code_verifier,
    );
    let token = match exchange.await {
        Ok(token) => token,
        Err(e) => {
            warning!("Token exchange failed for {}: {}", session_id, e);
            return Redirect::to("/").into_response();
        }
    };

    if let Err(e) = state.tokens.put(session_id, &token).await {
        warning!("Failed to cache token for {}: {}", session_id, e);
    }

    Redirect::to("/").into_response()
}

async fn status_page(state: &AppState, session_id: &str) -> Result<Response> {
    let client = match state.client_for(session_id).await {
        Ok(client) => client,
        Err(Error::MissingToken(_)) => return sign_in_page(state, session_id).await,
        Err(e) => return Err(e),
    };

    let me = match client.current_user().await {
        Ok(me) => me,
        Err(e) if e.is_credential() => {
            warning!("Cached token for {} is no longer usable: {}", session_id, e);
            state.tokens.delete(session_id).await?;
            return sign_in_page(state, session_id).await;
        }
        Err(e) => return Err(e),
    };

    let body = format!(
        "<h2>Hi {name}, <small><a href=\"/sign_out\">[sign out]</a></small></h2>\
         <p>Add tracks to <b>{source}</b>; they are counted every {secs} seconds.</p>\
         <a href=\"/playlists\">my playlists</a> | <a href=\"/create_playlist\">create</a>",
        name = escape_html(me.name()),
        source = escape_html(&state.config.source_playlist),
        secs = state.config.sync_interval.as_secs(),
    );
    Ok(Html(body).into_response())
}

async fn sign_in_page(state: &AppState, session_id: &str) -> Result<Response> {
    let sign_in = state.sessions.begin(session_id).await;

    let auth_url =
        spotify::auth::authorize_url(&state.config, &sign_in.state, &sign_in.code_challenge())?;
    let body = format!(
        "<h2><a href=\"{}\">Sign in</a></h2>",
        escape_html(&auth_url)
    );
    Ok(Html(body).into_response())
}
