//! # API Module
//!
//! HTTP endpoints of the web front end. Visitors get an anonymous session
//! cookie, sign in with Spotify, and from then on the scheduler reconciles
//! their playlists in the background.
//!
//! ## Endpoints
//!
//! - [`index`] - `GET /`: session bootstrap, sign-in link, OAuth callback
//!   (`?code=…&state=…`) and a small status page once signed in.
//! - [`sign_out`] - `GET /sign_out`: forgets the session and its token.
//! - [`playlists`] - `GET /playlists`: the user's playlists as JSON.
//! - [`create_playlist`] - `GET /create_playlist`: creates a playlist.
//! - [`health`] - `GET /health`: liveness and version.

use axum::{
    http::{
        HeaderMap, HeaderValue,
        header::{COOKIE, SET_COOKIE},
    },
    response::Response,
};

use crate::{
    error::{Error, Result},
    spotify::SpotifyClient,
    state::AppState,
    utils,
};

mod health;
mod index;
mod playlists;
mod sign_out;

pub use health::health;
pub use index::index;
pub use playlists::create_playlist;
pub use playlists::playlists;
pub use sign_out::sign_out;

/// Session id from the request cookies, if present and well formed.
fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(utils::session_from_cookies)
}

fn with_cookie(mut response: Response, cookie: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(cookie) {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}

/// API client for the signed-in visitor, `None` when there is no session or
/// no cached token.
async fn signed_in_client(state: &AppState, headers: &HeaderMap) -> Result<Option<SpotifyClient>> {
    let Some(session_id) = session_id(headers) else {
        return Ok(None);
    };

    match state.client_for(&session_id).await {
        Ok(client) => Ok(Some(client)),
        Err(Error::MissingToken(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
