//! Error type shared by every layer of the crate.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::warning;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("missing configuration value {0}")]
    MissingConfig(&'static str),

    #[error("invalid configuration value for {key}: {value}")]
    InvalidConfig { key: &'static str, value: String },

    #[error("no cached token for user {0}")]
    MissingToken(String),

    #[error("token refresh failed: {0}")]
    TokenRefresh(String),

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("invalid token cache key {0:?}")]
    InvalidCacheKey(String),

    #[error("playlist list spans more than one page ({0} playlists fetched)")]
    PlaylistOverflow(usize),

    #[error("source playlist {0:?} not found")]
    SourceMissing(String),

    #[error("failed to create playlist {name:?}: {reason}")]
    CreatePlaylist { name: String, reason: String },

    #[error("Spotify API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Missing or unusable credentials. The scheduler skips these users
    /// quietly and retries on the next tick.
    pub fn is_credential(&self) -> bool {
        matches!(self, Error::MissingToken(_) | Error::TokenRefresh(_))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        warning!("Request failed: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("<h4>Something went wrong.</h4><p><a href=\"/\">Back</a></p>"),
        )
            .into_response()
    }
}
