//! # Spotify Integration Module
//!
//! The slice of the Spotify Web API the reconciler and the web front end
//! consume, behind the [`SpotifyApi`] trait so the reconciliation logic does
//! not depend on HTTP.
//!
//! ## Modules
//!
//! - [`auth`] - OAuth 2.0 authorization code flow with PKCE: authorize URL,
//!   code exchange and token refresh.
//! - [`client`] - [`SpotifyClient`], the reqwest implementation of
//!   [`SpotifyApi`] for one signed-in user.
//!
//! ## API Coverage
//!
//! - `GET /me` - current user profile
//! - `GET /me/playlists` - the user's playlists (first page only)
//! - `GET /playlists/{id}/tracks` - playlist items, cursor paginated
//! - `POST /users/{user_id}/playlists` - create a playlist
//! - `POST /playlists/{id}/tracks` - add up to 100 tracks
//! - `DELETE /playlists/{id}/tracks` - remove up to 100 tracks
//! - `POST /api/token` - code exchange and refresh

use async_trait::async_trait;

use crate::{
    error::Result,
    types::{Page, Playlist, UserProfile},
};

pub mod auth;
pub mod client;

pub use client::SpotifyClient;

/// Provider limit for items per add/remove call.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

/// Operations on one signed-in user's Spotify account.
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    async fn current_user(&self) -> Result<UserProfile>;

    /// First page of the user's playlists. `next` is set when more exist.
    async fn current_user_playlists(&self) -> Result<Page<Playlist>>;

    /// One page of track ids in a playlist. Pass the previous page's `next`
    /// as `cursor` to continue; `None` starts at the beginning.
    async fn playlist_tracks(&self, playlist_id: &str, cursor: Option<&str>)
    -> Result<Page<String>>;

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        public: bool,
        description: &str,
    ) -> Result<Playlist>;

    /// At most [`MAX_TRACKS_PER_REQUEST`] ids per call.
    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()>;

    /// At most [`MAX_TRACKS_PER_REQUEST`] ids per call.
    async fn remove_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()>;
}

/// Collects every track id of a playlist, following `next` until the last
/// page.
pub async fn playlist_track_ids<A>(api: &A, playlist_id: &str) -> Result<Vec<String>>
where
    A: SpotifyApi + ?Sized,
{
    let mut ids = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = api.playlist_tracks(playlist_id, cursor.as_deref()).await?;
        ids.extend(page.items);

        match page.next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(ids)
}
