use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;
use tokio::{sync::Mutex, time::sleep};

use crate::{
    config::Config,
    error::{Error, Result},
    management::TokenManager,
    spotify::SpotifyApi,
    types::{
        AddTracksRequest, CreatePlaylistRequest, Page, Playlist, PlaylistItem, RemoveTracksRequest,
        SnapshotResponse, TrackUri, UserProfile,
    },
    utils, warning,
};

const MAX_RETRIES: u32 = 3;
const BAD_GATEWAY_DELAY: Duration = Duration::from_secs(10);
const MAX_RETRY_AFTER_SECS: u64 = 120;
const PLAYLISTS_PAGE_LIMIT: u32 = 50;
const TRACKS_PAGE_LIMIT: u32 = 100;

/// Spotify Web API client acting for the user owning `tokens`.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
}

impl SpotifyClient {
    pub fn new(http: Client, config: &Config, tokens: TokenManager) -> Self {
        Self {
            http,
            api_url: config.api_url.clone(),
            tokens: Mutex::new(tokens),
        }
    }

    async fn access_token(&self) -> Result<String> {
        self.tokens.lock().await.get_valid_token().await
    }

    /// Sends a request, retrying on `502 Bad Gateway` and on
    /// `429 Too Many Requests` with a sane `Retry-After`.
    async fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Response> {
        let mut attempt = 0;

        loop {
            let token = self.access_token().await?;
            let mut request = self.http.request(method.clone(), url).bearer_auth(token);
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();

            if attempt < MAX_RETRIES {
                if status == StatusCode::BAD_GATEWAY {
                    attempt += 1;
                    sleep(BAD_GATEWAY_DELAY).await;
                    continue;
                }

                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after = response
                        .headers()
                        .get("retry-after")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok())
                        .unwrap_or(1);

                    if retry_after <= MAX_RETRY_AFTER_SECS {
                        attempt += 1;
                        sleep(Duration::from_secs(retry_after)).await;
                        continue;
                    }

                    warning!(
                        "Spotify asked to retry after {} seconds, giving up on {}",
                        retry_after,
                        url
                    );
                }
            }

            return Ok(response.error_for_status()?);
        }
    }
}

#[async_trait]
impl SpotifyApi for SpotifyClient {
    async fn current_user(&self) -> Result<UserProfile> {
        let url = format!("{}/me", self.api_url);
        let response = self.send(Method::GET, &url, None).await?;
        Ok(response.json::<UserProfile>().await?)
    }

    async fn current_user_playlists(&self) -> Result<Page<Playlist>> {
        let url = format!(
            "{uri}/me/playlists?limit={limit}",
            uri = self.api_url,
            limit = PLAYLISTS_PAGE_LIMIT
        );
        let response = self.send(Method::GET, &url, None).await?;
        Ok(response.json::<Page<Playlist>>().await?)
    }

    async fn playlist_tracks(
        &self,
        playlist_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<String>> {
        let url = match cursor {
            Some(next) => next.to_string(),
            None => format!(
                "{uri}/playlists/{id}/tracks?fields=items(track(id)),next,total&limit={limit}",
                uri = self.api_url,
                id = playlist_id,
                limit = TRACKS_PAGE_LIMIT
            ),
        };

        let response = self.send(Method::GET, &url, None).await?;
        let page = response.json::<Page<PlaylistItem>>().await?;

        // local files and unavailable episodes have no id
        let ids = page
            .items
            .into_iter()
            .filter_map(|item| item.track.and_then(|t| t.id))
            .collect();

        Ok(Page {
            items: ids,
            next: page.next,
            total: page.total,
        })
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        public: bool,
        description: &str,
    ) -> Result<Playlist> {
        let url = format!("{}/users/{}/playlists", self.api_url, user_id);
        let body = serde_json::to_value(CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public,
        })?;

        let created = async {
            let response = self.send(Method::POST, &url, Some(&body)).await?;
            Ok::<Playlist, Error>(response.json::<Playlist>().await?)
        }
        .await;

        created.map_err(|e| Error::CreatePlaylist {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        let url = format!("{}/playlists/{}/tracks", self.api_url, playlist_id);
        let body = serde_json::to_value(AddTracksRequest {
            uris: track_ids.iter().map(|id| utils::track_uri(id)).collect(),
        })?;

        let response = self.send(Method::POST, &url, Some(&body)).await?;
        response.json::<SnapshotResponse>().await?;
        Ok(())
    }

    async fn remove_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        let url = format!("{}/playlists/{}/tracks", self.api_url, playlist_id);
        let body = serde_json::to_value(RemoveTracksRequest {
            tracks: track_ids
                .iter()
                .map(|id| TrackUri {
                    uri: utils::track_uri(id),
                })
                .collect(),
        })?;

        let response = self.send(Method::DELETE, &url, Some(&body)).await?;
        response.json::<SnapshotResponse>().await?;
        Ok(())
    }
}
