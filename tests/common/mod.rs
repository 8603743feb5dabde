#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use plural_likes::{
    Error, Result,
    config::Config,
    spotify::SpotifyApi,
    types::{Page, Playlist, PlaylistTracksRef, UserProfile},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(String),
    Add { playlist: String, tracks: usize },
    Remove { playlist: String, tracks: usize },
}

#[derive(Debug, Clone)]
pub struct FakePlaylist {
    pub id: String,
    pub name: String,
    pub tracks: Vec<String>,
}

#[derive(Debug)]
struct FakeState {
    playlists: Vec<FakePlaylist>,
    more_playlists: bool,
    page_size: usize,
    fail_create: bool,
    fail_remove: bool,
    calls: Vec<Call>,
    next_id: usize,
}

/// In-memory stand-in for one user's Spotify library.
pub struct FakeSpotify {
    user_id: String,
    state: Mutex<FakeState>,
}

impl FakeSpotify {
    pub fn new() -> Self {
        Self {
            user_id: "listener".to_string(),
            state: Mutex::new(FakeState {
                playlists: Vec::new(),
                more_playlists: false,
                page_size: 100,
                fail_create: false,
                fail_remove: false,
                calls: Vec::new(),
                next_id: 0,
            }),
        }
    }

    pub fn with_playlist(self, name: &str, tracks: &[&str]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            let id = format!("pl{}", state.next_id);
            state.playlists.push(FakePlaylist {
                id,
                name: name.to_string(),
                tracks: tracks.iter().map(|t| t.to_string()).collect(),
            });
        }
        self
    }

    pub fn with_track_page_size(self, size: usize) -> Self {
        self.state.lock().unwrap().page_size = size;
        self
    }

    pub fn with_more_playlists(self) -> Self {
        self.state.lock().unwrap().more_playlists = true;
        self
    }

    pub fn failing_creates(self) -> Self {
        self.state.lock().unwrap().fail_create = true;
        self
    }

    pub fn failing_removes(self) -> Self {
        self.state.lock().unwrap().fail_remove = true;
        self
    }

    /// Simulates the user adding a track to a playlist in the Spotify app.
    pub fn like(&self, playlist: &str, track: &str) {
        let mut state = self.state.lock().unwrap();
        let playlist = state
            .playlists
            .iter_mut()
            .find(|p| p.name == playlist)
            .expect("playlist exists");
        playlist.tracks.push(track.to_string());
    }

    /// Sorted track ids of the first playlist named `name`.
    pub fn tracks(&self, name: &str) -> Option<Vec<String>> {
        let state = self.state.lock().unwrap();
        state
            .playlists
            .iter()
            .find(|p| p.name == name)
            .map(|p| {
                let mut tracks = p.tracks.clone();
                tracks.sort();
                tracks
            })
    }

    pub fn playlist_names(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.playlists.iter().map(|p| p.name.clone()).collect()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn add_batches(&self) -> Vec<usize> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Add { tracks, .. } => Some(tracks),
                _ => None,
            })
            .collect()
    }

    pub fn remove_batches(&self) -> Vec<usize> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Remove { tracks, .. } => Some(tracks),
                _ => None,
            })
            .collect()
    }

    pub fn mutations(&self) -> usize {
        self.calls().len()
    }
}

#[async_trait]
impl SpotifyApi for FakeSpotify {
    async fn current_user(&self) -> Result<UserProfile> {
        Ok(UserProfile {
            id: self.user_id.clone(),
            display_name: Some("Listener".to_string()),
        })
    }

    async fn current_user_playlists(&self) -> Result<Page<Playlist>> {
        let state = self.state.lock().unwrap();
        let items = state
            .playlists
            .iter()
            .map(|p| Playlist {
                id: p.id.clone(),
                name: p.name.clone(),
                description: None,
                public: Some(true),
                snapshot_id: None,
                owner: None,
                tracks: Some(PlaylistTracksRef {
                    total: p.tracks.len() as u32,
                }),
            })
            .collect();

        Ok(Page {
            items,
            next: state
                .more_playlists
                .then(|| "https://api.spotify.com/v1/me/playlists?offset=50".to_string()),
            total: None,
        })
    }

    async fn playlist_tracks(
        &self,
        playlist_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<String>> {
        let state = self.state.lock().unwrap();
        let playlist = state
            .playlists
            .iter()
            .find(|p| p.id == playlist_id)
            .expect("known playlist id");

        let offset: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
        let end = (offset + state.page_size).min(playlist.tracks.len());
        let items = playlist.tracks[offset..end].to_vec();
        let next = (end < playlist.tracks.len()).then(|| end.to_string());

        Ok(Page {
            items,
            next,
            total: Some(playlist.tracks.len() as u32),
        })
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        public: bool,
        description: &str,
    ) -> Result<Playlist> {
        assert_eq!(user_id, self.user_id);
        let mut state = self.state.lock().unwrap();
        if state.fail_create {
            return Err(Error::TokenExchange("create rejected".to_string()));
        }

        state.next_id += 1;
        let id = format!("pl{}", state.next_id);
        state.playlists.push(FakePlaylist {
            id: id.clone(),
            name: name.to_string(),
            tracks: Vec::new(),
        });
        state.calls.push(Call::Create(name.to_string()));

        Ok(Playlist {
            id,
            name: name.to_string(),
            description: Some(description.to_string()),
            public: Some(public),
            snapshot_id: None,
            owner: None,
            tracks: Some(PlaylistTracksRef { total: 0 }),
        })
    }

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        assert!(track_ids.len() <= 100, "provider limit exceeded");
        let mut state = self.state.lock().unwrap();
        let playlist = state
            .playlists
            .iter_mut()
            .find(|p| p.id == playlist_id)
            .expect("known playlist id");
        playlist.tracks.extend(track_ids.iter().cloned());
        let name = playlist.name.clone();
        state.calls.push(Call::Add {
            playlist: name,
            tracks: track_ids.len(),
        });
        Ok(())
    }

    async fn remove_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        assert!(track_ids.len() <= 100, "provider limit exceeded");
        let mut state = self.state.lock().unwrap();
        if state.fail_remove {
            return Err(Error::Io(std::io::Error::other("remove rejected")));
        }

        let playlist = state
            .playlists
            .iter_mut()
            .find(|p| p.id == playlist_id)
            .expect("known playlist id");
        playlist.tracks.retain(|t| !track_ids.contains(t));
        let name = playlist.name.clone();
        state.calls.push(Call::Remove {
            playlist: name,
            tracks: track_ids.len(),
        });
        Ok(())
    }
}

pub fn test_config() -> Config {
    config_with(&[])
}

pub fn config_with(overrides: &[(&str, &str)]) -> Config {
    let mut values = vec![
        ("SPOTIFY_API_AUTH_CLIENT_ID", "client-id"),
        ("SPOTIFY_API_REDIRECT_URI", "http://127.0.0.1:8080"),
    ];
    values.extend_from_slice(overrides);

    Config::from_lookup(|key| {
        values
            .iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    })
    .expect("valid test config")
}
