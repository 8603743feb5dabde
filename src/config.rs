//! Configuration management for plural-likes.
//!
//! Configuration is read once at startup into an immutable [`Config`] which
//! is then handed to the web server and the scheduler through the
//! application state. Values are resolved in this order:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use crate::error::{Error, Result};

pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SCOPE: &str = "playlist-read-private playlist-modify-public playlist-modify-private";
pub const DEFAULT_SOURCE_PLAYLIST: &str = "Extra Liked Songs";
pub const DEFAULT_DEGREE_MARKER: &str = "♥";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 60;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Looks for `plural-likes/.env` below the platform-specific local data
/// directory (`~/.local/share` on Linux, `~/Library/Application Support` on
/// macOS, `%LOCALAPPDATA%` on Windows). The directory is created when it does
/// not exist yet. A missing `.env` file is fine, variables set in the process
/// environment are never overridden.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created.
pub async fn load_env() -> Result<()> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    // dotenv skips keys that are already present in the environment
    let _ = dotenv::from_path(path);
    Ok(())
}

/// Base directory for everything the application stores locally.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("plural-likes");
    path
}

/// Runtime configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub server_addr: SocketAddr,
    pub sync_interval: Duration,
    pub source_playlist: String,
    pub degree_marker: String,
    pub create_source_playlist: bool,
    pub public_playlists: bool,
    pub token_cache_dir: PathBuf,
}

impl Config {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated like unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(Error::MissingConfig(key));

        let server_addr = match get("SERVER_ADDRESS") {
            Some(addr) => parse("SERVER_ADDRESS", &addr)?,
            None => {
                let port: u16 = match get("PORT") {
                    Some(port) => parse("PORT", &port)?,
                    None => DEFAULT_PORT,
                };
                SocketAddr::from(([127, 0, 0, 1], port))
            }
        };

        let interval_secs: u64 = match get("SYNC_INTERVAL_SECS") {
            Some(secs) => parse("SYNC_INTERVAL_SECS", &secs)?,
            None => DEFAULT_SYNC_INTERVAL_SECS,
        };
        if interval_secs == 0 {
            return Err(Error::InvalidConfig {
                key: "SYNC_INTERVAL_SECS",
                value: "0".to_string(),
            });
        }

        let degree_marker = match lookup("DEGREE_MARKER") {
            Some(marker) if marker.is_empty() => {
                return Err(Error::InvalidConfig {
                    key: "DEGREE_MARKER",
                    value: marker,
                });
            }
            Some(marker) => marker,
            None => DEFAULT_DEGREE_MARKER.to_string(),
        };

        Ok(Self {
            client_id: required("SPOTIFY_API_AUTH_CLIENT_ID")?,
            client_secret: get("SPOTIFY_API_AUTH_CLIENT_SECRET"),
            redirect_uri: required("SPOTIFY_API_REDIRECT_URI")?,
            scope: get("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            auth_url: get("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: get("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            api_url: get("SPOTIFY_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            server_addr,
            sync_interval: Duration::from_secs(interval_secs),
            source_playlist: get("SOURCE_PLAYLIST_NAME")
                .unwrap_or_else(|| DEFAULT_SOURCE_PLAYLIST.to_string()),
            degree_marker,
            create_source_playlist: match get("CREATE_SOURCE_PLAYLIST") {
                Some(flag) => parse_bool("CREATE_SOURCE_PLAYLIST", &flag)?,
                None => true,
            },
            public_playlists: match get("PUBLIC_PLAYLISTS") {
                Some(flag) => parse_bool("PUBLIC_PLAYLISTS", &flag)?,
                None => true,
            },
            token_cache_dir: get("TOKEN_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir().join("cache")),
        })
    }
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| Error::InvalidConfig {
        key,
        value: value.to_string(),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::InvalidConfig {
            key,
            value: value.to_string(),
        }),
    }
}
