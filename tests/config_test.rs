use std::{collections::HashMap, net::SocketAddr, path::PathBuf, time::Duration};

use plural_likes::{Error, config::Config};

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

const REQUIRED: [(&str, &str); 2] = [
    ("SPOTIFY_API_AUTH_CLIENT_ID", "abc"),
    ("SPOTIFY_API_REDIRECT_URI", "http://127.0.0.1:8080"),
];

#[test]
fn test_defaults() {
    let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();

    assert_eq!(config.client_id, "abc");
    assert_eq!(config.client_secret, None);
    assert_eq!(config.api_url, "https://api.spotify.com/v1");
    assert_eq!(config.auth_url, "https://accounts.spotify.com/authorize");
    assert_eq!(config.token_url, "https://accounts.spotify.com/api/token");
    assert_eq!(
        config.server_addr,
        "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
    );
    assert_eq!(config.sync_interval, Duration::from_secs(60));
    assert_eq!(config.source_playlist, "Extra Liked Songs");
    assert_eq!(config.degree_marker, "♥");
    assert!(config.create_source_playlist);
    assert!(config.public_playlists);
    assert!(config.scope.contains("playlist-modify-public"));
    assert!(config.token_cache_dir.ends_with("plural-likes/cache"));
}

#[test]
fn test_missing_client_id() {
    let result = Config::from_lookup(lookup(&[(
        "SPOTIFY_API_REDIRECT_URI",
        "http://127.0.0.1:8080",
    )]));

    assert!(matches!(
        result,
        Err(Error::MissingConfig("SPOTIFY_API_AUTH_CLIENT_ID"))
    ));
}

#[test]
fn test_blank_values_count_as_missing() {
    let result = Config::from_lookup(lookup(&[
        ("SPOTIFY_API_AUTH_CLIENT_ID", "abc"),
        ("SPOTIFY_API_REDIRECT_URI", "   "),
    ]));

    assert!(matches!(
        result,
        Err(Error::MissingConfig("SPOTIFY_API_REDIRECT_URI"))
    ));
}

#[test]
fn test_port_and_server_address() {
    let mut pairs = REQUIRED.to_vec();
    pairs.push(("PORT", "9090"));
    let config = Config::from_lookup(lookup(&pairs)).unwrap();
    assert_eq!(config.server_addr.port(), 9090);

    pairs.push(("SERVER_ADDRESS", "0.0.0.0:7000"));
    let config = Config::from_lookup(lookup(&pairs)).unwrap();
    assert_eq!(
        config.server_addr,
        "0.0.0.0:7000".parse::<SocketAddr>().unwrap()
    );
}

#[test]
fn test_overrides() {
    let mut pairs = REQUIRED.to_vec();
    pairs.extend_from_slice(&[
        ("SPOTIFY_API_AUTH_CLIENT_SECRET", "s3cret"),
        ("SPOTIFY_API_URL", "http://localhost:9999/v1/"),
        ("SYNC_INTERVAL_SECS", "300"),
        ("SOURCE_PLAYLIST_NAME", "Inbox"),
        ("DEGREE_MARKER", "+"),
        ("CREATE_SOURCE_PLAYLIST", "no"),
        ("PUBLIC_PLAYLISTS", "FALSE"),
        ("TOKEN_CACHE_DIR", "/tmp/tokens"),
    ]);

    let config = Config::from_lookup(lookup(&pairs)).unwrap();

    assert_eq!(config.client_secret.as_deref(), Some("s3cret"));
    assert_eq!(config.api_url, "http://localhost:9999/v1");
    assert_eq!(config.sync_interval, Duration::from_secs(300));
    assert_eq!(config.source_playlist, "Inbox");
    assert_eq!(config.degree_marker, "+");
    assert!(!config.create_source_playlist);
    assert!(!config.public_playlists);
    assert_eq!(config.token_cache_dir, PathBuf::from("/tmp/tokens"));
}

#[test]
fn test_invalid_values() {
    let cases = [
        ("PORT", "eighty"),
        ("SERVER_ADDRESS", "localhost"),
        ("SYNC_INTERVAL_SECS", "0"),
        ("SYNC_INTERVAL_SECS", "-5"),
        ("CREATE_SOURCE_PLAYLIST", "maybe"),
        ("DEGREE_MARKER", ""),
    ];

    for (key, value) in cases {
        let mut pairs = REQUIRED.to_vec();
        pairs.push((key, value));
        let result = Config::from_lookup(lookup(&pairs));
        assert!(
            matches!(result, Err(Error::InvalidConfig { key: k, .. }) if k == key),
            "{key}={value:?} should be rejected"
        );
    }
}
