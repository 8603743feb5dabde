mod common;

use std::sync::Arc;

use plural_likes::{
    Error,
    management::{FileTokenCache, MemoryTokenCache, TokenCache, TokenManager, merge_refreshed},
    types::Token,
    utils,
};
use tempfile::TempDir;

fn token(access: &str) -> Token {
    Token {
        access_token: access.to_string(),
        refresh_token: "refresh".to_string(),
        scope: "playlist-modify-public".to_string(),
        expires_in: 3600,
        obtained_at: utils::unix_now(),
    }
}

#[tokio::test]
async fn test_file_cache_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let cache = FileTokenCache::new(temp_dir.path().join("cache"));

    assert_eq!(cache.get("alice").await.unwrap(), None);

    let first = token("a1");
    cache.put("alice", &first).await.unwrap();
    assert_eq!(cache.get("alice").await.unwrap(), Some(first));

    // Overwrite keeps a single entry
    cache.put("alice", &token("a2")).await.unwrap();
    assert_eq!(
        cache.get("alice").await.unwrap().unwrap().access_token,
        "a2"
    );

    // One file per user, named after the user id
    assert!(temp_dir.path().join("cache").join("alice").is_file());
}

#[tokio::test]
async fn test_file_cache_lists_and_deletes_users() {
    let temp_dir = TempDir::new().unwrap();
    let cache = FileTokenCache::new(temp_dir.path());

    cache.put("bob", &token("b")).await.unwrap();
    cache.put("alice", &token("a")).await.unwrap();
    std::fs::create_dir(temp_dir.path().join("nested")).unwrap();
    std::fs::write(temp_dir.path().join(".alice.tmp"), "{}").unwrap();

    assert_eq!(cache.users().await.unwrap(), vec!["alice", "bob"]);

    assert!(cache.delete("alice").await.unwrap());
    assert!(!cache.delete("alice").await.unwrap());
    assert_eq!(cache.users().await.unwrap(), vec!["bob"]);
}

#[tokio::test]
async fn test_file_cache_missing_directory_has_no_users() {
    let temp_dir = TempDir::new().unwrap();
    let cache = FileTokenCache::new(temp_dir.path().join("does-not-exist"));

    assert!(cache.users().await.unwrap().is_empty());
    assert!(!cache.delete("alice").await.unwrap());
}

#[tokio::test]
async fn test_file_cache_rejects_path_like_keys() {
    let temp_dir = TempDir::new().unwrap();
    let cache = FileTokenCache::new(temp_dir.path());

    let result = cache.put("../escape", &token("x")).await;
    assert!(matches!(result, Err(Error::InvalidCacheKey(_))));
    assert!(matches!(
        cache.get("a/b").await,
        Err(Error::InvalidCacheKey(_))
    ));
}

#[tokio::test]
async fn test_file_cache_ignores_corrupt_entries() {
    let temp_dir = TempDir::new().unwrap();
    let cache = FileTokenCache::new(temp_dir.path());
    std::fs::write(temp_dir.path().join("carol"), "not json").unwrap();

    assert_eq!(cache.get("carol").await.unwrap(), None);
}

#[tokio::test]
async fn test_memory_cache() {
    let cache = MemoryTokenCache::new();

    cache.put("zed", &token("z")).await.unwrap();
    cache.put("amy", &token("a")).await.unwrap();

    assert_eq!(cache.users().await.unwrap(), vec!["amy", "zed"]);
    assert_eq!(cache.get("amy").await.unwrap().unwrap().access_token, "a");
    assert!(cache.delete("amy").await.unwrap());
    assert_eq!(cache.get("amy").await.unwrap(), None);
}

#[tokio::test]
async fn test_token_manager_requires_cached_token() {
    let cache: Arc<dyn TokenCache> = Arc::new(MemoryTokenCache::new());
    let config = Arc::new(common::test_config());

    let result = TokenManager::load("nobody", cache, config, reqwest::Client::new()).await;

    match result {
        Err(e) => {
            assert!(matches!(e, Error::MissingToken(ref user) if user == "nobody"));
            assert!(e.is_credential());
        }
        Ok(_) => panic!("expected a missing token"),
    }
}

#[tokio::test]
async fn test_token_manager_returns_fresh_token_without_refresh() {
    let cache: Arc<dyn TokenCache> = Arc::new(MemoryTokenCache::new());
    cache.put("dana", &token("fresh")).await.unwrap();
    let config = Arc::new(common::test_config());

    let mut manager = TokenManager::load("dana", cache, config, reqwest::Client::new())
        .await
        .unwrap();

    assert!(!manager.is_expired());
    assert_eq!(manager.user_id(), "dana");
    assert_eq!(manager.get_valid_token().await.unwrap(), "fresh");
}

#[test]
fn test_merge_refreshed_keeps_previous_refresh_token() {
    let previous = token("old");
    let refreshed = Token {
        access_token: "new".to_string(),
        refresh_token: String::new(),
        scope: String::new(),
        expires_in: 3600,
        obtained_at: 7,
    };

    let merged = merge_refreshed(&previous, refreshed);

    assert_eq!(merged.access_token, "new");
    assert_eq!(merged.refresh_token, "refresh");
    assert_eq!(merged.scope, "playlist-modify-public");
    assert_eq!(merged.obtained_at, 7);
}
