use std::{
    collections::HashMap,
    io::ErrorKind,
    path::PathBuf,
};

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::RwLock;

use crate::{
    error::{Error, Result},
    types::Token,
    utils, warning,
};

/// Per-user credential storage keyed by the opaque user id.
#[async_trait]
pub trait TokenCache: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<Token>>;

    async fn put(&self, user_id: &str, token: &Token) -> Result<()>;

    /// Returns `true` when a token was actually removed.
    async fn delete(&self, user_id: &str) -> Result<bool>;

    /// All user ids with a cached token, sorted.
    async fn users(&self) -> Result<Vec<String>>;
}

/// One JSON file per user inside a cache directory.
pub struct FileTokenCache {
    dir: PathBuf,
}

impl FileTokenCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn token_path(&self, user_id: &str) -> Result<PathBuf> {
        if !utils::is_valid_session_id(user_id) {
            return Err(Error::InvalidCacheKey(user_id.to_string()));
        }
        Ok(self.dir.join(user_id))
    }
}

#[async_trait]
impl TokenCache for FileTokenCache {
    async fn get(&self, user_id: &str) -> Result<Option<Token>> {
        let path = self.token_path(user_id)?;
        let content = match async_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(token) => Ok(Some(token)),
            Err(e) => {
                warning!("Ignoring unreadable token for {}: {}", user_id, e);
                Ok(None)
            }
        }
    }

    async fn put(&self, user_id: &str, token: &Token) -> Result<()> {
        let path = self.token_path(user_id)?;
        async_fs::create_dir_all(&self.dir).await?;

        let json = serde_json::to_string_pretty(token)?;
        let tmp = self.dir.join(format!(".{user_id}.tmp"));
        async_fs::write(&tmp, json).await?;
        async_fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<bool> {
        let path = self.token_path(user_id)?;
        match async_fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn users(&self) -> Result<Vec<String>> {
        let mut entries = match async_fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut users = Vec::new();
        while let Some(entry) = entries.next().await {
            let entry = entry?;
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if utils::is_valid_session_id(name) {
                    users.push(name.to_string());
                }
            }
        }

        users.sort();
        Ok(users)
    }
}

/// Process-local cache, lost on restart.
#[derive(Default)]
pub struct MemoryTokenCache {
    tokens: RwLock<HashMap<String, Token>>,
}

impl MemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenCache for MemoryTokenCache {
    async fn get(&self, user_id: &str) -> Result<Option<Token>> {
        Ok(self.tokens.read().await.get(user_id).cloned())
    }

    async fn put(&self, user_id: &str, token: &Token) -> Result<()> {
        self.tokens
            .write()
            .await
            .insert(user_id.to_string(), token.clone());
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<bool> {
        Ok(self.tokens.write().await.remove(user_id).is_some())
    }

    async fn users(&self) -> Result<Vec<String>> {
        let mut users: Vec<String> = self.tokens.read().await.keys().cloned().collect();
        users.sort();
        Ok(users)
    }
}
