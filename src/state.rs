//! Shared application state.
use std::sync::Arc;

use reqwest::Client;

use crate::{
    config::Config,
    error::Result,
    management::{FileTokenCache, SessionStore, TokenCache, TokenManager},
    reconcile::{ReconcileOptions, Reconciler},
    spotify::SpotifyClient,
};

/// Everything handlers and the scheduler need, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: Arc<dyn TokenCache>,
    pub sessions: SessionStore,
    pub http: Client,
}

impl AppState {
    pub fn new(config: Config, tokens: Arc<dyn TokenCache>) -> Self {
        Self {
            config: Arc::new(config),
            tokens,
            sessions: SessionStore::new(),
            http: Client::new(),
        }
    }

    /// State backed by the on-disk token cache from the configuration.
    pub fn from_config(config: Config) -> Self {
        let tokens = Arc::new(FileTokenCache::new(config.token_cache_dir.clone()));
        Self::new(config, tokens)
    }

    /// API client for a user with a cached token.
    pub async fn client_for(&self, user_id: &str) -> Result<SpotifyClient> {
        let tokens = TokenManager::load(
            user_id,
            Arc::clone(&self.tokens),
            Arc::clone(&self.config),
            self.http.clone(),
        )
        .await?;

        Ok(SpotifyClient::new(self.http.clone(), &self.config, tokens))
    }

    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(ReconcileOptions::from_config(&self.config))
    }
}
