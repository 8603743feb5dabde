use std::sync::Arc;

use reqwest::Client;

use crate::{
    config::Config,
    error::{Error, Result},
    management::TokenCache,
    spotify,
    types::Token,
    utils,
};

/// Holds one user's token and keeps it fresh.
pub struct TokenManager {
    user_id: String,
    token: Token,
    cache: Arc<dyn TokenCache>,
    config: Arc<Config>,
    http: Client,
}

impl TokenManager {
    pub fn new(
        user_id: String,
        token: Token,
        cache: Arc<dyn TokenCache>,
        config: Arc<Config>,
        http: Client,
    ) -> Self {
        TokenManager {
            user_id,
            token,
            cache,
            config,
            http,
        }
    }

    pub async fn load(
        user_id: &str,
        cache: Arc<dyn TokenCache>,
        config: Arc<Config>,
        http: Client,
    ) -> Result<Self> {
        let token = cache
            .get(user_id)
            .await?
            .ok_or_else(|| Error::MissingToken(user_id.to_string()))?;
        Ok(Self::new(user_id.to_string(), token, cache, config, http))
    }

    pub async fn persist(&self) -> Result<()> {
        self.cache.put(&self.user_id, &self.token).await
    }

    pub async fn get_valid_token(&mut self) -> Result<String> {
        if self.is_expired() {
            let refreshed =
                spotify::auth::refresh_token(&self.http, &self.config, &self.token.refresh_token)
                    .await?;
            self.token = merge_refreshed(&self.token, refreshed);
            self.persist().await?;
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired(&self) -> bool {
        self.token.is_expired_at(utils::unix_now())
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// The refresh grant may omit the refresh token or the scope; keep the old
/// ones in that case.
pub fn merge_refreshed(previous: &Token, mut refreshed: Token) -> Token {
    if refreshed.refresh_token.is_empty() {
        refreshed.refresh_token = previous.refresh_token.clone();
    }
    if refreshed.scope.is_empty() {
        refreshed.scope = previous.scope.clone();
    }
    refreshed
}
