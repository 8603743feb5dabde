//! OAuth 2.0 authorization code flow with PKCE.

use reqwest::{Client, Url};

use crate::{
    config::Config,
    error::{Error, Result},
    types::{Token, TokenResponse},
    utils,
};

/// Builds the Spotify authorization URL the browser is sent to.
///
/// `state` is a per-sign-in nonce checked again when the callback
/// arrives. `show_dialog` forces the consent screen so a shared
/// browser can switch accounts after signing out.
pub fn authorize_url(config: &Config, state: &str, code_challenge: &str) -> Result<String> {
    let url = Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("code_challenge", code_challenge),
            ("code_challenge_method", "S256"),
            ("scope", config.scope.as_str()),
            ("state", state),
            ("show_dialog", "true"),
        ],
    )
    .map_err(|e| Error::InvalidConfig {
        key: "SPOTIFY_API_AUTH_URL",
        value: format!("{} ({})", config.auth_url, e),
    })?;

    Ok(url.into())
}

pub async fn exchange_code_pkce(
    http: &Client,
    config: &Config,
    code: &str,
    verifier: &str,
) -> Result<Token> {
    let response = request_token(
        http,
        config,
        &[
            ("grant_type", "authorization_code"),
            ("client_id", config.client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", config.redirect_uri.as_str()),
        ],
    )
    .await
    .map_err(|e| Error::TokenExchange(e.to_string()))?;

    token_from_response(response, utils::unix_now()).map_err(Error::TokenExchange)
}

pub async fn refresh_token(http: &Client, config: &Config, refresh_token: &str) -> Result<Token> {
    if refresh_token.is_empty() {
        return Err(Error::TokenRefresh("no refresh token".to_string()));
    }

    let response = request_token(
        http,
        config,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", config.client_id.as_str()),
        ],
    )
    .await
    .map_err(|e| Error::TokenRefresh(e.to_string()))?;

    token_from_response(response, utils::unix_now()).map_err(Error::TokenRefresh)
}

async fn request_token(
    http: &Client,
    config: &Config,
    form: &[(&str, &str)],
) -> std::result::Result<TokenResponse, reqwest::Error> {
    let mut request = http.post(&config.token_url).form(form);
    if let Some(secret) = &config.client_secret {
        request = request.basic_auth(&config.client_id, Some(secret));
    }

    // error answers carry a JSON body too, so the status is not checked here
    request.send().await?.json::<TokenResponse>().await
}

/// Turns a token endpoint answer into a [`Token`] obtained at `now`.
///
/// Missing `refresh_token` and `scope` come back empty; callers refreshing an
/// existing token merge the previous values back in.
pub fn token_from_response(
    response: TokenResponse,
    now: u64,
) -> std::result::Result<Token, String> {
    let Some(access_token) = response.access_token.filter(|t| !t.is_empty()) else {
        return Err(match (response.error, response.error_description) {
            (Some(error), Some(description)) => format!("{error}: {description}"),
            (Some(error), None) => error,
            _ => "response contained no access token".to_string(),
        });
    };

    Ok(Token {
        access_token,
        refresh_token: response.refresh_token.unwrap_or_default(),
        scope: response.scope.unwrap_or_default(),
        expires_in: response.expires_in.unwrap_or(3600),
        obtained_at: now,
    })
}
