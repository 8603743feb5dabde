use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

pub const SESSION_COOKIE: &str = "plural_likes_session";

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Single-use OAuth `state` value, unrelated to the session id.
pub fn generate_oauth_state() -> String {
    random_alphanumeric(32)
}

/// Anonymous session identifier, also used as the token cache key.
pub fn generate_session_id() -> String {
    random_alphanumeric(32)
}

/// Session ids are plain alphanumerics plus `-` and `_`; anything else is
/// rejected before it reaches the token cache.
pub fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 128
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Extracts the session id from a raw `Cookie` header value.
pub fn session_from_cookies(header: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| is_valid_session_id(value))
}

pub fn session_cookie(session_id: &str) -> String {
    format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax")
}

pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Name of the degree playlist: the marker repeated `degree` times.
pub fn degree_name(marker: &str, degree: usize) -> String {
    marker.repeat(degree)
}

pub fn unix_now() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

pub fn track_uri(track_id: &str) -> String {
    format!("spotify:track:{track_id}")
}
