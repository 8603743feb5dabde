use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;

use crate::utils;

/// How long a sign-in may sit between the redirect and the callback.
pub const SIGN_IN_TTL: Duration = Duration::from_secs(10 * 60);

/// Upper bound on sign-ins waiting for a callback at once.
pub const MAX_PENDING_SIGN_INS: usize = 1024;

/// One sign-in in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSignIn {
    pub code_verifier: String,
    /// Sent as the OAuth `state` parameter and checked on the callback.
    pub state: String,
    started_at: Instant,
}

impl PendingSignIn {
    fn new() -> Self {
        Self {
            code_verifier: utils::generate_code_verifier(),
            state: utils::generate_oauth_state(),
            started_at: Instant::now(),
        }
    }

    pub fn code_challenge(&self) -> String {
        utils::generate_code_challenge(&self.code_verifier)
    }
}

/// Pending sign-ins, keyed by session id.
///
/// Holds the PKCE code verifier and the `state` nonce between the redirect to
/// Spotify and the callback that consumes them. Entries expire after `ttl`
/// and the oldest one is dropped when the store is full.
#[derive(Clone)]
pub struct SessionStore {
    pending: Arc<Mutex<HashMap<String, PendingSignIn>>>,
    ttl: Duration,
    capacity: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(SIGN_IN_TTL, MAX_PENDING_SIGN_INS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(ttl: Duration, capacity: usize) -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Starts a sign-in for the session, or returns the one already running
    /// so that reloading the page keeps the same authorize URL.
    pub async fn begin(&self, session_id: &str) -> PendingSignIn {
        let mut pending = self.pending.lock().await;
        let ttl = self.ttl;
        pending.retain(|_, sign_in| sign_in.started_at.elapsed() < ttl);

        if let Some(existing) = pending.get(session_id) {
            return existing.clone();
        }

        while pending.len() >= self.capacity {
            let oldest = pending
                .iter()
                .min_by_key(|(_, sign_in)| sign_in.started_at)
                .map(|(id, _)| id.clone());
            let Some(id) = oldest else {
                break;
            };
            pending.remove(&id);
        }

        let sign_in = PendingSignIn::new();
        pending.insert(session_id.to_string(), sign_in.clone());
        sign_in
    }

    /// Removes and returns the sign-in; a code can be exchanged only once.
    /// Expired sign-ins are dropped and never returned.
    pub async fn take(&self, session_id: &str) -> Option<PendingSignIn> {
        self.pending
            .lock()
            .await
            .remove(session_id)
            .filter(|sign_in| sign_in.started_at.elapsed() < self.ttl)
    }

    pub async fn end(&self, session_id: &str) {
        self.pending.lock().await.remove(session_id);
    }

    pub async fn pending(&self) -> usize {
        self.pending.lock().await.len()
    }
}
