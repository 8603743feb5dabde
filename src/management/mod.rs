mod auth;
mod cache;
mod session;

pub use auth::TokenManager;
pub use auth::merge_refreshed;
pub use cache::FileTokenCache;
pub use cache::MemoryTokenCache;
pub use cache::TokenCache;
pub use session::{MAX_PENDING_SIGN_INS, PendingSignIn, SIGN_IN_TTL, SessionStore};
