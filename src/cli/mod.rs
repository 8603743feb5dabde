//! # CLI Module
//!
//! Command implementations for the `plural-likes` binary.
//!
//! - [`serve`] - web front end plus background scheduler
//! - [`sync`] - one reconciliation pass now
//! - [`users`] - signed-in users and token expiry
//! - [`degrees`] - degree playlists of one user
//!
//! Commands report through the crate's logging macros and exit with
//! status 1 on failures they cannot recover from.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

mod degrees;
mod serve;
mod sync;
mod users;

pub use degrees::degrees;
pub use serve::serve;
pub use sync::sync;
pub use users::users;

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
