//! Plural likes for Spotify
//!
//! Counts how often a Spotify user likes a track. Tracks the user adds to a
//! source playlist are moved, on every scheduler tick, into the lowest
//! "degree" playlist that does not hold them yet: the first like lands in
//! `♥`, the second in `♥♥`, and so on.
//!
//! # Modules
//!
//! - `api` - HTTP handlers of the web front end (sign in, sign out, helpers)
//! - `cli` - Command implementations for the binary
//! - `config` - Configuration from environment variables and `.env`
//! - `error` - Crate error type
//! - `management` - Token cache, token refresh and sign-in sessions
//! - `reconcile` - The promotion algorithm
//! - `scheduler` - Periodic reconciliation of every signed-in user
//! - `server` - Router and listener
//! - `spotify` - Spotify Web API client and OAuth helpers
//! - `state` - Application context shared by handlers and the scheduler
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod reconcile;
pub mod scheduler;
pub mod server;
pub mod spotify;
pub mod state;
pub mod types;
pub mod utils;

pub use error::{Error, Result};

/// Prints an informational message with a blue bullet point.
///
/// Every line starts with the local time, the scheduler runs unattended and
/// its output is mostly read after the fact.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!(
      "{} [{}] {}",
      chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
      "o".blue().bold(),
      std::format_args!($($arg)*)
    );
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!(
      "{} [{}] {}",
      chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
      "✓".green().bold(),
      std::format_args!($($arg)*)
    );
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for startup failures. Anything that can happen while serving or
/// syncing goes through [`warning!`] so one user cannot stop the process.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!(
      "{} [{}] {}",
      chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
      "!".red().bold(),
      std::format_args!($($arg)*)
    );
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!(
      "{} [{}] {}",
      chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
      "!".yellow().bold(),
      std::format_args!($($arg)*)
    );
  })
}
