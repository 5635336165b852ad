//! Video-to-Spotify Playlist CLI Library
//!
//! This library provides functionality for turning video metadata into Spotify
//! playlists. It extracts artist/song pairs from videos through `yt-dlp`, searches
//! the Spotify catalog for each pair, checks the returned artists with a fuzzy
//! matcher and appends the chosen tracks to a playlist.
//!
//! # Modules
//!
//! - `api` - HTTP API endpoints for the local callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `management` - Token persistence and the authenticated session
//! - `matching` - Fuzzy artist matching
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//! - `youtube` - Video metadata extraction
//!
//! # Example
//!
//! ```
//! use sporvid::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> sporvid::Res<()> {
//!     config::load_env().await?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

pub mod api;
pub mod cli;
pub mod config;
pub mod management;
pub mod matching;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;
pub mod youtube;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the CLI orchestration layer where errors of different modules meet.
/// Library functions return their own typed errors, which convert into this
/// boxed form through `?`.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Enables or disables output of the [`debug!`] macro.
pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

/// Returns whether [`debug!`] output is enabled.
pub fn verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Example
///
/// ```
/// info!("Extracting metadata for {} videos", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Added {} tracks", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Only the CLI layer uses it; library
/// code returns errors instead.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues, e.g. a single video whose lookup failed while
/// the rest of the batch continues.
///
/// # Example
///
/// ```
/// warning!("No metadata for video {}, skipping", video_id);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a dimmed diagnostic message when verbose output is enabled.
///
/// Verbose output is switched on by the global `--verbose` flag or by setting
/// `SPORVID_DEBUG=1`.
///
/// # Example
///
/// ```
/// debug!("Query arguments: {}", query);
/// ```
#[macro_export]
macro_rules! debug {
  ($($arg:tt)*) => ({
    if $crate::verbose() {
      use colored::Colorize;
      println!("[{}] {}", "·".dimmed(), std::format!($($arg)*).dimmed());
    }
  })
}
