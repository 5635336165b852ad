//! Configuration management for sporvid.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage application
//! configuration including Spotify API credentials, server settings, the fuzzy
//! matching threshold and the location of the `yt-dlp` binary.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

use thiserror::Error;

use crate::matching::DEFAULT_THRESHOLD;

pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_SCOPE: &str = "playlist-modify-private playlist-read-private";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_YT_DLP: &str = "yt-dlp";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Cannot prepare config directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read .env file: {0}")]
    Dotenv(#[from] dotenv::Error),
}

/// Returns the application directory inside the platform's local data directory.
///
/// - Linux: `~/.local/share/sporvid`
/// - macOS: `~/Library/Application Support/sporvid`
/// - Windows: `%LOCALAPPDATA%/sporvid`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sporvid");
    path
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the application directory if it doesn't exist. A missing `.env`
/// file is not an error since every value can also come from the process
/// environment, which always takes precedence over the file.
///
/// # Errors
///
/// This function will return an error if:
/// - The application directory cannot be created
/// - The `.env` file exists but cannot be read or parsed
///
/// # Example
///
/// ```
/// use sporvid::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), ConfigError> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir).await?;

    let path = dir.join(".env");
    if path.is_file() {
        dotenv::from_path(path)?;
    }

    if env::var("SPORVID_DEBUG").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true")) {
        crate::set_verbose(true);
    }

    Ok(())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn with_default(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Returns the address the local OAuth callback server binds to.
///
/// Reads `SERVER_ADDRESS`, defaulting to `127.0.0.1:8888`.
pub fn server_addr() -> String {
    with_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Returns the Spotify user ID that owns created playlists.
///
/// # Errors
///
/// Fails if `SPOTIFY_USER_ID` is not set.
pub fn spotify_user() -> Result<String, ConfigError> {
    required("SPOTIFY_USER_ID")
}

/// Returns the Spotify API client ID for authentication.
///
/// Reads `SPOTIFY_API_AUTH_CLIENT_ID`, the client ID obtained when registering
/// the application with Spotify's developer platform. The PKCE flow does not
/// need a client secret.
///
/// # Errors
///
/// Fails if `SPOTIFY_API_AUTH_CLIENT_ID` is not set.
pub fn spotify_client_id() -> Result<String, ConfigError> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Returns the Spotify OAuth redirect URI.
///
/// This must match the redirect URI registered in the Spotify application
/// settings and the address of the local callback server.
pub fn spotify_redirect_uri() -> String {
    with_default("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI)
}

/// Returns the Spotify API scope permissions requested during authorization.
pub fn spotify_scope() -> String {
    with_default("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SPOTIFY_SCOPE)
}

/// Returns the Spotify OAuth authorization URL.
pub fn spotify_apiauth_url() -> String {
    with_default("SPOTIFY_API_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL)
}

/// Returns the Spotify Web API base URL.
pub fn spotify_apiurl() -> String {
    with_default("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL)
}

/// Returns the Spotify OAuth token exchange URL.
pub fn spotify_apitoken_url() -> String {
    with_default("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL)
}

/// Returns the path or name of the `yt-dlp` executable.
pub fn yt_dlp_path() -> String {
    with_default("YT_DLP_PATH", DEFAULT_YT_DLP)
}

/// Returns the similarity cutoff used by the artist matcher.
///
/// Reads `SPORVID_MATCH_THRESHOLD`, defaulting to `0.8` when unset or blank.
///
/// # Errors
///
/// Fails if the value is not a number within `0.0..=1.0`.
pub fn match_threshold() -> Result<f64, ConfigError> {
    threshold_from(env::var("SPORVID_MATCH_THRESHOLD").ok().as_deref())
}

/// Unset and blank values fall back to [`DEFAULT_THRESHOLD`].
fn threshold_from(raw: Option<&str>) -> Result<f64, ConfigError> {
    let Some(raw) = raw.filter(|v| !v.trim().is_empty()) else {
        return Ok(DEFAULT_THRESHOLD);
    };

    parse_threshold(raw).map_err(|reason| ConfigError::Invalid {
        key: "SPORVID_MATCH_THRESHOLD",
        value: raw.to_string(),
        reason,
    })
}

/// Parses a threshold value, accepting only finite numbers in `0.0..=1.0`.
pub fn parse_threshold(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.trim().parse().map_err(|_| "not a number".to_string())?;
    if !(0.0..=1.0).contains(&value) {
        return Err("must be between 0.0 and 1.0".to_string());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_threshold_accepts_unit_interval() {
        assert_eq!(parse_threshold("0.8"), Ok(0.8));
        assert_eq!(parse_threshold(" 1 "), Ok(1.0));
        assert_eq!(parse_threshold("0"), Ok(0.0));
    }

    #[test]
    fn parse_threshold_rejects_out_of_range_and_garbage() {
        assert!(parse_threshold("1.5").is_err());
        assert!(parse_threshold("-0.1").is_err());
        assert!(parse_threshold("NaN").is_err());
        assert!(parse_threshold("high").is_err());
    }

    #[test]
    fn blank_threshold_falls_back_to_default() {
        assert_eq!(threshold_from(None).unwrap(), DEFAULT_THRESHOLD);
        assert_eq!(threshold_from(Some("")).unwrap(), DEFAULT_THRESHOLD);
        assert_eq!(threshold_from(Some("  ")).unwrap(), DEFAULT_THRESHOLD);
        assert_eq!(threshold_from(Some("0.9")).unwrap(), 0.9);
    }

    #[test]
    fn invalid_threshold_names_the_variable() {
        match threshold_from(Some("2")) {
            Err(ConfigError::Invalid { key, value, .. }) => {
                assert_eq!(key, "SPORVID_MATCH_THRESHOLD");
                assert_eq!(value, "2");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
