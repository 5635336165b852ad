//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify Web API used by sporvid:
//! authentication, catalog search and playlist management. It is the layer
//! between the CLI and Spotify's services and handles HTTP communication and
//! error reporting.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI)
//!          ↓
//! Session (cached token, expiry-aware refresh)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (OAuth 2.0 PKCE)
//!     ├── Search (track lookup + artist matching)
//!     └── Playlist Operations (Create, Add, Count)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! - [`auth`] - OAuth 2.0 PKCE flow: browser launch, local callback server,
//!   code exchange and token refresh.
//! - [`search`] - Track search and selection of the result whose artist
//!   matches the requested one.
//! - [`playlist`] - Private playlist creation, adding tracks in batches and
//!   reading the track count.
//!
//! ## Error Handling
//!
//! Every request returns a [`SpotifyError`]. Non-success responses are turned
//! into [`SpotifyError::Status`] carrying the status code and response body so
//! callers can report them. A successful response whose body does not decode
//! becomes [`SpotifyError::InvalidResponse`]. Nothing is retried here: the caller decides whether
//! to skip the affected video or abort.
//!
//! ## Authentication
//!
//! All data requests go through a [`crate::management::SpotifySession`], which
//! supplies a bearer token and refreshes it shortly before it expires.

use reqwest::Response;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::ConfigError;

pub mod auth;
pub mod playlist;
pub mod search;

#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Spotify API error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Token refresh failed: {0}")]
    TokenRefresh(String),

    #[error("Unexpected response from Spotify API: {0}")]
    InvalidResponse(String),

    #[error("No usable token: {0}")]
    MissingToken(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Passes successful responses through and turns everything else into
/// [`SpotifyError::Status`].
pub(crate) async fn check_status(response: Response) -> Result<Response, SpotifyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(SpotifyError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Reads the body of a successful response and decodes it as JSON.
pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, SpotifyError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| SpotifyError::InvalidResponse(e.to_string()))
}
