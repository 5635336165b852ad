//! # API Module
//!
//! HTTP endpoints served by the short-lived local server that runs during
//! `sporvid auth`.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives the redirect from Spotify's authorization page and
//!   exchanges the authorization code plus the stored PKCE verifier for a token.
//!   The token is placed in the shared state, where the waiting auth flow picks
//!   it up.
//! - [`health`] - Returns status and version, handy to check that the callback
//!   server is reachable at the configured address.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use sporvid::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
