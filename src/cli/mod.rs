//! # CLI Module
//!
//! User-facing commands of sporvid. Each command loads what it needs from the
//! configuration, delegates to the [`crate::spotify`], [`crate::youtube`] and
//! [`crate::matching`] modules and reports progress with the crate's logging
//! macros.
//!
//! ## Commands
//!
//! - [`auth`] - Runs the Spotify OAuth 2.0 PKCE flow and caches the token.
//! - [`search`] - Looks up a single artist/song pair and prints the track that
//!   would be added.
//! - [`compare`] - Scores candidate artist names against a query artist, to
//!   inspect matcher decisions without touching the network.
//! - [`playlist`] - Extracts metadata for a list of videos, looks up each song
//!   and adds the selected tracks to a new private playlist.
//!
//! ## Error Handling
//!
//! Failures that make the whole command pointless (missing configuration, no
//! cached token) end the program through `error!`. Failures affecting a single
//! video are reported with `warning!` and the video is skipped.
//!
//! ## Usage Patterns
//!
//! ```bash
//! sporvid auth
//! sporvid search --artist "Billie Eilish" --song "bad guy"
//! sporvid match "Billie Eilish" "Billie Eilish, Khalid" "Justin Bieber"
//! sporvid playlist --name "From videos" dQw4w9WgXcQ https://youtu.be/kJQP7kiw5Fk
//! sporvid playlist --name "Mix" --file videos.txt --strict
//! ```

mod auth;
mod compare;
mod playlist;
mod search;

pub use auth::auth;
pub use compare::compare;
pub use playlist::PlaylistRequest;
pub use playlist::playlist;
pub use search::search;

use crate::{config, error, matching::ArtistMatcher};

/// Builds the matcher from an explicit threshold or the configured one.
pub(crate) fn matcher_or_exit(threshold: Option<f64>) -> ArtistMatcher {
    let threshold = match threshold {
        Some(t) => t,
        None => match config::match_threshold() {
            Ok(t) => t,
            Err(e) => error!("{}", e),
        },
    };

    match ArtistMatcher::new(threshold) {
        Ok(matcher) => matcher,
        Err(e) => error!("{}", e),
    }
}
