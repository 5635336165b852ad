use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::SearchTrack;

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Artist string of every track, in search order.
///
/// Tracks with several artists produce one comma-joined entry, so a single
/// candidate may name a whole featuring list.
pub fn artist_names_from_tracks(tracks: &[SearchTrack]) -> Vec<String> {
    tracks.iter().map(SearchTrack::artist_names).collect()
}

pub fn build_search_query(artist: &str, song_name: &str) -> String {
    format!("{} {}", song_name.trim(), artist.trim())
}

/// Extracts a video id from a bare id or a watch/short URL.
pub fn parse_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let candidate = if let Some((_, rest)) = input.split_once("youtu.be/") {
        rest
    } else if let Some((_, query)) = input.split_once('?') {
        query
            .split('&')
            .find_map(|pair| pair.strip_prefix("v="))?
    } else if input.contains('/') {
        return None;
    } else {
        input
    };

    let id: String = candidate
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    (!id.is_empty()).then_some(id)
}

/// Parses a video list: one id or URL per line, blank lines and `#` comments ignored.
pub fn parse_video_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_video_id)
        .collect()
}

pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
