use crate::{
    debug,
    management::SpotifySession,
    matching::{ArtistMatcher, ArtistQuery},
    spotify::{SpotifyError, check_status, decode},
    types::{SearchResponse, SearchTrack, TrackSelection},
    utils,
};

/// Number of results requested per search.
pub const SEARCH_LIMIT: u32 = 10;

/// What to return when no search result's artist matches the query artist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Fall back to the top-ranked result.
    #[default]
    Lenient,
    /// Return nothing.
    Strict,
}

impl SelectionPolicy {
    /// Maps the `--strict` command-line flag.
    pub fn from_strict(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Lenient }
    }
}

/// Searches the catalog for tracks matching `"{song_name} {artist}"`.
///
/// Results keep Spotify's ranking order.
///
/// # Errors
///
/// Returns [`SpotifyError::Status`] for non-success responses,
/// [`SpotifyError::InvalidResponse`] for bodies that do not decode and
/// [`SpotifyError::Http`] for transport failures.
pub async fn search_tracks(
    session: &mut SpotifySession,
    artist: &str,
    song_name: &str,
) -> Result<Vec<SearchTrack>, SpotifyError> {
    let token = session.access_token().await?;
    let query = utils::build_search_query(artist, song_name);
    let url = format!("{}/search", session.api_url());
    let limit = SEARCH_LIMIT.to_string();
    debug!("Query arguments: q={} type=track limit={}", query, SEARCH_LIMIT);

    let response = session
        .http()
        .get(&url)
        .query(&[
            ("q", query.as_str()),
            ("type", "track"),
            ("limit", limit.as_str()),
        ])
        .bearer_auth(token)
        .send()
        .await?;

    let response = check_status(response).await?;
    let res: SearchResponse = decode(response).await?;
    Ok(res.tracks.items)
}

/// Picks the track to add for `artist` out of ranked search results.
///
/// The first track whose artists satisfy the matcher wins. When none does,
/// [`SelectionPolicy::Lenient`] returns the top result flagged as unmatched
/// and [`SelectionPolicy::Strict`] returns `None`. Empty results always give
/// `None`.
pub fn select_track(
    tracks: &[SearchTrack],
    query: &ArtistQuery,
    matcher: &ArtistMatcher,
    policy: SelectionPolicy,
) -> Option<TrackSelection> {
    let candidates = utils::artist_names_from_tracks(tracks);
    debug!("Candidate artists for '{}': {:?}", query.as_str(), candidates);

    if let Some(found) = matcher.find_match(query, &candidates) {
        debug!(
            "Matched '{}' at index {} with score {:.3}",
            found.candidate, found.index, found.score
        );
        let track = &tracks[found.index];
        return Some(TrackSelection {
            uri: track.uri.clone(),
            name: track.name.clone(),
            artists: found.candidate,
            matched: true,
            score: Some(found.score),
        });
    }

    match (policy, tracks.first()) {
        (SelectionPolicy::Lenient, Some(track)) => Some(TrackSelection {
            uri: track.uri.clone(),
            name: track.name.clone(),
            artists: track.artist_names(),
            matched: false,
            score: None,
        }),
        _ => None,
    }
}

/// Searches for a song and returns the selected track, if any.
pub async fn get_song_uri(
    session: &mut SpotifySession,
    matcher: &ArtistMatcher,
    policy: SelectionPolicy,
    query: &ArtistQuery,
    song_name: &str,
) -> Result<Option<TrackSelection>, SpotifyError> {
    let tracks = search_tracks(session, query.as_str(), song_name).await?;
    Ok(select_track(&tracks, query, matcher, policy))
}
