use crate::{
    error, info,
    management::SpotifySession,
    matching::ArtistQuery,
    spotify::search::{self, SelectionPolicy},
    success, warning,
};

use super::matcher_or_exit;

pub async fn search(artist: String, song: String, policy: SelectionPolicy) {
    let matcher = matcher_or_exit(None);
    let query = match ArtistQuery::new(&artist) {
        Ok(q) => q,
        Err(e) => error!("{}", e),
    };

    let mut session = match SpotifySession::from_env().await {
        Ok(s) => s,
        Err(e) => error!("{}", e),
    };

    info!("Searching for '{}' by '{}'", song, query.as_str());

    match search::get_song_uri(&mut session, &matcher, policy, &query, &song).await {
        Ok(Some(track)) if track.matched => success!(
            "{} - {} ({}, score {:.3})",
            track.artists,
            track.name,
            track.uri,
            track.score.unwrap_or_default()
        ),
        Ok(Some(track)) => warning!(
            "Top result {} - {} ({}) does not match artist '{}'",
            track.artists,
            track.name,
            track.uri,
            query.as_str()
        ),
        Ok(None) => warning!("No track found for '{}' by '{}'", song, query.as_str()),
        Err(e) => error!("Search failed: {}", e),
    }
}
