use crate::{
    management::SpotifySession,
    spotify::{SpotifyError, check_status, decode},
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, PlaylistTracksResponse,
    },
};

/// Maximum number of URIs Spotify accepts per add request.
pub const ADD_TRACKS_CHUNK: usize = 100;

/// Creates a private, non-collaborative playlist owned by `user_id`.
///
/// Returns the new playlist's id.
pub async fn create(
    session: &mut SpotifySession,
    user_id: &str,
    name: &str,
    description: &str,
) -> Result<String, SpotifyError> {
    let token = session.access_token().await?;
    let url = format!("{}/users/{}/playlists", session.api_url(), user_id);

    let body = CreatePlaylistRequest {
        name: name.to_string(),
        description: description.to_string(),
        public: false,
        collaborative: false,
    };

    let response = session
        .http()
        .post(&url)
        .bearer_auth(token)
        .json(&body)
        .send()
        .await?;

    let response = check_status(response).await?;
    let playlist: CreatePlaylistResponse = decode(response).await?;
    Ok(playlist.id)
}

/// Appends tracks to a playlist in batches of [`ADD_TRACKS_CHUNK`].
///
/// Returns the snapshot id of every batch. Stops at the first failing batch;
/// earlier batches stay added.
pub async fn add_tracks(
    session: &mut SpotifySession,
    playlist_id: &str,
    uris: &[String],
) -> Result<Vec<String>, SpotifyError> {
    let url = format!("{}/playlists/{}/tracks", session.api_url(), playlist_id);
    let mut snapshots = Vec::new();

    for chunk in uris.chunks(ADD_TRACKS_CHUNK) {
        let token = session.access_token().await?;
        let body = AddTrackToPlaylistRequest {
            uris: chunk.to_vec(),
        };

        let response = session
            .http()
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let response = check_status(response).await?;
        let res: AddTrackToPlaylistResponse = decode(response).await?;
        snapshots.push(res.snapshot_id);
    }

    Ok(snapshots)
}

/// Number of tracks in a playlist, `None` if the response carries no total.
pub async fn track_count(
    session: &mut SpotifySession,
    playlist_id: &str,
) -> Result<Option<u64>, SpotifyError> {
    let token = session.access_token().await?;
    let url = format!("{}/playlists/{}/tracks", session.api_url(), playlist_id);

    let response = session
        .http()
        .get(&url)
        .query(&[("limit", "1"), ("fields", "total")])
        .bearer_auth(token)
        .send()
        .await?;

    let response = check_status(response).await?;
    let res: PlaylistTracksResponse = decode(response).await?;
    Ok(res.total)
}
