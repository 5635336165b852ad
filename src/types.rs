use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongQuery {
    pub artist: String,
    pub song_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoInfo {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub track: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: SearchTracks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTracks {
    pub items: Vec<SearchTrack>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTrack {
    pub id: String,
    pub name: String,
    pub uri: String,
    pub artists: Vec<TrackArtist>,
}

impl SearchTrack {
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackArtist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackSelection {
    pub uri: String,
    pub name: String,
    pub artists: String,
    pub matched: bool,
    pub score: Option<f64>,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub video: String,
    pub query: String,
    pub track: String,
    pub status: String,
}

#[derive(Tabled)]
pub struct MatchTableRow {
    pub index: usize,
    pub candidate: String,
    pub score: String,
    pub accepted: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksResponse {
    pub total: Option<u64>,
}
