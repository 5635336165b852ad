use std::{collections::HashSet, path::PathBuf, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    config, error, info,
    management::SpotifySession,
    matching::{ArtistMatcher, ArtistQuery},
    spotify::{self, search::SelectionPolicy},
    success,
    types::{PlaylistTableRow, SongQuery, TrackSelection},
    utils, warning,
    youtube::{ExtractError, VideoTitleExtractor},
};

use super::matcher_or_exit;

pub struct PlaylistRequest {
    pub name: String,
    pub description: Option<String>,
    pub videos: Vec<String>,
    pub file: Option<PathBuf>,
    pub policy: SelectionPolicy,
}

enum Lookup {
    Added(SongQuery, TrackSelection),
    Duplicate(SongQuery, TrackSelection),
    NotFound(SongQuery),
    NoMetadata,
    Failed(String),
}

/// Track uris picked so far, each one once.
#[derive(Default)]
struct Collected {
    seen: HashSet<String>,
    uris: Vec<String>,
}

impl Collected {
    /// Records an added track, turning a repeated uri into [`Lookup::Duplicate`].
    fn record(&mut self, outcome: Lookup) -> Lookup {
        match outcome {
            Lookup::Added(q, track) => {
                if self.seen.insert(track.uri.clone()) {
                    self.uris.push(track.uri.clone());
                    Lookup::Added(q, track)
                } else {
                    Lookup::Duplicate(q, track)
                }
            }
            other => other,
        }
    }
}

pub async fn playlist(request: PlaylistRequest) {
    let video_ids = collect_video_ids(&request).await;
    if video_ids.is_empty() {
        error!("No videos given. Pass video ids/URLs or --file.");
    }

    let matcher = matcher_or_exit(None);
    let user_id = match config::spotify_user() {
        Ok(u) => u,
        Err(e) => error!("{}", e),
    };
    let mut session = match SpotifySession::from_env().await {
        Ok(s) => s,
        Err(e) => error!("{}", e),
    };
    let extractor = VideoTitleExtractor::new(config::yt_dlp_path());

    info!("Looking up {} videos", video_ids.len());

    let pb = ProgressBar::new(video_ids.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} [{bar:30.blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut collected = Collected::default();
    let mut rows: Vec<PlaylistTableRow> = Vec::new();

    for video_id in &video_ids {
        pb.set_message(video_id.clone());

        let outcome = lookup(
            &extractor,
            &mut session,
            &matcher,
            request.policy,
            video_id,
        )
        .await;
        let outcome = collected.record(outcome);

        if let Lookup::Failed(reason) = &outcome {
            pb.suspend(|| warning!("{}: {}", video_id, reason));
        }

        rows.push(table_row(video_id, outcome));
        pb.inc(1);
    }

    pb.finish_and_clear();
    println!("{}", Table::new(rows));

    let uris = collected.uris;
    if uris.is_empty() {
        warning!("No tracks selected, playlist '{}' not created", request.name);
        return;
    }

    let description = request
        .description
        .clone()
        .unwrap_or_else(|| format!("Created by sporvid from {} videos", video_ids.len()));

    let playlist_id =
        match spotify::playlist::create(&mut session, &user_id, &request.name, &description).await
        {
            Ok(id) => {
                success!("Playlist '{}' created.", request.name);
                id
            }
            Err(e) => error!("Failed to create playlist: {}", e),
        };

    match spotify::playlist::add_tracks(&mut session, &playlist_id, &uris).await {
        Ok(_) => success!("Added {} tracks to '{}'", uris.len(), request.name),
        Err(e) => warning!("Failed to add tracks to playlist: {}", e),
    }

    match spotify::playlist::track_count(&mut session, &playlist_id).await {
        Ok(Some(total)) => info!("Playlist '{}' now holds {} tracks", request.name, total),
        Ok(None) => {}
        Err(e) => warning!("Failed to read playlist size: {}", e),
    }
}

async fn collect_video_ids(request: &PlaylistRequest) -> Vec<String> {
    let mut ids = Vec::new();

    for video in &request.videos {
        match utils::parse_video_id(video) {
            Some(id) => ids.push(id),
            None => warning!("Ignoring '{}': not a video id or URL", video),
        }
    }

    if let Some(path) = &request.file {
        match async_fs::read_to_string(path).await {
            Ok(content) => ids.extend(utils::parse_video_list(&content)),
            Err(e) => error!("Cannot read {}: {}", path.display(), e),
        }
    }

    ids
}

async fn lookup(
    extractor: &VideoTitleExtractor,
    session: &mut SpotifySession,
    matcher: &ArtistMatcher,
    policy: SelectionPolicy,
    video_id: &str,
) -> Lookup {
    let metadata = extractor.song_query(video_id).await;
    lookup_song(session, matcher, policy, metadata).await
}

/// Searches for the song a video's metadata names. Videos without artist or
/// track never reach the catalog search.
async fn lookup_song(
    session: &mut SpotifySession,
    matcher: &ArtistMatcher,
    policy: SelectionPolicy,
    metadata: Result<Option<SongQuery>, ExtractError>,
) -> Lookup {
    let song = match metadata {
        Ok(Some(song)) => song,
        Ok(None) => return Lookup::NoMetadata,
        Err(e) => return Lookup::Failed(e.to_string()),
    };

    let query = match ArtistQuery::new(&song.artist) {
        Ok(q) => q,
        Err(_) => return Lookup::NoMetadata,
    };

    match spotify::search::get_song_uri(session, matcher, policy, &query, &song.song_name).await {
        Ok(Some(track)) => Lookup::Added(song, track),
        Ok(None) => Lookup::NotFound(song),
        Err(e) => Lookup::Failed(e.to_string()),
    }
}

fn table_row(video_id: &str, outcome: Lookup) -> PlaylistTableRow {
    let describe = |q: &SongQuery| utils::truncate(&format!("{} - {}", q.artist, q.song_name), 40);
    let track_label =
        |t: &TrackSelection| utils::truncate(&format!("{} - {}", t.artists, t.name), 40);

    let (query, track, status) = match outcome {
        Lookup::Added(q, t) => {
            let status = if t.matched { "added" } else { "added (unmatched)" };
            (describe(&q), track_label(&t), status.to_string())
        }
        Lookup::Duplicate(q, t) => (describe(&q), track_label(&t), "duplicate".to_string()),
        Lookup::NotFound(q) => (describe(&q), String::new(), "not found".to_string()),
        Lookup::NoMetadata => (String::new(), String::new(), "no metadata".to_string()),
        Lookup::Failed(_) => (String::new(), String::new(), "failed".to_string()),
    };

    PlaylistTableRow {
        video: video_id.to_string(),
        query,
        track,
        status,
    }
}
