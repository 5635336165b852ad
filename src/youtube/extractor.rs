use thiserror::Error;
use tokio::process::Command;

use crate::{
    debug,
    types::{SongQuery, VideoInfo},
};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to run {binary}: {source}")]
    Spawn {
        binary: String,
        source: std::io::Error,
    },

    #[error("yt-dlp exited with {status} for {url}: {stderr}")]
    Failed {
        url: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to parse video metadata: {0}")]
    Parse(#[from] serde_json::Error),
}

pub fn video_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

pub struct VideoTitleExtractor {
    binary: String,
}

impl VideoTitleExtractor {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Fetches the metadata of a single video as reported by `yt-dlp -j`.
    pub async fn call_yt_dlp(&self, video_id: &str) -> Result<VideoInfo, ExtractError> {
        let url = video_url(video_id);
        debug!("Running {} for {}", self.binary, url);

        let output = Command::new(&self.binary)
            .args(["-j", "--skip-download", "--no-playlist", "--no-warnings", &url])
            .output()
            .await
            .map_err(|source| ExtractError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExtractError::Failed {
                url,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_video_info(&String::from_utf8_lossy(&output.stdout))
    }

    /// Fetches metadata and reduces it to an artist/song pair.
    ///
    /// `Ok(None)` means the video exists but carries no usable music metadata.
    pub async fn song_query(&self, video_id: &str) -> Result<Option<SongQuery>, ExtractError> {
        let info = self.call_yt_dlp(video_id).await?;
        Ok(process_video_track(Some(&info)))
    }
}

/// Parses the JSON document `yt-dlp -j` prints for one video.
pub fn parse_video_info(json: &str) -> Result<VideoInfo, ExtractError> {
    Ok(serde_json::from_str(json.trim())?)
}

/// Returns the artist/song pair of a video, or `None` when either is missing or blank.
pub fn process_video_track(info: Option<&VideoInfo>) -> Option<SongQuery> {
    let info = info?;
    let artist = info.artist.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
    let song_name = info.track.as_deref().map(str::trim).filter(|s| !s.is_empty())?;

    Some(SongQuery {
        artist: artist.to_string(),
        song_name: song_name.to_string(),
    })
}
