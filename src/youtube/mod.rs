//! # Video Metadata
//!
//! Reads artist and song information for videos through the `yt-dlp`
//! executable. Only metadata is fetched; nothing is downloaded.
//!
//! Videos whose metadata lacks an artist or a track title produce no
//! [`crate::types::SongQuery`], which makes the playlist pipeline skip the
//! catalog search for them.

mod extractor;

pub use extractor::ExtractError;
pub use extractor::VideoTitleExtractor;
pub use extractor::parse_video_info;
pub use extractor::process_video_track;
pub use extractor::video_url;
