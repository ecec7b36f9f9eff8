//! Normalized listening data

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One track in any of the four snapshot lists.
///
/// Field names on the wire stay compatible with the web client
/// (`image`, `album`, `spotifyUrl`, `added_at`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackItem {
    pub name: String,
    /// First credited artist
    pub artist: String,
    #[serde(rename = "image")]
    pub album_image: Option<String>,
    #[serde(rename = "album")]
    pub album_name: Option<String>,
    /// Spotify popularity, 0-100
    pub popularity: Option<u8>,
    #[serde(rename = "spotifyUrl")]
    pub external_url: Option<String>,
    /// Saved-at (liked) or played-at (recently played); absent for top lists
    pub added_at: Option<DateTime<Utc>>,
}

/// Aggregate of the four listening-history lists. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// All-time top tracks
    pub top_tracks: Vec<TrackItem>,
    pub liked_songs: Vec<TrackItem>,
    pub recently_played: Vec<TrackItem>,
    /// Short-term top tracks
    pub most_heard: Vec<TrackItem>,
}
