//! Upstream track shapes → [`TrackItem`]
//!
//! All four snapshot lists go through [`normalize_track`], so a given upstream
//! gap is treated the same way wherever it shows up: a missing title or artist
//! becomes [`UNKNOWN`], every other missing field becomes `None`. Nothing here
//! fails.

use chrono::{DateTime, Utc};

use super::client::{RawPlayHistory, RawSavedTrack, RawTrack};
use super::model::TrackItem;

/// Placeholder for a missing title or artist
pub const UNKNOWN: &str = "Unknown";

/// Map one upstream track, stamping it with `added_at` when the list has one
pub fn normalize_track(track: &RawTrack, added_at: Option<DateTime<Utc>>) -> TrackItem {
    let album = track.album.as_ref();

    TrackItem {
        name: non_blank(track.name.as_deref()).unwrap_or(UNKNOWN).to_string(),
        artist: track
            .artists
            .as_deref()
            .and_then(|artists| artists.first())
            .and_then(|artist| non_blank(artist.name.as_deref()))
            .unwrap_or(UNKNOWN)
            .to_string(),
        album_image: album
            .and_then(|a| a.images.as_deref())
            .and_then(|images| images.first())
            .and_then(|image| non_blank(image.url.as_deref()))
            .map(str::to_string),
        album_name: album
            .and_then(|a| non_blank(a.name.as_deref()))
            .map(str::to_string),
        popularity: track
            .popularity
            .and_then(|p| u8::try_from(p).ok())
            .filter(|p| *p <= 100),
        external_url: track
            .external_urls
            .as_ref()
            .and_then(|urls| non_blank(urls.spotify.as_deref()))
            .map(str::to_string),
        added_at,
    }
}

/// Top-track lists carry bare tracks with no timestamp
pub fn normalize_top_tracks(tracks: &[RawTrack]) -> Vec<TrackItem> {
    tracks.iter().map(|t| normalize_track(t, None)).collect()
}

/// Liked songs; entries without a track object are skipped
pub fn normalize_saved_tracks(items: &[RawSavedTrack]) -> Vec<TrackItem> {
    items
        .iter()
        .filter_map(|item| {
            let track = item.track.as_ref()?;
            Some(normalize_track(track, parse_timestamp(item.added_at.as_deref())))
        })
        .collect()
}

/// Recently played; the play time lands in `added_at`
pub fn normalize_play_history(items: &[RawPlayHistory]) -> Vec<TrackItem> {
    items
        .iter()
        .filter_map(|item| {
            let track = item.track.as_ref()?;
            Some(normalize_track(track, parse_timestamp(item.played_at.as_deref())))
        })
        .collect()
}

/// RFC 3339 timestamp, or `None` if absent or malformed
fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!(value = raw, error = %e, "Ignoring unparseable Spotify timestamp");
            None
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
