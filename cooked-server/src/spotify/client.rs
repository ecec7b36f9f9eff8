//! Spotify Web API client
//!
//! Only the three read endpoints the snapshot needs. Every field of the
//! upstream payload is optional here; shaping into [`TrackItem`] happens in
//! [`super::normalize`].
//!
//! [`TrackItem`]: super::TrackItem

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const SPOTIFY_API_BASE_URL: &str = "https://api.spotify.com/v1";

/// Spotify client errors
#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Access token rejected by Spotify")]
    Unauthorized,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Window for the "top items" endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    /// Roughly the last four weeks
    ShortTerm,
    /// Several years of history
    LongTerm,
}

impl TimeRange {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

/// Paging wrapper; a missing `items` array reads as empty
#[derive(Debug, Deserialize)]
struct Paging<T> {
    #[serde(default = "Option::default")]
    items: Option<Vec<T>>,
}

impl<T> Paging<T> {
    fn into_items(self) -> Vec<T> {
        self.items.unwrap_or_default()
    }
}

/// Track object as returned by Spotify
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTrack {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Option<Vec<RawArtist>>,
    #[serde(default)]
    pub album: Option<RawAlbum>,
    #[serde(default)]
    pub popularity: Option<i64>,
    #[serde(default)]
    pub external_urls: Option<RawExternalUrls>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArtist {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAlbum {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<RawImage>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawImage {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

/// Saved track (`/me/tracks` item)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSavedTrack {
    #[serde(default)]
    pub added_at: Option<String>,
    #[serde(default)]
    pub track: Option<RawTrack>,
}

/// Play history entry (`/me/player/recently-played` item)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlayHistory {
    #[serde(default)]
    pub played_at: Option<String>,
    #[serde(default)]
    pub track: Option<RawTrack>,
}

/// Listening-history source
#[async_trait]
pub trait MusicService: Send + Sync {
    /// User's top tracks over `range`; `limit` falls back to the service default
    async fn top_tracks(
        &self,
        access_token: &str,
        range: TimeRange,
        limit: Option<u32>,
    ) -> Result<Vec<RawTrack>, SpotifyError>;

    /// Tracks saved to the user's library
    async fn saved_tracks(&self, access_token: &str) -> Result<Vec<RawSavedTrack>, SpotifyError>;

    /// Recently played tracks
    async fn recently_played(&self, access_token: &str)
        -> Result<Vec<RawPlayHistory>, SpotifyError>;
}

/// Live Spotify Web API client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl SpotifyClient {
    pub fn new() -> Result<Self, SpotifyError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| SpotifyError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: SPOTIFY_API_BASE_URL.to_string(),
        })
    }

    /// Point the client at another API root (mock servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get_paged<T: DeserializeOwned>(
        &self,
        access_token: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, SpotifyError> {
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!(url = %url, "Querying Spotify API");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| SpotifyError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(SpotifyError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SpotifyError::RateLimitExceeded);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SpotifyError::ApiError(status.as_u16(), error_text));
        }

        let page: Paging<T> = response
            .json()
            .await
            .map_err(|e| SpotifyError::ParseError(e.to_string()))?;

        Ok(page.into_items())
    }
}

#[async_trait]
impl MusicService for SpotifyClient {
    async fn top_tracks(
        &self,
        access_token: &str,
        range: TimeRange,
        limit: Option<u32>,
    ) -> Result<Vec<RawTrack>, SpotifyError> {
        let mut query = vec![("time_range", range.as_str().to_string())];
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        self.get_paged(access_token, "/me/top/tracks", &query).await
    }

    async fn saved_tracks(&self, access_token: &str) -> Result<Vec<RawSavedTrack>, SpotifyError> {
        self.get_paged(access_token, "/me/tracks", &[]).await
    }

    async fn recently_played(
        &self,
        access_token: &str,
    ) -> Result<Vec<RawPlayHistory>, SpotifyError> {
        self.get_paged(access_token, "/me/player/recently-played", &[])
            .await
    }
}
