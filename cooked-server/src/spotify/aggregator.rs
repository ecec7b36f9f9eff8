//! Listening snapshot aggregation
//!
//! Four independent upstream reads run concurrently and are joined with
//! all-or-nothing semantics: one failure fails the whole refresh and the
//! previously cached snapshot stays in place.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::client::{MusicService, SpotifyError, TimeRange};
use super::model::Snapshot;
use super::normalize::{normalize_play_history, normalize_saved_tracks, normalize_top_tracks};
use crate::session::Session;

/// Page size for the short-term ("most heard") list
const MOST_HEARD_LIMIT: u32 = 20;

/// Aggregate refresh errors
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Fetching {list} failed: {source}")]
    Fetch {
        list: &'static str,
        #[source]
        source: SpotifyError,
    },

    /// Logout or re-login happened while the fetch was in flight
    #[error("Session changed while fetching listening data")]
    SessionChanged,
}

fn tag(list: &'static str) -> impl FnOnce(SpotifyError) -> AggregateError {
    move |source| AggregateError::Fetch { list, source }
}

/// Builds and caches the listening [`Snapshot`]
pub struct SnapshotAggregator {
    music: Arc<dyn MusicService>,
}

impl SnapshotAggregator {
    pub fn new(music: Arc<dyn MusicService>) -> Self {
        Self { music }
    }

    /// Fetch all four lists with the session's current access token and
    /// replace the cached snapshot.
    pub async fn refresh(&self, session: &Session) -> Result<Arc<Snapshot>, AggregateError> {
        let (credential, epoch) = session
            .credential_with_epoch()
            .await
            .ok_or(AggregateError::NotAuthenticated)?;
        let token = credential.access_token.as_str();

        debug!("Fetching listening snapshot (4 concurrent requests)");

        let (top, liked, recent, most_heard) = tokio::try_join!(
            async {
                self.music
                    .top_tracks(token, TimeRange::LongTerm, None)
                    .await
                    .map_err(tag("top_tracks"))
            },
            async { self.music.saved_tracks(token).await.map_err(tag("liked_songs")) },
            async {
                self.music
                    .recently_played(token)
                    .await
                    .map_err(tag("recently_played"))
            },
            async {
                self.music
                    .top_tracks(token, TimeRange::ShortTerm, Some(MOST_HEARD_LIMIT))
                    .await
                    .map_err(tag("most_heard"))
            },
        )
        .map_err(|e| {
            warn!(error = %e, "Listening snapshot refresh failed; keeping previous cache");
            e
        })?;

        let snapshot = Arc::new(Snapshot {
            top_tracks: normalize_top_tracks(&top),
            liked_songs: normalize_saved_tracks(&liked),
            recently_played: normalize_play_history(&recent),
            most_heard: normalize_top_tracks(&most_heard),
        });

        if !session.commit_snapshot(epoch, Arc::clone(&snapshot)).await {
            warn!("Session changed during snapshot refresh; discarding fetched data");
            return Err(AggregateError::SessionChanged);
        }

        info!(
            top_tracks = snapshot.top_tracks.len(),
            liked_songs = snapshot.liked_songs.len(),
            recently_played = snapshot.recently_played.len(),
            most_heard = snapshot.most_heard.len(),
            "Listening snapshot refreshed"
        );

        Ok(snapshot)
    }
}
