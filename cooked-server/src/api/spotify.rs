//! Listening data endpoint

use axum::{extract::State, routing::get, Json, Router};
use tracing::debug;

use crate::auth::RefreshOutcome;
use crate::error::{ApiError, ApiResult};
use crate::spotify::Snapshot;
use crate::AppState;

/// GET /spotify/all-data
///
/// Refreshes the access token if it is due, fetches all four lists
/// concurrently, caches the result for roasting and returns it.
pub async fn all_data(State(state): State<AppState>) -> ApiResult<Json<Snapshot>> {
    let outcome = state.tokens.ensure_fresh(&state.session).await;
    if outcome == RefreshOutcome::NotAuthenticated {
        return Err(ApiError::NotAuthenticated);
    }
    debug!(?outcome, "Token check before snapshot fetch");

    let snapshot = state.aggregator.refresh(&state.session).await?;
    Ok(Json(Snapshot::clone(&snapshot)))
}

/// Build Spotify data routes
pub fn spotify_routes() -> Router<AppState> {
    Router::new().route("/spotify/all-data", get(all_data))
}
