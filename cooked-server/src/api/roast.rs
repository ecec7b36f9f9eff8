//! Roast endpoint

use axum::{extract::State, routing::post, Json, Router};
use tracing::info;

use crate::cooldown::CooldownDecision;
use crate::error::{ApiError, ApiResult};
use crate::roast::RoastResult;
use crate::AppState;

/// POST /ai-roast
///
/// Roasts the cached snapshot. Order matters: the cooldown gate runs first,
/// then the snapshot check, and only a finished generation stamps the
/// cooldown. A fallback result is still a finished generation.
pub async fn ai_roast(State(state): State<AppState>) -> ApiResult<Json<RoastResult>> {
    let permit = match state.cooldown.try_acquire(&state.session).await {
        CooldownDecision::Allowed(permit) => permit,
        CooldownDecision::Rejected { remaining } => {
            return Err(ApiError::RateLimited { remaining });
        }
    };

    let snapshot = state.session.snapshot().await.ok_or_else(|| {
        ApiError::BadRequest("No Spotify data available for roasting".to_string())
    })?;

    let outcome = state.pipeline.generate(&snapshot).await;
    permit.record_success(state.clock.now()).await;

    info!(fallback = outcome.is_fallback(), "Roast served");
    Ok(Json(outcome.result))
}

/// Build roast routes
pub fn roast_routes() -> Router<AppState> {
    Router::new().route("/ai-roast", post(ai_roast))
}
