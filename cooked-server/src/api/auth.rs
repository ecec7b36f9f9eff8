//! Login, callback, session status and logout

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::auth::authorize_url;
use crate::error::{ApiError, ApiResult};
use crate::session::SessionStatus;
use crate::AppState;

/// Query parameters Spotify appends to the redirect URI
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    /// Set when the user declined access
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AfterLoginResponse {
    pub logged_in: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /login
///
/// Redirects the browser to the Spotify authorize page.
pub async fn login(State(state): State<AppState>) -> ApiResult<Redirect> {
    let url = authorize_url(&state.config.spotify)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!(redirect_uri = %state.config.spotify.redirect_url, "Redirecting to Spotify authorize");
    Ok(Redirect::temporary(url.as_str()))
}

/// GET /callback
///
/// Exchanges the authorization code and sends the browser on to the frontend.
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> ApiResult<Redirect> {
    if let Some(reason) = params.error {
        warn!(reason = %reason, "Spotify authorization declined");
        return Err(ApiError::BadRequest(format!("Authorization failed: {}", reason)));
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No authorization code in callback".to_string()))?;

    state
        .tokens
        .exchange_code(&state.session, &code)
        .await
        .map_err(|e| {
            error!(error = %e, "Token exchange failed");
            ApiError::from(e)
        })?;

    Ok(Redirect::temporary(&state.config.frontend_url))
}

/// GET /session-status
pub async fn session_status(State(state): State<AppState>) -> Json<SessionStatus> {
    let remaining = state.cooldown.remaining_cooldown(&state.session).await;
    Json(state.tokens.status(&state.session, remaining).await)
}

/// GET /after-login
pub async fn after_login(State(state): State<AppState>) -> Json<AfterLoginResponse> {
    let logged_in = state.session.credentials().get().await.is_some();
    let message = if logged_in {
        "Spotify login successful!"
    } else {
        "Not logged in yet"
    };

    Json(AfterLoginResponse {
        logged_in,
        message: message.to_string(),
    })
}

/// POST /logout
///
/// Drops the credential and cached snapshot. The roast cooldown survives.
pub async fn logout(State(state): State<AppState>) -> Json<MessageResponse> {
    state.session.credentials().clear().await;
    info!("User logged out, session cleared");

    Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    })
}

/// Build auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login))
        .route("/callback", get(callback))
        .route("/session-status", get(session_status))
        .route("/after-login", get(after_login))
        .route("/logout", post(logout))
}
