//! cooked-server library interface
//!
//! Exposes the application state and router for the binary and for
//! integration tests.

pub mod api;
pub mod auth;
pub mod cooldown;
pub mod error;
pub mod roast;
pub mod session;
pub mod spotify;
pub mod utils;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use cooked_common::config::AppConfig;
use cooked_common::{Clock, SystemClock};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{SpotifyAccounts, TokenEndpoint, TokenLifecycleManager};
use crate::cooldown::RoastCooldown;
use crate::roast::{GeminiClient, GenerativeModel, RoastPipeline};
use crate::session::Session;
use crate::spotify::{MusicService, SnapshotAggregator, SpotifyClient};

/// External collaborators the service talks to
pub struct Upstream {
    pub tokens: Arc<dyn TokenEndpoint>,
    pub music: Arc<dyn MusicService>,
    pub model: Arc<dyn GenerativeModel>,
    pub clock: Arc<dyn Clock>,
}

impl Upstream {
    /// Real Spotify, Gemini and wall clock
    pub fn live(config: &AppConfig) -> cooked_common::Result<Self> {
        let accounts = SpotifyAccounts::new(config.spotify.clone()).map_err(|e| {
            cooked_common::Error::Internal(format!("Spotify accounts client: {}", e))
        })?;
        let music = SpotifyClient::new()
            .map_err(|e| cooked_common::Error::Internal(format!("Spotify API client: {}", e)))?;
        let model = GeminiClient::new(&config.gemini)
            .map_err(|e| cooked_common::Error::Internal(format!("Gemini client: {}", e)))?;

        Ok(Self {
            tokens: Arc::new(accounts),
            music: Arc::new(music),
            model: Arc::new(model),
            clock: Arc::new(SystemClock),
        })
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// The single listening session this process serves
    pub session: Session,
    pub clock: Arc<dyn Clock>,
    pub tokens: Arc<TokenLifecycleManager>,
    pub aggregator: Arc<SnapshotAggregator>,
    pub pipeline: Arc<RoastPipeline>,
    pub cooldown: Arc<RoastCooldown>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: AppConfig, upstream: Upstream) -> Self {
        let Upstream {
            tokens,
            music,
            model,
            clock,
        } = upstream;

        Self {
            session: Session::new(),
            tokens: Arc::new(TokenLifecycleManager::new(tokens, Arc::clone(&clock))),
            aggregator: Arc::new(SnapshotAggregator::new(music)),
            pipeline: Arc::new(RoastPipeline::new(model, &config.gemini)),
            cooldown: Arc::new(RoastCooldown::new(Arc::clone(&clock))),
            startup_time: clock.now(),
            clock,
            config: Arc::new(config),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::auth_routes())
        .merge(api::spotify_routes())
        .merge(api::roast_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
