//! Test Helper Utilities
//!
//! In-process fakes for the three upstreams plus a router wired to them and
//! to a manually driven clock.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use cooked_common::config::{AppConfig, GeminiConfig, SpotifyConfig};
use cooked_common::ManualClock;
use cooked_server::auth::{AuthError, TokenEndpoint, TokenGrant};
use cooked_server::roast::{GenerativeModel, ModelError};
use cooked_server::spotify::client::{
    RawArtist, RawPlayHistory, RawSavedTrack, RawTrack,
};
use cooked_server::spotify::{MusicService, SpotifyError, TimeRange};
use cooked_server::{build_router, AppState, Upstream};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::util::ServiceExt;

/// Token endpoint that accepts any code except "bad"
#[derive(Default)]
pub struct FakeAccounts {
    pub refresh_calls: AtomicUsize,
}

#[async_trait]
impl TokenEndpoint for FakeAccounts {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, AuthError> {
        if code == "bad" {
            return Err(AuthError::Rejected {
                operation: "Token exchange",
                status: 400,
                detail: "invalid_grant".to_string(),
            });
        }
        Ok(TokenGrant {
            access_token: format!("access-{}", code),
            refresh_token: Some("refresh".to_string()),
            expires_in: Some(3600),
        })
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<TokenGrant, AuthError> {
        let n = self.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(TokenGrant {
            access_token: format!("refreshed-{}", n),
            refresh_token: None,
            expires_in: Some(3600),
        })
    }
}

/// Music service returning one track per list; can be switched to fail
#[derive(Default)]
pub struct FakeMusic {
    pub fail_liked: AtomicBool,
    pub tokens_seen: Mutex<Vec<String>>,
}

pub fn raw_track(name: &str, artist: &str) -> RawTrack {
    RawTrack {
        name: Some(name.to_string()),
        artists: Some(vec![RawArtist {
            name: Some(artist.to_string()),
        }]),
        popularity: Some(70),
        ..Default::default()
    }
}

#[async_trait]
impl MusicService for FakeMusic {
    async fn top_tracks(
        &self,
        access_token: &str,
        range: TimeRange,
        _limit: Option<u32>,
    ) -> Result<Vec<RawTrack>, SpotifyError> {
        self.tokens_seen.lock().unwrap().push(access_token.to_string());
        let name = match range {
            TimeRange::ShortTerm => "Recent Obsession",
            _ => "All Time Favourite",
        };
        Ok(vec![raw_track(name, "Some Band")])
    }

    async fn saved_tracks(&self, _: &str) -> Result<Vec<RawSavedTrack>, SpotifyError> {
        if self.fail_liked.load(Ordering::SeqCst) {
            return Err(SpotifyError::ApiError(500, "server error".to_string()));
        }
        Ok(vec![RawSavedTrack {
            added_at: Some("2024-03-01T12:00:00Z".to_string()),
            track: Some(raw_track("Liked Song", "Other Band")),
        }])
    }

    async fn recently_played(&self, _: &str) -> Result<Vec<RawPlayHistory>, SpotifyError> {
        Ok(vec![RawPlayHistory {
            played_at: Some("2024-03-02T08:30:00Z".to_string()),
            track: Some(raw_track("Last Night", "Night Band")),
        }])
    }
}

/// Model that answers every prompt with the same text
pub struct FakeModel {
    pub reply: Mutex<String>,
    pub calls: AtomicUsize,
}

impl FakeModel {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Mutex::new(reply.into()),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl GenerativeModel for FakeModel {
    async fn generate(&self, _prompt: &str) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.lock().unwrap().clone())
    }
}

/// Known-good model output
pub fn roast_fixture() -> Value {
    json!({
        "roast_paragraph": "You have listened to the same breakup album enough times to owe it rent.",
        "scores": { "uniqueness": 6, "emotional_damage": 9, "cringe_factor": 5, "overall_taste": 7 },
        "fun_cooked_points": ["Cries on schedule", "Shuffle never helps", "Owns a 'vibes' playlist"],
        "fun_facts": ["Mostly minor keys", "One polka, unexplained", "Peak listening at 2am"],
        "main_character_energy": { "type": "Window Seat Narrator", "description": "Every bus ride is a music video" },
        "era_analysis": { "mentally_stuck_in": "2012", "description": "Skinny jeans still in rotation" },
        "music_personality": { "label": "Replay Loyalist", "behavior": "Finds a song and never lets go" },
        "spotify_algorithm_opinion": { "thoughts": "It has given up recommending anything new" },
        "listener_warnings": ["Aux at your own risk", "Ballads incoming", "Will sing along"],
        "fake_music_stats": { "sad_song_percentage": 78, "repeat_song_tendency": 92, "late_night_listening_score": 85 },
        "most_overplayed_song_roast": { "summary": "That song is tired of you" },
        "song_based_observations": {
            "top_tracks_summary": "Consistent",
            "liked_songs_summary": "Chaotic",
            "recently_played_summary": "Nostalgic",
            "most_heard_songs_summary": "Repetitive"
        }
    })
}

pub fn test_config() -> AppConfig {
    AppConfig {
        spotify: SpotifyConfig {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            redirect_url: "http://127.0.0.1:3000/callback".to_string(),
        },
        gemini: GeminiConfig {
            api_key: "test-key".to_string(),
            model: "gemini-2.5-flash".to_string(),
            timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(2),
            max_attempts: 1,
        },
        port: 3000,
        frontend_url: "http://localhost:5173/after-login".to_string(),
    }
}

/// Router plus handles to every fake behind it
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub clock: Arc<ManualClock>,
    pub accounts: Arc<FakeAccounts>,
    pub music: Arc<FakeMusic>,
    pub model: Arc<FakeModel>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_model(FakeModel::replying(roast_fixture().to_string()))
    }

    pub fn with_model(model: FakeModel) -> Self {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let accounts = Arc::new(FakeAccounts::default());
        let music = Arc::new(FakeMusic::default());
        let model = Arc::new(model);

        let state = AppState::new(
            test_config(),
            Upstream {
                tokens: accounts.clone(),
                music: music.clone(),
                model: model.clone(),
                clock: clock.clone(),
            },
        );

        Self {
            router: build_router(state.clone()),
            state,
            clock,
            accounts,
            music,
            model,
        }
    }

    pub async fn send(&self, method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    pub async fn send_json(&self, method: &str, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.send(method, uri).await;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, value)
    }

    /// GET that also returns the `Location` header
    pub async fn get_redirect(&self, uri: &str) -> (StatusCode, Option<String>) {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        (response.status(), location)
    }

    /// Complete the OAuth callback with a good code
    pub async fn login(&self) {
        let (status, _) = self.send("GET", "/callback?code=good").await;
        assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    }

    /// Log in and cache a snapshot
    pub async fn login_and_fetch(&self) {
        self.login().await;
        let (status, _) = self.send("GET", "/spotify/all-data").await;
        assert_eq!(status, StatusCode::OK);
    }
}
