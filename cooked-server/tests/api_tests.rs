//! Integration tests for the cooked-server HTTP API

mod helpers;

use axum::http::StatusCode;
use chrono::Duration as ChronoDuration;
use cooked_common::Clock;
use cooked_server::roast::{fallback_roast, RoastResult};
use helpers::{roast_fixture, FakeModel, TestApp};
use std::sync::atomic::Ordering;

#[tokio::test]
async fn test_root_and_health() {
    let app = TestApp::new();

    let (status, body) = app.send("GET", "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"Backend is running!");

    let (status, json) = app.send_json("GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "cooked-server");
}

#[tokio::test]
async fn test_login_redirects_to_spotify() {
    let app = TestApp::new();

    let (status, location) = app.get_redirect("/login").await;

    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    let location = location.expect("location header");
    assert!(location.starts_with("https://accounts.spotify.com/authorize?"));
    assert!(location.contains("client_id=test-client"));
    assert!(location.contains("response_type=code"));
}

#[tokio::test]
async fn test_callback_without_code_is_bad_request() {
    let app = TestApp::new();

    let (status, json) = app.send_json("GET", "/callback").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
    assert!(app.state.session.credentials().get().await.is_none());
}

#[tokio::test]
async fn test_callback_exchange_failure_is_server_error() {
    let app = TestApp::new();

    let (status, json) = app.send_json("GET", "/callback?code=bad").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "UPSTREAM_ERROR");
    assert!(app.state.session.credentials().get().await.is_none());
}

#[tokio::test]
async fn test_callback_redirects_to_frontend() {
    let app = TestApp::new();

    let (status, location) = app.get_redirect("/callback?code=abc").await;

    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location.as_deref(), Some("http://localhost:5173/after-login"));

    let credential = app.state.session.credentials().get().await.unwrap();
    assert_eq!(credential.access_token, "access-abc");
}

#[tokio::test]
async fn test_session_status_logged_out() {
    let app = TestApp::new();

    let (status, json) = app.send_json("GET", "/session-status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({ "loggedIn": false }));
}

#[tokio::test]
async fn test_session_status_after_login() {
    let app = TestApp::new();
    app.login().await;
    app.clock.advance(ChronoDuration::minutes(90));

    let (_, json) = app.send_json("GET", "/session-status").await;

    assert_eq!(json["loggedIn"], true);
    assert_eq!(json["minutesSinceLogin"], 90);
    assert_eq!(json["needsRefresh"], true);
    assert_eq!(json["expiresInHours"], 22.5);
    assert_eq!(json["roastCooldownRemaining"], 0);
}

#[tokio::test]
async fn test_after_login_reports_state() {
    let app = TestApp::new();

    let (_, json) = app.send_json("GET", "/after-login").await;
    assert_eq!(json["loggedIn"], false);

    app.login().await;
    let (_, json) = app.send_json("GET", "/after-login").await;
    assert_eq!(json["loggedIn"], true);
    assert_eq!(json["message"], "Spotify login successful!");
}

#[tokio::test]
async fn test_all_data_requires_login() {
    let app = TestApp::new();

    let (status, json) = app.send_json("GET", "/spotify/all-data").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "NOT_AUTHENTICATED");
}

#[tokio::test]
async fn test_all_data_returns_and_caches_snapshot() {
    let app = TestApp::new();
    app.login().await;

    let (status, json) = app.send_json("GET", "/spotify/all-data").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["top_tracks"][0]["name"], "All Time Favourite");
    assert_eq!(json["most_heard"][0]["name"], "Recent Obsession");
    assert_eq!(json["liked_songs"][0]["added_at"], "2024-03-01T12:00:00Z");
    assert_eq!(json["recently_played"][0]["artist"], "Night Band");
    assert_eq!(json["top_tracks"][0]["spotifyUrl"], serde_json::Value::Null);

    let cached = app.state.session.snapshot().await.unwrap();
    assert_eq!(serde_json::to_value(&*cached).unwrap(), json);
}

#[tokio::test]
async fn test_all_data_refreshes_stale_token_first() {
    let app = TestApp::new();
    app.login().await;
    app.clock.advance(ChronoDuration::minutes(61));

    let (status, _) = app.send_json("GET", "/spotify/all-data").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.accounts.refresh_calls.load(Ordering::SeqCst), 1);
    let seen = app.music.tokens_seen.lock().unwrap().clone();
    assert!(seen.iter().all(|t| t == "refreshed-1"));
}

#[tokio::test]
async fn test_all_data_failure_keeps_cached_snapshot() {
    let app = TestApp::new();
    app.login_and_fetch().await;
    let before = app.state.session.snapshot().await;

    app.music.fail_liked.store(true, Ordering::SeqCst);
    let (status, json) = app.send_json("GET", "/spotify/all-data").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "UPSTREAM_ERROR");
    assert_eq!(app.state.session.snapshot().await, before);
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = TestApp::new();
    app.login_and_fetch().await;

    let (status, json) = app.send_json("POST", "/logout").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Logged out successfully");

    assert!(app.state.session.snapshot().await.is_none());
    let (status, _) = app.send_json("GET", "/spotify/all-data").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_roast_without_snapshot_is_bad_request() {
    let app = TestApp::new();
    app.login().await;

    let (status, _) = app.send_json("POST", "/ai-roast").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.model.calls.load(Ordering::SeqCst), 0);
    // A rejected request does not start the cooldown
    assert!(app.state.session.last_roast_at().await.is_none());
}

#[tokio::test]
async fn test_roast_returns_model_result() {
    let app = TestApp::new();
    app.login_and_fetch().await;

    let (status, json) = app.send_json("POST", "/ai-roast").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, roast_fixture());
    let expected: RoastResult = serde_json::from_value(roast_fixture()).unwrap();
    let actual: RoastResult = serde_json::from_value(json).unwrap();
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_roast_malformed_model_output_serves_fallback() {
    let app = TestApp::with_model(FakeModel::replying("```json\n{ not json at all\n```"));
    app.login_and_fetch().await;

    let (status, json) = app.send_json("POST", "/ai-roast").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::to_value(fallback_roast()).unwrap());
    // Fallback still consumes the cooldown
    assert_eq!(app.state.session.last_roast_at().await, Some(app.clock.now()));
}

#[tokio::test]
async fn test_second_roast_within_window_is_rate_limited() {
    let app = TestApp::new();
    app.login_and_fetch().await;

    let (status, _) = app.send_json("POST", "/ai-roast").await;
    assert_eq!(status, StatusCode::OK);

    app.clock.advance(ChronoDuration::minutes(2));
    let (status, json) = app.send_json("POST", "/ai-roast").await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    let remaining = json["cooldownRemaining"].as_u64().unwrap();
    assert!(remaining > 0 && remaining <= 300_000);
    assert_eq!(remaining, 180_000);
    assert_eq!(json["error"], "You are roasting too fast! Chill for 180 seconds.");
    assert_eq!(app.model.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_roast_allowed_after_window() {
    let app = TestApp::new();
    app.login_and_fetch().await;

    app.send_json("POST", "/ai-roast").await;
    app.clock.advance(ChronoDuration::minutes(5) + ChronoDuration::seconds(1));

    let (status, _) = app.send_json("POST", "/ai-roast").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.model.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_cooldown_survives_logout() {
    let app = TestApp::new();
    app.login_and_fetch().await;
    app.send_json("POST", "/ai-roast").await;

    app.send_json("POST", "/logout").await;
    app.login_and_fetch().await;

    let (status, _) = app.send_json("POST", "/ai-roast").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    let (_, json) = app.send_json("GET", "/session-status").await;
    assert_eq!(json["roastCooldownRemaining"], 300_000);
}
