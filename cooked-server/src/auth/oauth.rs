//! Spotify Accounts OAuth client
//!
//! Authorization-code flow with client-secret authentication: build the
//! authorize redirect, exchange the returned code, and refresh access tokens.

use async_trait::async_trait;
use cooked_common::config::SpotifyConfig;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const SPOTIFY_ACCOUNTS_BASE_URL: &str = "https://accounts.spotify.com";

/// Read access to library, play history, and top items
pub const SPOTIFY_SCOPES: &str = "user-library-read user-read-recently-played user-top-read";

/// OAuth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Token endpoint answered with a non-success status
    #[error("{operation} failed with status {status}: {detail}")]
    Rejected {
        operation: &'static str,
        status: u16,
        detail: String,
    },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Token response for code exchange carried no refresh token")]
    MissingRefreshToken,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Tokens issued by the accounts service
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    /// Absent on most refresh responses; present on code exchange
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Upstream token endpoint
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    /// Exchange an authorization code for tokens
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, AuthError>;

    /// Trade a refresh token for a new access token
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, AuthError>;
}

/// Build the browser redirect to the Spotify authorize page
pub fn authorize_url(config: &SpotifyConfig) -> Result<Url, AuthError> {
    authorize_url_with_base(SPOTIFY_ACCOUNTS_BASE_URL, config)
}

fn authorize_url_with_base(base_url: &str, config: &SpotifyConfig) -> Result<Url, AuthError> {
    Url::parse_with_params(
        &format!("{}/authorize", base_url),
        &[
            ("response_type", "code"),
            ("client_id", config.client_id.as_str()),
            ("scope", SPOTIFY_SCOPES),
            ("redirect_uri", config.redirect_url.as_str()),
        ],
    )
    .map_err(|e| AuthError::InvalidUrl(e.to_string()))
}

/// Live Spotify Accounts token client
pub struct SpotifyAccounts {
    config: SpotifyConfig,
    http_client: reqwest::Client,
    base_url: String,
}

impl SpotifyAccounts {
    pub fn new(config: SpotifyConfig) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
            base_url: SPOTIFY_ACCOUNTS_BASE_URL.to_string(),
        })
    }

    /// Point the client at another accounts root (mock servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn request_token(
        &self,
        operation: &'static str,
        form: &[(&str, &str)],
    ) -> Result<TokenGrant, AuthError> {
        let url = format!("{}/api/token", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(form)
            .send()
            .await
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected {
                operation,
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json::<TokenGrant>()
            .await
            .map_err(|e| AuthError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl TokenEndpoint for SpotifyAccounts {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, AuthError> {
        self.request_token(
            "Token exchange",
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_url.as_str()),
            ],
        )
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, AuthError> {
        self.request_token(
            "Token refresh",
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ],
        )
        .await
    }
}
