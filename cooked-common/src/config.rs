//! Configuration loading
//!
//! Settings resolve with **Environment → TOML → default** priority. The
//! environment is seeded from a `.env` file (if present) before resolution.
//! Secrets have no default; a missing or blank secret fails startup.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Default listening port
pub const DEFAULT_PORT: u16 = 3000;
/// Where the browser lands after a successful login
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173/after-login";
/// Default generative model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
/// Default end-to-end timeout for one roast generation (seconds)
pub const DEFAULT_ROAST_TIMEOUT_SECS: u64 = 60;
/// Default timeout for a single model request (seconds)
pub const DEFAULT_ROAST_REQUEST_TIMEOUT_SECS: u64 = 20;
/// Default number of model attempts per roast
pub const DEFAULT_ROAST_MAX_ATTEMPTS: u32 = 5;

/// Environment variable naming an explicit TOML config file
pub const CONFIG_PATH_ENV: &str = "COOKED_CONFIG";

/// On-disk TOML configuration; every field is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    pub spotify_redirect_url: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub port: Option<u16>,
    pub frontend_url: Option<String>,
    pub roast_timeout_secs: Option<u64>,
    pub roast_request_timeout_secs: Option<u64>,
    pub roast_max_attempts: Option<u32>,
}

/// Spotify application credentials
#[derive(Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

impl std::fmt::Debug for SpotifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_url", &self.redirect_url)
            .finish()
    }
}

/// Generative model settings
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    /// End-to-end budget for one roast, retries included
    pub timeout: Duration,
    /// Transport timeout for one model request; always below `timeout`
    pub request_timeout: Duration,
    pub max_attempts: u32,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("request_timeout", &self.request_timeout)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub spotify: SpotifyConfig,
    pub gemini: GeminiConfig,
    pub port: u16,
    pub frontend_url: String,
}

impl AppConfig {
    /// Load configuration from `.env`, the process environment, and TOML.
    ///
    /// `config_path` overrides the TOML location; otherwise `COOKED_CONFIG`
    /// and then the platform default (`<config_dir>/cooked/cooked.toml`) are
    /// consulted. An explicit path that does not exist is an error; a missing
    /// default file is not.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => warn!("Ignoring unreadable .env file: {}", e),
        }

        let explicit = config_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from));

        let toml_config = match explicit {
            Some(path) => load_toml_config(&path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => load_toml_config(&path)?,
                _ => TomlConfig::default(),
            },
        };

        Self::resolve(&toml_config, |name| std::env::var(name).ok())
    }

    /// Resolve settings from an environment lookup and a parsed TOML file
    pub fn resolve<F>(toml_config: &TomlConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let spotify = SpotifyConfig {
            client_id: required(
                "SPOTIFY_CLIENT_ID",
                "spotify_client_id",
                &env,
                toml_config.spotify_client_id.as_deref(),
            )?,
            client_secret: required(
                "SPOTIFY_CLIENT_SECRET",
                "spotify_client_secret",
                &env,
                toml_config.spotify_client_secret.as_deref(),
            )?,
            redirect_url: required(
                "SPOTIFY_REDIRECT_URL",
                "spotify_redirect_url",
                &env,
                toml_config.spotify_redirect_url.as_deref(),
            )?,
        };

        let timeout_secs = resolve_parsed(
            "COOKED_ROAST_TIMEOUT_SECS",
            "roast_timeout_secs",
            &env,
            toml_config.roast_timeout_secs,
        )?
        .unwrap_or(DEFAULT_ROAST_TIMEOUT_SECS);

        let request_timeout_secs = resolve_parsed(
            "COOKED_ROAST_REQUEST_TIMEOUT_SECS",
            "roast_request_timeout_secs",
            &env,
            toml_config.roast_request_timeout_secs,
        )?;

        let max_attempts = resolve_parsed(
            "COOKED_ROAST_MAX_ATTEMPTS",
            "roast_max_attempts",
            &env,
            toml_config.roast_max_attempts,
        )?
        .unwrap_or(DEFAULT_ROAST_MAX_ATTEMPTS);

        if max_attempts == 0 {
            return Err(Error::Config(
                "roast_max_attempts must be at least 1".to_string(),
            ));
        }

        let request_timeout = per_request_timeout(timeout_secs, request_timeout_secs)?;

        let gemini = GeminiConfig {
            api_key: required(
                "GEMINI_API_KEY",
                "gemini_api_key",
                &env,
                toml_config.gemini_api_key.as_deref(),
            )?,
            model: optional(
                "COOKED_GEMINI_MODEL",
                "gemini_model",
                &env,
                toml_config.gemini_model.as_deref(),
            )
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            request_timeout,
            max_attempts,
        };

        let port = resolve_parsed("PORT", "port", &env, toml_config.port)?.unwrap_or(DEFAULT_PORT);

        let frontend_url = optional(
            "COOKED_FRONTEND_URL",
            "frontend_url",
            &env,
            toml_config.frontend_url.as_deref(),
        )
        .unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string());

        Ok(Self {
            spotify,
            gemini,
            port,
            frontend_url,
        })
    }
}

/// Per-request model timeout. An explicit value must leave room for a retry
/// inside the overall budget; the default shrinks to half a short budget.
fn per_request_timeout(timeout_secs: u64, configured: Option<u64>) -> Result<Duration> {
    let timeout = Duration::from_secs(timeout_secs);
    match configured {
        Some(secs) if secs == 0 || secs >= timeout_secs => Err(Error::Config(format!(
            "roast_request_timeout_secs ({}) must be between 1 and roast_timeout_secs ({}) exclusive",
            secs, timeout_secs
        ))),
        Some(secs) => Ok(Duration::from_secs(secs)),
        None => Ok(Duration::from_secs(DEFAULT_ROAST_REQUEST_TIMEOUT_SECS).min(timeout / 2)),
    }
}

/// Validate a string setting (non-empty, non-whitespace)
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Platform default TOML location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cooked").join("cooked.toml"))
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML {} failed: {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML {} failed: {}", path.display(), e)))?;
    info!("Configuration loaded from {}", path.display());
    Ok(config)
}

fn optional<F>(env_var: &str, toml_key: &str, env: &F, toml_value: Option<&str>) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let env_value = env(env_var).filter(|v| is_valid_value(v));
    let toml_value = toml_value.filter(|v| is_valid_value(v));

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} found in both environment ({}) and TOML ({}). Using environment (highest priority).",
            toml_key, env_var, toml_key
        );
    }

    env_value
        .map(|v| v.trim().to_string())
        .or_else(|| toml_value.map(|v| v.trim().to_string()))
}

fn required<F>(env_var: &str, toml_key: &str, env: &F, toml_value: Option<&str>) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional(env_var, toml_key, env, toml_value).ok_or_else(|| {
        Error::Config(format!(
            "{} not configured. Set environment variable {} (or add it to .env), \
             or set `{}` in the TOML config file",
            toml_key, env_var, toml_key
        ))
    })
}

fn resolve_parsed<T, F>(
    env_var: &str,
    toml_key: &str,
    env: &F,
    toml_value: Option<T>,
) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match env(env_var).filter(|v| is_valid_value(v)) {
        Some(raw) => {
            if toml_value.is_some() {
                warn!(
                    "{} found in both environment ({}) and TOML. Using environment (highest priority).",
                    toml_key, env_var
                );
            }
            raw.trim()
                .parse::<T>()
                .map(Some)
                .map_err(|e| Error::Config(format!("Invalid {} value {:?}: {}", env_var, raw, e)))
        }
        None => Ok(toml_value),
    }
}
