//! Session status report for the client

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use super::credential::{Credential, REFRESH_INTERVAL};

/// Hours a login is presented as valid for before the client should re-login
const LOGIN_WINDOW_HOURS: f64 = 24.0;

/// `GET /session-status` body. Logged-out sessions serialize as
/// `{"loggedIn": false}` only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes_since_login: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_refresh: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_hours: Option<f64>,
    /// Milliseconds until the next roast is allowed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roast_cooldown_remaining: Option<u64>,
}

impl SessionStatus {
    pub fn logged_out() -> Self {
        Self {
            logged_in: false,
            minutes_since_login: None,
            needs_refresh: None,
            expires_in_hours: None,
            roast_cooldown_remaining: None,
        }
    }

    /// Derive the status from the held credential and the roast cooldown
    pub fn compute(
        credential: Option<&Credential>,
        cooldown_remaining: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        let Some(credential) = credential else {
            return Self::logged_out();
        };

        let elapsed = credential.age(now);
        let elapsed_hours = elapsed.as_secs_f64() / 3600.0;

        Self {
            logged_in: true,
            minutes_since_login: Some(elapsed.as_secs() / 60),
            needs_refresh: Some(elapsed > REFRESH_INTERVAL),
            expires_in_hours: Some((LOGIN_WINDOW_HOURS - elapsed_hours).max(0.0)),
            roast_cooldown_remaining: Some(duration_millis(cooldown_remaining)),
        }
    }
}

pub(crate) fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
