//! OAuth credential storage
//!
//! [`CredentialStore`] is pure storage: it never validates or refreshes.
//! Freshness decisions live in [`crate::auth::TokenLifecycleManager`].

use chrono::{DateTime, Utc};
use std::time::Duration;

use super::Session;

/// Age after which a credential is proactively refreshed (1 hour)
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Access/refresh token pair and the instant the access token was issued
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
    /// Start of the proactive refresh window
    pub issued_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            issued_at,
        }
    }

    /// Time since the access token was issued (zero if `now` precedes it)
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        cooked_common::time::elapsed_between(self.issued_at, now)
    }

    /// Strictly older than [`REFRESH_INTERVAL`]
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.age(now) > REFRESH_INTERVAL
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

/// View over the session's credential slot
pub struct CredentialStore<'a> {
    session: &'a Session,
}

impl<'a> CredentialStore<'a> {
    pub(super) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Store a credential for a freshly logged-in identity
    pub async fn set(&self, credential: Credential) {
        self.session.set_credential(credential).await;
    }

    pub async fn get(&self) -> Option<Credential> {
        self.session.credential().await
    }

    /// Forget the credential. Also discards the cached snapshot, which belongs
    /// to the identity being logged out.
    pub async fn clear(&self) {
        self.session.clear_credential().await;
    }
}
