//! Token lifecycle management
//!
//! Proactive refresh policy: a credential older than
//! [`REFRESH_INTERVAL`](crate::session::REFRESH_INTERVAL) is refreshed before
//! the next upstream call. Refresh failures are logged and swallowed; the stale
//! token stays in place and the data call that follows reports the failure.
//! The refresh clock is not reset on failure, so the next caller attempts the
//! refresh again.

use cooked_common::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::oauth::{AuthError, TokenEndpoint};
use crate::session::{Credential, Session, SessionStatus};

/// What [`TokenLifecycleManager::ensure_fresh`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// No credential held
    NotAuthenticated,
    /// Credential within the refresh interval; nothing to do
    Fresh,
    /// New access token stored and refresh clock reset
    Refreshed,
    /// Refresh call failed; stale credential left in place
    Failed,
    /// Session was logged out or replaced while the refresh was in flight
    Discarded,
}

/// Keeps the session credential fresh
pub struct TokenLifecycleManager {
    endpoint: Arc<dyn TokenEndpoint>,
    clock: Arc<dyn Clock>,
    /// Serialises refreshes so one stale credential causes one refresh call
    refresh_gate: Mutex<()>,
}

impl TokenLifecycleManager {
    pub fn new(endpoint: Arc<dyn TokenEndpoint>, clock: Arc<dyn Clock>) -> Self {
        Self {
            endpoint,
            clock,
            refresh_gate: Mutex::new(()),
        }
    }

    /// Refresh the session credential if it is older than the refresh interval.
    ///
    /// Never fails: the outcome is informational.
    pub async fn ensure_fresh(&self, session: &Session) -> RefreshOutcome {
        let _gate = self.refresh_gate.lock().await;

        // Read after taking the gate so a refresh that just finished is seen
        let Some((credential, epoch)) = session.credential_with_epoch().await else {
            return RefreshOutcome::NotAuthenticated;
        };

        let now = self.clock.now();
        if !credential.needs_refresh(now) {
            return RefreshOutcome::Fresh;
        }

        debug!(
            age_secs = credential.age(now).as_secs(),
            "Access token past refresh interval, refreshing"
        );

        let grant = match self.endpoint.refresh(&credential.refresh_token).await {
            Ok(grant) => grant,
            Err(e) => {
                warn!(error = %e, "Token refresh failed; keeping existing access token");
                return RefreshOutcome::Failed;
            }
        };

        let rotated = grant.refresh_token.is_some();
        let updated = Credential {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token.unwrap_or(credential.refresh_token),
            issued_at: now,
        };

        if !session.replace_credential_if(epoch, updated).await {
            debug!("Session changed during token refresh; discarding refreshed token");
            return RefreshOutcome::Discarded;
        }

        info!(refresh_token_rotated = rotated, "Spotify access token refreshed");
        RefreshOutcome::Refreshed
    }

    /// Login age and refresh state, with the roast cooldown folded in
    pub async fn status(&self, session: &Session, cooldown_remaining: Duration) -> SessionStatus {
        let credential = session.credentials().get().await;
        SessionStatus::compute(credential.as_ref(), cooldown_remaining, self.clock.now())
    }

    /// Complete login: exchange an authorization code and store the credential
    pub async fn exchange_code(&self, session: &Session, code: &str) -> Result<(), AuthError> {
        let grant = self.endpoint.exchange_code(code).await?;
        let refresh_token = grant.refresh_token.ok_or(AuthError::MissingRefreshToken)?;

        session
            .credentials()
            .set(Credential::new(grant.access_token, refresh_token, self.clock.now()))
            .await;

        info!(expires_in = ?grant.expires_in, "Spotify login completed");
        Ok(())
    }
}
