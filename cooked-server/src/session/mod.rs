//! Listening session state
//!
//! One [`Session`] holds everything tied to the logged-in listener: the OAuth
//! credential, the cached listening snapshot, and the last roast timestamp.
//! The handle is cheap to clone and is passed explicitly to every operation.
//!
//! Every mutation is a single write-lock assignment made after any awaited I/O
//! has completed; no lock is held across a network call.

pub mod credential;
pub mod status;

pub use credential::{Credential, CredentialStore, REFRESH_INTERVAL};
pub use status::SessionStatus;

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::spotify::Snapshot;

/// Identity generation. Bumped whenever a credential is set by login or
/// cleared by logout, never by a token refresh.
pub type Epoch = u64;

#[derive(Debug, Default)]
struct SessionState {
    credential: Option<Credential>,
    epoch: Epoch,
    last_roast_at: Option<DateTime<Utc>>,
    snapshot: Option<Arc<Snapshot>>,
}

/// Shared handle to the listening session
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Access to the credential slot
    pub fn credentials(&self) -> CredentialStore<'_> {
        CredentialStore::new(self)
    }

    /// Cached snapshot from the last successful aggregate, if any
    pub async fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.state.read().await.snapshot.clone()
    }

    /// Replace the cached snapshot if the identity that fetched it is still
    /// logged in. Returns `false` when the session moved on (logout or a new
    /// login) while the data was in flight.
    pub async fn commit_snapshot(&self, fetched_at_epoch: Epoch, snapshot: Arc<Snapshot>) -> bool {
        let mut state = self.state.write().await;
        if state.epoch != fetched_at_epoch || state.credential.is_none() {
            return false;
        }
        state.snapshot = Some(snapshot);
        true
    }

    /// When the last roast was generated
    pub async fn last_roast_at(&self) -> Option<DateTime<Utc>> {
        self.state.read().await.last_roast_at
    }

    /// Stamp the roast cooldown clock
    pub async fn stamp_roast(&self, at: DateTime<Utc>) {
        self.state.write().await.last_roast_at = Some(at);
    }

    /// Current credential together with the identity epoch it belongs to
    pub async fn credential_with_epoch(&self) -> Option<(Credential, Epoch)> {
        let state = self.state.read().await;
        state.credential.clone().map(|c| (c, state.epoch))
    }

    async fn set_credential(&self, credential: Credential) {
        let mut state = self.state.write().await;
        state.credential = Some(credential);
        state.epoch += 1;
        // New identity: cached listening data belongs to whoever was here before
        state.snapshot = None;
    }

    async fn clear_credential(&self) {
        let mut state = self.state.write().await;
        state.credential = None;
        state.snapshot = None;
        state.epoch += 1;
    }

    pub(crate) async fn replace_credential_if(&self, epoch: Epoch, credential: Credential) -> bool {
        let mut state = self.state.write().await;
        if state.epoch != epoch || state.credential.is_none() {
            return false;
        }
        state.credential = Some(credential);
        true
    }

    async fn credential(&self) -> Option<Credential> {
        self.state.read().await.credential.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential() -> Credential {
        Credential::new("access", "refresh", Utc::now())
    }

    #[tokio::test]
    async fn test_new_session_is_logged_out() {
        let session = Session::new();
        assert!(session.credentials().get().await.is_none());
        assert!(session.snapshot().await.is_none());
        assert!(session.last_roast_at().await.is_none());
    }

    #[tokio::test]
    async fn test_commit_snapshot_requires_same_identity() {
        let session = Session::new();
        session.credentials().set(credential()).await;
        let (_, epoch) = session.credential_with_epoch().await.unwrap();

        // Logout and log back in while the fetch was in flight
        session.credentials().clear().await;
        session.credentials().set(credential()).await;

        let committed = session
            .commit_snapshot(epoch, Arc::new(Snapshot::default()))
            .await;
        assert!(!committed);
        assert!(session.snapshot().await.is_none());
    }

    #[tokio::test]
    async fn test_commit_snapshot_for_current_identity() {
        let session = Session::new();
        session.credentials().set(credential()).await;
        let (_, epoch) = session.credential_with_epoch().await.unwrap();

        assert!(
            session
                .commit_snapshot(epoch, Arc::new(Snapshot::default()))
                .await
        );
        assert!(session.snapshot().await.is_some());
    }

    #[tokio::test]
    async fn test_login_discards_previous_snapshot() {
        let session = Session::new();
        session.credentials().set(credential()).await;
        let (_, epoch) = session.credential_with_epoch().await.unwrap();
        session
            .commit_snapshot(epoch, Arc::new(Snapshot::default()))
            .await;

        session.credentials().set(credential()).await;
        assert!(session.snapshot().await.is_none());
    }

    #[tokio::test]
    async fn test_stamp_roast() {
        let session = Session::new();
        let at = Utc::now();
        session.stamp_roast(at).await;
        assert_eq!(session.last_roast_at().await, Some(at));
    }
}
