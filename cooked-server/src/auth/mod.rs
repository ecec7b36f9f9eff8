//! Spotify authentication
//!
//! - [`oauth`]: authorize URL, code exchange, and refresh against Spotify Accounts
//! - [`lifecycle`]: proactive refresh of the session credential

pub mod lifecycle;
pub mod oauth;

pub use lifecycle::{RefreshOutcome, TokenLifecycleManager};
pub use oauth::{authorize_url, AuthError, SpotifyAccounts, TokenEndpoint, TokenGrant};
