//! Spotify Web API integration
//!
//! - [`client`]: upstream HTTP client behind the [`MusicService`] trait
//! - [`normalize`]: one mapping from every upstream track shape to [`TrackItem`]
//! - [`aggregator`]: concurrent fan-out of the four listening-history calls

pub mod aggregator;
pub mod client;
pub mod model;
pub mod normalize;

pub use aggregator::{AggregateError, SnapshotAggregator};
pub use client::{MusicService, SpotifyClient, SpotifyError, TimeRange};
pub use model::{Snapshot, TrackItem};
