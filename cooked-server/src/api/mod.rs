//! HTTP API handlers for cooked-server
//!
//! Route groups are merged by [`build_router`](crate::build_router).

pub mod auth;
pub mod health;
pub mod roast;
pub mod spotify;

pub use auth::auth_routes;
pub use health::health_routes;
pub use roast::roast_routes;
pub use spotify::spotify_routes;
