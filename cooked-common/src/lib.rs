//! # COOKED Common Library
//!
//! Shared code for the COOKED service crates:
//! - Error and result types
//! - Configuration loading (environment, `.env`, TOML)
//! - Clock abstraction for time-dependent session logic

pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
pub use time::{Clock, ManualClock, SystemClock};
