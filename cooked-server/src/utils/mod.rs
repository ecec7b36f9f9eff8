//! Utility modules for cooked-server

pub mod retry;

pub use retry::{retry_with_backoff, RetryPolicy};
