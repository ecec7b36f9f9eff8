//! AI roast generation
//!
//! Turns a listening [`Snapshot`](crate::spotify::Snapshot) into a
//! [`RoastResult`]. Generation never fails from the caller's point of view:
//! a static fallback stands in whenever the model does not deliver.

pub mod decode;
pub mod fallback;
pub mod gemini;
pub mod pipeline;
pub mod prompt;
pub mod schema;

pub use decode::{decode_roast, strip_code_fence, DecodeError};
pub use fallback::fallback_roast;
pub use gemini::{GeminiClient, GenerativeModel, ModelError};
pub use pipeline::{GenerationFailure, RoastOutcome, RoastPipeline, RoastSource};
pub use schema::{RoastResult, ValidationError};
