//! Model output decoding
//!
//! Contract: the input is the raw text returned by the model. An optional
//! leading code fence (```` ``` ```` or ```` ```json ````, any case) and an
//! optional trailing ```` ``` ```` are removed, surrounding whitespace is
//! trimmed, and what remains must be exactly one JSON object that matches
//! [`RoastResult`] and passes [`RoastResult::validate`].

use thiserror::Error;

use super::schema::{RoastResult, ValidationError};

/// Decoding failures, in pipeline order
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Model output is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("Model output does not match the roast schema: {0}")]
    Schema(#[source] serde_json::Error),

    #[error("Model output breaks a value constraint: {0}")]
    Constraint(#[from] ValidationError),
}

/// Remove one surrounding markdown code fence, if present
pub fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        text = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Parse and validate model output
pub fn decode_roast(raw: &str) -> Result<RoastResult, DecodeError> {
    let text = strip_code_fence(raw);
    let value: serde_json::Value = serde_json::from_str(text).map_err(DecodeError::Json)?;
    let result: RoastResult = serde_json::from_value(value).map_err(DecodeError::Schema)?;
    result.validate()?;
    Ok(result)
}
