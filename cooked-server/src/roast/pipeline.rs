//! Roast generation pipeline
//!
//! Prompt, model call with bounded retry, decode, validate. The whole run sits
//! under one timeout. Any failure yields the static fallback instead of an
//! error, so callers always get a schema-valid [`RoastResult`].

use cooked_common::config::GeminiConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

use super::decode::{decode_roast, DecodeError};
use super::fallback::fallback_roast;
use super::gemini::{GenerativeModel, ModelError};
use super::prompt::build_prompt;
use super::schema::RoastResult;
use crate::spotify::Snapshot;
use crate::utils::retry::{retry_with_backoff, RetryPolicy};

/// Why a generation fell back
#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error("Prompt serialization failed: {0}")]
    Prompt(#[source] serde_json::Error),

    #[error("Generation exceeded {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Where a result came from
#[derive(Debug)]
pub enum RoastSource {
    Model,
    Fallback(GenerationFailure),
}

/// Result of one pipeline run
#[derive(Debug)]
pub struct RoastOutcome {
    pub result: RoastResult,
    pub source: RoastSource,
}

impl RoastOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, RoastSource::Fallback(_))
    }
}

pub struct RoastPipeline {
    model: Arc<dyn GenerativeModel>,
    retry: RetryPolicy,
    timeout: Duration,
}

impl RoastPipeline {
    pub fn new(model: Arc<dyn GenerativeModel>, config: &GeminiConfig) -> Self {
        Self::with_policy(
            model,
            RetryPolicy::with_attempts(config.max_attempts),
            config.timeout,
        )
    }

    pub fn with_policy(model: Arc<dyn GenerativeModel>, retry: RetryPolicy, timeout: Duration) -> Self {
        Self {
            model,
            retry,
            timeout,
        }
    }

    /// Produce a roast for `snapshot`. Never fails.
    pub async fn generate(&self, snapshot: &Snapshot) -> RoastOutcome {
        let start = Instant::now();

        match self.run(snapshot).await {
            Ok(result) => {
                info!(
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Roast generated by model"
                );
                RoastOutcome {
                    result,
                    source: RoastSource::Model,
                }
            }
            Err(failure) => {
                warn!(
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    reason = %failure,
                    "Roast generation failed, serving fallback"
                );
                RoastOutcome {
                    result: fallback_roast(),
                    source: RoastSource::Fallback(failure),
                }
            }
        }
    }

    async fn run(&self, snapshot: &Snapshot) -> Result<RoastResult, GenerationFailure> {
        let prompt = build_prompt(snapshot).map_err(GenerationFailure::Prompt)?;

        let call = retry_with_backoff(
            "roast_generation",
            &self.retry,
            ModelError::is_retryable,
            || self.model.generate(&prompt),
        );

        let text = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| GenerationFailure::Timeout(self.timeout))??;

        Ok(decode_roast(&text)?)
    }
}
