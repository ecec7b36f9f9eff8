//! Roast cooldown
//!
//! A fixed window between roast generations. The window is measured from the
//! last generation that returned a result (model or fallback): the guard is
//! about model cost, not success. A rejected request never stamps it.

use chrono::{DateTime, Utc};
use cooked_common::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use crate::session::Session;

/// Minimum spacing between roasts (5 minutes)
pub const ROAST_COOLDOWN: Duration = Duration::from_secs(5 * 60);

/// Gate decision
#[derive(Debug)]
pub enum CooldownDecision {
    Allowed(CooldownPermit),
    Rejected { remaining: Duration },
}

/// Exclusive right to run one generation. Dropping it without calling
/// [`CooldownPermit::record_success`] leaves the cooldown untouched.
#[derive(Debug)]
pub struct CooldownPermit {
    session: Session,
    _in_flight: OwnedMutexGuard<()>,
}

impl CooldownPermit {
    /// Stamp the cooldown after a generation returned its result
    pub async fn record_success(self, at: DateTime<Utc>) {
        self.session.stamp_roast(at).await;
    }
}

/// Cooldown gate in front of the roast pipeline
pub struct RoastCooldown {
    clock: Arc<dyn Clock>,
    window: Duration,
    in_flight: Arc<Mutex<()>>,
}

impl RoastCooldown {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_window(clock, ROAST_COOLDOWN)
    }

    pub fn with_window(clock: Arc<dyn Clock>, window: Duration) -> Self {
        Self {
            clock,
            window,
            in_flight: Arc::new(Mutex::new(())),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Time since the last roast; `None` if there has never been one
    pub async fn time_since_last(&self, session: &Session) -> Option<Duration> {
        let last = session.last_roast_at().await?;
        Some(cooked_common::time::elapsed_between(last, self.clock.now()))
    }

    /// `max(0, window - time_since_last)`; zero when never stamped
    pub async fn remaining_cooldown(&self, session: &Session) -> Duration {
        match self.time_since_last(session).await {
            Some(elapsed) => self.window.saturating_sub(elapsed),
            None => Duration::ZERO,
        }
    }

    /// Ask to start a generation. While another generation holds a permit,
    /// the full window is reported as remaining.
    pub async fn try_acquire(&self, session: &Session) -> CooldownDecision {
        let Ok(guard) = Arc::clone(&self.in_flight).try_lock_owned() else {
            debug!("Roast rejected: generation already in flight");
            return CooldownDecision::Rejected {
                remaining: self.window,
            };
        };

        let remaining = self.remaining_cooldown(session).await;
        if !remaining.is_zero() {
            debug!(remaining_ms = remaining.as_millis() as u64, "Roast rejected: cooling down");
            return CooldownDecision::Rejected { remaining };
        }

        CooldownDecision::Allowed(CooldownPermit {
            session: session.clone(),
            _in_flight: guard,
        })
    }
}
