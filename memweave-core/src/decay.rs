//! Temporal decay of memory confidence.
//!
//! Pure computation, no graph access. A node's *effective confidence* is its
//! stored confidence scaled by a decay factor of the wall-clock time elapsed
//! since the node was created:
//!
//! ```text
//! effective = confidence * decay_factor(now - timestamp)
//! ```
//!
//! Every policy must return a factor of 1.0 at zero elapsed time, be
//! monotonically non-increasing in elapsed time, and stay within (0, 1] for
//! bounded elapsed time. Elapsed time is clamped at zero, so a timestamp in
//! the future never raises confidence.

use chrono::{DateTime, Duration, Utc};
use std::fmt::Debug;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Strategy for computing how much confidence survives elapsed time.
pub trait DecayPolicy: Send + Sync + Debug {
    /// Multiplier in (0, 1] applied to stored confidence after `elapsed`.
    fn decay_factor(&self, elapsed: Duration) -> f64;

    /// Effective confidence of a value stored at `timestamp`, observed at `now`.
    fn effective_confidence(
        &self,
        confidence: f64,
        timestamp: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> f64 {
        let elapsed = (now - timestamp).max(Duration::zero());
        let factor = self.decay_factor(elapsed).clamp(0.0, 1.0);
        confidence * factor
    }
}

/// Exponential decay: `daily_retention ^ (elapsed_hours / 24)`.
///
/// With the default retention of 0.95 a conclusion keeps 95% of its
/// confidence after one day and roughly half after two weeks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialDecay {
    daily_retention: f64,
}

impl ExponentialDecay {
    /// Default fraction of confidence retained per day.
    pub const DEFAULT_DAILY_RETENTION: f64 = 0.95;

    /// Create a policy retaining `daily_retention` of confidence per day.
    ///
    /// The value is clamped into (0, 1]; callers wanting validation go
    /// through [`crate::config::DecayConfig::validate`].
    pub fn new(daily_retention: f64) -> Self {
        let daily_retention = if daily_retention.is_finite() {
            daily_retention.clamp(f64::MIN_POSITIVE, 1.0)
        } else {
            Self::DEFAULT_DAILY_RETENTION
        };
        Self { daily_retention }
    }

    /// Create a policy from a half-life: confidence halves every `half_life`.
    pub fn from_half_life(half_life: Duration) -> Self {
        let hours = half_life.num_milliseconds() as f64 / MILLIS_PER_HOUR;
        if hours <= 0.0 {
            return Self::new(f64::MIN_POSITIVE);
        }
        Self::new(0.5_f64.powf(24.0 / hours))
    }

    /// Fraction of confidence retained per day.
    pub fn daily_retention(&self) -> f64 {
        self.daily_retention
    }
}

impl Default for ExponentialDecay {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DAILY_RETENTION)
    }
}

impl DecayPolicy for ExponentialDecay {
    fn decay_factor(&self, elapsed: Duration) -> f64 {
        let hours = elapsed.num_milliseconds().max(0) as f64 / MILLIS_PER_HOUR;
        self.daily_retention.powf(hours / 24.0)
    }
}

/// Policy under which confidence never decays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoDecay;

impl DecayPolicy for NoDecay {
    fn decay_factor(&self, _elapsed: Duration) -> f64 {
        1.0
    }
}
