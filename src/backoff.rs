//! Exponential backoff used between reconnection attempts.

use std::time::Duration;

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Default starting delay for a reconnection sequence.
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(100);
/// Default ceiling on the nominal delay.
pub const DEFAULT_BACKOFF_CAP: Duration = Duration::from_secs(10);

/// Bounds for the doubling walk performed by [`BackoffState`].
#[derive(Clone, Debug)]
pub struct BackoffPolicy {
    pub base: Duration,
    pub cap: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base: DEFAULT_BACKOFF_BASE,
            cap: DEFAULT_BACKOFF_CAP,
        }
    }
}

/// Tracks the current nominal delay and produces jittered waits.
///
/// One state is created per reconnection sequence; the delay is never
/// carried over from an earlier, unrelated sequence.
pub struct BackoffState {
    policy: BackoffPolicy,
    current: Duration,
    rng: StdRng,
}

impl BackoffState {
    /// Create a state starting at the policy's base delay.
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            current: policy.base,
            rng: StdRng::from_entropy(),
            policy,
        }
    }

    /// The nominal delay the next wait will be derived from.
    pub fn current(&self) -> Duration {
        self.current
    }

    /// Double the nominal delay (capped) and return a jittered wait.
    ///
    /// The wait is `next + uniform(0, next)` where
    /// `next = min(current * 2, cap)`, so realized waits range up to
    /// twice the nominal delay.
    pub fn next_wait(&mut self) -> Duration {
        self.current = self.current.saturating_mul(2).min(self.policy.cap);
        let max_ms = self.current.as_millis().min(u128::from(u64::MAX)) as u64;
        let jitter = match max_ms {
            0 => Duration::ZERO,
            _ => Duration::from_millis(self.rng.gen_range(0..=max_ms)),
        };
        self.current + jitter
    }
}
