use std::time::Duration;

use super::classify::RetryClass;
use crate::config::RetryConfig;

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry; surface the last error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Delay schedule between attempts.
///
/// `retry` is 1-based: `delay(1)` is the pause after the first failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// `base * 2^(retry - 1)`. Used for unary calls.
    Exponential { base: Duration },
    /// `base * retry`. Used for stream establishment.
    Linear { base: Duration },
}

impl Backoff {
    pub fn delay(&self, retry: u32) -> Duration {
        let n = retry.max(1);
        match *self {
            Backoff::Exponential { base } => base.saturating_mul(1u32 << (n - 1).min(16)),
            Backoff::Linear { base } => base.saturating_mul(n),
        }
    }
}

/// Bounded attempts plus a backoff schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// Four attempts, exponential backoff from 2s.
    pub fn unary_default() -> Self {
        Self::new(
            4,
            Backoff::Exponential {
                base: Duration::from_secs(2),
            },
        )
    }

    /// Four attempts, linear backoff from 3s.
    pub fn stream_default() -> Self {
        Self::new(
            4,
            Backoff::Linear {
                base: Duration::from_secs(3),
            },
        )
    }

    /// Sum of every backoff sleep when all attempts fail with retryable codes.
    pub fn worst_case_backoff(&self) -> Duration {
        (1..self.max_attempts.max(1))
            .map(|retry| self.backoff.delay(retry))
            .fold(Duration::ZERO, Duration::saturating_add)
    }

    /// Decide what to do after `attempt` (1-based) failed with `class`.
    pub fn decide(&self, attempt: u32, class: RetryClass) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        match class {
            RetryClass::Terminal => RetryDecision::NoRetry,
            RetryClass::Transient => RetryDecision::RetryAfter(self.backoff.delay(attempt)),
        }
    }
}

/// The two policies of the client: one for unary calls, one for opening streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicies {
    pub unary: RetryPolicy,
    pub stream: RetryPolicy,
}

impl Default for RetryPolicies {
    fn default() -> Self {
        Self {
            unary: RetryPolicy::unary_default(),
            stream: RetryPolicy::stream_default(),
        }
    }
}

impl RetryPolicies {
    /// Build both policies from the `[retry]` config section. The schedule
    /// shapes are fixed; only attempts and bases are tunable.
    pub fn from_config(cfg: &RetryConfig) -> Self {
        Self {
            unary: RetryPolicy::new(
                cfg.max_attempts.max(1),
                Backoff::Exponential {
                    base: secs(cfg.unary_base_delay_secs),
                },
            ),
            stream: RetryPolicy::new(
                cfg.stream_max_attempts.max(1),
                Backoff::Linear {
                    base: secs(cfg.stream_base_delay_secs),
                },
            ),
        }
    }
}

fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}
