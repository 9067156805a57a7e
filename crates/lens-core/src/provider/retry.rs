//! Retry policy for provider attempts.
//!
//! Provides classification of attempt failures and capped exponential backoff.

use crate::error::ProviderError;
use std::time::Duration;

/// What the client does after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Back off and try the same provider again, budget permitting
    Retry,
    /// Stop using this provider for the current call, no backoff
    Abandon,
    /// Stop the whole call and return the error to the caller
    Surface,
}

/// Decide how a failed attempt affects the retry loop.
///
/// Rate limits abandon the provider. Invalid input is the caller's problem and
/// would fail identically everywhere. Everything else is retried.
pub fn classify(error: &ProviderError) -> Disposition {
    match error {
        ProviderError::RateLimited => Disposition::Abandon,
        ProviderError::InvalidArgument(_) => Disposition::Surface,
        _ => Disposition::Retry,
    }
}

/// Backoff parameters shared by every provider in a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before the first retry
    pub base_delay_ms: u64,
    /// Upper bound for any single delay
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay_ms: 1000,
            max_delay_ms: 5000,
        }
    }
}

impl RetryPolicy {
    /// Calculate the delay after the given zero-based attempt.
    ///
    /// Uses `base_delay * 2^attempt`, capped at `max_delay_ms`.
    pub fn backoff_duration(&self, attempt: u32) -> Duration {
        let delay = self
            .base_delay_ms
            .saturating_mul(2u64.saturating_pow(attempt));
        Duration::from_millis(delay.min(self.max_delay_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_abandons() {
        assert_eq!(classify(&ProviderError::RateLimited), Disposition::Abandon);
    }

    #[test]
    fn test_invalid_argument_surfaces() {
        let err = ProviderError::InvalidArgument("empty".into());
        assert_eq!(classify(&err), Disposition::Surface);
    }

    #[test]
    fn test_transient_failures_retry() {
        let cases = [
            ProviderError::Timeout { timeout_ms: 10 },
            ProviderError::Http {
                status: 401,
                body: String::new(),
            },
            ProviderError::Http {
                status: 503,
                body: String::new(),
            },
            ProviderError::MissingCredential {
                family: "google".into(),
            },
            ProviderError::Decode("eof".into()),
            ProviderError::ProviderReported {
                provider: "Hugging Face".into(),
                message: "loading".into(),
            },
        ];
        for err in &cases {
            assert_eq!(classify(err), Disposition::Retry, "{err}");
        }
    }

    #[test]
    fn test_backoff_exponential() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_duration(0), Duration::from_millis(1000));
        assert_eq!(policy.backoff_duration(1), Duration::from_millis(2000));
        assert_eq!(policy.backoff_duration(2), Duration::from_millis(4000));
    }

    #[test]
    fn test_backoff_capped_at_5s() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_duration(3), Duration::from_millis(5000));
        assert_eq!(policy.backoff_duration(64), Duration::from_millis(5000));
    }
}
