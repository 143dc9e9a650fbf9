//! Retry policies for fetch operations.
//!
//! Only idempotent methods are ever retried. POST and PATCH go out once.

use crate::{FetchError, Method};
use std::time::Duration;

/// Backoff strategy between retry attempts.
#[derive(Debug, Clone)]
pub enum BackoffStrategy {
    /// No delay between retries.
    None,
    /// Fixed delay between retries.
    Fixed(Duration),
    /// Exponential backoff with base and max.
    Exponential {
        /// Initial delay.
        base: Duration,
        /// Maximum delay.
        max: Duration,
    },
}

impl BackoffStrategy {
    /// Calculate delay for a given attempt number (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Fixed(d) => *d,
            Self::Exponential { base, max } => {
                let multiplier = 2u64.saturating_pow(attempt);
                let delay =
                    Duration::from_millis((base.as_millis() as u64).saturating_mul(multiplier));
                std::cmp::min(delay, *max)
            }
        }
    }
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(50),
            max: Duration::from_millis(500),
        }
    }
}

/// Conditions that trigger a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryCondition {
    /// Retry on specific HTTP status code.
    StatusCode(u16),
    /// Retry on any 5xx status.
    ServerError,
    /// Retry on timeout.
    Timeout,
    /// Retry on connection error.
    ConnectionError,
}

impl RetryCondition {
    /// Check if a status code matches this condition.
    pub fn matches_status(&self, status: u16) -> bool {
        match self {
            Self::StatusCode(code) => status == *code,
            Self::ServerError => (500..600).contains(&status),
            _ => false,
        }
    }

    /// Check if an error matches this condition.
    pub fn matches_error(&self, error: &FetchError) -> bool {
        match (self, error) {
            (Self::Timeout, FetchError::Timeout) => true,
            (Self::ConnectionError, FetchError::Connect(_)) => true,
            (_, FetchError::Status { status, .. }) => self.matches_status(*status),
            _ => false,
        }
    }
}

/// Retry policy configuration.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts.
    pub max_attempts: u32,
    /// Backoff strategy.
    pub backoff: BackoffStrategy,
    /// Conditions that trigger retry.
    pub retry_on: Vec<RetryCondition>,
}

impl RetryPolicy {
    /// Create a new retry policy.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff: BackoffStrategy::default(),
            retry_on: vec![
                RetryCondition::ServerError,
                RetryCondition::Timeout,
                RetryCondition::ConnectionError,
            ],
        }
    }

    /// Create a policy with no retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 0,
            backoff: BackoffStrategy::None,
            retry_on: Vec::new(),
        }
    }

    /// Set backoff strategy.
    pub fn with_backoff(mut self, strategy: BackoffStrategy) -> Self {
        self.backoff = strategy;
        self
    }

    /// Set retry conditions.
    pub fn with_conditions(mut self, conditions: Vec<RetryCondition>) -> Self {
        self.retry_on = conditions;
        self
    }

    /// Check if a failed request should be sent again.
    ///
    /// `attempt` counts retries already made.
    pub fn should_retry(&self, method: Method, error: &FetchError, attempt: u32) -> bool {
        if attempt >= self.max_attempts || !method.is_idempotent() {
            return false;
        }
        self.retry_on.iter().any(|c| c.matches_error(error))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_error() -> FetchError {
        FetchError::Status {
            status: 503,
            message: "unavailable".to_string(),
        }
    }

    #[test]
    fn test_exponential_backoff_is_capped() {
        let backoff = BackoffStrategy::Exponential {
            base: Duration::from_millis(100),
            max: Duration::from_millis(350),
        };
        assert_eq!(backoff.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(backoff.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(backoff.delay_for_attempt(2), Duration::from_millis(350));
        assert_eq!(backoff.delay_for_attempt(40), Duration::from_millis(350));
    }

    #[test]
    fn test_retries_idempotent_methods() {
        let policy = RetryPolicy::new(2);
        assert!(policy.should_retry(Method::Get, &server_error(), 0));
        assert!(policy.should_retry(Method::Put, &FetchError::Timeout, 1));
        assert!(policy.should_retry(Method::Delete, &FetchError::Connect("reset".into()), 0));
        assert!(!policy.should_retry(Method::Get, &server_error(), 2));
    }

    #[test]
    fn test_never_retries_post_or_patch() {
        let policy = RetryPolicy::new(5);
        assert!(!policy.should_retry(Method::Post, &server_error(), 0));
        assert!(!policy.should_retry(Method::Patch, &FetchError::Timeout, 0));
    }

    #[test]
    fn test_client_errors_are_final() {
        let policy = RetryPolicy::new(3);
        let unauthorized = FetchError::Status {
            status: 401,
            message: "unauthorized".to_string(),
        };
        assert!(!policy.should_retry(Method::Get, &unauthorized, 0));
        let policy = policy.with_conditions(vec![RetryCondition::StatusCode(429)]);
        let throttled = FetchError::Status {
            status: 429,
            message: "slow down".to_string(),
        };
        assert!(policy.should_retry(Method::Get, &throttled, 0));
    }

    #[test]
    fn test_none_policy() {
        assert!(!RetryPolicy::none().should_retry(Method::Get, &FetchError::Timeout, 0));
    }
}
