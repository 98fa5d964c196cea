//! Bounded retry with exponential backoff and a pluggable sleep mechanism
//!
//! A [`RetryExecutor`] owns three things. Its [`RetryPolicy`] decides
//! whether an error deserves another attempt. Its [`RetryConfig`] caps the
//! number of retries and spaces them out. Its [`Sleeper`] waits between
//! attempts: [`TokioSleeper`] in production, a recording double in tests.
//!
//! The operation's error is never wrapped. When the policy says stop, or the
//! retry budget runs out, the last error is handed back to the caller as-is.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while building a [`RetryConfig`]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RetryConfigError {
    #[error("Invalid retry configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Decides whether an error is worth another attempt
pub trait RetryPolicy<E> {
    /// `attempt` is the number of retries already performed
    fn should_retry(&self, error: &E, attempt: u32) -> RetryDecision;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after the configured backoff delay
    Retry,
    /// Retry after a delay chosen by the error itself
    RetryAfter(Duration),
    Stop,
}

/// `initial_delay * base^attempt`, capped at `max_delay`
#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialBackoff {
    pub initial_delay: Duration,
    pub base: f64,
    pub max_delay: Duration,
}

impl ExponentialBackoff {
    /// Delay before retry number `attempt` (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let delay_ms = self.initial_delay.as_millis() as f64 * self.base.powi(exponent);
        let capped_ms = delay_ms.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped_ms as u64)
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(100),
            base: 2.0,
            max_delay: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the initial attempt
    pub max_retries: u32,
    pub backoff: ExponentialBackoff,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_retries: 2, backoff: ExponentialBackoff::default() }
    }
}

impl RetryConfig {
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::default()
    }

    /// Initial try plus retries
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// # Errors
    /// [`RetryConfigError::InvalidConfiguration`] for a non-positive or
    /// non-finite base, or an initial delay above the cap.
    pub fn validate(&self) -> Result<(), RetryConfigError> {
        let ExponentialBackoff { initial_delay, base, max_delay } = &self.backoff;
        if !base.is_finite() || *base <= 0.0 {
            return Err(RetryConfigError::InvalidConfiguration {
                message: "exponential base must be a finite number greater than 0".to_string(),
            });
        }
        if initial_delay > max_delay {
            return Err(RetryConfigError::InvalidConfiguration {
                message: "initial delay must not exceed max delay".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RetryConfigBuilder {
    config: RetryConfig,
}

impl RetryConfigBuilder {
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    pub fn exponential_backoff(
        mut self,
        initial_delay: Duration,
        base: f64,
        max_delay: Duration,
    ) -> Self {
        self.config.backoff = ExponentialBackoff { initial_delay, base, max_delay };
        self
    }

    /// # Errors
    /// See [`RetryConfig::validate`].
    pub fn build(self) -> Result<RetryConfig, RetryConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Waits between retry attempts
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

/// [`Sleeper`] backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

pub struct RetryExecutor<P> {
    config: RetryConfig,
    policy: P,
    sleeper: Arc<dyn Sleeper>,
}

impl<P: fmt::Debug> fmt::Debug for RetryExecutor<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryExecutor")
            .field("config", &self.config)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<P> RetryExecutor<P> {
    /// Create an executor sleeping on the tokio timer
    pub fn new(config: RetryConfig, policy: P) -> Self {
        Self { config, policy, sleeper: Arc::new(TokioSleeper) }
    }

    /// Replace the sleep mechanism used between attempts
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Pure retry decision: the delay before the next attempt, or `None` to
    /// stop.
    ///
    /// `attempt` is the number of retries already performed. Nothing is
    /// slept or logged here.
    pub fn next_delay<E>(&self, error: &E, attempt: u32) -> Option<Duration>
    where
        P: RetryPolicy<E>,
    {
        if attempt >= self.config.max_retries {
            return None;
        }

        match self.policy.should_retry(error, attempt) {
            RetryDecision::Stop => None,
            RetryDecision::Retry => Some(self.config.backoff.delay_for(attempt)),
            RetryDecision::RetryAfter(delay) => Some(delay),
        }
    }

    /// Run `operation` until it succeeds, the policy stops, or the budget
    /// runs out.
    ///
    /// The operation receives the number of retries performed so far.
    ///
    /// # Errors
    /// The error of the last attempt, unchanged.
    pub async fn execute<F, Fut, T, E>(&self, mut operation: F) -> Result<T, E>
    where
        P: RetryPolicy<E>,
        E: fmt::Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0u32;

        loop {
            match operation(attempt).await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(retries = attempt, "Operation succeeded after retries");
                    }
                    return Ok(value);
                }
                Err(error) => {
                    let Some(delay) = self.next_delay(&error, attempt) else {
                        debug!(
                            attempts = attempt + 1,
                            max_attempts = self.config.max_attempts(),
                            error = %error,
                            "Giving up on operation"
                        );
                        return Err(error);
                    };

                    warn!(
                        attempt = attempt + 1,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %error,
                        "Retrying request"
                    );
                    self.sleeper.sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

pub mod policies {
    use super::{RetryDecision, RetryPolicy};
    use crate::error::ErrorClassification;

    /// Retries exactly the errors that classify themselves as retryable,
    /// honouring their `retry_after` hint when present.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct ClassifiedRetry;

    impl<E: ErrorClassification> RetryPolicy<E> for ClassifiedRetry {
        fn should_retry(&self, error: &E, _attempt: u32) -> RetryDecision {
            if !error.is_retryable() {
                return RetryDecision::Stop;
            }
            match error.retry_after() {
                Some(delay) => RetryDecision::RetryAfter(delay),
                None => RetryDecision::Retry,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::policies::ClassifiedRetry;
    use super::*;
    use crate::error::{ErrorClassification, ErrorSeverity};
    use crate::testing::RecordingSleeper;

    #[derive(Debug, Clone, PartialEq)]
    enum Fault {
        Transient(u32),
        Permanent,
    }

    impl fmt::Display for Fault {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::Transient(n) => write!(f, "transient #{n}"),
                Self::Permanent => write!(f, "permanent"),
            }
        }
    }

    impl ErrorClassification for Fault {
        fn is_retryable(&self) -> bool {
            matches!(self, Self::Transient(_))
        }

        fn severity(&self) -> ErrorSeverity {
            ErrorSeverity::Error
        }

        fn is_critical(&self) -> bool {
            false
        }

        fn retry_after(&self) -> Option<Duration> {
            None
        }
    }

    fn executor(sleeper: &Arc<RecordingSleeper>) -> RetryExecutor<ClassifiedRetry> {
        RetryExecutor::new(RetryConfig::default(), ClassifiedRetry).with_sleeper(sleeper.clone())
    }

    #[test]
    fn test_exponential_backoff_is_capped() {
        let backoff = ExponentialBackoff {
            initial_delay: Duration::from_millis(100),
            base: 2.0,
            max_delay: Duration::from_secs(10),
        };

        assert_eq!(backoff.delay_for(0), Duration::from_millis(100));
        assert_eq!(backoff.delay_for(1), Duration::from_millis(200));
        assert_eq!(backoff.delay_for(2), Duration::from_millis(400));
        assert_eq!(backoff.delay_for(40), Duration::from_secs(10));
        assert_eq!(backoff.delay_for(u32::MAX), Duration::from_secs(10));
    }

    #[test]
    fn test_retry_config_default() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.max_attempts(), 3);
        assert_eq!(config.backoff.delay_for(0), Duration::from_millis(100));
    }

    #[test]
    fn test_retry_config_builder() {
        let config = RetryConfig::builder()
            .max_retries(4)
            .exponential_backoff(Duration::from_millis(5), 3.0, Duration::from_millis(50))
            .build()
            .expect("valid config");

        assert_eq!(config.max_retries, 4);
        assert_eq!(config.backoff.delay_for(1), Duration::from_millis(15));
    }

    #[test]
    fn test_retry_config_builder_validation_fails() {
        let result = RetryConfig::builder()
            .exponential_backoff(Duration::from_millis(100), 0.0, Duration::from_secs(1))
            .build();
        assert!(matches!(result, Err(RetryConfigError::InvalidConfiguration { .. })));

        let result = RetryConfig::builder()
            .exponential_backoff(Duration::from_secs(2), 2.0, Duration::from_secs(1))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_next_delay_is_pure_decision() {
        let sleeper = Arc::new(RecordingSleeper::new());
        let executor = executor(&sleeper);

        assert_eq!(
            executor.next_delay(&Fault::Transient(1), 0),
            Some(Duration::from_millis(100))
        );
        assert_eq!(
            executor.next_delay(&Fault::Transient(2), 1),
            Some(Duration::from_millis(200))
        );
        assert_eq!(executor.next_delay(&Fault::Transient(3), 2), None, "budget exhausted");
        assert_eq!(executor.next_delay(&Fault::Permanent, 0), None);
        assert!(sleeper.delays().is_empty());
    }

    #[test]
    fn test_classified_retry_honours_retry_after() {
        #[derive(Debug)]
        struct Throttled;

        impl ErrorClassification for Throttled {
            fn is_retryable(&self) -> bool {
                true
            }
            fn severity(&self) -> ErrorSeverity {
                ErrorSeverity::Warning
            }
            fn is_critical(&self) -> bool {
                false
            }
            fn retry_after(&self) -> Option<Duration> {
                Some(Duration::from_secs(3))
            }
        }

        assert_eq!(
            ClassifiedRetry.should_retry(&Throttled, 0),
            RetryDecision::RetryAfter(Duration::from_secs(3))
        );
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let sleeper = Arc::new(RecordingSleeper::new());
        let executor = executor(&sleeper);
        let counter = AtomicU32::new(0);

        let result = executor
            .execute(|_| async {
                let count = counter.fetch_add(1, Ordering::SeqCst);
                if count < 2 {
                    Err(Fault::Transient(count))
                } else {
                    Ok(42)
                }
            })
            .await;

        assert_eq!(result, Ok(42));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert_eq!(sleeper.delays(), vec![Duration::from_millis(100), Duration::from_millis(200)]);
    }

    #[tokio::test]
    async fn test_exhausted_budget_returns_last_error() {
        let sleeper = Arc::new(RecordingSleeper::new());
        let executor = executor(&sleeper);
        let counter = AtomicU32::new(0);

        let result: Result<(), Fault> = executor
            .execute(|_| async { Err(Fault::Transient(counter.fetch_add(1, Ordering::SeqCst))) })
            .await;

        assert_eq!(result, Err(Fault::Transient(2)));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_stops_on_non_retryable_error() {
        let sleeper = Arc::new(RecordingSleeper::new());
        let executor = executor(&sleeper);
        let counter = AtomicU32::new(0);

        let result = executor
            .execute(|_| async {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(Fault::Permanent)
            })
            .await;

        assert_eq!(result, Err(Fault::Permanent));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(sleeper.delays().is_empty());
    }

    #[tokio::test]
    async fn test_operation_receives_retry_count() {
        let sleeper = Arc::new(RecordingSleeper::new());
        let executor = executor(&sleeper);
        let seen = parking_lot::Mutex::new(Vec::new());

        let _ = executor
            .execute(|attempt| {
                seen.lock().push(attempt);
                async move { Err::<(), _>(Fault::Transient(attempt)) }
            })
            .await;

        assert_eq!(*seen.lock(), vec![0, 1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_sleeper_waits_for_delay() {
        let start = tokio::time::Instant::now();
        TokioSleeper.sleep(Duration::from_millis(250)).await;
        assert!(start.elapsed() >= Duration::from_millis(250));
    }
}
