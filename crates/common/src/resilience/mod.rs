//! Resilience patterns for upstream calls
//!
//! Currently a single pattern lives here: a bounded retry executor with
//! pluggable policies and backoff. Policies are generic over the error type,
//! so the same executor serves any fault that implements
//! [`ErrorClassification`](crate::error::ErrorClassification).

pub mod retry;

pub use retry::{
    policies, ExponentialBackoff, RetryConfig, RetryConfigBuilder, RetryConfigError,
    RetryDecision, RetryExecutor, RetryPolicy, Sleeper, TokioSleeper,
};
