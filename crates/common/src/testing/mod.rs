//! Testing utilities and helpers
//!
//! - **[`mocks`]**: recording and counting doubles for the retry sleeper and
//!   context listeners, so retry loops and context teardown can be asserted
//!   without wall-clock delays.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use peoplebridge_common::error::{ErrorClassification, ErrorSeverity};
//! use peoplebridge_common::resilience::{policies::ClassifiedRetry, RetryConfig, RetryExecutor};
//! use peoplebridge_common::testing::RecordingSleeper;
//!
//! struct Flaky;
//!
//! impl ErrorClassification for Flaky {
//!     fn is_retryable(&self) -> bool { true }
//!     fn severity(&self) -> ErrorSeverity { ErrorSeverity::Warning }
//!     fn is_critical(&self) -> bool { false }
//!     fn retry_after(&self) -> Option<Duration> { None }
//! }
//!
//! let sleeper = Arc::new(RecordingSleeper::new());
//! let executor =
//!     RetryExecutor::new(RetryConfig::default(), ClassifiedRetry).with_sleeper(sleeper.clone());
//! assert_eq!(executor.next_delay(&Flaky, 1), Some(Duration::from_millis(200)));
//! assert!(sleeper.delays().is_empty());
//! ```

pub mod mocks;

pub use mocks::{CountingContextListener, RecordingSleeper};
