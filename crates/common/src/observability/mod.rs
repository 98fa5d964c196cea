//! Request-scoped observability primitives
//!
//! - [`context`]: the per-request [`CorrelationContext`], its release guard
//!   [`ContextScope`], and listeners notified when a request completes.

pub mod context;

pub use context::{
    ContextListener, ContextScope, ContextSnapshot, CorrelationContext, TracingContextListener,
};
