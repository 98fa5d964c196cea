//! Per-request correlation context
//!
//! A [`CorrelationContext`] is created at the start of an inbound call and
//! handed by reference to every async continuation of that call. Nothing is
//! stored in thread-locals: the context travels with the future, so it stays
//! correct when the runtime moves the task between worker threads.
//!
//! Teardown is owned by [`ContextScope`]. Its release runs exactly once,
//! either explicitly through [`ContextScope::release`] or from `Drop` when the
//! call future is cancelled mid-flight.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use peoplebridge_common::observability::{ContextScope, CorrelationContext};
//!
//! let context = Arc::new(CorrelationContext::from_metadata(Some("req-1"), None));
//! let scope = ContextScope::bind(Arc::clone(&context));
//! assert_eq!(scope.context().current_id(), "req-1");
//!
//! let snapshot = scope.release();
//! assert_eq!(snapshot.request_id.as_deref(), Some("req-1"));
//! assert!(context.request_id().is_none());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{info, info_span, Span};
use uuid::Uuid;

#[derive(Debug, Default)]
struct ContextState {
    request_id: Option<String>,
    correlation_id: Option<String>,
    attributes: BTreeMap<String, String>,
}

/// Identifiers and attributes bound to one logical call
#[derive(Debug)]
pub struct CorrelationContext {
    state: Mutex<ContextState>,
    started_at: Instant,
}

impl Default for CorrelationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl CorrelationContext {
    /// Create an empty context. The request id is generated lazily.
    pub fn new() -> Self {
        Self { state: Mutex::new(ContextState::default()), started_at: Instant::now() }
    }

    /// Build a context from inbound transport metadata.
    ///
    /// Blank values are treated as absent.
    pub fn from_metadata(request_id: Option<&str>, correlation_id: Option<&str>) -> Self {
        let context = Self::new();
        {
            let mut state = context.state.lock();
            state.request_id = non_blank(request_id);
            state.correlation_id = non_blank(correlation_id);
        }
        context
    }

    /// Request id of the current call, generating one if none is bound yet
    pub fn current_id(&self) -> String {
        let mut state = self.state.lock();
        state.request_id.get_or_insert_with(|| Uuid::new_v4().to_string()).clone()
    }

    /// Bind `id` as the request id, replacing any generated one
    pub fn with_id(&self, id: impl Into<String>) {
        self.state.lock().request_id = Some(id.into());
    }

    /// Request id if one has been bound or generated
    pub fn request_id(&self) -> Option<String> {
        self.state.lock().request_id.clone()
    }

    pub fn correlation_id(&self) -> Option<String> {
        self.state.lock().correlation_id.clone()
    }

    /// Attach a free-form attribute to the call
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.state.lock().attributes.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.state.lock().attributes.get(key).cloned()
    }

    pub fn attributes(&self) -> BTreeMap<String, String> {
        self.state.lock().attributes.clone()
    }

    /// Time since the context was created
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ContextSnapshot {
        let state = self.state.lock();
        ContextSnapshot {
            request_id: state.request_id.clone(),
            correlation_id: state.correlation_id.clone(),
            attributes: state.attributes.clone(),
            elapsed: self.started_at.elapsed(),
        }
    }

    /// Remove all bound state
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.request_id = None;
        state.correlation_id = None;
        state.attributes.clear();
    }

    /// Tracing span carrying the call's identifiers.
    ///
    /// Instrumenting the call future with this span tags every log line
    /// emitted inside the call, across await points.
    pub fn span(&self, resource: &'static str, operation: &'static str) -> Span {
        let request_id = self.current_id();
        let correlation_id = self.correlation_id().unwrap_or_default();
        info_span!(
            "request",
            request_id = %request_id,
            correlation_id = %correlation_id,
            resource,
            operation
        )
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// State of a context captured at release time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSnapshot {
    pub request_id: Option<String>,
    pub correlation_id: Option<String>,
    pub attributes: BTreeMap<String, String>,
    pub elapsed: Duration,
}

/// Observer notified once when a call's context is released
pub trait ContextListener: Send + Sync {
    fn on_release(&self, snapshot: &ContextSnapshot);
}

/// Emits the completion log line for every released context
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingContextListener;

impl ContextListener for TracingContextListener {
    fn on_release(&self, snapshot: &ContextSnapshot) {
        let outcome = snapshot.attributes.get("outcome").map_or("unknown", String::as_str);
        info!(
            request_id = snapshot.request_id.as_deref().unwrap_or_default(),
            correlation_id = snapshot.correlation_id.as_deref().unwrap_or_default(),
            outcome,
            elapsed_ms = snapshot.elapsed.as_millis() as u64,
            "Request context released"
        );
    }
}

/// Scoped acquisition of a [`CorrelationContext`].
///
/// Release snapshots the context, clears it, and notifies listeners. It runs
/// on every exit path, including cancellation, and never more than once.
pub struct ContextScope {
    context: Arc<CorrelationContext>,
    listeners: Vec<Arc<dyn ContextListener>>,
    released: bool,
}

impl fmt::Debug for ContextScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextScope")
            .field("context", &self.context)
            .field("listeners", &self.listeners.len())
            .field("released", &self.released)
            .finish()
    }
}

impl ContextScope {
    /// Bind `context` for the duration of one call
    pub fn bind(context: Arc<CorrelationContext>) -> Self {
        context.current_id();
        Self { context, listeners: Vec::new(), released: false }
    }

    pub fn with_listener(mut self, listener: Arc<dyn ContextListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn with_listeners(
        mut self,
        listeners: impl IntoIterator<Item = Arc<dyn ContextListener>>,
    ) -> Self {
        self.listeners.extend(listeners);
        self
    }

    pub fn context(&self) -> &CorrelationContext {
        &self.context
    }

    /// Release the context now and return its final state
    pub fn release(mut self) -> ContextSnapshot {
        let snapshot = self.context.snapshot();
        self.release_once(&snapshot);
        snapshot
    }

    fn release_once(&mut self, snapshot: &ContextSnapshot) {
        if self.released {
            return;
        }
        self.released = true;
        self.context.clear();
        for listener in &self.listeners {
            listener.on_release(snapshot);
        }
    }
}

impl Drop for ContextScope {
    fn drop(&mut self) {
        if !self.released {
            let mut snapshot = self.context.snapshot();
            snapshot
                .attributes
                .entry("outcome".to_string())
                .or_insert_with(|| "cancelled".to_string());
            self.release_once(&snapshot);
        }
    }
}
