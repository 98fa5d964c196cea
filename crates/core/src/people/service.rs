//! Lookup facade - the only entry point the RPC layer calls
//!
//! Each call binds its correlation context, routes to the active upstream
//! client under the retry executor, records the outcome on the context, and
//! releases the context before returning. Release also happens when the
//! call's future is dropped mid-flight.

use std::sync::Arc;

use peoplebridge_common::error::{ErrorClassification, ErrorSeverity};
use peoplebridge_common::observability::{ContextListener, ContextScope, CorrelationContext};
use peoplebridge_common::resilience::policies::ClassifiedRetry;
use peoplebridge_common::resilience::{RetryConfig, RetryExecutor, Sleeper};
use peoplebridge_domain::{Person, UpstreamFault};
use tracing::{error, info, warn, Instrument};

use super::router::DataSourceRouter;

/// Resource family served by a [`LookupService`]
///
/// Both families map onto the same [`Person`] shape; the kind only labels
/// logs, spans, and RPC routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    People,
    User,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::People => "people",
            Self::User => "user",
        }
    }
}

/// Resilient lookup use case
pub struct LookupService {
    kind: ResourceKind,
    router: Arc<DataSourceRouter>,
    retry: RetryExecutor<ClassifiedRetry>,
    listeners: Vec<Arc<dyn ContextListener>>,
}

impl std::fmt::Debug for LookupService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupService")
            .field("kind", &self.kind)
            .field("router", &self.router)
            .field("retry", &self.retry)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl LookupService {
    /// Create a service retrying retryable faults per `retry`
    pub fn new(kind: ResourceKind, router: Arc<DataSourceRouter>, retry: RetryConfig) -> Self {
        Self {
            kind,
            router,
            retry: RetryExecutor::new(retry, ClassifiedRetry),
            listeners: Vec::new(),
        }
    }

    /// Replace the backoff sleep mechanism
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.retry = self.retry.with_sleeper(sleeper);
        self
    }

    /// Notify `listener` whenever a call's context is released
    pub fn with_context_listener(mut self, listener: Arc<dyn ContextListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn router(&self) -> &DataSourceRouter {
        &self.router
    }

    /// Look up one person by id
    ///
    /// # Errors
    /// The upstream fault, unchanged, once retries are exhausted or the fault
    /// is not retryable.
    pub async fn get_by_id(
        &self,
        context: Arc<CorrelationContext>,
        id: i64,
    ) -> Result<Person, UpstreamFault> {
        let scope = self.bind(context);
        let span = scope.context().span(self.kind.as_str(), "get_by_id");
        scope.context().insert("person_id", id.to_string());

        let result = self.fetch_by_id(scope.context(), id).instrument(span.clone()).await;

        span.in_scope(|| match &result {
            Ok(person) => {
                record_success(scope.context());
                info!(
                    person_id = person.id(),
                    duration_ms = elapsed_ms(scope.context()),
                    "Person retrieved"
                );
            }
            Err(fault) => record_failure(scope.context(), fault),
        });

        scope.release();
        result
    }

    /// List every person known to the active upstream
    ///
    /// # Errors
    /// The upstream fault, unchanged. No partial list is ever returned.
    pub async fn list_all(
        &self,
        context: Arc<CorrelationContext>,
    ) -> Result<Vec<Person>, UpstreamFault> {
        let scope = self.bind(context);
        let span = scope.context().span(self.kind.as_str(), "list_all");

        let result = self.fetch_all(scope.context()).instrument(span.clone()).await;

        span.in_scope(|| match &result {
            Ok(people) => {
                record_success(scope.context());
                scope.context().insert("count", people.len().to_string());
                info!(
                    count = people.len(),
                    duration_ms = elapsed_ms(scope.context()),
                    "People listed"
                );
            }
            Err(fault) => record_failure(scope.context(), fault),
        });

        scope.release();
        result
    }

    fn bind(&self, context: Arc<CorrelationContext>) -> ContextScope {
        ContextScope::bind(context).with_listeners(self.listeners.iter().cloned())
    }

    async fn fetch_by_id(
        &self,
        context: &CorrelationContext,
        id: i64,
    ) -> Result<Person, UpstreamFault> {
        let client = self.router.route();
        context.insert("data_source", client.data_source().as_str());

        let person = self.retry.execute(move |_attempt| client.find_by_id(context, id)).await?;
        if person.id() != id {
            return Err(UpstreamFault::mapping(format!(
                "upstream returned id {} for requested id {id}",
                person.id()
            )));
        }
        Ok(person)
    }

    async fn fetch_all(&self, context: &CorrelationContext) -> Result<Vec<Person>, UpstreamFault> {
        let client = self.router.route();
        context.insert("data_source", client.data_source().as_str());

        self.retry.execute(move |_attempt| client.list_all(context)).await
    }
}

fn elapsed_ms(context: &CorrelationContext) -> u64 {
    u64::try_from(context.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn record_success(context: &CorrelationContext) {
    context.insert("outcome", "success");
}

fn record_failure(context: &CorrelationContext, fault: &UpstreamFault) {
    context.insert("outcome", "error");
    context.insert("error", fault.code());
    context.insert("error_message", fault.to_string());

    let duration_ms = elapsed_ms(context);
    let status = fault.protocol_status();
    match fault.severity() {
        ErrorSeverity::Info => info!(
            error_code = fault.code(),
            protocol_status = %status,
            duration_ms,
            "Lookup failed: {fault}"
        ),
        ErrorSeverity::Warning => warn!(
            error_code = fault.code(),
            protocol_status = %status,
            duration_ms,
            "Lookup failed: {fault}"
        ),
        ErrorSeverity::Error | ErrorSeverity::Critical => error!(
            error_code = fault.code(),
            protocol_status = %status,
            details = %fault.details(),
            duration_ms,
            "Lookup failed: {fault}"
        ),
    }
}
