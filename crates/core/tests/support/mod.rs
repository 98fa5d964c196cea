//! Shared test helpers for `peoplebridge-core` integration tests.
//!
//! Scripted upstream clients let lookup tests replay an exact sequence of
//! upstream outcomes and count how many attempts were made.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use peoplebridge_common::observability::CorrelationContext;
use peoplebridge_common::resilience::RetryConfig;
use peoplebridge_common::testing::{CountingContextListener, RecordingSleeper};
use peoplebridge_core::{DataSourceRouter, LookupService, PeopleClient, ResourceKind};
use peoplebridge_domain::{DataSourceId, Person, UpstreamFault};

/// Client replaying a fixed script of outcomes, one per call.
///
/// Once the script runs out, every further call returns a transport fault so
/// an unexpected extra attempt is visible in assertions.
#[derive(Default)]
pub struct ScriptedClient {
    by_id: Mutex<VecDeque<Result<Person, UpstreamFault>>>,
    lists: Mutex<VecDeque<Result<Vec<Person>, UpstreamFault>>>,
    calls: AtomicUsize,
    seen_request_ids: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_person(self, outcome: Result<Person, UpstreamFault>) -> Self {
        self.by_id.lock().unwrap().push_back(outcome);
        self
    }

    pub fn then_list(self, outcome: Result<Vec<Person>, UpstreamFault>) -> Self {
        self.lists.lock().unwrap().push_back(outcome);
        self
    }

    /// Number of upstream attempts made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Request id observed on each attempt
    pub fn seen_request_ids(&self) -> Vec<String> {
        self.seen_request_ids.lock().unwrap().clone()
    }

    fn record(&self, context: &CorrelationContext) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_request_ids.lock().unwrap().push(context.current_id());
    }
}

#[async_trait]
impl PeopleClient for ScriptedClient {
    fn data_source(&self) -> DataSourceId {
        DataSourceId::Typicode
    }

    async fn find_by_id(
        &self,
        context: &CorrelationContext,
        _id: i64,
    ) -> Result<Person, UpstreamFault> {
        self.record(context);
        tokio::task::yield_now().await;
        let next = self.by_id.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(UpstreamFault::transport("script exhausted")))
    }

    async fn list_all(&self, context: &CorrelationContext) -> Result<Vec<Person>, UpstreamFault> {
        self.record(context);
        tokio::task::yield_now().await;
        let next = self.lists.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(UpstreamFault::transport("script exhausted")))
    }
}

/// Client whose calls never complete, for cancellation tests
pub struct PendingClient;

#[async_trait]
impl PeopleClient for PendingClient {
    fn data_source(&self) -> DataSourceId {
        DataSourceId::Typicode
    }

    async fn find_by_id(
        &self,
        _context: &CorrelationContext,
        _id: i64,
    ) -> Result<Person, UpstreamFault> {
        std::future::pending().await
    }

    async fn list_all(&self, _context: &CorrelationContext) -> Result<Vec<Person>, UpstreamFault> {
        std::future::pending().await
    }
}

/// Lookup service wired to one client with recording doubles
pub struct Harness {
    pub service: LookupService,
    pub sleeper: Arc<RecordingSleeper>,
    pub listener: Arc<CountingContextListener>,
}

pub fn harness(client: Arc<dyn PeopleClient>) -> Harness {
    let mut clients = HashMap::new();
    clients.insert(DataSourceId::Typicode, client);
    let router = DataSourceRouter::new(clients, DataSourceId::Typicode).unwrap();

    let sleeper = Arc::new(RecordingSleeper::new());
    let listener = Arc::new(CountingContextListener::new());
    let service =
        LookupService::new(ResourceKind::People, Arc::new(router), RetryConfig::default())
            .with_sleeper(sleeper.clone())
            .with_context_listener(listener.clone());

    Harness { service, sleeper, listener }
}

pub fn server_error(status: u16) -> UpstreamFault {
    UpstreamFault::ServerError { id: None, status, body: "upstream exploded".to_string() }
}
