//! Shared helpers for `peoplebridge-infra` integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use peoplebridge_common::resilience::RetryConfig;
use peoplebridge_common::testing::{CountingContextListener, RecordingSleeper};
use peoplebridge_core::{DataSourceRouter, LookupService, PeopleClient, ResourceKind};
use peoplebridge_infra::HttpClient;

/// HTTP client with a short timeout so a stuck mock fails fast
pub fn http_client() -> HttpClient {
    HttpClient::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .expect("http client should build")
}

pub struct Harness {
    pub service: LookupService,
    pub sleeper: Arc<RecordingSleeper>,
    pub listener: Arc<CountingContextListener>,
}

/// Lookup service routing to `client` with the default retry budget and a
/// sleeper that records instead of waiting.
pub fn lookup_service(client: Arc<dyn PeopleClient>) -> Harness {
    let active = client.data_source();
    let router = DataSourceRouter::new([(active, client)].into_iter().collect(), active)
        .expect("router should build");

    let sleeper = Arc::new(RecordingSleeper::new());
    let listener = Arc::new(CountingContextListener::new());
    let service = LookupService::new(ResourceKind::People, Arc::new(router), RetryConfig::default())
        .with_sleeper(sleeper.clone())
        .with_context_listener(listener.clone());

    Harness { service, sleeper, listener }
}
