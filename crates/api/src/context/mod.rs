//! Application context - dependency injection container
//!
//! Built once at startup from a validated [`BridgeConfig`]. Every upstream
//! client is constructed eagerly so a bad base URL or data source id fails
//! the process before it starts serving.

use std::collections::HashMap;
use std::sync::Arc;

use peoplebridge_common::observability::{ContextListener, TracingContextListener};
use peoplebridge_common::resilience::{RetryConfig, Sleeper};
use peoplebridge_core::{DataSourceRouter, LookupService, PeopleClient, ResourceKind};
use peoplebridge_domain::{BridgeConfig, ConfigResult, ConfigurationError, DataSourceId};
use peoplebridge_infra::{DummyJsonClient, HttpClient, ReqResClient, TypicodeClient};
use tracing::info;

/// Exponential backoff factor between attempts
const BACKOFF_BASE: f64 = 2.0;

/// Application context - holds all services and dependencies
#[derive(Debug)]
pub struct AppContext {
    pub config: BridgeConfig,
    pub router: Arc<DataSourceRouter>,
    pub people: Arc<LookupService>,
    pub users: Arc<LookupService>,
}

impl AppContext {
    /// Wire clients, router, and lookup services from `config`
    ///
    /// # Errors
    /// Returns a [`ConfigurationError`] if any client or the router cannot
    /// be built.
    pub fn new(config: BridgeConfig) -> ConfigResult<Self> {
        Self::build(config, None)
    }

    /// As [`AppContext::new`] but with a custom backoff sleeper
    ///
    /// # Errors
    /// See [`AppContext::new`].
    pub fn with_sleeper(config: BridgeConfig, sleeper: Arc<dyn Sleeper>) -> ConfigResult<Self> {
        Self::build(config, Some(sleeper))
    }

    fn build(config: BridgeConfig, sleeper: Option<Arc<dyn Sleeper>>) -> ConfigResult<Self> {
        config.validate()?;

        let http = HttpClient::builder()
            .timeout(config.client.request_timeout())
            .max_body_bytes(config.client.max_in_memory_size)
            .user_agent(config.client.user_agent.clone())
            .build()?;

        let router = Arc::new(DataSourceRouter::from_config(
            build_clients(&config, &http)?,
            &config.client.active_datasource,
        )?);
        let retry = retry_config(&config)?;
        let listener: Arc<dyn ContextListener> = Arc::new(TracingContextListener);

        let service = |kind| {
            let service = LookupService::new(kind, Arc::clone(&router), retry.clone())
                .with_context_listener(Arc::clone(&listener));
            Arc::new(match &sleeper {
                Some(sleeper) => service.with_sleeper(Arc::clone(sleeper)),
                None => service,
            })
        };
        let people = service(ResourceKind::People);
        let users = service(ResourceKind::User);

        info!(
            active = %router.active(),
            max_retries = retry.max_retries,
            max_body_bytes = config.client.max_in_memory_size,
            "Application context initialized"
        );

        Ok(Self { config, router, people, users })
    }
}

fn build_clients(
    config: &BridgeConfig,
    http: &HttpClient,
) -> ConfigResult<HashMap<DataSourceId, Arc<dyn PeopleClient>>> {
    let upstreams = &config.upstreams;
    let mut clients: HashMap<DataSourceId, Arc<dyn PeopleClient>> = HashMap::new();

    clients.insert(
        DataSourceId::Typicode,
        Arc::new(TypicodeClient::new(&upstreams.typicode.base_url, http.clone())?),
    );
    clients.insert(
        DataSourceId::Dummy,
        Arc::new(DummyJsonClient::new(&upstreams.dummy.base_url, http.clone())?),
    );
    clients.insert(
        DataSourceId::Reqres,
        Arc::new(ReqResClient::new(&upstreams.reqres.base_url, http.clone())?),
    );

    Ok(clients)
}

fn retry_config(config: &BridgeConfig) -> ConfigResult<RetryConfig> {
    RetryConfig::builder()
        .max_retries(config.retry.max_retries)
        .exponential_backoff(config.retry.base_delay(), BACKOFF_BASE, config.retry.max_delay())
        .build()
        .map_err(|err| ConfigurationError::Invalid(err.to_string()))
}
