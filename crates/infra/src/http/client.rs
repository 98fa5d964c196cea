use std::time::Duration;

use peoplebridge_common::observability::CorrelationContext;
use peoplebridge_domain::constants::{
    CORRELATION_ID_HEADER, DEFAULT_MAX_IN_MEMORY_SIZE, DEFAULT_REQUEST_TIMEOUT_MS,
    DEFAULT_USER_AGENT, REQUEST_ID_HEADER,
};
use peoplebridge_domain::{ConfigurationError, UpstreamFault};
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::Client as ReqwestClient;
use tracing::debug;
use url::Url;

use crate::errors::InfraError;

/// Status and fully buffered body of one upstream response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl UpstreamResponse {
    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP client performing exactly one attempt per call, with a per-request
/// timeout and a cap on buffered body size.
///
/// Retrying is left to the caller so the retry decision can see classified
/// faults instead of raw transport errors.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_body_bytes: usize,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    ///
    /// # Errors
    /// Returns `ConfigurationError::Invalid` if the TLS backend cannot be
    /// initialised.
    pub fn new() -> Result<Self, ConfigurationError> {
        Self::builder().build()
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// Issue one GET to `url`, tagged with the context's identifiers.
    ///
    /// Any HTTP status is returned as-is; only failures to obtain a complete
    /// response are faults here.
    ///
    /// # Errors
    /// `UpstreamFault::TransportError` on connect failure, timeout, a body
    /// that fails mid-stream, or a body larger than the configured limit.
    pub async fn get(
        &self,
        context: &CorrelationContext,
        url: Url,
    ) -> Result<UpstreamResponse, UpstreamFault> {
        let mut request = self
            .client
            .get(url.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(REQUEST_ID_HEADER, context.current_id());
        if let Some(correlation_id) = context.correlation_id() {
            request = request.header(CORRELATION_ID_HEADER, correlation_id);
        }

        debug!(%url, "sending HTTP request");
        let mut response = request.send().await.map_err(into_fault)?;
        let status = response.status().as_u16();
        debug!(%url, status, "received HTTP response");

        if let Some(length) = response.content_length() {
            if length > self.max_body_bytes as u64 {
                return Err(self.body_too_large());
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(into_fault)? {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(self.body_too_large());
            }
            body.extend_from_slice(&chunk);
        }

        Ok(UpstreamResponse { status, body })
    }

    fn body_too_large(&self) -> UpstreamFault {
        UpstreamFault::transport(format!(
            "response body exceeds limit of {} bytes",
            self.max_body_bytes
        ))
    }
}

fn into_fault(err: reqwest::Error) -> UpstreamFault {
    InfraError::from(err).into()
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_body_bytes: usize,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            max_body_bytes: DEFAULT_MAX_IN_MEMORY_SIZE,
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
        }
    }
}

impl HttpClientBuilder {
    /// Bound on each request, connect through last body byte
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// # Errors
    /// `ConfigurationError::Invalid` for a zero body limit or when reqwest
    /// rejects the client configuration.
    pub fn build(self) -> Result<HttpClient, ConfigurationError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigurationError::Invalid("max body size must be greater than 0".into()));
        }

        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(|err| {
            ConfigurationError::Invalid(format!("failed to build HTTP client: {err}"))
        })?;

        Ok(HttpClient { client, max_body_bytes: self.max_body_bytes })
    }
}
