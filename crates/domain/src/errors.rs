//! Error types used throughout the bridge
//!
//! [`UpstreamFault`] is the closed taxonomy every upstream client returns.
//! Classification from an HTTP outcome and translation into a
//! [`ProtocolStatus`] are pure functions, so both are tested without
//! performing any I/O.

use std::time::Duration;

use peoplebridge_common::error::{ErrorClassification, ErrorSeverity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::status::ProtocolStatus;
use crate::types::DataSourceId;

/// Fault produced while fetching from an upstream data source
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UpstreamFault {
    /// The upstream answered 404
    #[error("{}", not_found_message(.id))]
    NotFound { id: Option<i64> },

    /// The upstream rejected the request with a 4xx other than 404
    #[error("Upstream rejected the request with HTTP {status}")]
    ClientError { id: Option<i64>, status: u16, body: String },

    /// The upstream failed with a 5xx
    #[error("Upstream failed with HTTP {status}")]
    ServerError { id: Option<i64>, status: u16, body: String },

    /// The request never produced a usable HTTP response
    #[error("Upstream transport failure: {cause}")]
    TransportError { cause: String },

    /// A successful response could not be mapped to a resource
    #[error("Could not map upstream response: {reason}")]
    MappingError { reason: String },
}

fn not_found_message(id: &Option<i64>) -> String {
    match id {
        Some(id) => format!("Person with id {id} not found"),
        None => "Resource not found".to_string(),
    }
}

impl UpstreamFault {
    /// Classify an HTTP status into a fault.
    ///
    /// Returns `None` for 2xx responses. Any status outside 2xx/4xx/5xx is
    /// treated as a transport failure since no usable response was produced.
    pub fn from_http_status(status: u16, id: Option<i64>, body: impl Into<String>) -> Option<Self> {
        match status {
            200..=299 => None,
            404 => Some(Self::NotFound { id }),
            400..=499 => Some(Self::ClientError { id, status, body: body.into() }),
            500..=599 => Some(Self::ServerError { id, status, body: body.into() }),
            other => Some(Self::TransportError { cause: format!("unexpected HTTP status {other}") }),
        }
    }

    pub fn transport(cause: impl Into<String>) -> Self {
        Self::TransportError { cause: cause.into() }
    }

    pub fn mapping(reason: impl Into<String>) -> Self {
        Self::MappingError { reason: reason.into() }
    }

    /// Stable machine code
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "RESOURCE_NOT_FOUND",
            Self::ClientError { .. } => "UPSTREAM_CLIENT_ERROR",
            Self::ServerError { .. } => "EXTERNAL_SERVICE_ERROR",
            Self::TransportError { .. } => "UPSTREAM_TRANSPORT_ERROR",
            Self::MappingError { .. } => "UPSTREAM_MAPPING_ERROR",
        }
    }

    /// Human-readable details attached to the fault
    pub fn details(&self) -> String {
        match self {
            Self::NotFound { id: Some(id) } => format!("id: {id}"),
            Self::NotFound { id: None } => String::new(),
            Self::ClientError { status, .. } | Self::ServerError { status, .. } => {
                format!("HTTP Status: {status}")
            }
            Self::TransportError { cause } => cause.clone(),
            Self::MappingError { reason } => reason.clone(),
        }
    }

    /// Upstream HTTP status, if the fault came from an HTTP response
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::ClientError { status, .. } | Self::ServerError { status, .. } => Some(*status),
            Self::TransportError { .. } | Self::MappingError { .. } => None,
        }
    }

    /// Protocol status delivered to RPC callers
    pub fn protocol_status(&self) -> ProtocolStatus {
        match self {
            Self::NotFound { .. } => ProtocolStatus::NotFound,
            Self::ClientError { status: 400 | 422, .. } => ProtocolStatus::InvalidArgument,
            Self::ClientError { .. } | Self::MappingError { .. } => ProtocolStatus::Internal,
            Self::ServerError { .. } | Self::TransportError { .. } => ProtocolStatus::Unavailable,
        }
    }
}

impl ErrorClassification for UpstreamFault {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::ServerError { .. } | Self::TransportError { .. })
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFound { .. } => ErrorSeverity::Info,
            Self::ClientError { .. } => ErrorSeverity::Warning,
            Self::ServerError { .. } | Self::TransportError { .. } | Self::MappingError { .. } => {
                ErrorSeverity::Error
            }
        }
    }

    fn is_critical(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Startup-time configuration failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Data source mapping must not be empty")]
    EmptyMapping,

    #[error("No client registered for active data source {0}")]
    MissingClient(DataSourceId),

    #[error("Unknown data source: {0}")]
    UnknownDataSource(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias for configuration loading
pub type ConfigResult<T> = std::result::Result<T, ConfigurationError>;
