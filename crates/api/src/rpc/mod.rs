//! JSON-over-HTTP RPC surface
//!
//! Each RPC is a `POST /<package>.<Service>/<Method>` with a JSON body.
//! Inbound `x-request-id`/`x-correlation-id` headers seed the call's
//! [`CorrelationContext`]; every reply echoes the request id and carries the
//! numeric protocol status in `x-rpc-status`.

pub mod people;
pub mod user;

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use peoplebridge_common::observability::CorrelationContext;
use peoplebridge_core::LookupService;
use peoplebridge_domain::constants::{CORRELATION_ID_HEADER, REQUEST_ID_HEADER, RPC_STATUS_HEADER};
use peoplebridge_domain::{Person, ProtocolStatus, UpstreamFault};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fault code reported for rejected request payloads
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";

/// Error returned by an RPC handler
#[derive(Debug, Error)]
pub enum RpcError {
    #[error(transparent)]
    Fault(#[from] UpstreamFault),

    /// The request was rejected before any upstream call
    #[error("{message}")]
    Validation { message: String, details: String },
}

impl RpcError {
    pub fn validation(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Validation { message: message.into(), details: details.into() }
    }

    pub fn protocol_status(&self) -> ProtocolStatus {
        match self {
            Self::Fault(fault) => fault.protocol_status(),
            Self::Validation { .. } => ProtocolStatus::InvalidArgument,
        }
    }

    pub fn fault_code(&self) -> &'static str {
        match self {
            Self::Fault(fault) => fault.code(),
            Self::Validation { .. } => VALIDATION_ERROR,
        }
    }

    pub fn details(&self) -> String {
        match self {
            Self::Fault(fault) => fault.details(),
            Self::Validation { details, .. } => details.clone(),
        }
    }
}

impl From<JsonRejection> for RpcError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation("Malformed request body", rejection.body_text())
    }
}

/// Error body delivered to RPC callers
#[derive(Debug, Serialize)]
struct RpcErrorBody {
    code: &'static str,
    status: u8,
    message: String,
    fault_code: &'static str,
    details: String,
}

/// HTTP status carrying a protocol status
pub fn http_status(status: ProtocolStatus) -> StatusCode {
    match status {
        ProtocolStatus::Ok => StatusCode::OK,
        ProtocolStatus::InvalidArgument => StatusCode::BAD_REQUEST,
        ProtocolStatus::NotFound => StatusCode::NOT_FOUND,
        ProtocolStatus::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        ProtocolStatus::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn status_header(status: ProtocolStatus) -> HeaderValue {
    HeaderValue::from(u16::from(status.code()))
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.protocol_status();
        let body = RpcErrorBody {
            code: status.as_str(),
            status: status.code(),
            message: self.to_string(),
            fault_code: self.fault_code(),
            details: self.details(),
        };

        let mut response = (http_status(status), Json(body)).into_response();
        response.headers_mut().insert(RPC_STATUS_HEADER, status_header(status));
        response
    }
}

/// `{ "id": n }`
#[derive(Debug, Deserialize)]
pub struct GetByIdRequest {
    pub id: i64,
}

/// `{}`
#[derive(Debug, Default, Deserialize)]
pub struct ListRequest {}

/// Build the call's context from inbound metadata headers
pub fn context_from_headers(headers: &HeaderMap) -> Arc<CorrelationContext> {
    let header = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());
    Arc::new(CorrelationContext::from_metadata(
        header(REQUEST_ID_HEADER),
        header(CORRELATION_ID_HEADER),
    ))
}

/// Serve a get-by-id RPC through `service`
pub(crate) async fn get_by_id(
    service: &LookupService,
    headers: &HeaderMap,
    body: Result<Json<GetByIdRequest>, JsonRejection>,
) -> Response {
    let context = context_from_headers(headers);
    let request_id = context.current_id();

    let result = async {
        let Json(request) = body?;
        if request.id <= 0 {
            return Err(RpcError::validation(
                "id must be a positive integer",
                format!("id: {}", request.id),
            ));
        }
        Ok(service.get_by_id(context, request.id).await?)
    }
    .await;

    reply(&request_id, result.map(Json))
}

/// Serve a list RPC through `service`, wrapping the people with `wrap`
pub(crate) async fn list_all<T: Serialize>(
    service: &LookupService,
    headers: &HeaderMap,
    body: Result<Json<ListRequest>, JsonRejection>,
    wrap: impl FnOnce(Vec<Person>) -> T,
) -> Response {
    let context = context_from_headers(headers);
    let request_id = context.current_id();

    let result = async {
        body?;
        Ok::<_, RpcError>(wrap(service.list_all(context).await?))
    }
    .await;

    reply(&request_id, result.map(Json))
}

fn reply(request_id: &str, result: Result<impl IntoResponse, RpcError>) -> Response {
    let mut response = match result {
        Ok(ok) => {
            let mut response = ok.into_response();
            response.headers_mut().insert(RPC_STATUS_HEADER, status_header(ProtocolStatus::Ok));
            response
        }
        Err(err) => err.into_response(),
    };

    if let Ok(value) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
