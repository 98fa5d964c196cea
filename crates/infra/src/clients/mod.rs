//! Upstream people clients
//!
//! One adapter per data source, all implementing
//! [`PeopleClient`](peoplebridge_core::PeopleClient). They share
//! [`UpstreamEndpoint`], which performs the single GET of an attempt, logs
//! it, and classifies the HTTP outcome before any payload is decoded.
//!
//! A 2xx body that is not JSON at all is a `TransportError`. Anything that
//! parses is then decoded record by record into structs with optional fields
//! and mapped with [`require`], so a wrongly typed, null or absent field
//! surfaces as a non-retryable `MappingError`.

pub mod dummy;
pub mod reqres;
pub mod typicode;

use std::time::Instant;

use peoplebridge_common::observability::CorrelationContext;
use peoplebridge_domain::{ConfigurationError, DataSourceId, UpstreamFault};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

pub use dummy::DummyJsonClient;
pub use reqres::ReqResClient;
pub use typicode::TypicodeClient;

use crate::http::HttpClient;

/// Base URL plus transport for one upstream
#[derive(Debug, Clone)]
pub struct UpstreamEndpoint {
    data_source: DataSourceId,
    base_url: Url,
    http: HttpClient,
}

impl UpstreamEndpoint {
    /// # Errors
    /// `ConfigurationError::Invalid` if `base_url` is not an absolute
    /// http(s) URL.
    pub fn new(
        data_source: DataSourceId,
        base_url: &str,
        http: HttpClient,
    ) -> Result<Self, ConfigurationError> {
        let mut base_url = Url::parse(base_url.trim()).map_err(|err| {
            ConfigurationError::Invalid(format!("invalid base URL for {data_source}: {err}"))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigurationError::Invalid(format!(
                "base URL for {data_source} must use http or https"
            )));
        }
        // Url::join treats a path without trailing slash as a file and drops it
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { data_source, base_url, http })
    }

    pub fn data_source(&self) -> DataSourceId {
        self.data_source
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET `route` (relative to the base URL) and parse a 2xx body as JSON.
    ///
    /// `id` is carried into `NotFound`/`ClientError`/`ServerError` faults.
    pub(crate) async fn fetch(
        &self,
        context: &CorrelationContext,
        route: &str,
        id: Option<i64>,
    ) -> Result<Value, UpstreamFault> {
        let url = self.base_url.join(route).map_err(|err| {
            UpstreamFault::transport(format!("invalid upstream route {route}: {err}"))
        })?;
        let data_source = self.data_source.as_str();
        let started = Instant::now();

        debug!(data_source, %url, "Upstream request started");

        let response = match self.http.get(context, url.clone()).await {
            Ok(response) => response,
            Err(fault) => {
                warn!(
                    data_source,
                    %url,
                    error_code = fault.code(),
                    duration_ms = elapsed_ms(started),
                    "Upstream request failed: {fault}"
                );
                return Err(fault);
            }
        };

        if let Some(fault) = UpstreamFault::from_http_status(response.status, id, response.text()) {
            warn!(
                data_source,
                %url,
                status = response.status,
                error_code = fault.code(),
                duration_ms = elapsed_ms(started),
                "Upstream request failed: {fault}"
            );
            return Err(fault);
        }

        info!(
            data_source,
            %url,
            status = response.status,
            duration_ms = elapsed_ms(started),
            "Upstream request succeeded"
        );

        serde_json::from_slice::<Value>(&response.body)
            .map_err(|err| UpstreamFault::transport(format!("malformed response body: {err}")))
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Unwrap a required record field or fail with a mapping fault
pub(crate) fn require<T>(value: Option<T>, field: &str) -> Result<T, UpstreamFault> {
    value.ok_or_else(|| {
        UpstreamFault::mapping(format!("required field `{field}` is null or absent"))
    })
}

/// Decode one upstream record; a shape mismatch is a mapping fault
pub(crate) fn decode<T: DeserializeOwned>(record: Value) -> Result<T, UpstreamFault> {
    serde_json::from_value(record)
        .map_err(|err| UpstreamFault::mapping(format!("malformed record: {err}")))
}

/// Take `field` out of an envelope object such as `{"data": ...}`
pub(crate) fn unwrap_field(body: Value, field: &str) -> Result<Value, UpstreamFault> {
    match body {
        Value::Object(mut object) => {
            require(object.remove(field).filter(|value| !value.is_null()), field)
        }
        other => Err(UpstreamFault::mapping(format!(
            "expected an object with `{field}`, got {}",
            json_kind(&other)
        ))),
    }
}

/// Split a list body into its records
pub(crate) fn records(body: Value) -> Result<Vec<Value>, UpstreamFault> {
    match body {
        Value::Array(records) => Ok(records),
        other => Err(UpstreamFault::mapping(format!(
            "expected an array of records, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// `first + " " + last`, exactly as the upstream spells them
pub(crate) fn full_name(first: &str, last: &str) -> String {
    format!("{first} {last}")
}

/// Map every record, failing the whole list on the first bad one
pub(crate) fn map_all<R, T>(
    records: Vec<R>,
    map: impl Fn(R) -> Result<T, UpstreamFault>,
) -> Result<Vec<T>, UpstreamFault> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            map(record).map_err(|fault| match fault {
                UpstreamFault::MappingError { reason } => {
                    UpstreamFault::mapping(format!("record {index}: {reason}"))
                }
                other => other,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use peoplebridge_common::error::ErrorClassification;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_base_url_gains_trailing_slash() {
        let endpoint = UpstreamEndpoint::new(
            DataSourceId::Reqres,
            "https://reqres.in/api",
            HttpClient::new().expect("http client"),
        )
        .expect("valid endpoint");

        assert_eq!(endpoint.base_url().as_str(), "https://reqres.in/api/");
        assert_eq!(
            endpoint.base_url().join("users/2").expect("join").as_str(),
            "https://reqres.in/api/users/2"
        );
    }

    #[test]
    fn test_rejects_invalid_base_urls() {
        let http = HttpClient::new().expect("http client");
        assert!(UpstreamEndpoint::new(DataSourceId::Dummy, "not a url", http.clone()).is_err());
        assert!(UpstreamEndpoint::new(DataSourceId::Dummy, "ftp://dummyjson.com", http).is_err());
    }

    #[test]
    fn test_require_reports_field() {
        let fault = require::<i64>(None, "id").expect_err("missing id");
        assert_eq!(fault, UpstreamFault::mapping("required field `id` is null or absent"));
    }

    #[test]
    fn test_full_name_joins_with_single_space() {
        assert_eq!(full_name("Emily", "Johnson"), "Emily Johnson");
        assert_eq!(full_name("Emily", ""), "Emily ");
    }

    #[test]
    fn test_decode_type_mismatch_is_mapping_error() {
        #[derive(Debug, serde::Deserialize)]
        struct Record {
            #[allow(dead_code)]
            id: Option<i64>,
        }

        let fault = decode::<Record>(json!({"id": "four"})).expect_err("string id");
        assert!(matches!(fault, UpstreamFault::MappingError { .. }), "{fault:?}");
        assert!(!fault.is_retryable());

        let fault = decode::<Record>(Value::Null).expect_err("null record");
        assert!(matches!(fault, UpstreamFault::MappingError { .. }), "{fault:?}");
    }

    #[test]
    fn test_unwrap_field_requires_object_with_value() {
        assert_eq!(unwrap_field(json!({"data": [1]}), "data"), Ok(json!([1])));
        assert_eq!(
            unwrap_field(json!({"data": null}), "data"),
            Err(UpstreamFault::mapping("required field `data` is null or absent"))
        );
        assert_eq!(
            unwrap_field(json!([]), "users"),
            Err(UpstreamFault::mapping("expected an object with `users`, got an array"))
        );
    }

    #[test]
    fn test_records_requires_array() {
        assert_eq!(records(json!([{}, null])).map(|r| r.len()), Ok(2));
        assert_eq!(
            records(json!({"id": 1})),
            Err(UpstreamFault::mapping("expected an array of records, got an object"))
        );
    }

    #[test]
    fn test_map_all_is_all_or_nothing() {
        let result = map_all(vec![Some(1), None, Some(3)], |value| require(value, "id"));
        assert_eq!(
            result,
            Err(UpstreamFault::mapping("record 1: required field `id` is null or absent"))
        );

        let result = map_all(vec![Some(1), Some(2)], |value| require(value, "id"));
        assert_eq!(result, Ok(vec![1, 2]));
    }
}
