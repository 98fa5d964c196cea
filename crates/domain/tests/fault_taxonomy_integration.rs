//! Integration tests for the upstream fault taxonomy
//!
//! Sweeps the full HTTP status range through classification, retry
//! eligibility, and protocol status translation.

use peoplebridge_common::error::ErrorClassification;
use peoplebridge_domain::{ProtocolStatus, UpstreamFault};

/// Every status classifies into exactly one outcome, and only 5xx responses
/// (plus non-HTTP transport failures) are retried.
#[test]
fn test_status_sweep_retry_eligibility() {
    for status in 100u16..=599 {
        let fault = UpstreamFault::from_http_status(status, Some(1), "body");

        match status {
            200..=299 => assert!(fault.is_none(), "{status} should be success"),
            500..=599 => {
                let fault = fault.expect("5xx is a fault");
                assert!(fault.is_retryable(), "{status} should be retryable");
                assert_eq!(fault.protocol_status(), ProtocolStatus::Unavailable);
            }
            400..=499 => {
                let fault = fault.expect("4xx is a fault");
                assert!(!fault.is_retryable(), "{status} must not be retried");
            }
            _ => {
                let fault = fault.expect("unexpected status is a fault");
                assert!(matches!(fault, UpstreamFault::TransportError { .. }));
            }
        }
    }
}

/// 404 is the only status that maps to NOT_FOUND and it carries the id.
#[test]
fn test_not_found_keeps_requested_id() {
    let fault = UpstreamFault::from_http_status(404, Some(42), "").expect("404 is a fault");

    assert_eq!(fault, UpstreamFault::NotFound { id: Some(42) });
    assert_eq!(fault.protocol_status(), ProtocolStatus::NotFound);
    assert_eq!(fault.protocol_status().code(), 5);
    assert_eq!(fault.to_string(), "Person with id 42 not found");
}

/// Client errors keep the upstream body for diagnostics but only surface the
/// status in details.
#[test]
fn test_client_error_details_hide_body() {
    let fault =
        UpstreamFault::from_http_status(400, Some(1), r#"{"error":"bad id"}"#).expect("fault");

    assert_eq!(fault.details(), "HTTP Status: 400");
    assert_eq!(fault.code(), "UPSTREAM_CLIENT_ERROR");
    assert_eq!(fault.protocol_status(), ProtocolStatus::InvalidArgument);
    match fault {
        UpstreamFault::ClientError { body, .. } => assert_eq!(body, r#"{"error":"bad id"}"#),
        other => panic!("expected client error, got {other:?}"),
    }
}
