//! Conversions from external infrastructure errors into upstream faults.

use peoplebridge_domain::UpstreamFault;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain fault.
#[derive(Debug)]
pub struct InfraError(pub UpstreamFault);

impl From<InfraError> for UpstreamFault {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<UpstreamFault> for InfraError {
    fn from(value: UpstreamFault) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoUpstreamFault {
    fn into_fault(self) -> UpstreamFault;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → UpstreamFault */
/* -------------------------------------------------------------------------- */

impl IntoUpstreamFault for HttpError {
    fn into_fault(self) -> UpstreamFault {
        if self.is_timeout() {
            return UpstreamFault::transport("HTTP request timed out");
        }

        if self.is_connect() {
            return UpstreamFault::transport(format!("HTTP connection failure: {self}"));
        }

        if self.is_decode() || self.is_body() {
            return UpstreamFault::transport(format!("malformed response body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            if let Some(fault) = UpstreamFault::from_http_status(code, None, String::new()) {
                return fault;
            }
        }

        UpstreamFault::transport(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_fault())
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_round_trips_through_newtype() {
        let fault = UpstreamFault::mapping("email missing");
        let infra = InfraError::from(fault.clone());
        assert_eq!(UpstreamFault::from(infra), fault);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_fault() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener); // release the port so that requests fail with ECONNREFUSED

        let err = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .no_proxy()
            .build()
            .expect("client")
            .get(format!("http://{addr}"))
            .send()
            .await
            .expect_err("connection should be refused");

        let fault: UpstreamFault = InfraError::from(err).into();
        match fault {
            UpstreamFault::TransportError { cause } => {
                assert!(cause.contains("connection"), "unexpected cause: {cause}");
            }
            other => panic!("expected transport fault, got {other:?}"),
        }
    }
}
