//! Port interfaces for upstream people lookups
//!
//! These traits define the boundary between the lookup facade and the HTTP
//! adapters that talk to concrete upstreams.

use async_trait::async_trait;
use peoplebridge_common::observability::CorrelationContext;
use peoplebridge_domain::{DataSourceId, Person, UpstreamFault};

/// One upstream data source able to serve person lookups
///
/// Each call performs a single logical HTTP GET and classifies the outcome
/// before returning. Retrying is the caller's concern.
#[async_trait]
pub trait PeopleClient: Send + Sync {
    /// Data source this client talks to
    fn data_source(&self) -> DataSourceId;

    /// Fetch one person by id
    async fn find_by_id(
        &self,
        context: &CorrelationContext,
        id: i64,
    ) -> Result<Person, UpstreamFault>;

    /// Fetch every person. Fails as a whole if any record cannot be mapped.
    async fn list_all(&self, context: &CorrelationContext) -> Result<Vec<Person>, UpstreamFault>;
}
