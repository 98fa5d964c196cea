//! JSONPlaceholder (`TYPICODE`) client

use async_trait::async_trait;
use peoplebridge_common::observability::CorrelationContext;
use peoplebridge_core::PeopleClient;
use peoplebridge_domain::{ConfigurationError, DataSourceId, Person, UpstreamFault};
use serde::Deserialize;

use super::{decode, map_all, records, require, UpstreamEndpoint};
use crate::http::HttpClient;

#[derive(Debug, Deserialize)]
struct TypicodeUser {
    id: Option<i64>,
    name: Option<String>,
    email: Option<String>,
}

impl TypicodeUser {
    fn into_person(self) -> Result<Person, UpstreamFault> {
        Ok(Person::new(
            require(self.id, "id")?,
            require(self.name, "name")?,
            require(self.email, "email")?,
        ))
    }
}

/// Client for `GET users/{id}` and `GET users` on JSONPlaceholder
#[derive(Debug, Clone)]
pub struct TypicodeClient {
    endpoint: UpstreamEndpoint,
}

impl TypicodeClient {
    /// # Errors
    /// `ConfigurationError::Invalid` for an unusable base URL.
    pub fn new(base_url: &str, http: HttpClient) -> Result<Self, ConfigurationError> {
        Ok(Self { endpoint: UpstreamEndpoint::new(DataSourceId::Typicode, base_url, http)? })
    }
}

#[async_trait]
impl PeopleClient for TypicodeClient {
    fn data_source(&self) -> DataSourceId {
        DataSourceId::Typicode
    }

    async fn find_by_id(
        &self,
        context: &CorrelationContext,
        id: i64,
    ) -> Result<Person, UpstreamFault> {
        let body = self.endpoint.fetch(context, &format!("users/{id}"), Some(id)).await?;
        decode::<TypicodeUser>(body)?.into_person()
    }

    async fn list_all(&self, context: &CorrelationContext) -> Result<Vec<Person>, UpstreamFault> {
        let body = self.endpoint.fetch(context, "users", None).await?;
        map_all(records(body)?, |record| decode::<TypicodeUser>(record)?.into_person())
    }
}
