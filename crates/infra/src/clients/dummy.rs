//! DummyJSON (`DUMMY`) client
//!
//! Names arrive split as `firstName`/`lastName` and lists are wrapped in a
//! `{"users": [...]}` envelope.

use async_trait::async_trait;
use peoplebridge_common::observability::CorrelationContext;
use peoplebridge_core::PeopleClient;
use peoplebridge_domain::{ConfigurationError, DataSourceId, Person, UpstreamFault};
use serde::Deserialize;

use super::{decode, full_name, map_all, records, require, unwrap_field, UpstreamEndpoint};
use crate::http::HttpClient;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DummyUser {
    id: Option<i64>,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
}

impl DummyUser {
    fn into_person(self) -> Result<Person, UpstreamFault> {
        let id = require(self.id, "id")?;
        let first = require(self.first_name, "firstName")?;
        let last = require(self.last_name, "lastName")?;
        let email = require(self.email, "email")?;
        Ok(Person::new(id, full_name(&first, &last), email))
    }
}

#[derive(Debug, Clone)]
pub struct DummyJsonClient {
    endpoint: UpstreamEndpoint,
}

impl DummyJsonClient {
    /// # Errors
    /// `ConfigurationError::Invalid` for an unusable base URL.
    pub fn new(base_url: &str, http: HttpClient) -> Result<Self, ConfigurationError> {
        Ok(Self { endpoint: UpstreamEndpoint::new(DataSourceId::Dummy, base_url, http)? })
    }
}

#[async_trait]
impl PeopleClient for DummyJsonClient {
    fn data_source(&self) -> DataSourceId {
        DataSourceId::Dummy
    }

    async fn find_by_id(
        &self,
        context: &CorrelationContext,
        id: i64,
    ) -> Result<Person, UpstreamFault> {
        let body = self.endpoint.fetch(context, &format!("users/{id}"), Some(id)).await?;
        decode::<DummyUser>(body)?.into_person()
    }

    async fn list_all(&self, context: &CorrelationContext) -> Result<Vec<Person>, UpstreamFault> {
        let body = self.endpoint.fetch(context, "users", None).await?;
        let users = records(unwrap_field(body, "users")?)?;
        map_all(users, |record| decode::<DummyUser>(record)?.into_person())
    }
}
