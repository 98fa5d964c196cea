//! ReqRes (`REQRES`) client
//!
//! Both endpoints wrap their payload in a `{"data": ...}` envelope.

use async_trait::async_trait;
use peoplebridge_common::observability::CorrelationContext;
use peoplebridge_core::PeopleClient;
use peoplebridge_domain::{ConfigurationError, DataSourceId, Person, UpstreamFault};
use serde::Deserialize;

use super::{decode, full_name, map_all, records, require, unwrap_field, UpstreamEndpoint};
use crate::http::HttpClient;

#[derive(Debug, Deserialize)]
struct ReqResUser {
    id: Option<i64>,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
}

impl ReqResUser {
    fn into_person(self) -> Result<Person, UpstreamFault> {
        let id = require(self.id, "id")?;
        let first = require(self.first_name, "first_name")?;
        let last = require(self.last_name, "last_name")?;
        let email = require(self.email, "email")?;
        Ok(Person::new(id, full_name(&first, &last), email))
    }
}

#[derive(Debug, Clone)]
pub struct ReqResClient {
    endpoint: UpstreamEndpoint,
}

impl ReqResClient {
    /// # Errors
    /// `ConfigurationError::Invalid` for an unusable base URL.
    pub fn new(base_url: &str, http: HttpClient) -> Result<Self, ConfigurationError> {
        Ok(Self { endpoint: UpstreamEndpoint::new(DataSourceId::Reqres, base_url, http)? })
    }
}

#[async_trait]
impl PeopleClient for ReqResClient {
    fn data_source(&self) -> DataSourceId {
        DataSourceId::Reqres
    }

    async fn find_by_id(
        &self,
        context: &CorrelationContext,
        id: i64,
    ) -> Result<Person, UpstreamFault> {
        let body = self.endpoint.fetch(context, &format!("users/{id}"), Some(id)).await?;
        decode::<ReqResUser>(unwrap_field(body, "data")?)?.into_person()
    }

    async fn list_all(&self, context: &CorrelationContext) -> Result<Vec<Person>, UpstreamFault> {
        let body = self.endpoint.fetch(context, "users", None).await?;
        let users = records(unwrap_field(body, "data")?)?;
        map_all(users, |record| decode::<ReqResUser>(record)?.into_person())
    }
}
