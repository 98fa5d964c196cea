//! Data source router
//!
//! A lookup table from [`DataSourceId`] to [`PeopleClient`], built once at
//! startup. Every check happens in the constructor so [`DataSourceRouter::route`]
//! cannot fail afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use peoplebridge_domain::{ConfigurationError, DataSourceId};
use tracing::info;

use super::ports::PeopleClient;

/// Selects the upstream client for the configured data source
pub struct DataSourceRouter {
    clients: HashMap<DataSourceId, Arc<dyn PeopleClient>>,
    active: DataSourceId,
    active_client: Arc<dyn PeopleClient>,
}

impl DataSourceRouter {
    /// Build a router over `clients` serving `active`.
    ///
    /// # Errors
    /// - [`ConfigurationError::EmptyMapping`] if `clients` is empty
    /// - [`ConfigurationError::MissingClient`] if `active` has no entry
    /// - [`ConfigurationError::Invalid`] if a client is registered under a
    ///   key other than its own data source
    pub fn new(
        clients: HashMap<DataSourceId, Arc<dyn PeopleClient>>,
        active: DataSourceId,
    ) -> Result<Self, ConfigurationError> {
        if clients.is_empty() {
            return Err(ConfigurationError::EmptyMapping);
        }

        let mismatched = clients.iter().find(|(key, client)| client.data_source() != **key);
        if let Some((key, client)) = mismatched {
            return Err(ConfigurationError::Invalid(format!(
                "client for {} registered under {key}",
                client.data_source()
            )));
        }

        let active_client =
            clients.get(&active).cloned().ok_or(ConfigurationError::MissingClient(active))?;

        let router = Self { clients, active, active_client };
        info!(
            active = %router.active,
            registered = ?router.registered(),
            "Data source router configured"
        );
        Ok(router)
    }

    /// Build a router from the textual data source id found in configuration.
    ///
    /// # Errors
    /// [`ConfigurationError::UnknownDataSource`] if `active` does not name a
    /// known data source, otherwise as [`DataSourceRouter::new`].
    pub fn from_config(
        clients: HashMap<DataSourceId, Arc<dyn PeopleClient>>,
        active: &str,
    ) -> Result<Self, ConfigurationError> {
        let active = active.parse::<DataSourceId>()?;
        Self::new(clients, active)
    }

    /// The active client
    pub fn route(&self) -> &Arc<dyn PeopleClient> {
        &self.active_client
    }

    pub fn active(&self) -> DataSourceId {
        self.active
    }

    /// Registered data sources, sorted
    pub fn registered(&self) -> Vec<DataSourceId> {
        let mut ids: Vec<_> = self.clients.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl fmt::Debug for DataSourceRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSourceRouter")
            .field("active", &self.active)
            .field("registered", &self.registered())
            .finish()
    }
}
