//! People and user lookups
//!
//! - [`ports`]: the upstream client boundary implemented in infra
//! - [`router`]: selects the active upstream client, validated at startup
//! - [`service`]: the facade the RPC layer calls

pub mod ports;
pub mod router;
pub mod service;

pub use ports::PeopleClient;
pub use router::DataSourceRouter;
pub use service::{LookupService, ResourceKind};
