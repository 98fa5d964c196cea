//! # People Bridge Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for upstream data sources (traits)
//! - The data source router
//! - The resilient lookup use case
//!
//! ## Architecture Principles
//! - Only depends on `peoplebridge-common` and `peoplebridge-domain`
//! - No HTTP or transport code
//! - All external dependencies via traits

pub mod people;

pub use people::ports::PeopleClient;
pub use people::router::DataSourceRouter;
pub use people::service::{LookupService, ResourceKind};
