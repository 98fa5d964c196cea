//! # PeopleBridge Infrastructure
//!
//! Adapters behind the ports defined in `peoplebridge-core`.
//!
//! This crate contains:
//! - The outbound HTTP transport (single attempt, bounded body, correlation
//!   headers)
//! - One upstream client per data source
//! - Configuration loading from files and environment variables
//!
//! ## Architecture
//! - Implements traits defined in `peoplebridge-core`
//! - Contains all "impure" code (network and filesystem I/O)

pub mod clients;
pub mod config;
pub mod errors;
pub mod http;

pub use clients::{DummyJsonClient, ReqResClient, TypicodeClient, UpstreamEndpoint};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder, UpstreamResponse};
