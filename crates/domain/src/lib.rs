//! # People Bridge Domain
//!
//! Business domain types for the people/user lookup bridge.
//!
//! This crate contains:
//! - The [`Person`] resource and the [`DataSourceId`] router key
//! - The upstream fault taxonomy and its protocol status mapping
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - Depends only on the foundation tier of `peoplebridge-common`
//! - Pure domain models and data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod status;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use status::ProtocolStatus;
pub use types::*;
