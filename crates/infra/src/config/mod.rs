//! Configuration loading
//!
//! Builds a validated [`BridgeConfig`](peoplebridge_domain::BridgeConfig)
//! from defaults, an optional config file, and environment variables.

pub mod loader;

pub use loader::{
    apply_overrides, config_source, load, load_from_file, load_from_lookup, probe_config_paths,
};
