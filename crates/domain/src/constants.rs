//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! bridge.

// Correlation metadata
pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";
pub const RPC_STATUS_HEADER: &str = "x-rpc-status";

// Upstream client defaults
pub const DEFAULT_MAX_IN_MEMORY_SIZE: usize = 5 * 1024 * 1024;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_USER_AGENT: &str = concat!("people-bridge/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_ACTIVE_DATASOURCE: &str = "TYPICODE";

// Retry defaults: 2 retries, 100ms base doubling per attempt
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_BASE_DELAY_MS: u64 = 100;
pub const DEFAULT_MAX_DELAY_MS: u64 = 5_000;

// Upstream base URLs
pub const TYPICODE_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DUMMY_BASE_URL: &str = "https://dummyjson.com";
pub const REQRES_BASE_URL: &str = "https://reqres.in/api";

// Inbound server
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:9090";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Prefix for configuration environment variables
pub const ENV_PREFIX: &str = "PEOPLE_BRIDGE_";
