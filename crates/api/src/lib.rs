//! # PeopleBridge API
//!
//! Inbound RPC layer and process wiring.
//!
//! This crate contains:
//! - JSON-over-HTTP RPC handlers for the people and user services
//! - Application context (dependency injection)
//! - Server startup, graceful shutdown, and logging setup
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod context;
pub mod rpc;
pub mod server;
pub mod utils;

pub use context::AppContext;
pub use rpc::RpcError;
pub use server::{router, serve};
