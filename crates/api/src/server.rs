//! Inbound HTTP server
//!
//! Routes the RPC endpoints plus `GET /health` and shuts down gracefully on
//! Ctrl-C, letting in-flight calls finish.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::context::AppContext;
use crate::rpc::people::{get_people, list_people, GET_PEOPLE_PATH, LIST_PEOPLE_PATH};
use crate::rpc::user::{get_user, list_users, GET_USER_PATH, LIST_USERS_PATH};

pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub active_datasource: &'static str,
}

/// Build the application router
pub fn router(context: Arc<AppContext>) -> Router {
    Router::new()
        .route(GET_PEOPLE_PATH, post(get_people))
        .route(LIST_PEOPLE_PATH, post(list_people))
        .route(GET_USER_PATH, post(get_user))
        .route(LIST_USERS_PATH, post(list_users))
        .route(HEALTH_PATH, get(health))
        .with_state(context)
}

async fn health(State(context): State<Arc<AppContext>>) -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok", active_datasource: context.router.active().as_str() })
}

/// Serve on `listener` until Ctrl-C
///
/// # Errors
/// Returns the I/O error that stopped the server.
pub async fn serve(listener: TcpListener, context: Arc<AppContext>) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!(address = %addr, "RPC server starting");

    axum::serve(listener, router(context)).with_graceful_shutdown(shutdown_signal()).await?;

    info!("RPC server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for shutdown signal");
        // never resolve, so the server keeps running
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining in-flight calls");
}
