//! HTTP control surface over a container engine.
//!
//! Lists containers and restarts them, one at a time or in batch, by
//! delegating to a [`ContainerEngine`] supplied at construction.

pub mod config;
pub mod error;
pub mod handlers;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};
use dockgate_common::ContainerEngine;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use config::GatewayConfig;
pub use error::{ConfigError, GatewayError};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn ContainerEngine>,
}

impl AppState {
    pub fn new(engine: Arc<dyn ContainerEngine>) -> Self {
        Self { engine }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health_handler))
        .route("/container-list", get(handlers::list_containers_handler))
        .route(
            "/specific-container-restart/:containerName",
            post(handlers::restart_container_handler),
        )
        .route(
            "/selected-containers-restart",
            post(handlers::restart_selected_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
