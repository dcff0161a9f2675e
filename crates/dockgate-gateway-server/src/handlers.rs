//! HTTP endpoint handlers

use crate::error::GatewayError;
use crate::types::{BatchRestartResponse, ContainerListResponse, HealthResponse, RestartResponse};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Json,
};
use dockgate_engine::{failure_message, restart_container, restart_many};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

pub const INVALID_BATCH_REQUEST: &str =
    "Invalid request format. Please provide an array of container names in the request body.";

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
    })
}

#[instrument(skip(state))]
pub async fn list_containers_handler(
    State(state): State<AppState>,
) -> Result<Json<ContainerListResponse>, GatewayError> {
    let containers = state.engine.list_containers().await.map_err(|e| {
        error!("Failed to list containers: {}", e);
        GatewayError::Internal(format!("Error getting container list: {e}"))
    })?;

    Ok(Json(ContainerListResponse {
        success: true,
        containers,
    }))
}

/// Restart one container addressed by name or id.
///
/// The workflow runs on its own task so a client disconnect cannot cancel an
/// engine call halfway through a stop/start pair.
#[instrument(skip(state))]
pub async fn restart_container_handler(
    State(state): State<AppState>,
    Path(container_name): Path<String>,
) -> Result<Json<RestartResponse>, GatewayError> {
    info!("Restarting container: {}", container_name);

    let engine = state.engine.clone();
    let id = container_name.clone();
    let outcome = tokio::spawn(async move { restart_container(engine.as_ref(), &id).await })
        .await
        .map_err(|e| {
            error!("Restart task for {} failed: {}", container_name, e);
            GatewayError::Internal(format!("Error restarting specific container: {e}"))
        })?
        .map_err(|e| {
            warn!("Restart of container {} failed: {}", container_name, e);
            GatewayError::Internal(failure_message(&container_name, &e))
        })?;

    Ok(Json(RestartResponse {
        success: true,
        message: outcome.to_string(),
    }))
}

/// Restart every container named in `{"containerNames": [...]}` concurrently.
///
/// Per-container failures are reported in their slot; the response is 200
/// unless the body is unusable. Each restart runs on its own task, so a client
/// disconnect leaves in-flight engine calls running.
#[instrument(skip(state, body))]
pub async fn restart_selected_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<BatchRestartResponse>, GatewayError> {
    let names = parse_container_names(&body)
        .ok_or_else(|| GatewayError::BadRequest(INVALID_BATCH_REQUEST.to_string()))?;

    let messages = restart_many(state.engine.clone(), names).await;

    Ok(Json(BatchRestartResponse {
        success: true,
        messages,
    }))
}

/// Pull the identifier list out of a batch request body.
///
/// Returns `None` unless the body is a JSON object whose `containerNames` is an
/// array. Elements are rendered with [`identifier_text`].
fn parse_container_names(body: &[u8]) -> Option<Vec<String>> {
    let request: Value = serde_json::from_slice(body).ok()?;

    match request.get("containerNames")? {
        Value::Array(items) => Some(items.iter().map(identifier_text).collect()),
        _ => None,
    }
}

/// String form of an identifier, following JavaScript string conversion so
/// clients of the Node service see the same names: arrays join their elements
/// with `,` (null inside an array is empty) and objects become
/// `[object Object]`.
fn identifier_text(value: &Value) -> String {
    match value {
        Value::String(name) => name.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => identifier_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}
