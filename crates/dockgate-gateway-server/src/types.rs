use dockgate_common::ContainerSummary;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContainerListResponse {
    pub success: bool,
    pub containers: Vec<ContainerSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RestartResponse {
    pub success: bool,
    pub message: String,
}

/// One message per requested container, in request order.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchRestartResponse {
    pub success: bool,
    pub messages: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
