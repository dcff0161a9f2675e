use std::fmt::Display;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine could not be reached at all (socket missing, daemon down).
    #[error("{0}")]
    Connection(String),

    #[error("{0}")]
    NotFound(String),

    /// The engine answered but refused the call.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Other(String),
}

// Define the primary Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Read-only projection of the metadata the engine reports for one container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSummary {
    pub id: String,
    pub name: String,
    pub image: String,
    pub state: String,
}

/// The part of an inspect reply the restart workflow looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContainerStatus {
    pub running: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartAction {
    /// The container was running: stop, then start.
    StoppedAndStarted,
    /// The container was not running: start only.
    Started,
}

impl RestartAction {
    pub fn describe(&self) -> &'static str {
        match self {
            RestartAction::StoppedAndStarted => "stopped and started",
            RestartAction::Started => "started",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartOutcome {
    pub container_name: String,
    pub action: RestartAction,
}

impl Display for RestartOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Container {} {} successfully.",
            self.container_name,
            self.action.describe()
        )
    }
}

/// The four engine calls the gateway depends on.
///
/// Identifiers are container names or ids, passed through to the engine as-is.
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    /// All containers, running and stopped, in the order the engine reports them.
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>>;

    async fn inspect_container(&self, id: &str) -> Result<ContainerStatus>;

    async fn stop_container(&self, id: &str) -> Result<()>;

    async fn start_container(&self, id: &str) -> Result<()>;
}
