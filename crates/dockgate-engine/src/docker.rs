//! bollard-backed implementation of [`ContainerEngine`].
//!
//! Talks to the local Docker daemon (or whatever `DOCKER_HOST` points at) and
//! reshapes its replies into the gateway's transient types.

use async_trait::async_trait;
use bollard::container::{
    InspectContainerOptions, ListContainersOptions, StartContainerOptions, StopContainerOptions,
};
use bollard::errors::Error as BollardError;
use bollard::models::ContainerSummary as DockerContainerSummary;
use bollard::Docker;
use dockgate_common::{ContainerEngine, ContainerStatus, ContainerSummary, EngineError, Result};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct DockerEngine {
    docker: Docker,
}

impl DockerEngine {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }

    /// Connect using the platform defaults (`DOCKER_HOST`, else the local socket).
    ///
    /// Connecting is lazy: an unreachable daemon only shows up on the first call.
    pub fn connect_with_local_defaults() -> Result<Self> {
        let docker = Docker::connect_with_local_defaults().map_err(engine_error)?;
        Ok(Self::new(docker))
    }
}

#[async_trait]
impl ContainerEngine for DockerEngine {
    #[instrument(skip(self))]
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>> {
        let options = ListContainersOptions::<String> {
            all: true,
            ..Default::default()
        };

        let containers = self
            .docker
            .list_containers(Some(options))
            .await
            .map_err(engine_error)?;

        debug!(count = containers.len(), "Listed containers");
        Ok(containers.into_iter().map(summarize).collect())
    }

    #[instrument(skip(self))]
    async fn inspect_container(&self, id: &str) -> Result<ContainerStatus> {
        let info = self
            .docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await
            .map_err(engine_error)?;

        let running = info.state.and_then(|s| s.running).unwrap_or(false);
        Ok(ContainerStatus { running })
    }

    #[instrument(skip(self))]
    async fn stop_container(&self, id: &str) -> Result<()> {
        self.docker
            .stop_container(id, None::<StopContainerOptions>)
            .await
            .map_err(engine_error)
    }

    #[instrument(skip(self))]
    async fn start_container(&self, id: &str) -> Result<()> {
        self.docker
            .start_container(id, None::<StartContainerOptions<String>>)
            .await
            .map_err(engine_error)
    }
}

/// Project the engine's summary onto the four reported fields.
///
/// Names keep Docker's leading `/`; only the first declared name is used.
fn summarize(container: DockerContainerSummary) -> ContainerSummary {
    ContainerSummary {
        id: container.id.unwrap_or_default(),
        name: container
            .names
            .and_then(|names| names.into_iter().next())
            .unwrap_or_default(),
        image: container.image.unwrap_or_default(),
        state: container.state.unwrap_or_default(),
    }
}

fn engine_error(err: BollardError) -> EngineError {
    let message = err.to_string();
    match err {
        BollardError::DockerResponseServerError { status_code: 404, .. } => {
            EngineError::NotFound(message)
        }
        BollardError::DockerResponseServerError { status_code, .. } => EngineError::Api {
            status: status_code,
            message,
        },
        BollardError::SocketNotFoundError(_)
        | BollardError::IOError { .. }
        | BollardError::HyperResponseError { .. }
        | BollardError::HyperLegacyError { .. }
        | BollardError::RequestTimeoutError => EngineError::Connection(message),
        _ => EngineError::Other(message),
    }
}
