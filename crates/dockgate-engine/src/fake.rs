//! In-memory [`ContainerEngine`] for tests.
//!
//! Keeps a running flag per container and records every call so tests can
//! assert the exact engine traffic a request produced.

use async_trait::async_trait;
use dockgate_common::{ContainerEngine, ContainerStatus, ContainerSummary, EngineError, Result};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCall {
    List,
    Inspect,
    Stop,
    Start,
}

#[derive(Debug, Clone)]
struct FakeContainer {
    id: String,
    name: String,
    image: String,
    running: bool,
}

#[derive(Default)]
pub struct FakeEngine {
    containers: Mutex<Vec<FakeContainer>>,
    calls: Mutex<Vec<(String, EngineCall)>>,
    failing_stop: HashSet<String>,
    failing_start: HashSet<String>,
    panicking: HashSet<String>,
    list_error: Option<String>,
    latency: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a container addressable by `name` (or by its generated id).
    pub fn with_container(mut self, name: &str, running: bool) -> Self {
        let containers = self.containers.get_mut();
        let id = format!("{:012x}", containers.len() + 1);
        containers.push(FakeContainer {
            id,
            name: name.to_string(),
            image: format!("{name}:latest"),
            running,
        });
        self
    }

    pub fn failing_stop(mut self, name: &str) -> Self {
        self.failing_stop.insert(name.to_string());
        self
    }

    pub fn failing_start(mut self, name: &str) -> Self {
        self.failing_start.insert(name.to_string());
        self
    }

    /// Panic inside `inspect_container` for this identifier.
    pub fn panicking_on(mut self, name: &str) -> Self {
        self.panicking.insert(name.to_string());
        self
    }

    pub fn failing_list(mut self, message: &str) -> Self {
        self.list_error = Some(message.to_string());
        self
    }

    /// Delay every call, to observe concurrency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub async fn calls_for(&self, id: &str) -> Vec<EngineCall> {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|(target, _)| target == id)
            .map(|(_, call)| *call)
            .collect()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    /// Highest number of engine calls that were in progress at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub async fn is_running(&self, id: &str) -> bool {
        self.containers
            .lock()
            .await
            .iter()
            .any(|c| (c.name == id || c.id == id) && c.running)
    }

    async fn record(&self, id: &str, call: EngineCall) {
        self.calls.lock().await.push((id.to_string(), call));

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    async fn set_running(&self, id: &str, running: bool) -> Result<()> {
        let mut containers = self.containers.lock().await;
        let container = containers
            .iter_mut()
            .find(|c| c.name == id || c.id == id)
            .ok_or_else(|| no_such_container(id))?;
        container.running = running;
        Ok(())
    }
}

fn no_such_container(id: &str) -> EngineError {
    EngineError::NotFound(format!("No such container: {id}"))
}

#[async_trait]
impl ContainerEngine for FakeEngine {
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>> {
        self.record("", EngineCall::List).await;
        if let Some(message) = &self.list_error {
            return Err(EngineError::Connection(message.clone()));
        }

        Ok(self
            .containers
            .lock()
            .await
            .iter()
            .map(|c| ContainerSummary {
                id: c.id.clone(),
                name: format!("/{}", c.name),
                image: c.image.clone(),
                state: if c.running { "running" } else { "exited" }.to_string(),
            })
            .collect())
    }

    async fn inspect_container(&self, id: &str) -> Result<ContainerStatus> {
        self.record(id, EngineCall::Inspect).await;
        if self.panicking.contains(id) {
            panic!("fake engine panicked while inspecting {id}");
        }

        self.containers
            .lock()
            .await
            .iter()
            .find(|c| c.name == id || c.id == id)
            .map(|c| ContainerStatus { running: c.running })
            .ok_or_else(|| no_such_container(id))
    }

    async fn stop_container(&self, id: &str) -> Result<()> {
        self.record(id, EngineCall::Stop).await;
        if self.failing_stop.contains(id) {
            return Err(EngineError::Api {
                status: 500,
                message: format!("cannot stop container: {id}"),
            });
        }
        self.set_running(id, false).await
    }

    async fn start_container(&self, id: &str) -> Result<()> {
        self.record(id, EngineCall::Start).await;
        if self.failing_start.contains(id) {
            return Err(EngineError::Api {
                status: 500,
                message: format!("cannot start container: {id}"),
            });
        }
        self.set_running(id, true).await
    }
}
