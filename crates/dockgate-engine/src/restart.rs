//! Restart workflow shared by the single and batch restart endpoints.
//!
//! Each attempt re-inspects the container: a running container is stopped and
//! then started again, anything else is only started. There is no rollback, so
//! a failed start after a successful stop leaves the container stopped.

use dockgate_common::{ContainerEngine, RestartAction, RestartOutcome, Result};
use futures::future::join_all;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

#[instrument(skip(engine))]
pub async fn restart_container(engine: &dyn ContainerEngine, id: &str) -> Result<RestartOutcome> {
    let status = engine.inspect_container(id).await?;

    let action = if status.running {
        engine.stop_container(id).await?;
        engine.start_container(id).await?;
        RestartAction::StoppedAndStarted
    } else {
        engine.start_container(id).await?;
        RestartAction::Started
    };

    info!(action = action.describe(), "Restarted container {}", id);
    Ok(RestartOutcome {
        container_name: id.to_string(),
        action,
    })
}

pub fn failure_message(id: &str, err: &impl Display) -> String {
    format!("Error stopping or starting container {id}: {err}")
}

/// Run one restart and fold the result into the message reported for it.
pub async fn restart_message(engine: &dyn ContainerEngine, id: &str) -> String {
    match restart_container(engine, id).await {
        Ok(outcome) => outcome.to_string(),
        Err(e) => {
            warn!("Restart of container {} failed: {}", id, e);
            failure_message(id, &e)
        }
    }
}

/// Restart every container concurrently and wait for all of them.
///
/// Each container gets its own task, so a panic in one restart neither
/// cancels the others nor escapes: it becomes that slot's failure message.
/// The result has one message per input id, in input order.
#[instrument(skip(engine, ids))]
pub async fn restart_many<I>(engine: Arc<dyn ContainerEngine>, ids: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let ids: Vec<String> = ids.into_iter().collect();
    info!(count = ids.len(), "Restarting selected containers");

    let handles: Vec<_> = ids
        .iter()
        .map(|id| {
            let engine = engine.clone();
            let id = id.clone();
            tokio::spawn(async move { restart_message(engine.as_ref(), &id).await })
        })
        .collect();

    join_all(handles)
        .await
        .into_iter()
        .zip(&ids)
        .map(|(joined, id)| {
            joined.unwrap_or_else(|e| {
                error!("Restart task for container {} failed: {}", id, e);
                failure_message(id, &e)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{EngineCall, FakeEngine};
    use dockgate_common::EngineError;
    use std::time::Duration;

    #[tokio::test]
    async fn test_running_container_is_stopped_then_started() {
        let engine = FakeEngine::new().with_container("web", true);

        let outcome = restart_container(&engine, "web").await.unwrap();

        assert_eq!(outcome.action, RestartAction::StoppedAndStarted);
        assert_eq!(
            engine.calls_for("web").await,
            vec![EngineCall::Inspect, EngineCall::Stop, EngineCall::Start]
        );
        assert!(engine.is_running("web").await);
    }

    #[tokio::test]
    async fn test_stopped_container_is_only_started() {
        let engine = FakeEngine::new().with_container("db", false);

        let outcome = restart_container(&engine, "db").await.unwrap();

        assert_eq!(outcome.action, RestartAction::Started);
        assert_eq!(
            engine.calls_for("db").await,
            vec![EngineCall::Inspect, EngineCall::Start]
        );
        assert!(engine.is_running("db").await);
    }

    #[tokio::test]
    async fn test_unknown_container_fails_at_inspect() {
        let engine = FakeEngine::new();

        let err = restart_container(&engine, "ghost").await.unwrap_err();

        assert!(matches!(err, EngineError::NotFound(_)));
        assert_eq!(engine.calls_for("ghost").await, vec![EngineCall::Inspect]);
    }

    #[tokio::test]
    async fn test_failed_start_after_stop_leaves_container_stopped() {
        let engine = FakeEngine::new()
            .with_container("web", true)
            .failing_start("web");

        let err = restart_container(&engine, "web").await.unwrap_err();

        assert!(matches!(err, EngineError::Api { .. }));
        assert!(!engine.is_running("web").await);
        assert_eq!(
            engine.calls_for("web").await,
            vec![EngineCall::Inspect, EngineCall::Stop, EngineCall::Start]
        );
    }

    #[tokio::test]
    async fn test_failed_stop_skips_start() {
        let engine = FakeEngine::new()
            .with_container("web", true)
            .failing_stop("web");

        assert!(restart_container(&engine, "web").await.is_err());
        assert_eq!(
            engine.calls_for("web").await,
            vec![EngineCall::Inspect, EngineCall::Stop]
        );
    }

    #[tokio::test]
    async fn test_restart_twice_repeats_same_transition() {
        let engine = FakeEngine::new().with_container("web", true);

        let first = restart_container(&engine, "web").await.unwrap();
        let second = restart_container(&engine, "web").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(engine.calls_for("web").await.len(), 6);
    }

    #[tokio::test]
    async fn test_restart_many_isolates_failures_and_keeps_order() {
        let engine = Arc::new(
            FakeEngine::new()
                .with_container("a", true)
                .with_container("c", false),
        );

        let messages = restart_many(
            engine.clone(),
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
        )
        .await;

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], "Container a stopped and started successfully.");
        assert!(messages[1].starts_with("Error stopping or starting container b: "));
        assert_eq!(messages[2], "Container c started successfully.");
    }

    #[tokio::test]
    async fn test_restart_many_runs_concurrently() {
        let engine = Arc::new(
            FakeEngine::new()
                .with_container("a", false)
                .with_container("b", false)
                .with_latency(Duration::from_millis(20)),
        );

        let messages = restart_many(engine.clone(), vec!["a".to_string(), "b".to_string()]).await;

        assert_eq!(messages.len(), 2);
        assert_eq!(engine.max_in_flight(), 2);
    }

    #[tokio::test]
    async fn test_restart_many_panic_stays_in_its_slot() {
        let engine = Arc::new(
            FakeEngine::new()
                .with_container("bad", true)
                .with_container("good", true)
                .panicking_on("bad")
                .with_latency(Duration::from_millis(50)),
        );

        let messages =
            restart_many(engine.clone(), vec!["bad".to_string(), "good".to_string()]).await;

        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with("Error stopping or starting container bad: "));
        assert_eq!(messages[1], "Container good stopped and started successfully.");
        assert_eq!(
            engine.calls_for("good").await,
            vec![EngineCall::Inspect, EngineCall::Stop, EngineCall::Start]
        );
        assert!(engine.is_running("good").await);
    }

    #[tokio::test]
    async fn test_restart_many_empty() {
        let engine = Arc::new(FakeEngine::new());

        let messages = restart_many(engine.clone(), Vec::<String>::new()).await;

        assert!(messages.is_empty());
        assert_eq!(engine.call_count().await, 0);
    }
}
