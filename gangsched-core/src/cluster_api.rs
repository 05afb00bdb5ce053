use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::SchedulerError;
use crate::models::{NodeRecord, PodRecord, WatchEvent};

/// Narrow cluster collaborator the core schedules against. Mirrors a
/// standard container-orchestrator API: list pods/nodes cluster-wide, watch
/// pods, bind a pod to a node, and evict a pod. Implementations may talk to
/// a real cluster or be an in-memory fake for tests.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait ClusterApi: Send + Sync {
    async fn list_pods(&self) -> Result<Vec<PodRecord>, SchedulerError>;

    async fn list_nodes(&self) -> Result<Vec<NodeRecord>, SchedulerError>;

    async fn watch_pods(&self) -> Result<BoxStream<'static, WatchEvent>, SchedulerError>;

    async fn bind(
        &self,
        namespace: &str,
        pod_name: &str,
        node_name: &str,
    ) -> Result<(), SchedulerError>;

    /// Requests graceful termination subject to disruption policies. A
    /// policy-violation or other retryable failure is reported as `Err` and
    /// treated by the preemption planner as a non-success, not propagated.
    async fn evict(
        &self,
        namespace: &str,
        pod_name: &str,
        grace_seconds: u32,
    ) -> Result<(), SchedulerError>;
}
