//! Node discoverer: computes free/occupied node status from the cluster's
//! current pod and node listings. The node model is binary free/occupied —
//! no CPU/memory fit is modeled.

use std::collections::HashSet;

use crate::classify::{is_daemon_owned, is_system_namespace};
use crate::cluster_api::ClusterApi;
use crate::error::SchedulerError;
use crate::models::{NodeStatus, PodPhase};

/// A node is occupied on a pod's account iff the pod is an "active user
/// pod": it has a phase of Running or Pending, is assigned to a node, and is
/// neither system-namespaced nor daemon-owned.
fn occupied_nodes(pods: &[crate::models::PodRecord]) -> HashSet<String> {
    pods.iter()
        .filter(|p| !is_system_namespace(p))
        .filter(|p| matches!(p.phase, PodPhase::Running | PodPhase::Pending))
        .filter(|p| !is_daemon_owned(p))
        .filter_map(|p| p.node_name.clone())
        .filter(|name| !name.is_empty())
        .collect()
}

pub async fn nodes_with_status(api: &dyn ClusterApi) -> Result<Vec<NodeStatus>, SchedulerError> {
    let nodes = api.list_nodes().await?;
    let pods = api.list_pods().await?;
    let used = occupied_nodes(&pods);

    Ok(nodes
        .into_iter()
        .map(|n| NodeStatus {
            is_free: !used.contains(&n.name),
            name: n.name,
        })
        .collect())
}

pub async fn free_nodes(api: &dyn ClusterApi) -> Result<Vec<NodeStatus>, SchedulerError> {
    Ok(nodes_with_status(api)
        .await?
        .into_iter()
        .filter(|n| n.is_free)
        .collect())
}

pub async fn count_free_nodes(api: &dyn ClusterApi) -> Result<usize, SchedulerError> {
    Ok(free_nodes(api).await?.len())
}
