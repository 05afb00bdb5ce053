//! Watch-driven scheduling loop. Processes pod watch events serially,
//! binding one pod at a time; concurrent scheduling is deliberately avoided
//! so the "free nodes" view stays coherent within a single decision.

use futures::StreamExt;
use log::{error, info, warn};

use crate::cluster_api::ClusterApi;
use crate::error::SchedulerError;
use crate::models::{effective_gang_id, PodPhase, WatchEvent, WatchEventKind};
use crate::node::free_nodes;
use crate::preempt::preempt_for;
use crate::rng::NodeRng;

/// Outcome of one `schedule_pod` attempt, for logging and tests. The loop
/// never acts on this beyond observing it — there is no in-process retry.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Bound { node_name: String },
    Abandoned,
}

/// A watch event is schedulable iff it is a fresh observation of a Pending
/// pod naming this scheduler with no node assigned yet.
pub fn schedulable(event: &WatchEvent, self_name: &str) -> bool {
    matches!(event.kind, WatchEventKind::Added | WatchEventKind::Modified)
        && event.pod.phase == PodPhase::Pending
        && event.pod.scheduler_name.as_deref() == Some(self_name)
        && event.pod.node_name.as_deref().unwrap_or("").is_empty()
}

async fn select_node(
    api: &dyn ClusterApi,
    rng: &mut dyn NodeRng,
) -> Result<String, SchedulerError> {
    let free = free_nodes(api).await?;
    if free.is_empty() {
        return Err(SchedulerError::NoNodesAvailable);
    }
    let idx = rng.choose_index(free.len());
    Ok(free[idx].name.clone())
}

/// Selects a node for `pod`, triggering preemption on shortage, and binds.
/// Every failure kind is caught here, logged with the pod's identity, and
/// the pod is abandoned for this event — it will re-appear on the watch
/// stream and can be retried then.
pub async fn schedule_pod(
    api: &dyn ClusterApi,
    rng: &mut dyn NodeRng,
    pod: &crate::models::PodRecord,
    group_annotation: &str,
) -> Outcome {
    let node_name = match select_node(api, rng).await {
        Ok(name) => name,
        Err(SchedulerError::NoNodesAvailable) => {
            let gang_id = effective_gang_id(pod, group_annotation);
            if let Err(e) = preempt_for(api, &gang_id).await {
                warn!(
                    "preemption failed for {}/{} (gang {gang_id:?}): {e}",
                    pod.namespace, pod.name
                );
                return Outcome::Abandoned;
            }
            match select_node(api, rng).await {
                Ok(name) => name,
                Err(e) => {
                    warn!(
                        "no node available for {}/{} even after preemption: {e}",
                        pod.namespace, pod.name
                    );
                    return Outcome::Abandoned;
                }
            }
        }
        Err(e) => {
            warn!("failed to select a node for {}/{}: {e}", pod.namespace, pod.name);
            return Outcome::Abandoned;
        }
    };

    info!("binding {}/{} -> {node_name}", pod.namespace, pod.name);
    match api.bind(&pod.namespace, &pod.name, &node_name).await {
        Ok(()) => Outcome::Bound { node_name },
        Err(e) => {
            error!("bind failed for {}/{}: {e}", pod.namespace, pod.name);
            Outcome::Abandoned
        }
    }
}

/// Consumes the pod watch stream until it terminates or errors at the
/// transport level. Non-schedulable events are silently ignored.
pub async fn run(
    api: &dyn ClusterApi,
    rng: &mut dyn NodeRng,
    self_name: &str,
    group_annotation: &str,
) -> Result<(), SchedulerError> {
    let mut events = api.watch_pods().await?;
    while let Some(event) = events.next().await {
        if schedulable(&event, self_name) {
            schedule_pod(api, rng, &event.pod, group_annotation).await;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster_api::MockClusterApi;
    use crate::models::{NodeRecord, PodRecord};
    use crate::rng::FixedNodeRng;
    use std::collections::HashMap;

    fn pending_pod(name: &str, scheduler_name: &str, node_name: Option<&str>) -> PodRecord {
        PodRecord {
            namespace: "default".to_string(),
            name: name.to_string(),
            phase: PodPhase::Pending,
            node_name: node_name.map(String::from),
            scheduler_name: Some(scheduler_name.to_string()),
            priority: None,
            annotations: HashMap::new(),
            owner_kinds: vec![],
            deletion_timestamp: None,
        }
    }

    fn event(kind: WatchEventKind, pod: PodRecord) -> WatchEvent {
        WatchEvent { kind, pod }
    }

    #[test]
    fn schedulable_requires_added_or_modified() {
        let pod = pending_pod("p", "foobar", None);
        assert!(schedulable(&event(WatchEventKind::Added, pod.clone()), "foobar"));
        assert!(schedulable(&event(WatchEventKind::Modified, pod.clone()), "foobar"));
        assert!(!schedulable(&event(WatchEventKind::Deleted, pod.clone()), "foobar"));
        assert!(!schedulable(&event(WatchEventKind::Bookmark, pod.clone()), "foobar"));
    }

    #[test]
    fn schedulable_requires_matching_scheduler_name() {
        let pod = pending_pod("p", "other-scheduler", None);
        assert!(!schedulable(&event(WatchEventKind::Added, pod), "foobar"));
    }

    #[test]
    fn schedulable_requires_pending_phase_and_no_node() {
        let mut pod = pending_pod("p", "foobar", None);
        pod.phase = PodPhase::Running;
        assert!(!schedulable(&event(WatchEventKind::Added, pod), "foobar"));

        let bound = pending_pod("p", "foobar", Some("node1"));
        assert!(!schedulable(&event(WatchEventKind::Added, bound), "foobar"));
    }

    #[tokio::test]
    async fn redelivery_of_a_bound_pod_is_never_schedulable() {
        // A pod delivered ADDED then bound; re-delivered MODIFIED with
        // nodeName set must not be schedulable.
        let pod = pending_pod("p", "foobar", None);
        assert!(schedulable(&event(WatchEventKind::Added, pod.clone()), "foobar"));

        let mut rebound = pod;
        rebound.node_name = Some("node1".to_string());
        assert!(!schedulable(
            &event(WatchEventKind::Modified, rebound),
            "foobar"
        ));
    }

    #[tokio::test]
    async fn schedule_pod_binds_when_a_free_node_exists() {
        let mut api = MockClusterApi::new();
        api.expect_list_nodes()
            .returning(|| Ok(vec![NodeRecord { name: "node1".to_string() }]));
        api.expect_list_pods().returning(|| Ok(vec![]));
        api.expect_bind()
            .withf(|ns, name, node| ns == "default" && name == "p" && node == "node1")
            .returning(|_, _, _| Ok(()));

        let pod = pending_pod("p", "foobar", None);
        let mut rng = FixedNodeRng(0);
        let outcome = schedule_pod(&api, &mut rng, &pod, "pod-group").await;
        assert_eq!(
            outcome,
            Outcome::Bound { node_name: "node1".to_string() }
        );
    }

    #[tokio::test]
    async fn schedule_pod_triggers_preemption_then_binds() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let mut low = pending_pod("low", "foobar", Some("node1"));
        low.phase = PodPhase::Running;
        low.priority = Some(1);
        low.annotations
            .insert("pod-group".to_string(), "L".to_string());

        let mut pending = pending_pod("h", "foobar", None);
        pending.priority = Some(1000);
        pending
            .annotations
            .insert("pod-group".to_string(), "H".to_string());

        let evicted = Arc::new(AtomicBool::new(false));

        let mut api = MockClusterApi::new();
        api.expect_list_nodes()
            .returning(|| Ok(vec![NodeRecord { name: "node1".to_string() }]));

        // Before eviction takes effect, "low" still occupies node1; after
        // evict() is called, subsequent listings no longer carry it,
        // mirroring a real eviction freeing the node it ran on. "h" itself
        // is already known to the cluster (it arrived over the watch
        // stream unscheduled) so every listing carries it too.
        let low_clone = low.clone();
        let pending_clone = pending.clone();
        let evicted_reader = evicted.clone();
        api.expect_list_pods().returning(move || {
            if evicted_reader.load(Ordering::SeqCst) {
                Ok(vec![pending_clone.clone()])
            } else {
                Ok(vec![low_clone.clone(), pending_clone.clone()])
            }
        });
        let evicted_writer = evicted.clone();
        api.expect_evict().returning(move |_, _, _| {
            evicted_writer.store(true, Ordering::SeqCst);
            Ok(())
        });
        api.expect_bind().returning(|_, _, _| Ok(()));

        let mut rng = FixedNodeRng(0);
        let outcome = schedule_pod(&api, &mut rng, &pending, "pod-group").await;
        assert_eq!(outcome, Outcome::Bound { node_name: "node1".to_string() });
    }

    #[tokio::test]
    async fn schedule_pod_abandons_when_no_nodes_and_preemption_is_infeasible() {
        let mut api = MockClusterApi::new();
        api.expect_list_nodes().returning(|| Ok(vec![]));
        api.expect_list_pods().returning(|| Ok(vec![]));

        let pod = pending_pod("p", "foobar", None);
        let mut rng = FixedNodeRng(0);
        let outcome = schedule_pod(&api, &mut rng, &pod, "pod-group").await;
        assert_eq!(outcome, Outcome::Abandoned);
    }
}
