//! Gang discoverer: groups a flat pod listing into priority-ordered gangs.

use std::collections::HashMap;

use crate::classify::should_skip_for_scheduling;
use crate::cluster_api::ClusterApi;
use crate::error::SchedulerError;
use crate::models::{
    effective_gang_id, effective_priority, PodGroup, PodRecord, Selector,
    DEFAULT_GROUP_ANNOTATION, DEFAULT_PRIORITY_ANNOTATION,
};

/// Lists all pods, applies the system/phase/priority filter chain, groups by
/// gang annotation, and returns the groups ordered `(priority asc, size
/// desc)` — preemption walks this list front-to-back.
pub async fn discover(
    api: &dyn ClusterApi,
    selector: &Selector,
) -> Result<Vec<PodGroup>, SchedulerError> {
    let pods = api.list_pods().await?;

    let pods: Vec<PodRecord> = pods
        .into_iter()
        .filter(|p| !should_skip_for_scheduling(p))
        .filter(|p| match &selector.allowed_statuses {
            Some(allowed) => allowed.contains(&p.phase),
            None => !p.phase.is_terminated(),
        })
        .filter(|p| match selector.max_priority {
            Some(max) => effective_priority(p, &selector.priority_annotation) <= max,
            None => true,
        })
        .collect();

    let mut buckets: HashMap<String, Vec<PodRecord>> = HashMap::new();
    for pod in pods {
        let gid = effective_gang_id(&pod, &selector.group_annotation);
        buckets.entry(gid).or_default().push(pod);
    }

    let mut groups: Vec<PodGroup> = buckets
        .into_iter()
        .map(|(gid, pods)| PodGroup::new(gid, pods, &selector.priority_annotation))
        .collect();

    groups.sort_by(|a, b| a.priority.cmp(&b.priority).then(b.size.cmp(&a.size)));
    Ok(groups)
}

/// Ground-truth snapshot of one gang's current membership, unfiltered —
/// includes terminating and terminated pods so callers like the preemption
/// planner get a conservative size comparison. Uses the default annotation
/// names regardless of any caller-supplied `Selector`.
pub async fn get_group(
    api: &dyn ClusterApi,
    gang_id: &str,
) -> Result<Option<PodGroup>, SchedulerError> {
    let pods = api.list_pods().await?;
    let members: Vec<PodRecord> = pods
        .into_iter()
        .filter(|p| effective_gang_id(p, DEFAULT_GROUP_ANNOTATION) == gang_id)
        .collect();

    if members.is_empty() {
        return Ok(None);
    }

    Ok(Some(PodGroup::new(
        gang_id.to_string(),
        members,
        DEFAULT_PRIORITY_ANNOTATION,
    )))
}
