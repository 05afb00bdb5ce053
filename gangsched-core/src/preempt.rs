//! Preemption planner: selects and evicts whole lower-priority gangs until
//! a victim gang's capacity need is satisfied, or declares infeasible.

use log::warn;

use crate::classify::{is_terminated_phase, is_terminating, should_skip_for_scheduling};
use crate::cluster_api::ClusterApi;
use crate::error::SchedulerError;
use crate::gang::{discover, get_group};
use crate::models::Selector;

/// Evicts whole lower-priority gangs until `gang_id`'s size is covered, or
/// fails without evicting anything when total lower-priority capacity is
/// insufficient.
pub async fn preempt_for(api: &dyn ClusterApi, gang_id: &str) -> Result<(), SchedulerError> {
    let victim = get_group(api, gang_id)
        .await?
        .ok_or_else(|| SchedulerError::GroupNotFound(gang_id.to_string()))?;
    let need = victim.size;

    let selector = Selector {
        max_priority: Some(victim.priority - 1),
        ..Selector::default()
    };
    let candidates: Vec<_> = discover(api, &selector)
        .await?
        .into_iter()
        .filter(|g| g.gang_id != victim.gang_id)
        .collect();

    let available: usize = candidates.iter().map(|g| g.size).sum();
    if available < need {
        return Err(SchedulerError::InsufficientCapacity { need, available });
    }

    let mut evicted_total = 0usize;
    for candidate in &candidates {
        let evicted = preempt_group(api, &candidate.gang_id, 0, true)
            .await?
            .unwrap_or(0);
        if evicted < candidate.size {
            return Err(SchedulerError::PartialEviction {
                gang_id: candidate.gang_id.clone(),
                evicted,
                expected: candidate.size,
            });
        }
        evicted_total += evicted;
        if evicted_total >= need {
            break;
        }
    }

    Ok(())
}

/// Re-fetches `gang_id` from a fresh snapshot and evicts every member pod
/// that isn't already terminating, terminated, or a skip-fixture. Returns
/// the count of successful evictions, or `None` if the gang has vanished.
/// Per-pod eviction failures are swallowed into the count.
pub async fn preempt_group(
    api: &dyn ClusterApi,
    gang_id: &str,
    grace_seconds: u32,
    use_eviction: bool,
) -> Result<Option<usize>, SchedulerError> {
    let group = match get_group(api, gang_id).await? {
        Some(g) => g,
        None => return Ok(None),
    };

    let mut count = 0usize;
    for pod in &group.pods {
        if is_terminating(pod) || is_terminated_phase(pod.phase) {
            continue;
        }
        if should_skip_for_scheduling(pod) {
            continue;
        }
        if !use_eviction {
            continue;
        }
        match api.evict(&pod.namespace, &pod.name, grace_seconds).await {
            Ok(()) => count += 1,
            Err(e) => warn!(
                "eviction failed for {}/{}: {e}",
                pod.namespace, pod.name
            ),
        }
    }

    Ok(Some(count))
}
