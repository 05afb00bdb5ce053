//! Pure predicates over a pod record. No I/O, no `ClusterApi` dependency.

use crate::models::{PodPhase, PodRecord};

const SYSTEM_NAMESPACES: [&str; 3] = ["kube-system", "kube-public", "kube-node-lease"];

pub fn is_terminating(pod: &PodRecord) -> bool {
    pod.deletion_timestamp.is_some()
}

pub fn is_terminated_phase(phase: PodPhase) -> bool {
    phase.is_terminated()
}

pub fn is_system_namespace(pod: &PodRecord) -> bool {
    SYSTEM_NAMESPACES.contains(&pod.namespace.as_str())
}

pub fn is_daemon_owned(pod: &PodRecord) -> bool {
    pod.owner_kinds.iter().any(|k| k == "DaemonSet")
}

/// Pods for which this holds are immutable fixtures: neither candidates for
/// scheduling nor for eviction.
pub fn should_skip_for_scheduling(pod: &PodRecord) -> bool {
    is_system_namespace(pod) || is_daemon_owned(pod)
}
