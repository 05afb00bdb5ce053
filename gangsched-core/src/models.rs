use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

/// Phase of a pod as reported by the cluster API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl PodPhase {
    pub fn is_terminated(self) -> bool {
        matches!(self, PodPhase::Succeeded | PodPhase::Failed)
    }
}

/// Read-only view of a pod supplied by the cluster API.
///
/// Only the fields the scheduling/preemption decision engine actually reads
/// are carried; everything else in a real pod spec is irrelevant here.
#[derive(Debug, Clone)]
pub struct PodRecord {
    pub namespace: String,
    pub name: String,
    pub phase: PodPhase,
    pub node_name: Option<String>,
    pub scheduler_name: Option<String>,
    pub priority: Option<i64>,
    pub annotations: HashMap<String, String>,
    /// Kinds of the pod's owner references (e.g. `"DaemonSet"`).
    pub owner_kinds: Vec<String>,
    pub deletion_timestamp: Option<DateTime<Utc>>,
}

impl PodRecord {
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }
}

/// A worker node as reported by the cluster API. The node model is binary
/// free/occupied — no resource fit is modeled.
#[derive(Debug, Clone)]
pub struct NodeRecord {
    pub name: String,
}

/// Derived, never-persisted view of a node's occupancy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeStatus {
    pub name: String,
    pub is_free: bool,
}

/// A gang: pods sharing a gang-annotation value, treated as the unit of
/// preemption. Immutable once built — never mutated after a discovery pass.
#[derive(Debug, Clone)]
pub struct PodGroup {
    pub gang_id: String,
    pub pods: Vec<PodRecord>,
    pub size: usize,
    pub priority: i64,
}

impl PodGroup {
    pub(crate) fn new(gang_id: String, pods: Vec<PodRecord>, priority_annotation: &str) -> Self {
        let priority = pods
            .iter()
            .map(|p| effective_priority(p, priority_annotation))
            .max()
            .unwrap_or(0);
        PodGroup {
            gang_id,
            size: pods.len(),
            pods,
            priority,
        }
    }
}

pub const DEFAULT_GROUP_ANNOTATION: &str = "pod-group";
pub const DEFAULT_PRIORITY_ANNOTATION: &str = "priority";

/// Filter used by the gang discoverer when listing and grouping pods.
#[derive(Debug, Clone)]
pub struct Selector {
    pub max_priority: Option<i64>,
    pub group_annotation: String,
    pub priority_annotation: String,
    pub allowed_statuses: Option<HashSet<PodPhase>>,
}

impl Default for Selector {
    fn default() -> Self {
        Selector {
            max_priority: None,
            group_annotation: DEFAULT_GROUP_ANNOTATION.to_string(),
            priority_annotation: DEFAULT_PRIORITY_ANNOTATION.to_string(),
            allowed_statuses: None,
        }
    }
}

/// The integer used for ordering: pod-spec priority if set, else the parsed
/// annotation, else 0. A malformed annotation parses as 0.
pub fn effective_priority(pod: &PodRecord, priority_annotation: &str) -> i64 {
    if let Some(p) = pod.priority {
        return p;
    }
    match pod.annotation(priority_annotation) {
        Some(raw) => raw.parse::<i64>().unwrap_or(0),
        None => 0,
    }
}

/// The annotation value naming a pod's gang, or the empty string when absent
/// (the "ungrouped" bucket).
pub fn effective_gang_id(pod: &PodRecord, group_annotation: &str) -> String {
    pod.annotation(group_annotation).unwrap_or("").to_string()
}

/// A single delivery from the pod watch stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEventKind {
    Added,
    Modified,
    Deleted,
    Bookmark,
    Error,
}

#[derive(Debug, Clone)]
pub struct WatchEvent {
    pub kind: WatchEventKind,
    pub pod: PodRecord,
}
