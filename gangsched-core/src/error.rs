/// Distinguishable failure kinds for the scheduling/preemption decision
/// engine. Every kind here is caught inside `schedule_pod`, logged with the
/// pod identity, and leaves the pod abandoned for the next watch delivery —
/// the watch stream is the only retry mechanism.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("no free nodes available")]
    NoNodesAvailable,

    #[error("gang {0:?} not found")]
    GroupNotFound(String),

    #[error("insufficient preemptible capacity: need {need}, available {available}")]
    InsufficientCapacity { need: usize, available: usize },

    #[error("partial eviction of gang {gang_id:?}: evicted {evicted} of {expected}")]
    PartialEviction {
        gang_id: String,
        evicted: usize,
        expected: usize,
    },

    #[error("bind failed: {0}")]
    BindFailed(String),

    #[error("eviction failed for {namespace}/{pod_name}: {source}")]
    EvictionFailed {
        namespace: String,
        pod_name: String,
        #[source]
        source: anyhow::Error,
    },

    /// Any failure originating from the cluster API transport itself (list,
    /// watch, or a connection-level error) that isn't one of the specific
    /// kinds above.
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}
