//! Gang-aware scheduling and priority preemption core.
//!
//! This crate holds the cluster-agnostic decision logic: classifying pods,
//! discovering free nodes and gangs, planning whole-gang preemption, and
//! driving the watch loop that binds pods to nodes. It knows nothing about
//! any particular cluster API — callers supply a [`ClusterApi`]
//! implementation, real or mocked.

pub mod classify;
pub mod cluster_api;
pub mod error;
pub mod gang;
pub mod models;
pub mod node;
pub mod preempt;
pub mod rng;
pub mod scheduler_loop;

pub use cluster_api::ClusterApi;
pub use error::SchedulerError;
pub use models::{
    effective_gang_id, effective_priority, NodeRecord, NodeStatus, PodGroup, PodPhase, PodRecord,
    Selector, WatchEvent, WatchEventKind, DEFAULT_GROUP_ANNOTATION, DEFAULT_PRIORITY_ANNOTATION,
};
pub use rng::{NodeRng, StdNodeRng};
pub use scheduler_loop::{run, schedulable, schedule_pod, Outcome};

#[cfg(any(test, feature = "test-util"))]
pub use cluster_api::MockClusterApi;
#[cfg(any(test, feature = "test-util"))]
pub use rng::FixedNodeRng;
