//! Real `ClusterApi` adapter over a Kubernetes-compatible cluster, built on
//! `kube` and `k8s-openapi`. Everything cluster-specific (object shapes,
//! the binding and eviction subresources, watch bookmarks) lives here; the
//! core crate never sees a `k8s_openapi` type.

use anyhow::Context;
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use k8s_openapi::api::core::v1::{Binding, Node, Pod};
use kube::api::{EvictParams, ObjectMeta};
use kube::runtime::watcher;
use kube::runtime::watcher::Event;
use kube::{Api, Client, Config as KubeConfig};
use log::warn;

use gangsched_core::{ClusterApi, NodeRecord, PodPhase, PodRecord, SchedulerError, WatchEvent, WatchEventKind};

pub struct KubeClusterApi {
    client: Client,
    pods: Api<Pod>,
    nodes: Api<Node>,
}

impl KubeClusterApi {
    pub async fn connect(kubeconfig: Option<&str>) -> anyhow::Result<Self> {
        let client = match kubeconfig {
            Some(path) => {
                let kubeconfig = kube::config::Kubeconfig::read_from(path)
                    .with_context(|| format!("failed to read kubeconfig at {path}"))?;
                let config = KubeConfig::from_custom_kubeconfig(
                    kubeconfig,
                    &kube::config::KubeConfigOptions::default(),
                )
                .await
                .context("failed to build client config from kubeconfig")?;
                Client::try_from(config).context("failed to build kube client")?
            }
            None => Client::try_default()
                .await
                .context("failed to build in-cluster kube client")?,
        };

        Ok(KubeClusterApi {
            pods: Api::all(client.clone()),
            nodes: Api::all(client.clone()),
            client,
        })
    }
}

fn pod_record(pod: &Pod) -> PodRecord {
    let meta = &pod.metadata;
    let spec = pod.spec.as_ref();
    let status = pod.status.as_ref();

    let phase = match status.and_then(|s| s.phase.as_deref()) {
        Some("Pending") => PodPhase::Pending,
        Some("Running") => PodPhase::Running,
        Some("Succeeded") => PodPhase::Succeeded,
        Some("Failed") => PodPhase::Failed,
        _ => PodPhase::Unknown,
    };

    let owner_kinds = meta
        .owner_references
        .as_ref()
        .map(|refs| refs.iter().map(|r| r.kind.clone()).collect())
        .unwrap_or_default();

    PodRecord {
        namespace: meta.namespace.clone().unwrap_or_default(),
        name: meta.name.clone().unwrap_or_default(),
        phase,
        node_name: spec.and_then(|s| s.node_name.clone()),
        scheduler_name: spec.and_then(|s| s.scheduler_name.clone()),
        priority: spec.and_then(|s| s.priority).map(i64::from),
        annotations: meta.annotations.clone().unwrap_or_default(),
        owner_kinds,
        deletion_timestamp: meta.deletion_timestamp.as_ref().map(|t| t.0),
    }
}

fn node_record(node: &Node) -> NodeRecord {
    NodeRecord {
        name: node.metadata.name.clone().unwrap_or_default(),
    }
}

fn to_watch_event(event: Event<Pod>) -> Vec<WatchEvent> {
    match event {
        Event::Apply(pod) | Event::InitApply(pod) => {
            vec![WatchEvent { kind: WatchEventKind::Modified, pod: pod_record(&pod) }]
        }
        Event::Delete(pod) => vec![WatchEvent { kind: WatchEventKind::Deleted, pod: pod_record(&pod) }],
        Event::Init | Event::InitDone => vec![],
    }
}

#[async_trait]
impl ClusterApi for KubeClusterApi {
    async fn list_pods(&self) -> Result<Vec<PodRecord>, SchedulerError> {
        let list = self
            .pods
            .list(&Default::default())
            .await
            .map_err(|e| SchedulerError::Transport(e.into()))?;
        Ok(list.items.iter().map(pod_record).collect())
    }

    async fn list_nodes(&self) -> Result<Vec<NodeRecord>, SchedulerError> {
        let list = self
            .nodes
            .list(&Default::default())
            .await
            .map_err(|e| SchedulerError::Transport(e.into()))?;
        Ok(list.items.iter().map(node_record).collect())
    }

    async fn watch_pods(&self) -> Result<BoxStream<'static, WatchEvent>, SchedulerError> {
        let stream = watcher(self.pods.clone(), watcher::Config::default())
            .filter_map(|event| async move {
                match event {
                    Ok(e) => Some(futures::stream::iter(to_watch_event(e))),
                    Err(e) => {
                        warn!("pod watch stream error: {e}");
                        None
                    }
                }
            })
            .flatten();
        Ok(Box::pin(stream))
    }

    async fn bind(
        &self,
        namespace: &str,
        pod_name: &str,
        node_name: &str,
    ) -> Result<(), SchedulerError> {
        let binding = Binding {
            metadata: ObjectMeta {
                name: Some(pod_name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            target: k8s_openapi::api::core::v1::ObjectReference {
                kind: Some("Node".to_string()),
                name: Some(node_name.to_string()),
                ..Default::default()
            },
        };

        let body = serde_json::to_vec(&binding).map_err(|e| SchedulerError::BindFailed(e.to_string()))?;
        let request = http::Request::post(format!(
            "/api/v1/namespaces/{namespace}/pods/{pod_name}/binding"
        ))
        .header("content-type", "application/json")
        .body(body)
        .map_err(|e| SchedulerError::BindFailed(e.to_string()))?;

        self.client
            .request::<Binding>(request)
            .await
            .map(|_| ())
            .map_err(|e| SchedulerError::BindFailed(e.to_string()))
    }

    async fn evict(
        &self,
        namespace: &str,
        pod_name: &str,
        grace_seconds: u32,
    ) -> Result<(), SchedulerError> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let mut params = EvictParams::default();
        params.delete_options = Some(kube::api::DeleteParams {
            grace_period_seconds: Some(grace_seconds),
            ..Default::default()
        });

        pods.evict(pod_name, &params).await.map_err(|e| {
            SchedulerError::EvictionFailed {
                namespace: namespace.to_string(),
                pod_name: pod_name.to_string(),
                source: e.into(),
            }
        })?;
        Ok(())
    }
}
