//! Pod operations
//!
//! Read and delete operations for Kubernetes Pods, plus the per-pod runtime
//! metrics view assembled from an already-fetched object.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{Container, ContainerState, Pod};

use crate::kubernetes::cluster::Cluster;
use crate::kubernetes::error::{OpResult, ResultExt};
use crate::kubernetes::meta;
use crate::kubernetes::types::{
    ContainerInfo, ContainerMetrics, PodConditionInfo, PodDetail, PodInfo, PodMetrics,
    ResourceRequest,
};

/// List pods in a namespace
pub async fn list_pods(cluster: &Cluster, namespace: &str) -> OpResult<Vec<Pod>> {
    cluster.pods(namespace).list().await.during("list pods")
}

/// Get a single pod
pub async fn get_pod(cluster: &Cluster, namespace: &str, name: &str) -> OpResult<Pod> {
    cluster.pods(namespace).get(name).await.during("get pod")
}

/// Delete a pod
pub async fn delete_pod(cluster: &Cluster, namespace: &str, name: &str) -> OpResult<()> {
    tracing::info!(namespace, name, "Deleting pod");
    cluster.pods(namespace).delete(name).await.during("delete pod")
}

/// Runtime metrics for a single pod
pub async fn pod_metrics(cluster: &Cluster, namespace: &str, name: &str) -> OpResult<PodMetrics> {
    let pod = get_pod(cluster, namespace, name).await?;
    Ok(metrics_from_pod(&pod))
}

pub fn metrics_from_pod(pod: &Pod) -> PodMetrics {
    let status = pod.status.clone().unwrap_or_default();

    let containers: BTreeMap<String, ContainerMetrics> = status
        .container_statuses
        .iter()
        .flatten()
        .map(|cs| {
            (
                cs.name.clone(),
                ContainerMetrics {
                    ready: cs.ready,
                    restart_count: cs.restart_count,
                    state: container_state(cs.state.as_ref()),
                },
            )
        })
        .collect();

    let conditions = status
        .conditions
        .iter()
        .flatten()
        .map(|c| PodConditionInfo {
            type_: c.type_.clone(),
            status: c.status.clone(),
            reason: c.reason.clone(),
            message: c.message.clone(),
        })
        .collect();

    let resource_requests = pod
        .spec
        .as_ref()
        .map(|spec| spec.containers.iter().map(resource_request).collect())
        .unwrap_or_default();

    PodMetrics {
        phase: status.phase,
        host_ip: status.host_ip,
        pod_ip: status.pod_ip,
        start_time: status.start_time.map(|t| t.0.to_rfc3339()),
        containers,
        conditions,
        resource_requests,
    }
}

/// Human-readable container state
pub fn container_state(state: Option<&ContainerState>) -> String {
    let Some(state) = state else {
        return "Unknown".to_string();
    };

    if state.running.is_some() {
        "Running".to_string()
    } else if let Some(waiting) = &state.waiting {
        format!("Waiting ({})", waiting.reason.as_deref().unwrap_or_default())
    } else if let Some(terminated) = &state.terminated {
        format!(
            "Terminated ({})",
            terminated.reason.as_deref().unwrap_or_default()
        )
    } else {
        "Unknown".to_string()
    }
}

fn resource_request(container: &Container) -> ResourceRequest {
    let requests = container
        .resources
        .as_ref()
        .and_then(|r| r.requests.as_ref());

    ResourceRequest {
        name: container.name.clone(),
        cpu: requests.and_then(|r| r.get("cpu")).map(|q| q.0.clone()),
        memory: requests.and_then(|r| r.get("memory")).map(|q| q.0.clone()),
    }
}

pub fn container_info(container: &Container) -> ContainerInfo {
    ContainerInfo {
        name: container.name.clone(),
        image: container.image.clone(),
        ports: container.ports.clone().unwrap_or_default(),
        env: container.env.clone().unwrap_or_default(),
        command: container.command.clone().unwrap_or_default(),
        args: container.args.clone().unwrap_or_default(),
    }
}

/// Convert k8s Pod to PodInfo
pub fn pod_to_info(pod: &Pod) -> PodInfo {
    let metadata = &pod.metadata;
    let status = pod.status.as_ref();

    PodInfo {
        name: metadata.name.clone().unwrap_or_default(),
        namespace: metadata.namespace.clone().unwrap_or_default(),
        status: status
            .and_then(|s| s.phase.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
        pod_ip: status.and_then(|s| s.pod_ip.clone()),
        host_ip: status.and_then(|s| s.host_ip.clone()),
        creation_time: meta::creation_time(metadata),
        labels: meta::labels(metadata),
    }
}

pub fn pod_to_detail(pod: &Pod) -> PodDetail {
    let spec = pod.spec.as_ref();

    PodDetail {
        summary: pod_to_info(pod),
        annotations: meta::annotations(&pod.metadata),
        node_name: spec.and_then(|s| s.node_name.clone()),
        containers: spec
            .map(|s| s.containers.iter().map(container_info).collect())
            .unwrap_or_default(),
    }
}
