//! Namespace operations

use k8s_openapi::api::core::v1::{Namespace, Pod};

use crate::kubernetes::cluster::Cluster;
use crate::kubernetes::error::{OpResult, ResultExt};
use crate::kubernetes::meta;
use crate::kubernetes::types::{NamespaceInfo, NamespaceMetrics, PhaseCounts};

/// List all namespaces
pub async fn list_namespaces(cluster: &Cluster) -> OpResult<Vec<Namespace>> {
    cluster.namespaces().list().await.during("list namespaces")
}

/// Get a namespace
pub async fn get_namespace(cluster: &Cluster, name: &str) -> OpResult<Namespace> {
    cluster.namespaces().get(name).await.during("get namespace")
}

/// Pod count by phase for a namespace
pub async fn namespace_metrics(cluster: &Cluster, name: &str) -> OpResult<NamespaceMetrics> {
    let pods = cluster
        .pods(name)
        .list()
        .await
        .during("get namespace metrics")?;

    Ok(count_phases(&pods))
}

pub fn count_phases(pods: &[Pod]) -> NamespaceMetrics {
    let mut status = PhaseCounts::default();

    for pod in pods {
        let phase = pod.status.as_ref().and_then(|s| s.phase.as_deref());
        match phase {
            Some("Running") => status.running += 1,
            Some("Pending") => status.pending += 1,
            Some("Succeeded") => status.succeeded += 1,
            Some("Failed") => status.failed += 1,
            _ => status.unknown += 1,
        }
    }

    NamespaceMetrics {
        pod_count: pods.len(),
        status,
    }
}

pub fn namespace_to_info(ns: &Namespace) -> NamespaceInfo {
    let metadata = &ns.metadata;

    NamespaceInfo {
        name: metadata.name.clone().unwrap_or_default(),
        status: ns
            .status
            .as_ref()
            .and_then(|s| s.phase.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
        creation_time: meta::creation_time(metadata),
        resource_version: metadata.resource_version.clone(),
        labels: meta::labels(metadata),
    }
}
