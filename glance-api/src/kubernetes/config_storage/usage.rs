//! Pod reference scan
//!
//! Finds the pods in a namespace that reference a config map or secret
//! through a volume, a bulk `envFrom` import, or a single `env[].valueFrom`.

use k8s_openapi::api::core::v1::{Container, Pod, Volume};

use crate::kubernetes::cluster::Cluster;
use crate::kubernetes::error::{OpResult, ResultExt};
use crate::kubernetes::types::{PodUsage, UsageEvidence};

/// The object being looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageTarget<'a> {
    ConfigMap(&'a str),
    Secret(&'a str),
}

impl UsageTarget<'_> {
    fn volume_matches(&self, volume: &Volume) -> bool {
        match self {
            UsageTarget::ConfigMap(name) => volume
                .config_map
                .as_ref()
                .is_some_and(|source| source.name == *name),
            UsageTarget::Secret(name) => volume
                .secret
                .as_ref()
                .and_then(|source| source.secret_name.as_deref())
                .is_some_and(|secret| secret == *name),
        }
    }

    fn env_from_matches(&self, container: &Container) -> bool {
        container.env_from.iter().flatten().any(|source| match self {
            UsageTarget::ConfigMap(name) => source
                .config_map_ref
                .as_ref()
                .is_some_and(|r| r.name == *name),
            UsageTarget::Secret(name) => {
                source.secret_ref.as_ref().is_some_and(|r| r.name == *name)
            }
        })
    }

    fn env_var_names<'c>(
        &'c self,
        container: &'c Container,
    ) -> impl Iterator<Item = &'c str> + 'c {
        container
            .env
            .iter()
            .flatten()
            .filter(move |var| {
                let Some(source) = var.value_from.as_ref() else {
                    return false;
                };
                match self {
                    UsageTarget::ConfigMap(name) => source
                        .config_map_key_ref
                        .as_ref()
                        .is_some_and(|r| r.name == *name),
                    UsageTarget::Secret(name) => source
                        .secret_key_ref
                        .as_ref()
                        .is_some_and(|r| r.name == *name),
                }
            })
            .map(|var| var.name.as_str())
    }
}

/// Collect the evidence one pod holds for `target`
pub fn pod_usage(pod: &Pod, target: UsageTarget<'_>) -> UsageEvidence {
    let mut evidence = UsageEvidence::default();
    let Some(spec) = pod.spec.as_ref() else {
        return evidence;
    };

    for volume in spec.volumes.iter().flatten() {
        if target.volume_matches(volume) {
            evidence.volume_mounts.push(volume.name.clone());
        }
    }

    for container in &spec.containers {
        if target.env_from_matches(container) {
            evidence.env_from.push(container.name.clone());
        }
        for var in target.env_var_names(container) {
            evidence.env_vars.push(format!("{}:{}", container.name, var));
        }
    }

    evidence
}

/// Filter an already-fetched pod list down to the pods that use `target`
///
/// Keeps list order; each pod appears at most once.
pub fn scan_pods(pods: &[Pod], target: UsageTarget<'_>) -> Vec<PodUsage> {
    pods.iter()
        .filter_map(|pod| {
            let usage = pod_usage(pod, target);
            if usage.is_empty() {
                return None;
            }
            Some(PodUsage {
                name: pod.metadata.name.clone().unwrap_or_default(),
                status: pod
                    .status
                    .as_ref()
                    .and_then(|s| s.phase.clone())
                    .unwrap_or_default(),
                usage,
            })
        })
        .collect()
}

/// List every pod in the namespace and scan it
pub async fn find_pods_using(
    cluster: &Cluster,
    namespace: &str,
    target: UsageTarget<'_>,
    operation: &str,
) -> OpResult<Vec<PodUsage>> {
    let pods = cluster.pods(namespace).list().await.during(operation)?;
    let using = scan_pods(&pods, target);

    tracing::debug!(
        namespace,
        scanned = pods.len(),
        matched = using.len(),
        "Usage scan complete"
    );

    Ok(using)
}
