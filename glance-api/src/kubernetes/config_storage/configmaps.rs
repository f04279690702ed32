//! ConfigMap operations
//!
//! CRUD operations for Kubernetes ConfigMaps plus the pod usage lookup.
//! Projections returned to callers carry key names only, never values.

use k8s_openapi::api::core::v1::ConfigMap;

use super::usage::{find_pods_using, UsageTarget};
use crate::kubernetes::cluster::Cluster;
use crate::kubernetes::error::{OpResult, ResultExt};
use crate::kubernetes::meta;
use crate::kubernetes::types::{
    ConfigMapInfo, ConfigMapUsage, CreateConfigMapRequest, UpdateConfigMapRequest,
};

/// List ConfigMaps in a namespace
pub async fn list_configmaps(cluster: &Cluster, namespace: &str) -> OpResult<Vec<ConfigMap>> {
    cluster
        .config_maps(namespace)
        .list()
        .await
        .during("list configmaps")
}

/// Get a specific ConfigMap
pub async fn get_configmap(cluster: &Cluster, namespace: &str, name: &str) -> OpResult<ConfigMap> {
    cluster
        .config_maps(namespace)
        .get(name)
        .await
        .during("get configmap")
}

/// Create a new ConfigMap
pub async fn create_configmap(
    cluster: &Cluster,
    namespace: &str,
    request: &CreateConfigMapRequest,
) -> OpResult<ConfigMap> {
    let configmap = build_configmap(namespace, request);

    tracing::info!(namespace, name = %request.name, "Creating ConfigMap");
    cluster
        .config_maps(namespace)
        .create(&configmap)
        .await
        .during("create configmap")
}

/// Update a ConfigMap by read-modify-write
pub async fn update_configmap(
    cluster: &Cluster,
    namespace: &str,
    name: &str,
    request: &UpdateConfigMapRequest,
) -> OpResult<ConfigMap> {
    let api = cluster.config_maps(namespace);
    let mut configmap = api.get(name).await.during("get configmap")?;

    apply_update(&mut configmap, request);

    api.replace(name, &configmap)
        .await
        .during("update configmap")
}

/// Delete a ConfigMap
pub async fn delete_configmap(cluster: &Cluster, namespace: &str, name: &str) -> OpResult<()> {
    cluster
        .config_maps(namespace)
        .delete(name)
        .await
        .during("delete configmap")
}

/// Pods in the namespace that reference this ConfigMap
pub async fn configmap_usage(
    cluster: &Cluster,
    namespace: &str,
    name: &str,
) -> OpResult<ConfigMapUsage> {
    let pods = find_pods_using(
        cluster,
        namespace,
        UsageTarget::ConfigMap(name),
        "list pods for configmap usage",
    )
    .await?;

    Ok(ConfigMapUsage {
        total_pods: pods.len(),
        pods_using_config_map: pods,
    })
}

pub fn build_configmap(namespace: &str, request: &CreateConfigMapRequest) -> ConfigMap {
    ConfigMap {
        metadata: meta::new_meta(
            namespace,
            &request.name,
            request.labels.as_ref(),
            request.annotations.as_ref(),
        ),
        data: request.data.clone(),
        binary_data: request.binary_data.clone(),
        immutable: None,
    }
}

/// Overlay the fields present in `request`
pub fn apply_update(configmap: &mut ConfigMap, request: &UpdateConfigMapRequest) {
    if let Some(data) = &request.data {
        configmap.data = Some(data.clone());
    }
    if let Some(binary_data) = &request.binary_data {
        configmap.binary_data = Some(binary_data.clone());
    }
    meta::overlay_meta(
        &mut configmap.metadata,
        request.labels.as_ref(),
        request.annotations.as_ref(),
    );
    meta::set_write_precondition(&mut configmap.metadata, request.resource_version.as_deref());
}

pub fn configmap_to_info(configmap: &ConfigMap) -> ConfigMapInfo {
    let metadata = &configmap.metadata;

    let keys: Vec<String> = configmap
        .data
        .as_ref()
        .map(|d| d.keys().cloned().collect())
        .unwrap_or_default();

    // Binary values are never exposed, only their keys
    let binary_keys: Vec<String> = configmap
        .binary_data
        .as_ref()
        .map(|bd| bd.keys().cloned().collect())
        .unwrap_or_default();

    ConfigMapInfo {
        name: metadata.name.clone().unwrap_or_default(),
        namespace: metadata.namespace.clone().unwrap_or_default(),
        data_count: keys.len() + binary_keys.len(),
        keys,
        binary_keys,
        labels: meta::labels(metadata),
        annotations: meta::annotations(metadata),
        creation_time: meta::creation_time(metadata),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubernetes::cluster::memory::MemoryCluster;
    use crate::kubernetes::error::RemoteError;
    use std::collections::BTreeMap;

    fn create_request() -> CreateConfigMapRequest {
        CreateConfigMapRequest {
            name: "app-config".to_string(),
            data: Some(BTreeMap::from([
                ("mode".to_string(), "production".to_string()),
                ("level".to_string(), "debug".to_string()),
            ])),
            binary_data: None,
            labels: Some(BTreeMap::from([("team".to_string(), "core".to_string())])),
            annotations: None,
        }
    }

    #[test]
    fn test_info_hides_values() {
        let configmap = build_configmap("default", &create_request());
        let info = configmap_to_info(&configmap);

        assert_eq!(info.keys, vec!["level", "mode"]);
        assert_eq!(info.data_count, 2);

        let json = serde_json::to_string(&info).unwrap();
        assert!(!json.contains("production"));
    }

    #[tokio::test]
    async fn test_empty_update_keeps_object() {
        let cluster = Cluster::new(MemoryCluster::new());
        let created = create_configmap(&cluster, "default", &create_request())
            .await
            .unwrap();

        let updated = update_configmap(
            &cluster,
            "default",
            "app-config",
            &UpdateConfigMapRequest::default(),
        )
        .await
        .unwrap();

        assert_eq!(updated.data, created.data);
        assert_eq!(updated.metadata.labels, created.metadata.labels);
        assert_ne!(
            updated.metadata.resource_version,
            created.metadata.resource_version
        );
    }

    #[tokio::test]
    async fn test_update_replaces_only_present_fields() {
        let cluster = Cluster::new(MemoryCluster::new());
        create_configmap(&cluster, "default", &create_request())
            .await
            .unwrap();

        let request = UpdateConfigMapRequest {
            data: Some(BTreeMap::from([("mode".to_string(), "staging".to_string())])),
            ..Default::default()
        };
        let updated = update_configmap(&cluster, "default", "app-config", &request)
            .await
            .unwrap();

        let data = updated.data.unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data["mode"], "staging");
        assert_eq!(meta::labels(&updated.metadata)["team"], "core");
    }

    #[tokio::test]
    async fn test_delete_missing_reports_not_found() {
        let cluster = Cluster::new(MemoryCluster::new());
        let err = delete_configmap(&cluster, "default", "nope")
            .await
            .unwrap_err();

        assert!(matches!(err.remote(), Some(RemoteError::NotFound { .. })));
        assert!(err.to_string().starts_with("delete configmap failed:"));
        assert!(err.to_string().contains("NotFound"));
    }
}
