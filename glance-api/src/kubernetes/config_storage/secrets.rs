//! K8s Secrets operations
//!
//! CRUD operations for Kubernetes Secrets.
//! Every Secret leaving this module has been through [`redact`]: key names
//! survive with empty values, `stringData` is dropped.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;

use super::usage::{find_pods_using, UsageTarget};
use crate::kubernetes::cluster::Cluster;
use crate::kubernetes::error::{OpResult, ResultExt};
use crate::kubernetes::meta;
use crate::kubernetes::types::{
    CreateSecretRequest, SecretInfo, SecretKeys, SecretUsage, UpdateSecretRequest,
};

const DEFAULT_SECRET_TYPE: &str = "Opaque";

/// List Secrets in a namespace
pub async fn list_secrets(cluster: &Cluster, namespace: &str) -> OpResult<Vec<Secret>> {
    let secrets = cluster
        .secrets(namespace)
        .list()
        .await
        .during("list secrets")?;

    Ok(secrets.into_iter().map(redact).collect())
}

/// Get a specific Secret (key names only, not values)
pub async fn get_secret(cluster: &Cluster, namespace: &str, name: &str) -> OpResult<Secret> {
    fetch_unredacted(cluster, namespace, name).await.map(redact)
}

/// Create a new Secret
pub async fn create_secret(
    cluster: &Cluster,
    namespace: &str,
    request: &CreateSecretRequest,
) -> OpResult<Secret> {
    let secret = build_secret(namespace, request);

    tracing::info!(namespace, name = %request.name, "Creating Secret");
    cluster
        .secrets(namespace)
        .create(&secret)
        .await
        .during("create secret")
        .map(redact)
}

/// Update a Secret, merging `stringData` into the existing values
pub async fn update_secret(
    cluster: &Cluster,
    namespace: &str,
    name: &str,
    request: &UpdateSecretRequest,
) -> OpResult<Secret> {
    let mut secret = fetch_unredacted(cluster, namespace, name).await?;

    apply_update(&mut secret, request);

    cluster
        .secrets(namespace)
        .replace(name, &secret)
        .await
        .during("update secret")
        .map(redact)
}

/// Delete a Secret
pub async fn delete_secret(cluster: &Cluster, namespace: &str, name: &str) -> OpResult<()> {
    cluster
        .secrets(namespace)
        .delete(name)
        .await
        .during("delete secret")
}

/// Key names and type of a Secret
pub async fn secret_keys(cluster: &Cluster, namespace: &str, name: &str) -> OpResult<SecretKeys> {
    let secret = get_secret(cluster, namespace, name).await?;

    Ok(SecretKeys {
        keys: secret_key_names(&secret),
        secret_type: secret_type(&secret),
    })
}

/// Pods in the namespace that reference this Secret
pub async fn secret_usage(cluster: &Cluster, namespace: &str, name: &str) -> OpResult<SecretUsage> {
    let pods = find_pods_using(
        cluster,
        namespace,
        UsageTarget::Secret(name),
        "list pods for secret usage",
    )
    .await?;

    Ok(SecretUsage {
        total_pods: pods.len(),
        pods_using_secret: pods,
    })
}

/// The only path that sees values; never returned outside this module
async fn fetch_unredacted(cluster: &Cluster, namespace: &str, name: &str) -> OpResult<Secret> {
    cluster
        .secrets(namespace)
        .get(name)
        .await
        .during("get secret")
}

/// Strip value payloads, keeping key names
pub fn redact(mut secret: Secret) -> Secret {
    let mut data: BTreeMap<String, ByteString> = secret
        .data
        .take()
        .unwrap_or_default()
        .into_keys()
        .map(|key| (key, ByteString(Vec::new())))
        .collect();

    if let Some(string_data) = secret.string_data.take() {
        for key in string_data.into_keys() {
            data.entry(key).or_insert_with(|| ByteString(Vec::new()));
        }
    }

    secret.data = if data.is_empty() { None } else { Some(data) };
    secret
}

pub fn build_secret(namespace: &str, request: &CreateSecretRequest) -> Secret {
    Secret {
        metadata: meta::new_meta(
            namespace,
            &request.name,
            request.labels.as_ref(),
            request.annotations.as_ref(),
        ),
        type_: Some(
            request
                .secret_type
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_SECRET_TYPE.to_string()),
        ),
        string_data: request.string_data.clone(),
        ..Default::default()
    }
}

/// Overlay the fields present in `request` onto an unredacted Secret
pub fn apply_update(secret: &mut Secret, request: &UpdateSecretRequest) {
    if let Some(string_data) = &request.string_data {
        let data = secret.data.get_or_insert_with(BTreeMap::new);
        for (key, value) in string_data {
            data.insert(key.clone(), ByteString(value.clone().into_bytes()));
        }
    }
    secret.string_data = None;

    meta::overlay_meta(
        &mut secret.metadata,
        request.labels.as_ref(),
        request.annotations.as_ref(),
    );
    meta::set_write_precondition(&mut secret.metadata, request.resource_version.as_deref());
}

fn secret_key_names(secret: &Secret) -> Vec<String> {
    secret
        .data
        .as_ref()
        .map(|d| d.keys().cloned().collect())
        .unwrap_or_default()
}

fn secret_type(secret: &Secret) -> String {
    secret
        .type_
        .clone()
        .unwrap_or_else(|| DEFAULT_SECRET_TYPE.to_string())
}

pub fn secret_to_info(secret: &Secret) -> SecretInfo {
    let metadata = &secret.metadata;

    SecretInfo {
        name: metadata.name.clone().unwrap_or_default(),
        namespace: metadata.namespace.clone().unwrap_or_default(),
        secret_type: secret_type(secret),
        keys: secret_key_names(secret),
        labels: meta::labels(metadata),
        annotations: meta::annotations(metadata),
        creation_time: meta::creation_time(metadata),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubernetes::cluster::memory::MemoryCluster;

    fn create_request() -> CreateSecretRequest {
        CreateSecretRequest {
            name: "db".to_string(),
            secret_type: None,
            string_data: Some(BTreeMap::from([
                ("username".to_string(), "admin".to_string()),
                ("password".to_string(), "hunter2".to_string()),
            ])),
            labels: None,
            annotations: None,
        }
    }

    #[test]
    fn test_redact_keeps_keys_only() {
        let secret = Secret {
            data: Some(BTreeMap::from([(
                "token".to_string(),
                ByteString(b"s3cr3t".to_vec()),
            )])),
            string_data: Some(BTreeMap::from([("extra".to_string(), "v".to_string())])),
            ..Default::default()
        };

        let redacted = redact(secret);
        assert!(redacted.string_data.is_none());
        let data = redacted.data.unwrap();
        assert_eq!(data.len(), 2);
        assert!(data.values().all(|v| v.0.is_empty()));
    }

    #[test]
    fn test_default_type_is_opaque() {
        let secret = build_secret("default", &create_request());
        assert_eq!(secret.type_.as_deref(), Some("Opaque"));
    }

    #[tokio::test]
    async fn test_create_and_get_never_return_values() {
        let cluster = Cluster::new(MemoryCluster::new());
        let created = create_secret(&cluster, "default", &create_request())
            .await
            .unwrap();
        let fetched = get_secret(&cluster, "default", "db").await.unwrap();

        for secret in [&created, &fetched] {
            let json = serde_json::to_string(secret).unwrap();
            assert!(!json.contains("hunter2"));
            assert!(!json.contains("aHVudGVyMg"));
            assert_eq!(secret_key_names(secret), vec!["password", "username"]);
        }
    }

    #[tokio::test]
    async fn test_update_merges_without_losing_values() {
        let cluster = Cluster::new(MemoryCluster::new());
        create_secret(&cluster, "default", &create_request())
            .await
            .unwrap();

        let request = UpdateSecretRequest {
            string_data: Some(BTreeMap::from([("password".to_string(), "n3w".to_string())])),
            ..Default::default()
        };
        update_secret(&cluster, "default", "db", &request)
            .await
            .unwrap();

        let raw = fetch_unredacted(&cluster, "default", "db").await.unwrap();
        let data = raw.data.unwrap();
        assert_eq!(data["username"].0, b"admin".to_vec());
        assert_eq!(data["password"].0, b"n3w".to_vec());
    }

    #[tokio::test]
    async fn test_keys_report() {
        let cluster = Cluster::new(MemoryCluster::new());
        create_secret(&cluster, "default", &create_request())
            .await
            .unwrap();

        let keys = secret_keys(&cluster, "default", "db").await.unwrap();
        assert_eq!(keys.keys, vec!["password", "username"]);
        assert_eq!(keys.secret_type, "Opaque");
    }
}
