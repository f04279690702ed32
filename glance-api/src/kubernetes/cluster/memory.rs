//! In-memory control plane
//!
//! Implements [`ClusterApi`] over a map of JSON documents with the parts of
//! API server behaviour the resource modules depend on: server-assigned
//! metadata, `AlreadyExists` / `NotFound` / `Conflict` statuses, optimistic
//! concurrency when a `resourceVersion` is supplied, and secret
//! `stringData` folding. Used by the test suites and for running the API
//! without a cluster.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use base64::Engine;
use kube::core::ApiResource;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::ClusterApi;
use crate::kubernetes::error::{K8sResult, RemoteError};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ObjectKey {
    kind: String,
    namespace: String,
    name: String,
}

impl ObjectKey {
    fn new(resource: &ApiResource, namespace: Option<&str>, name: &str) -> Self {
        Self {
            kind: qualified(resource),
            namespace: namespace.unwrap_or_default().to_string(),
            name: name.to_string(),
        }
    }
}

/// `plural.group` the way the API server names a kind in its messages
fn qualified(resource: &ApiResource) -> String {
    if resource.group.is_empty() {
        resource.plural.clone()
    } else {
        format!("{}.{}", resource.plural, resource.group)
    }
}

fn invalid(resource: &ApiResource, detail: &str) -> RemoteError {
    RemoteError::from_status(
        422,
        "Invalid",
        format!("{} is invalid: {}", resource.kind, detail),
    )
}

fn object_name(object: &Value) -> Option<String> {
    object
        .pointer("/metadata/name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(String::from)
}

fn metadata_mut<'a>(
    resource: &ApiResource,
    object: &'a mut Value,
) -> K8sResult<&'a mut Map<String, Value>> {
    object
        .get_mut("metadata")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| invalid(resource, "metadata: Required value").into())
}

/// Map-backed [`ClusterApi`]
#[derive(Debug, Default)]
pub struct MemoryCluster {
    objects: RwLock<BTreeMap<ObjectKey, Value>>,
    revision: AtomicU64,
}

impl MemoryCluster {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_revision(&self) -> String {
        (self.revision.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }

    fn stamp_type(resource: &ApiResource, object: &mut Value) {
        if let Some(fields) = object.as_object_mut() {
            fields.insert("apiVersion".into(), Value::String(resource.api_version.clone()));
            fields.insert("kind".into(), Value::String(resource.kind.clone()));
        }
    }

    /// Apply the defaulting the API server performs on write
    fn normalize(&self, resource: &ApiResource, object: &mut Value, previous: Option<&Value>) {
        match resource.kind.as_str() {
            "Secret" => fold_string_data(object),
            "Service" => {
                let service_type = object
                    .pointer("/spec/type")
                    .and_then(Value::as_str)
                    .unwrap_or("ClusterIP")
                    .to_string();
                let has_ip = object
                    .pointer("/spec/clusterIP")
                    .and_then(Value::as_str)
                    .is_some_and(|ip| !ip.is_empty());
                if service_type == "ExternalName" || has_ip {
                    return;
                }
                let ip = previous
                    .and_then(|prev| prev.pointer("/spec/clusterIP"))
                    .and_then(Value::as_str)
                    .map(String::from)
                    .unwrap_or_else(|| {
                        let n = self.revision.load(Ordering::SeqCst);
                        format!("10.96.{}.{}", (n / 250) % 250, n % 250 + 1)
                    });
                if let Some(spec) = object.get_mut("spec").and_then(Value::as_object_mut) {
                    spec.insert("clusterIP".into(), Value::String(ip));
                }
            }
            _ => {}
        }
    }
}

/// Secrets never store `stringData`; it is base64-merged into `data`
fn fold_string_data(object: &mut Value) {
    let Some(fields) = object.as_object_mut() else {
        return;
    };
    let Some(Value::Object(string_data)) = fields.remove("stringData") else {
        return;
    };

    let data = fields
        .entry("data")
        .or_insert_with(|| Value::Object(Map::new()));
    if !data.is_object() {
        *data = Value::Object(Map::new());
    }
    if let Some(data) = data.as_object_mut() {
        for (key, value) in string_data {
            let raw = value.as_str().unwrap_or_default();
            let encoded = base64::engine::general_purpose::STANDARD.encode(raw.as_bytes());
            data.insert(key, Value::String(encoded));
        }
    }
}

#[async_trait]
impl ClusterApi for MemoryCluster {
    async fn list(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        limit: Option<u32>,
    ) -> K8sResult<Vec<Value>> {
        let kind = qualified(resource);
        let objects = self.objects.read().await;
        let limit = limit.map(|l| l as usize).unwrap_or(usize::MAX);

        Ok(objects
            .iter()
            .filter(|(key, _)| key.kind == kind)
            .filter(|(key, _)| namespace.map_or(true, |ns| key.namespace == ns))
            .take(limit)
            .map(|(_, object)| object.clone())
            .collect())
    }

    async fn get(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
    ) -> K8sResult<Value> {
        let key = ObjectKey::new(resource, namespace, name);
        let objects = self.objects.read().await;
        objects.get(&key).cloned().ok_or_else(|| {
            RemoteError::not_found(format!("{} \"{}\" not found", qualified(resource), name))
                .into()
        })
    }

    async fn create(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        mut object: Value,
    ) -> K8sResult<Value> {
        let name = object_name(&object)
            .ok_or_else(|| invalid(resource, "metadata.name: Required value"))?;
        let key = ObjectKey::new(resource, namespace, &name);

        let mut objects = self.objects.write().await;
        if objects.contains_key(&key) {
            return Err(RemoteError::already_exists(format!(
                "{} \"{}\" already exists",
                qualified(resource),
                name
            ))
            .into());
        }

        Self::stamp_type(resource, &mut object);
        let revision = self.next_revision();
        let metadata = metadata_mut(resource, &mut object)?;
        if let Some(ns) = namespace {
            metadata.insert("namespace".into(), Value::String(ns.to_string()));
        }
        metadata.insert(
            "uid".into(),
            Value::String(uuid::Uuid::new_v4().to_string()),
        );
        metadata.insert(
            "creationTimestamp".into(),
            Value::String(chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()),
        );
        metadata.insert("resourceVersion".into(), Value::String(revision));
        self.normalize(resource, &mut object, None);

        objects.insert(key, object.clone());
        Ok(object)
    }

    async fn replace(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
        mut object: Value,
    ) -> K8sResult<Value> {
        let key = ObjectKey::new(resource, namespace, name);

        let mut objects = self.objects.write().await;
        let current = objects.get(&key).ok_or_else(|| {
            RemoteError::not_found(format!("{} \"{}\" not found", qualified(resource), name))
        })?;

        if object_name(&object).as_deref() != Some(name) {
            return Err(RemoteError::from_status(
                400,
                "BadRequest",
                format!("the name of the object does not match the name on the URL ({})", name),
            )
            .into());
        }

        let stored_version = current
            .pointer("/metadata/resourceVersion")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let sent_version = object
            .pointer("/metadata/resourceVersion")
            .and_then(Value::as_str)
            .filter(|rv| !rv.is_empty());
        if let Some(sent) = sent_version {
            if sent != stored_version {
                return Err(RemoteError::conflict(format!(
                    "Operation cannot be fulfilled on {} \"{}\": the object has been modified; \
                     please apply your changes to the latest version and try again",
                    qualified(resource),
                    name
                ))
                .into());
            }
        }

        let preserved: Vec<(String, Value)> = ["uid", "creationTimestamp"]
            .iter()
            .filter_map(|field| {
                current
                    .pointer(&format!("/metadata/{}", field))
                    .map(|value| (field.to_string(), value.clone()))
            })
            .collect();
        let previous = current.clone();

        Self::stamp_type(resource, &mut object);
        let revision = self.next_revision();
        let metadata = metadata_mut(resource, &mut object)?;
        if let Some(ns) = namespace {
            metadata.insert("namespace".into(), Value::String(ns.to_string()));
        }
        for (field, value) in preserved {
            metadata.insert(field, value);
        }
        metadata.insert("resourceVersion".into(), Value::String(revision));
        self.normalize(resource, &mut object, Some(&previous));

        objects.insert(key, object.clone());
        Ok(object)
    }

    async fn delete(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
    ) -> K8sResult<()> {
        let key = ObjectKey::new(resource, namespace, name);
        let mut objects = self.objects.write().await;
        objects.remove(&key).map(|_| ()).ok_or_else(|| {
            RemoteError::not_found(format!("{} \"{}\" not found", qualified(resource), name))
                .into()
        })
    }
}
