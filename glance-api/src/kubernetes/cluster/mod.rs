//! Cluster access
//!
//! [`ClusterApi`] is the single seam between the resource modules and the
//! control plane. It is object-safe and speaks untyped JSON so one trait
//! object can serve every resource kind; [`Resources`] layers the typed
//! `k8s-openapi` view on top. The live implementation is
//! [`K8sClient`](crate::kubernetes::client::K8sClient), the in-memory one is
//! [`MemoryCluster`](memory::MemoryCluster).

pub mod health;
pub mod memory;

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, Endpoints, Namespace, Pod, Secret, Service};
use k8s_openapi::api::networking::v1::Ingress;
use kube::core::ApiResource;
use kube::Resource;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::kubernetes::error::{K8sError, K8sResult};

/// Raw verbs against the control plane
///
/// `namespace` is `None` for cluster-scoped kinds. Objects are full
/// resource documents including `apiVersion`, `kind` and `metadata`.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    async fn list(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        limit: Option<u32>,
    ) -> K8sResult<Vec<Value>>;

    async fn get(&self, resource: &ApiResource, namespace: Option<&str>, name: &str)
        -> K8sResult<Value>;

    async fn create(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        object: Value,
    ) -> K8sResult<Value>;

    async fn replace(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
        object: Value,
    ) -> K8sResult<Value>;

    async fn delete(&self, resource: &ApiResource, namespace: Option<&str>, name: &str)
        -> K8sResult<()>;
}

/// Shared handle to the control plane
#[derive(Clone)]
pub struct Cluster {
    api: Arc<dyn ClusterApi>,
}

impl Cluster {
    pub fn new(api: impl ClusterApi + 'static) -> Self {
        Self { api: Arc::new(api) }
    }

    pub fn from_api(api: Arc<dyn ClusterApi>) -> Self {
        Self { api }
    }

    /// Typed accessor for a namespaced kind
    pub fn namespaced<K>(&self, namespace: &str) -> Resources<K>
    where
        K: Resource<DynamicType = ()>,
    {
        Resources::new(self.api.clone(), Some(namespace.to_string()))
    }

    /// Typed accessor for a cluster-scoped kind
    pub fn cluster_scoped<K>(&self) -> Resources<K>
    where
        K: Resource<DynamicType = ()>,
    {
        Resources::new(self.api.clone(), None)
    }

    pub fn namespaces(&self) -> Resources<Namespace> {
        self.cluster_scoped()
    }

    pub fn pods(&self, namespace: &str) -> Resources<Pod> {
        self.namespaced(namespace)
    }

    pub fn deployments(&self, namespace: &str) -> Resources<Deployment> {
        self.namespaced(namespace)
    }

    pub fn services(&self, namespace: &str) -> Resources<Service> {
        self.namespaced(namespace)
    }

    pub fn endpoints(&self, namespace: &str) -> Resources<Endpoints> {
        self.namespaced(namespace)
    }

    pub fn config_maps(&self, namespace: &str) -> Resources<ConfigMap> {
        self.namespaced(namespace)
    }

    pub fn secrets(&self, namespace: &str) -> Resources<Secret> {
        self.namespaced(namespace)
    }

    pub fn ingresses(&self, namespace: &str) -> Resources<Ingress> {
        self.namespaced(namespace)
    }
}

impl std::fmt::Debug for Cluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cluster").finish_non_exhaustive()
    }
}

/// Typed view of one resource kind, optionally scoped to a namespace
pub struct Resources<K> {
    api: Arc<dyn ClusterApi>,
    resource: ApiResource,
    namespace: Option<String>,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Resources<K>
where
    K: Resource<DynamicType = ()>,
{
    fn new(api: Arc<dyn ClusterApi>, namespace: Option<String>) -> Self {
        Self {
            api,
            resource: ApiResource::erase::<K>(&()),
            namespace,
            _kind: PhantomData,
        }
    }
}

impl<K> Resources<K>
where
    K: Resource<DynamicType = ()> + Serialize + DeserializeOwned,
{
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub async fn list(&self) -> K8sResult<Vec<K>> {
        self.list_limited(None).await
    }

    /// List at most `limit` objects
    pub async fn list_limited(&self, limit: Option<u32>) -> K8sResult<Vec<K>> {
        let items = self
            .api
            .list(&self.resource, self.namespace(), limit)
            .await?;
        items
            .into_iter()
            .map(|item| serde_json::from_value::<K>(item).map_err(K8sError::from))
            .collect()
    }

    pub async fn get(&self, name: &str) -> K8sResult<K> {
        let object = self.api.get(&self.resource, self.namespace(), name).await?;
        Ok(serde_json::from_value(object)?)
    }

    pub async fn create(&self, object: &K) -> K8sResult<K> {
        let object = serde_json::to_value(object)?;
        let created = self
            .api
            .create(&self.resource, self.namespace(), object)
            .await?;
        Ok(serde_json::from_value(created)?)
    }

    pub async fn replace(&self, name: &str, object: &K) -> K8sResult<K> {
        let object = serde_json::to_value(object)?;
        let replaced = self
            .api
            .replace(&self.resource, self.namespace(), name, object)
            .await?;
        Ok(serde_json::from_value(replaced)?)
    }

    pub async fn delete(&self, name: &str) -> K8sResult<()> {
        self.api.delete(&self.resource, self.namespace(), name).await
    }
}
