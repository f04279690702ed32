//! Kubernetes client wrapper
//!
//! Wraps the kube-rs Client and implements [`ClusterApi`] on top of
//! `Api<DynamicObject>`, so every resource kind goes through the same four
//! verbs.

use std::path::Path;

use async_trait::async_trait;
use kube::api::{Api, DeleteParams, DynamicObject, ListParams, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::core::{ApiResource, TypeMeta};
use kube::{Client, Config};
use serde_json::Value;

use super::cluster::ClusterApi;
use super::error::{K8sError, K8sResult};

/// Context name used for the generated host/token kubeconfig
const TOKEN_CONTEXT: &str = "glance";

/// Wrapper around kube-rs Client
#[derive(Clone)]
pub struct K8sClient {
    inner: Client,
    api_server: String,
}

impl K8sClient {
    /// Create client from a kubeconfig file with optional context
    pub async fn from_kubeconfig_file(path: &Path, context: Option<&str>) -> K8sResult<Self> {
        if !path.exists() {
            return Err(K8sError::InvalidKubeconfig(format!(
                "kubeconfig file not found at {}",
                path.display()
            )));
        }

        let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
            K8sError::InvalidKubeconfig(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_kubeconfig(kubeconfig, context).await
    }

    /// Create client from an API server URL and bearer token
    pub async fn from_token(host: &str, token: &str, insecure_skip_tls_verify: bool) -> K8sResult<Self> {
        if host.is_empty() || token.is_empty() {
            return Err(K8sError::InvalidKubeconfig(
                "K8S_HOST and K8S_TOKEN must both be set".to_string(),
            ));
        }

        let yaml = token_kubeconfig(host, token, insecure_skip_tls_verify)?;
        let kubeconfig = Kubeconfig::from_yaml(&yaml).map_err(|e| {
            K8sError::InvalidKubeconfig(format!("Failed to parse kubeconfig: {}", e))
        })?;

        Self::from_kubeconfig(kubeconfig, Some(TOKEN_CONTEXT)).await
    }

    async fn from_kubeconfig(kubeconfig: Kubeconfig, context: Option<&str>) -> K8sResult<Self> {
        let config = Config::from_custom_kubeconfig(
            kubeconfig,
            &KubeConfigOptions {
                context: context.map(String::from),
                ..Default::default()
            },
        )
        .await
        .map_err(|e| K8sError::InvalidKubeconfig(format!("Failed to create config: {}", e)))?;

        let api_server = config.cluster_url.to_string();

        let client = Client::try_from(config)
            .map_err(|e| K8sError::InvalidKubeconfig(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            inner: client,
            api_server,
        })
    }

    /// Get API server URL
    pub fn api_server(&self) -> &str {
        &self.api_server
    }

    fn api(&self, resource: &ApiResource, namespace: Option<&str>) -> Api<DynamicObject> {
        match namespace {
            Some(ns) => Api::namespaced_with(self.inner.clone(), ns, resource),
            None => Api::all_with(self.inner.clone(), resource),
        }
    }
}

/// Single-context kubeconfig for bearer token access
fn token_kubeconfig(host: &str, token: &str, insecure_skip_tls_verify: bool) -> K8sResult<String> {
    let document = serde_json::json!({
        "apiVersion": "v1",
        "kind": "Config",
        "clusters": [{
            "name": TOKEN_CONTEXT,
            "cluster": {
                "server": host,
                "insecure-skip-tls-verify": insecure_skip_tls_verify,
            },
        }],
        "users": [{
            "name": TOKEN_CONTEXT,
            "user": { "token": token },
        }],
        "contexts": [{
            "name": TOKEN_CONTEXT,
            "context": { "cluster": TOKEN_CONTEXT, "user": TOKEN_CONTEXT },
        }],
        "current-context": TOKEN_CONTEXT,
    });

    serde_yaml::to_string(&document)
        .map_err(|e| K8sError::InvalidKubeconfig(format!("Failed to render kubeconfig: {}", e)))
}

fn to_dynamic(object: Value) -> K8sResult<DynamicObject> {
    Ok(serde_json::from_value(object)?)
}

/// List items come back without `apiVersion`/`kind`; restore them
fn to_value(resource: &ApiResource, mut object: DynamicObject) -> K8sResult<Value> {
    if object.types.is_none() {
        object.types = Some(TypeMeta {
            api_version: resource.api_version.clone(),
            kind: resource.kind.clone(),
        });
    }
    Ok(serde_json::to_value(object)?)
}

#[async_trait]
impl ClusterApi for K8sClient {
    async fn list(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        limit: Option<u32>,
    ) -> K8sResult<Vec<Value>> {
        let mut params = ListParams::default();
        if let Some(limit) = limit {
            params = params.limit(limit);
        }

        let list = self.api(resource, namespace).list(&params).await?;
        list.items
            .into_iter()
            .map(|item| to_value(resource, item))
            .collect()
    }

    async fn get(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
    ) -> K8sResult<Value> {
        let object = self.api(resource, namespace).get(name).await?;
        to_value(resource, object)
    }

    async fn create(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        object: Value,
    ) -> K8sResult<Value> {
        let object = to_dynamic(object)?;
        let created = self
            .api(resource, namespace)
            .create(&PostParams::default(), &object)
            .await?;
        to_value(resource, created)
    }

    async fn replace(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
        object: Value,
    ) -> K8sResult<Value> {
        let object = to_dynamic(object)?;
        let replaced = self
            .api(resource, namespace)
            .replace(name, &PostParams::default(), &object)
            .await?;
        to_value(resource, replaced)
    }

    async fn delete(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
    ) -> K8sResult<()> {
        self.api(resource, namespace)
            .delete(name, &DeleteParams::default())
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for K8sClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("K8sClient")
            .field("api_server", &self.api_server)
            .finish()
    }
}
