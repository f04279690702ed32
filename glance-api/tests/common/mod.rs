//! Common test utilities and helpers
//!
//! Builds the real router over an in-memory cluster and drives it with
//! `tower::ServiceExt::oneshot`, so no listener or control plane is needed.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use glance_api::config::GlanceConfig;
use glance_api::kubernetes::cluster::memory::MemoryCluster;
use glance_api::kubernetes::cluster::{Cluster, ClusterApi};
use glance_api::kubernetes::error::K8sResult;
use glance_api::{routes, AppState};
use kube::core::ApiResource;
use serde_json::Value;
use tokio::sync::Barrier;
use tower::ServiceExt;

pub const NAMESPACE: &str = "default";

/// Response status plus parsed JSON envelope
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

/// Test environment setup
pub struct TestEnv {
    pub router: Router,
    pub cluster: Cluster,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_api(Arc::new(MemoryCluster::new()), GlanceConfig::default())
    }

    pub fn with_config(config: GlanceConfig) -> Self {
        Self::with_api(Arc::new(MemoryCluster::new()), config)
    }

    pub fn with_api(api: Arc<dyn ClusterApi>, config: GlanceConfig) -> Self {
        let cluster = Cluster::from_api(api);
        let state = Arc::new(AppState::new(cluster.clone(), config));
        Self {
            router: routes::build_router(state),
            cluster,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }
}

/// Wraps a cluster and, while armed, holds every `get` at a barrier
///
/// Two concurrent read-modify-write updates then both read the same
/// version before either writes.
pub struct GatedCluster {
    inner: MemoryCluster,
    armed: AtomicBool,
    barrier: Barrier,
}

impl GatedCluster {
    pub fn new(parties: usize) -> Self {
        Self {
            inner: MemoryCluster::new(),
            armed: AtomicBool::new(false),
            barrier: Barrier::new(parties),
        }
    }

    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    pub fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl ClusterApi for GatedCluster {
    async fn list(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        limit: Option<u32>,
    ) -> K8sResult<Vec<Value>> {
        self.inner.list(resource, namespace, limit).await
    }

    async fn get(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
    ) -> K8sResult<Value> {
        let object = self.inner.get(resource, namespace, name).await;
        if self.armed.load(Ordering::SeqCst) {
            self.barrier.wait().await;
        }
        object
    }

    async fn create(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        object: Value,
    ) -> K8sResult<Value> {
        self.inner.create(resource, namespace, object).await
    }

    async fn replace(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
        object: Value,
    ) -> K8sResult<Value> {
        self.inner.replace(resource, namespace, name, object).await
    }

    async fn delete(
        &self,
        resource: &ApiResource,
        namespace: Option<&str>,
        name: &str,
    ) -> K8sResult<()> {
        self.inner.delete(resource, namespace, name).await
    }
}
