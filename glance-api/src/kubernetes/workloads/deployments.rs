//! Deployment operations
//!
//! CRUD operations for Kubernetes Deployments, including scaling and the
//! rollout status report.

use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{Container, ContainerPort, EnvVar, PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};

use super::pods::container_info;
use crate::kubernetes::cluster::Cluster;
use crate::kubernetes::error::{OpResult, ResultExt};
use crate::kubernetes::meta;
use crate::kubernetes::types::{
    CreateDeploymentRequest, DeploymentConditionInfo, DeploymentDetail, DeploymentInfo,
    DeploymentStatusReport, EnvVarRequest, Labels, ReplicaCounts, UpdateDeploymentRequest,
};

const APP_LABEL: &str = "app";
const DEFAULT_STRATEGY: &str = "RollingUpdate";

/// List deployments in a namespace
pub async fn list_deployments(cluster: &Cluster, namespace: &str) -> OpResult<Vec<Deployment>> {
    cluster
        .deployments(namespace)
        .list()
        .await
        .during("list deployments")
}

/// Get a single deployment
pub async fn get_deployment(
    cluster: &Cluster,
    namespace: &str,
    name: &str,
) -> OpResult<Deployment> {
    cluster
        .deployments(namespace)
        .get(name)
        .await
        .during("get deployment")
}

/// Create a single-container deployment selected by `app=<name>`
pub async fn create_deployment(
    cluster: &Cluster,
    namespace: &str,
    request: &CreateDeploymentRequest,
) -> OpResult<Deployment> {
    let deployment = build_deployment(namespace, request);

    tracing::info!(
        namespace,
        name = %request.name,
        image = %request.image,
        replicas = request.replicas,
        "Creating deployment"
    );
    cluster
        .deployments(namespace)
        .create(&deployment)
        .await
        .during("create deployment")
}

/// Update a deployment by read-modify-write
pub async fn update_deployment(
    cluster: &Cluster,
    namespace: &str,
    name: &str,
    request: &UpdateDeploymentRequest,
) -> OpResult<Deployment> {
    let api = cluster.deployments(namespace);
    let mut deployment = api.get(name).await.during("get deployment")?;

    apply_update(&mut deployment, request);

    api.replace(name, &deployment)
        .await
        .during("update deployment")
}

/// Scale a deployment
pub async fn scale_deployment(
    cluster: &Cluster,
    namespace: &str,
    name: &str,
    replicas: i32,
) -> OpResult<Deployment> {
    let request = UpdateDeploymentRequest {
        replicas: Some(replicas),
        ..Default::default()
    };

    tracing::info!(namespace, name, replicas, "Scaling deployment");
    let api = cluster.deployments(namespace);
    let mut deployment = api.get(name).await.during("get deployment")?;
    apply_update(&mut deployment, &request);

    api.replace(name, &deployment)
        .await
        .during("scale deployment")
}

/// Delete a deployment
pub async fn delete_deployment(cluster: &Cluster, namespace: &str, name: &str) -> OpResult<()> {
    cluster
        .deployments(namespace)
        .delete(name)
        .await
        .during("delete deployment")
}

/// Rollout status for a deployment
pub async fn deployment_status(
    cluster: &Cluster,
    namespace: &str,
    name: &str,
) -> OpResult<DeploymentStatusReport> {
    let deployment = get_deployment(cluster, namespace, name).await?;
    Ok(status_report(&deployment))
}

fn env_vars(vars: &[EnvVarRequest]) -> Vec<EnvVar> {
    vars.iter()
        .map(|v| EnvVar {
            name: v.name.clone(),
            value: Some(v.value.clone()),
            value_from: None,
        })
        .collect()
}

pub fn build_deployment(namespace: &str, request: &CreateDeploymentRequest) -> Deployment {
    let selector: Labels = BTreeMap::from([(APP_LABEL.to_string(), request.name.clone())]);

    let mut template_labels = request.labels.clone().unwrap_or_default();
    template_labels.extend(selector.clone());

    let container = Container {
        name: request.name.clone(),
        image: Some(request.image.clone()),
        ports: request.container_port.map(|port| {
            vec![ContainerPort {
                container_port: port,
                ..Default::default()
            }]
        }),
        env: request
            .env_vars
            .as_deref()
            .filter(|vars| !vars.is_empty())
            .map(env_vars),
        ..Default::default()
    };

    Deployment {
        metadata: meta::new_meta(
            namespace,
            &request.name,
            request.labels.as_ref(),
            request.annotations.as_ref(),
        ),
        spec: Some(DeploymentSpec {
            replicas: Some(request.replicas),
            selector: LabelSelector {
                match_labels: Some(selector),
                match_expressions: None,
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(template_labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![container],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        status: None,
    }
}

/// Overlay the fields present in `request`
///
/// `image` and `envVars` target the first container.
pub fn apply_update(deployment: &mut Deployment, request: &UpdateDeploymentRequest) {
    let spec = deployment.spec.get_or_insert_with(Default::default);

    if let Some(replicas) = request.replicas {
        spec.replicas = Some(replicas);
    }

    let first_container = spec
        .template
        .spec
        .as_mut()
        .and_then(|pod| pod.containers.first_mut());
    if let Some(container) = first_container {
        if let Some(image) = request.image.as_ref().filter(|i| !i.is_empty()) {
            container.image = Some(image.clone());
        }
        if let Some(vars) = request.env_vars.as_ref().filter(|v| !v.is_empty()) {
            container.env = Some(env_vars(vars));
        }
    }

    meta::overlay_meta(
        &mut deployment.metadata,
        request.labels.as_ref(),
        request.annotations.as_ref(),
    );
    meta::set_write_precondition(&mut deployment.metadata, request.resource_version.as_deref());
}

fn strategy(deployment: &Deployment) -> String {
    deployment
        .spec
        .as_ref()
        .and_then(|s| s.strategy.as_ref())
        .and_then(|s| s.type_.clone())
        .unwrap_or_else(|| DEFAULT_STRATEGY.to_string())
}

pub fn status_report(deployment: &Deployment) -> DeploymentStatusReport {
    let status = deployment.status.clone().unwrap_or_default();

    let conditions = status
        .conditions
        .iter()
        .flatten()
        .map(|c| DeploymentConditionInfo {
            type_: c.type_.clone(),
            status: c.status.clone(),
            last_update_time: c.last_update_time.as_ref().map(|t| t.0.to_rfc3339()),
            last_transition_time: c.last_transition_time.as_ref().map(|t| t.0.to_rfc3339()),
            reason: c.reason.clone(),
            message: c.message.clone(),
        })
        .collect();

    DeploymentStatusReport {
        replicas: ReplicaCounts {
            desired: deployment
                .spec
                .as_ref()
                .and_then(|s| s.replicas)
                .unwrap_or(0),
            current: status.replicas.unwrap_or(0),
            updated: status.updated_replicas.unwrap_or(0),
            ready: status.ready_replicas.unwrap_or(0),
            available: status.available_replicas.unwrap_or(0),
        },
        conditions,
        strategy: strategy(deployment),
        age: meta::creation_time(&deployment.metadata),
    }
}

/// Convert k8s Deployment to DeploymentInfo
pub fn deployment_to_info(deployment: &Deployment) -> DeploymentInfo {
    let metadata = &deployment.metadata;
    let status = deployment.status.as_ref();

    DeploymentInfo {
        name: metadata.name.clone().unwrap_or_default(),
        namespace: metadata.namespace.clone().unwrap_or_default(),
        replicas: status.and_then(|s| s.replicas).unwrap_or(0),
        ready_replicas: status.and_then(|s| s.ready_replicas).unwrap_or(0),
        desired_replicas: deployment
            .spec
            .as_ref()
            .and_then(|s| s.replicas)
            .unwrap_or(0),
        strategy: strategy(deployment),
        creation_time: meta::creation_time(metadata),
        labels: meta::labels(metadata),
    }
}

pub fn deployment_to_detail(deployment: &Deployment) -> DeploymentDetail {
    let spec = deployment.spec.as_ref();

    DeploymentDetail {
        summary: deployment_to_info(deployment),
        selector: spec
            .and_then(|s| s.selector.match_labels.clone())
            .unwrap_or_default(),
        annotations: meta::annotations(&deployment.metadata),
        containers: spec
            .and_then(|s| s.template.spec.as_ref())
            .map(|pod| pod.containers.iter().map(container_info).collect())
            .unwrap_or_default(),
    }
}
