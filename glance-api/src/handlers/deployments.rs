use axum::extract::{Path, Query, State};
use glance_common::Deleted;
use serde::Deserialize;
use std::sync::Arc;

use super::{created, ok, ApiResult, Created};
use crate::error::{bad_request, ApiError};
use crate::kubernetes::types::{
    CreateDeploymentRequest, DeploymentDetail, DeploymentInfo, DeploymentStatusReport,
    UpdateDeploymentRequest, WorkloadAck,
};
use crate::kubernetes::workloads::deployments;
use crate::state::AppState;
use crate::validation::ValidJson;

#[derive(Debug, Deserialize)]
pub struct ScaleQuery {
    pub replicas: Option<String>,
}

impl ScaleQuery {
    /// Non-negative replica count, or 400
    pub fn replicas(&self) -> Result<i32, ApiError> {
        self.replicas
            .as_deref()
            .and_then(|raw| raw.parse::<i32>().ok())
            .filter(|replicas| *replicas >= 0)
            .ok_or_else(|| bad_request("Invalid replicas value"))
    }
}

fn ack(namespace: &str, name: &str, status: &str, replicas: Option<i32>) -> WorkloadAck {
    WorkloadAck {
        name: name.to_string(),
        namespace: namespace.to_string(),
        status: status.to_string(),
        replicas,
    }
}

pub async fn list_deployments(
    State(state): State<Arc<AppState>>,
    Path(namespace): Path<String>,
) -> ApiResult<Vec<DeploymentInfo>> {
    let items = deployments::list_deployments(&state.cluster, &namespace).await?;
    ok(items.iter().map(deployments::deployment_to_info).collect())
}

pub async fn get_deployment(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> ApiResult<DeploymentDetail> {
    let deployment = deployments::get_deployment(&state.cluster, &namespace, &name).await?;
    ok(deployments::deployment_to_detail(&deployment))
}

pub async fn create_deployment(
    State(state): State<Arc<AppState>>,
    Path(namespace): Path<String>,
    ValidJson(request): ValidJson<CreateDeploymentRequest>,
) -> Created<WorkloadAck> {
    deployments::create_deployment(&state.cluster, &namespace, &request).await?;
    created(ack(&namespace, &request.name, "created", None))
}

pub async fn update_deployment(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
    ValidJson(request): ValidJson<UpdateDeploymentRequest>,
) -> ApiResult<WorkloadAck> {
    deployments::update_deployment(&state.cluster, &namespace, &name, &request).await?;
    ok(ack(&namespace, &name, "updated", None))
}

pub async fn scale_deployment(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
    Query(query): Query<ScaleQuery>,
) -> ApiResult<WorkloadAck> {
    let replicas = query.replicas()?;
    deployments::scale_deployment(&state.cluster, &namespace, &name, replicas).await?;
    ok(ack(&namespace, &name, "scaled", Some(replicas)))
}

pub async fn delete_deployment(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> ApiResult<Deleted> {
    deployments::delete_deployment(&state.cluster, &namespace, &name).await?;
    ok(Deleted::new("Deployment", &namespace, &name))
}

pub async fn deployment_status(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> ApiResult<DeploymentStatusReport> {
    ok(deployments::deployment_status(&state.cluster, &namespace, &name).await?)
}
