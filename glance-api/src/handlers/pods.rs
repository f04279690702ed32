use axum::extract::{Path, State};
use glance_common::Deleted;
use std::sync::Arc;

use super::{ok, ApiResult};
use crate::kubernetes::types::{PodDetail, PodInfo, PodMetrics};
use crate::kubernetes::workloads::pods;
use crate::state::AppState;

pub async fn list_pods(
    State(state): State<Arc<AppState>>,
    Path(namespace): Path<String>,
) -> ApiResult<Vec<PodInfo>> {
    let items = pods::list_pods(&state.cluster, &namespace).await?;
    ok(items.iter().map(pods::pod_to_info).collect())
}

pub async fn get_pod(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> ApiResult<PodDetail> {
    let pod = pods::get_pod(&state.cluster, &namespace, &name).await?;
    ok(pods::pod_to_detail(&pod))
}

pub async fn delete_pod(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> ApiResult<Deleted> {
    pods::delete_pod(&state.cluster, &namespace, &name).await?;
    ok(Deleted::new("Pod", &namespace, &name))
}

pub async fn pod_metrics(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> ApiResult<PodMetrics> {
    ok(pods::pod_metrics(&state.cluster, &namespace, &name).await?)
}
