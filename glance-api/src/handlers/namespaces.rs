use axum::extract::{Path, State};
use std::sync::Arc;

use super::{ok, ApiResult};
use crate::kubernetes::cluster_resources::namespaces;
use crate::kubernetes::types::{NamespaceInfo, NamespaceMetrics};
use crate::state::AppState;

pub async fn list_namespaces(State(state): State<Arc<AppState>>) -> ApiResult<Vec<NamespaceInfo>> {
    let items = namespaces::list_namespaces(&state.cluster).await?;
    ok(items.iter().map(namespaces::namespace_to_info).collect())
}

pub async fn get_namespace(
    State(state): State<Arc<AppState>>,
    Path(namespace): Path<String>,
) -> ApiResult<NamespaceInfo> {
    let ns = namespaces::get_namespace(&state.cluster, &namespace).await?;
    ok(namespaces::namespace_to_info(&ns))
}

pub async fn namespace_metrics(
    State(state): State<Arc<AppState>>,
    Path(namespace): Path<String>,
) -> ApiResult<NamespaceMetrics> {
    ok(namespaces::namespace_metrics(&state.cluster, &namespace).await?)
}
