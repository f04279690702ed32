use axum::extract::{Path, State};
use glance_common::Deleted;
use std::sync::Arc;

use super::{created, ok, ApiResult, Created};
use crate::kubernetes::config_storage::configmaps;
use crate::kubernetes::types::{
    ConfigMapInfo, ConfigMapUsage, CreateConfigMapRequest, UpdateConfigMapRequest,
};
use crate::state::AppState;
use crate::validation::ValidJson;

pub async fn list_configmaps(
    State(state): State<Arc<AppState>>,
    Path(namespace): Path<String>,
) -> ApiResult<Vec<ConfigMapInfo>> {
    let items = configmaps::list_configmaps(&state.cluster, &namespace).await?;
    ok(items.iter().map(configmaps::configmap_to_info).collect())
}

pub async fn get_configmap(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> ApiResult<ConfigMapInfo> {
    let configmap = configmaps::get_configmap(&state.cluster, &namespace, &name).await?;
    ok(configmaps::configmap_to_info(&configmap))
}

pub async fn create_configmap(
    State(state): State<Arc<AppState>>,
    Path(namespace): Path<String>,
    ValidJson(request): ValidJson<CreateConfigMapRequest>,
) -> Created<ConfigMapInfo> {
    let configmap = configmaps::create_configmap(&state.cluster, &namespace, &request).await?;
    created(configmaps::configmap_to_info(&configmap))
}

pub async fn update_configmap(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
    ValidJson(request): ValidJson<UpdateConfigMapRequest>,
) -> ApiResult<ConfigMapInfo> {
    let configmap =
        configmaps::update_configmap(&state.cluster, &namespace, &name, &request).await?;
    ok(configmaps::configmap_to_info(&configmap))
}

pub async fn delete_configmap(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> ApiResult<Deleted> {
    configmaps::delete_configmap(&state.cluster, &namespace, &name).await?;
    ok(Deleted::new("ConfigMap", &namespace, &name))
}

pub async fn configmap_usage(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> ApiResult<ConfigMapUsage> {
    ok(configmaps::configmap_usage(&state.cluster, &namespace, &name).await?)
}
