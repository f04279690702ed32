use axum::extract::{Path, State};
use glance_common::Deleted;
use std::sync::Arc;

use super::{created, ok, ApiResult, Created};
use crate::kubernetes::networking::services;
use crate::kubernetes::types::{
    CreateServiceRequest, ServiceDetail, ServiceInfo, ServiceStatusReport, UpdateServiceRequest,
};
use crate::state::AppState;
use crate::validation::ValidJson;

pub async fn list_services(
    State(state): State<Arc<AppState>>,
    Path(namespace): Path<String>,
) -> ApiResult<Vec<ServiceInfo>> {
    let items = services::list_services(&state.cluster, &namespace).await?;
    ok(items.iter().map(services::service_to_info).collect())
}

pub async fn get_service(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> ApiResult<ServiceDetail> {
    let service = services::get_service(&state.cluster, &namespace, &name).await?;
    ok(services::service_to_detail(&service))
}

pub async fn create_service(
    State(state): State<Arc<AppState>>,
    Path(namespace): Path<String>,
    ValidJson(request): ValidJson<CreateServiceRequest>,
) -> Created<ServiceInfo> {
    let service = services::create_service(&state.cluster, &namespace, &request).await?;
    created(services::service_to_info(&service))
}

pub async fn update_service(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
    ValidJson(request): ValidJson<UpdateServiceRequest>,
) -> ApiResult<ServiceInfo> {
    let service = services::update_service(&state.cluster, &namespace, &name, &request).await?;
    ok(services::service_to_info(&service))
}

pub async fn delete_service(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> ApiResult<Deleted> {
    services::delete_service(&state.cluster, &namespace, &name).await?;
    ok(Deleted::new("Service", &namespace, &name))
}

pub async fn service_status(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> ApiResult<ServiceStatusReport> {
    ok(services::service_status(&state.cluster, &namespace, &name).await?)
}
