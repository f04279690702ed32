use axum::extract::{Path, State};
use glance_common::Deleted;
use std::sync::Arc;

use super::{created, ok, ApiResult, Created};
use crate::kubernetes::networking::ingress;
use crate::kubernetes::types::{
    CreateIngressRequest, IngressInfo, IngressStatusReport, UpdateIngressRequest,
};
use crate::state::AppState;
use crate::validation::ValidJson;

pub async fn list_ingresses(
    State(state): State<Arc<AppState>>,
    Path(namespace): Path<String>,
) -> ApiResult<Vec<IngressInfo>> {
    let items = ingress::list_ingresses(&state.cluster, &namespace).await?;
    ok(items.iter().map(ingress::ingress_to_info).collect())
}

pub async fn get_ingress(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> ApiResult<IngressInfo> {
    let item = ingress::get_ingress(&state.cluster, &namespace, &name).await?;
    ok(ingress::ingress_to_info(&item))
}

pub async fn create_ingress(
    State(state): State<Arc<AppState>>,
    Path(namespace): Path<String>,
    ValidJson(request): ValidJson<CreateIngressRequest>,
) -> Created<IngressInfo> {
    let item = ingress::create_ingress(&state.cluster, &namespace, &request).await?;
    created(ingress::ingress_to_info(&item))
}

pub async fn update_ingress(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
    ValidJson(request): ValidJson<UpdateIngressRequest>,
) -> ApiResult<IngressInfo> {
    let item = ingress::update_ingress(&state.cluster, &namespace, &name, &request).await?;
    ok(ingress::ingress_to_info(&item))
}

pub async fn delete_ingress(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> ApiResult<Deleted> {
    ingress::delete_ingress(&state.cluster, &namespace, &name).await?;
    ok(Deleted::new("Ingress", &namespace, &name))
}

pub async fn ingress_status(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> ApiResult<IngressStatusReport> {
    ok(ingress::ingress_status(&state.cluster, &namespace, &name).await?)
}
