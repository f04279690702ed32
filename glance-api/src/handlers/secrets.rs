use axum::extract::{Path, State};
use glance_common::Deleted;
use std::sync::Arc;

use super::{created, ok, ApiResult, Created};
use crate::kubernetes::config_storage::secrets;
use crate::kubernetes::types::{
    CreateSecretRequest, SecretInfo, SecretKeys, SecretUsage, UpdateSecretRequest,
};
use crate::state::AppState;
use crate::validation::ValidJson;

pub async fn list_secrets(
    State(state): State<Arc<AppState>>,
    Path(namespace): Path<String>,
) -> ApiResult<Vec<SecretInfo>> {
    let items = secrets::list_secrets(&state.cluster, &namespace).await?;
    ok(items.iter().map(secrets::secret_to_info).collect())
}

pub async fn get_secret(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> ApiResult<SecretInfo> {
    let secret = secrets::get_secret(&state.cluster, &namespace, &name).await?;
    ok(secrets::secret_to_info(&secret))
}

pub async fn create_secret(
    State(state): State<Arc<AppState>>,
    Path(namespace): Path<String>,
    ValidJson(request): ValidJson<CreateSecretRequest>,
) -> Created<SecretInfo> {
    let secret = secrets::create_secret(&state.cluster, &namespace, &request).await?;
    created(secrets::secret_to_info(&secret))
}

pub async fn update_secret(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
    ValidJson(request): ValidJson<UpdateSecretRequest>,
) -> ApiResult<SecretInfo> {
    let secret = secrets::update_secret(&state.cluster, &namespace, &name, &request).await?;
    ok(secrets::secret_to_info(&secret))
}

pub async fn delete_secret(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> ApiResult<Deleted> {
    secrets::delete_secret(&state.cluster, &namespace, &name).await?;
    ok(Deleted::new("Secret", &namespace, &name))
}

pub async fn secret_keys(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> ApiResult<SecretKeys> {
    ok(secrets::secret_keys(&state.cluster, &namespace, &name).await?)
}

pub async fn secret_usage(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> ApiResult<SecretUsage> {
    ok(secrets::secret_usage(&state.cluster, &namespace, &name).await?)
}
