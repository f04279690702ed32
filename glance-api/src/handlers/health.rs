use axum::Json;
use glance_common::{ApiResponse, HealthStatus};

/// Liveness; never touches the cluster
pub async fn health() -> Json<ApiResponse<HealthStatus>> {
    Json(ApiResponse::ok(HealthStatus::ok()))
}
