//! Route table
//!
//! Route builders are split per resource group and merged into one router.
//! Layers are added innermost first, so CORS is outermost and answers
//! preflight requests before anything else runs. Unmatched paths and
//! bodiless layer errors still come back in the response envelope.

use axum::{
    middleware as axum_middleware,
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::handlers::{
    self, configmaps, deployments, health, ingresses, namespaces, pods, secrets, services,
};
use crate::middleware::{cors, envelope, remote_status};
use crate::state::AppState;

/// Build the full application router
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors_config =
        cors::CorsConfig::with_origins(state.config.server.cors_allowed_origins.clone());
    let timeout = state.config.server.request_timeout();
    let passthrough = state.config.server.remote_status_passthrough;

    let api = Router::new()
        .merge(namespace_routes())
        .merge(pod_routes())
        .merge(deployment_routes())
        .merge(service_routes())
        .merge(configmap_routes())
        .merge(secret_routes())
        .merge(ingress_routes());

    let api = if passthrough {
        tracing::info!("Remote status passthrough enabled");
        api.layer(axum_middleware::from_fn(
            remote_status::remote_status_middleware,
        ))
    } else {
        api
    };

    Router::new()
        .route("/health", get(health::health))
        .merge(api)
        .fallback(handlers::fallback)
        .with_state(state)
        .layer(TimeoutLayer::new(timeout))
        .layer(axum_middleware::from_fn(envelope::envelope_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(move |req, next| {
            cors::cors_middleware(cors_config.clone(), req, next)
        }))
}

fn namespace_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/namespaces", get(namespaces::list_namespaces))
        .route("/api/v1/namespaces/:namespace", get(namespaces::get_namespace))
        .route(
            "/api/v1/namespaces/:namespace/metrics",
            get(namespaces::namespace_metrics),
        )
}

fn pod_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/pods/namespaces/:namespace", get(pods::list_pods))
        .route(
            "/api/v1/pods/namespaces/:namespace/:name",
            get(pods::get_pod).delete(pods::delete_pod),
        )
        .route(
            "/api/v1/pods/namespaces/:namespace/:name/metrics",
            get(pods::pod_metrics),
        )
}

fn deployment_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/v1/deployments/namespaces/:namespace",
            get(deployments::list_deployments).post(deployments::create_deployment),
        )
        .route(
            "/api/v1/deployments/namespaces/:namespace/:name",
            get(deployments::get_deployment)
                .put(deployments::update_deployment)
                .delete(deployments::delete_deployment),
        )
        .route(
            "/api/v1/deployments/namespaces/:namespace/:name/status",
            get(deployments::deployment_status),
        )
        .route(
            "/api/v1/deployments/namespaces/:namespace/:name/scale",
            put(deployments::scale_deployment),
        )
}

fn service_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/v1/services/namespaces/:namespace",
            get(services::list_services).post(services::create_service),
        )
        .route(
            "/api/v1/services/namespaces/:namespace/:name",
            get(services::get_service)
                .put(services::update_service)
                .delete(services::delete_service),
        )
        .route(
            "/api/v1/services/namespaces/:namespace/:name/status",
            get(services::service_status),
        )
}

fn configmap_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/v1/configmaps/namespaces/:namespace",
            get(configmaps::list_configmaps).post(configmaps::create_configmap),
        )
        .route(
            "/api/v1/configmaps/namespaces/:namespace/:name",
            get(configmaps::get_configmap)
                .put(configmaps::update_configmap)
                .delete(configmaps::delete_configmap),
        )
        .route(
            "/api/v1/configmaps/namespaces/:namespace/:name/usage",
            get(configmaps::configmap_usage),
        )
}

fn secret_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/v1/secrets/namespaces/:namespace",
            get(secrets::list_secrets).post(secrets::create_secret),
        )
        .route(
            "/api/v1/secrets/namespaces/:namespace/:name",
            get(secrets::get_secret)
                .put(secrets::update_secret)
                .delete(secrets::delete_secret),
        )
        .route(
            "/api/v1/secrets/namespaces/:namespace/:name/keys",
            get(secrets::secret_keys),
        )
        .route(
            "/api/v1/secrets/namespaces/:namespace/:name/usage",
            get(secrets::secret_usage),
        )
}

fn ingress_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/v1/namespaces/:namespace/ingresses",
            get(ingresses::list_ingresses).post(ingresses::create_ingress),
        )
        .route(
            "/api/v1/namespaces/:namespace/ingresses/:name",
            get(ingresses::get_ingress)
                .put(ingresses::update_ingress)
                .delete(ingresses::delete_ingress),
        )
        .route(
            "/api/v1/namespaces/:namespace/ingresses/:name/status",
            get(ingresses::ingress_status),
        )
}
