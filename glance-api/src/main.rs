//! Glance API server

use std::sync::Arc;

use anyhow::Context;
use glance_api::config::GlanceConfig;
use glance_api::kubernetes::client::K8sClient;
use glance_api::kubernetes::cluster::{health, Cluster};
use glance_api::shutdown::ShutdownCoordinator;
use glance_api::{logging, routes, AppState};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().skip(1).any(|arg| arg == "--print-config") {
        print!("{}", GlanceConfig::generate_sample());
        return Ok(());
    }

    let config = GlanceConfig::load().context("Failed to load configuration")?;

    // Held until exit so the file writer flushes
    let _log_guard = logging::init(&config)?;

    info!(environment = %config.environment, "Starting Glance API");

    let client = connect(&config).await?;
    let api_server = client.api_server().to_string();
    let cluster = Cluster::new(client);

    health::probe(&cluster)
        .await
        .context("Kubernetes API is not reachable")?;

    let addr = config.server.listen_addr()?;
    let coordinator = ShutdownCoordinator::with_timeout(config.server.shutdown_grace());

    let state = Arc::new(AppState::new(cluster, config));
    let app = routes::build_router(state);

    let listener = TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, %api_server, "Glance API listening");

    coordinator.listen_for_signals();
    coordinator
        .run_until_drained(axum::serve(listener, app).with_graceful_shutdown(coordinator.signal()))
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Token access wins over the kubeconfig file
async fn connect(config: &GlanceConfig) -> anyhow::Result<K8sClient> {
    let k8s = &config.kubernetes;

    let client = match &k8s.token {
        Some(token) => {
            info!(host = %k8s.host, insecure = k8s.insecure_skip_tls_verify, "Connecting with bearer token");
            K8sClient::from_token(&k8s.host, token, k8s.insecure_skip_tls_verify).await?
        }
        None => {
            info!(kubeconfig = %k8s.kubeconfig.display(), context = ?k8s.context, "Connecting with kubeconfig");
            K8sClient::from_kubeconfig_file(&k8s.kubeconfig, k8s.context.as_deref()).await?
        }
    };

    Ok(client)
}
