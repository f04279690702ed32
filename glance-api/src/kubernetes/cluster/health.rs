//! Cluster liveness probe
//!
//! Run once at startup before the server accepts traffic.

use super::Cluster;
use crate::kubernetes::error::{OpResult, ResultExt};

/// Prove the control plane answers by listing at most one namespace
pub async fn probe(cluster: &Cluster) -> OpResult<()> {
    let namespaces = cluster
        .namespaces()
        .list_limited(Some(1))
        .await
        .during("probe cluster")?;

    tracing::info!(
        sample = namespaces.len(),
        "Kubernetes API reachable"
    );

    Ok(())
}
