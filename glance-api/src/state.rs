//! Shared application state

use crate::config::GlanceConfig;
use crate::kubernetes::cluster::Cluster;

/// State handed to every handler
///
/// The cluster handle is shared by all requests; it holds no per-request
/// data, so no locking is needed.
pub struct AppState {
    pub cluster: Cluster,
    pub config: GlanceConfig,
}

impl AppState {
    pub fn new(cluster: Cluster, config: GlanceConfig) -> Self {
        Self { cluster, config }
    }
}
