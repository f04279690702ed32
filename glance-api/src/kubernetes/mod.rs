//! Kubernetes integration for Glance
//!
//! Provides the Kubernetes façade behind the HTTP API:
//! - Cluster connection via kubeconfig or host/token
//! - Workloads (Pods, Deployments)
//! - Networking (Services, Ingress)
//! - Configuration (ConfigMaps, Secrets) and their pod usage
//! - Namespaces and per-namespace pod metrics
//!
//! Every operation takes an explicit [`cluster::Cluster`] handle and wraps
//! remote failures with the operation name.

pub mod client;
pub mod cluster;
pub mod error;
pub mod meta;
pub mod types;

pub mod cluster_resources;
pub mod config_storage;
pub mod networking;
pub mod workloads;
