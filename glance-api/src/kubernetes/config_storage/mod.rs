//! Kubernetes configuration resources
//!
//! Handles ConfigMaps and Secrets, and the pod scan that reports which
//! workloads reference them.

pub mod configmaps;
pub mod secrets;
pub mod usage;
