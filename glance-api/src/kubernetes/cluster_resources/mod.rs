//! Kubernetes cluster-scoped resources
//!
//! Handles Namespaces and the pod phase summary per namespace.

pub mod namespaces;
