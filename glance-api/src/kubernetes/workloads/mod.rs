//! Kubernetes workload management
//!
//! Handles Pods and Deployments.

pub mod deployments;
pub mod pods;
