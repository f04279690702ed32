//! Kubernetes networking resources
//!
//! Handles Services and Ingress.

pub mod ingress;
pub mod services;
