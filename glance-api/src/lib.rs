//! Glance API Library
//!
//! A JSON-over-HTTP façade for a Kubernetes cluster: namespaces, pods,
//! deployments, services, ingresses, config maps and secrets. Exposed as a
//! library so integration tests can build the router over an in-memory
//! cluster.

// Core modules
pub mod config;
pub mod error;
pub mod validation;

// Application state
pub mod state;
pub use state::AppState;

// HTTP surface
pub mod handlers;
pub mod middleware;
pub mod routes;

// Kubernetes integration
pub mod kubernetes;

// Logging configuration
pub mod logging;

// Graceful shutdown handling
pub mod shutdown;
