//! Kubernetes types for the Glance API
//!
//! Simplified representations of Kubernetes resources for API responses,
//! request payloads, and the derived status / metrics / usage reports.
//! Field names follow the camelCase wire format of the Kubernetes API.

use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use k8s_openapi::ByteString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type Labels = BTreeMap<String, String>;

// ============================================================================
// Namespace Types
// ============================================================================

/// Simplified namespace information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceInfo {
    pub name: String,
    pub status: String,
    pub creation_time: Option<String>,
    pub resource_version: Option<String>,
    pub labels: Labels,
}

/// Pod counts for a namespace
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceMetrics {
    pub pod_count: usize,
    pub status: PhaseCounts,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhaseCounts {
    pub running: usize,
    pub pending: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub unknown: usize,
}

// ============================================================================
// Pod Types
// ============================================================================

/// Simplified pod information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodInfo {
    pub name: String,
    pub namespace: String,
    pub status: String,
    #[serde(rename = "podIP")]
    pub pod_ip: Option<String>,
    #[serde(rename = "hostIP")]
    pub host_ip: Option<String>,
    pub creation_time: Option<String>,
    pub labels: Labels,
}

/// Full pod view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodDetail {
    #[serde(flatten)]
    pub summary: PodInfo,
    pub annotations: Labels,
    pub node_name: Option<String>,
    pub containers: Vec<ContainerInfo>,
}

/// Container spec summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerInfo {
    pub name: String,
    pub image: Option<String>,
    pub ports: Vec<k8s_openapi::api::core::v1::ContainerPort>,
    pub env: Vec<k8s_openapi::api::core::v1::EnvVar>,
    pub command: Vec<String>,
    pub args: Vec<String>,
}

/// Runtime view of a pod
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodMetrics {
    pub phase: Option<String>,
    #[serde(rename = "hostIP")]
    pub host_ip: Option<String>,
    #[serde(rename = "podIP")]
    pub pod_ip: Option<String>,
    pub start_time: Option<String>,
    pub containers: BTreeMap<String, ContainerMetrics>,
    pub conditions: Vec<PodConditionInfo>,
    pub resource_requests: Vec<ResourceRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerMetrics {
    pub ready: bool,
    pub restart_count: i32,
    pub state: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodConditionInfo {
    #[serde(rename = "type")]
    pub type_: String,
    pub status: String,
    pub reason: Option<String>,
    pub message: Option<String>,
}

/// Requested cpu / memory per container
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceRequest {
    pub name: String,
    pub cpu: Option<String>,
    pub memory: Option<String>,
}

// ============================================================================
// Deployment Types
// ============================================================================

/// Simplified deployment information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentInfo {
    pub name: String,
    pub namespace: String,
    /// Replicas the controller currently runs (`status.replicas`)
    pub replicas: i32,
    pub ready_replicas: i32,
    /// Requested count (`spec.replicas`)
    pub desired_replicas: i32,
    pub strategy: String,
    pub creation_time: Option<String>,
    pub labels: Labels,
}

/// Full deployment view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentDetail {
    #[serde(flatten)]
    pub summary: DeploymentInfo,
    pub selector: Labels,
    pub annotations: Labels,
    pub containers: Vec<ContainerInfo>,
}

/// Plain `name=value` environment entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvVarRequest {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// Create Deployment request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeploymentRequest {
    pub name: String,
    pub image: String,
    pub replicas: i32,
    pub container_port: Option<i32>,
    pub labels: Option<Labels>,
    pub annotations: Option<Labels>,
    pub env_vars: Option<Vec<EnvVarRequest>>,
}

/// Update Deployment request; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeploymentRequest {
    pub image: Option<String>,
    pub replicas: Option<i32>,
    pub labels: Option<Labels>,
    pub annotations: Option<Labels>,
    pub env_vars: Option<Vec<EnvVarRequest>>,
    pub resource_version: Option<String>,
}

/// Acknowledgement for deployment writes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkloadAck {
    pub name: String,
    pub namespace: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
}

/// Deployment rollout status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentStatusReport {
    pub replicas: ReplicaCounts,
    pub conditions: Vec<DeploymentConditionInfo>,
    pub strategy: String,
    pub age: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplicaCounts {
    pub desired: i32,
    pub current: i32,
    pub updated: i32,
    pub ready: i32,
    pub available: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConditionInfo {
    #[serde(rename = "type")]
    pub type_: String,
    pub status: String,
    pub last_update_time: Option<String>,
    pub last_transition_time: Option<String>,
    pub reason: Option<String>,
    pub message: Option<String>,
}

// ============================================================================
// Service Types
// ============================================================================

/// Simplified service information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub name: String,
    pub namespace: String,
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(rename = "clusterIP")]
    pub cluster_ip: Option<String>,
    pub ports: Vec<ServicePortInfo>,
    pub selector: Labels,
    pub labels: Labels,
    pub creation_time: Option<String>,
}

/// Full service view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetail {
    #[serde(flatten)]
    pub summary: ServiceInfo,
    #[serde(rename = "externalIPs")]
    pub external_ips: Vec<String>,
    pub session_affinity: Option<String>,
    pub annotations: Labels,
}

/// Service port definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServicePortInfo {
    pub name: Option<String>,
    pub protocol: String,
    pub port: i32,
    pub target_port: String,
    pub node_port: Option<i32>,
}

/// Service port specification for create / update
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePortRequest {
    pub name: Option<String>,
    pub port: i32,
    pub target_port: Option<IntOrString>,
    pub node_port: Option<i32>,
    pub protocol: Option<String>,
}

/// Create Service request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub ports: Vec<ServicePortRequest>,
    pub selector: Labels,
    pub labels: Option<Labels>,
    #[serde(rename = "externalIPs")]
    pub external_ips: Option<Vec<String>>,
}

/// Update Service request; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRequest {
    pub ports: Option<Vec<ServicePortRequest>>,
    pub selector: Option<Labels>,
    pub labels: Option<Labels>,
    #[serde(rename = "externalIPs")]
    pub external_ips: Option<Vec<String>>,
    pub resource_version: Option<String>,
}

/// Service exposure and endpoint status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatusReport {
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(rename = "clusterIP")]
    pub cluster_ip: Option<String>,
    #[serde(rename = "externalIPs")]
    pub external_ips: Vec<String>,
    pub load_balancer: Vec<LoadBalancerIngressInfo>,
    pub ports: Vec<ServicePortInfo>,
    pub endpoints: Vec<EndpointAddressInfo>,
    pub selector: Labels,
    pub session_affinity: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoadBalancerIngressInfo {
    pub ip: Option<String>,
    pub hostname: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EndpointAddressInfo {
    pub ip: String,
    pub hostname: Option<String>,
    pub node_name: Option<String>,
    pub target_ref: Option<TargetRefInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetRefInfo {
    pub kind: Option<String>,
    pub name: Option<String>,
    pub namespace: Option<String>,
}

// ============================================================================
// Ingress Types
// ============================================================================

/// Ingress information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressInfo {
    pub name: String,
    pub namespace: String,
    pub class_name: Option<String>,
    pub rules: Vec<IngressRuleInfo>,
    pub tls: Vec<IngressTlsInfo>,
    pub labels: Labels,
    pub annotations: Labels,
    pub creation_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngressRuleInfo {
    pub host: Option<String>,
    pub paths: Vec<IngressPathInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IngressPathInfo {
    pub path: Option<String>,
    pub path_type: String,
    pub backend: IngressBackendInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngressBackendInfo {
    pub service: Option<IngressServiceInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngressServiceInfo {
    pub name: String,
    pub port: Option<IngressServicePort>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngressServicePort {
    pub number: Option<i32>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IngressTlsInfo {
    pub hosts: Vec<String>,
    pub secret_name: Option<String>,
}

/// Create Ingress request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIngressRequest {
    pub name: String,
    pub class_name: Option<String>,
    pub rules: Vec<IngressRuleRequest>,
    pub tls: Option<Vec<IngressTlsRequest>>,
    pub annotations: Option<Labels>,
    pub labels: Option<Labels>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngressRuleRequest {
    pub host: Option<String>,
    pub paths: Vec<IngressPathRequest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressPathRequest {
    pub path: String,
    pub path_type: String,
    pub service_name: String,
    pub service_port: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressTlsRequest {
    #[serde(default)]
    pub hosts: Vec<String>,
    pub secret_name: Option<String>,
}

/// Update Ingress request; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIngressRequest {
    pub class_name: Option<String>,
    pub rules: Option<Vec<IngressRuleRequest>>,
    pub tls: Option<Vec<IngressTlsRequest>>,
    pub labels: Option<Labels>,
    pub annotations: Option<Labels>,
    pub resource_version: Option<String>,
}

/// Ingress routing and load balancer status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressStatusReport {
    pub load_balancer: Vec<LoadBalancerIngressInfo>,
    pub rules: Vec<IngressRuleInfo>,
    pub tls: Vec<IngressTlsInfo>,
    pub class: Option<String>,
    pub annotations: Labels,
}

// ============================================================================
// ConfigMap and Secret Types
// ============================================================================

/// ConfigMap information (key names only, never values)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMapInfo {
    pub name: String,
    pub namespace: String,
    pub data_count: usize,
    pub keys: Vec<String>,
    pub binary_keys: Vec<String>,
    pub labels: Labels,
    pub annotations: Labels,
    pub creation_time: Option<String>,
}

/// Create ConfigMap request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConfigMapRequest {
    pub name: String,
    pub data: Option<BTreeMap<String, String>>,
    pub binary_data: Option<BTreeMap<String, ByteString>>,
    pub labels: Option<Labels>,
    pub annotations: Option<Labels>,
}

/// Update ConfigMap request; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfigMapRequest {
    pub data: Option<BTreeMap<String, String>>,
    pub binary_data: Option<BTreeMap<String, ByteString>>,
    pub labels: Option<Labels>,
    pub annotations: Option<Labels>,
    pub resource_version: Option<String>,
}

/// Secret information (data values are not exposed)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretInfo {
    pub name: String,
    pub namespace: String,
    #[serde(rename = "type")]
    pub secret_type: String,
    pub keys: Vec<String>,
    pub labels: Labels,
    pub annotations: Labels,
    pub creation_time: Option<String>,
}

/// Create Secret request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSecretRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub secret_type: Option<String>,
    pub string_data: Option<BTreeMap<String, String>>,
    pub labels: Option<Labels>,
    pub annotations: Option<Labels>,
}

/// Update Secret request; `stringData` entries merge into existing data
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSecretRequest {
    pub string_data: Option<BTreeMap<String, String>>,
    pub labels: Option<Labels>,
    pub annotations: Option<Labels>,
    pub resource_version: Option<String>,
}

/// Key names held by a secret
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecretKeys {
    pub keys: Vec<String>,
    #[serde(rename = "type")]
    pub secret_type: String,
}

// ============================================================================
// Usage Types
// ============================================================================

/// How one pod references a config map or secret
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UsageEvidence {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volume_mounts: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_from: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_vars: Vec<String>,
}

impl UsageEvidence {
    pub fn is_empty(&self) -> bool {
        self.volume_mounts.is_empty() && self.env_from.is_empty() && self.env_vars.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PodUsage {
    pub name: String,
    pub status: String,
    pub usage: UsageEvidence,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMapUsage {
    pub pods_using_config_map: Vec<PodUsage>,
    pub total_pods: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecretUsage {
    pub pods_using_secret: Vec<PodUsage>,
    pub total_pods: usize,
}
