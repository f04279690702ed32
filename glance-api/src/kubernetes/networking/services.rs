//! Service operations
//!
//! CRUD operations for Kubernetes Services. The status report combines the
//! Service with its Endpoints; the two reads are not atomic.

use k8s_openapi::api::core::v1::{
    Endpoints, LoadBalancerStatus, Service, ServicePort, ServiceSpec,
};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

use crate::kubernetes::cluster::Cluster;
use crate::kubernetes::error::{OpResult, RemoteError, ResultExt};
use crate::kubernetes::meta;
use crate::kubernetes::types::{
    CreateServiceRequest, EndpointAddressInfo, LoadBalancerIngressInfo, ServiceDetail,
    ServiceInfo, ServicePortInfo, ServicePortRequest, ServiceStatusReport, TargetRefInfo,
    UpdateServiceRequest,
};

const DEFAULT_PROTOCOL: &str = "TCP";
const DEFAULT_TYPE: &str = "ClusterIP";

/// List services in a namespace
pub async fn list_services(cluster: &Cluster, namespace: &str) -> OpResult<Vec<Service>> {
    cluster
        .services(namespace)
        .list()
        .await
        .during("list services")
}

/// Get a specific service
pub async fn get_service(cluster: &Cluster, namespace: &str, name: &str) -> OpResult<Service> {
    cluster
        .services(namespace)
        .get(name)
        .await
        .during("get service")
}

/// Create a new service
pub async fn create_service(
    cluster: &Cluster,
    namespace: &str,
    request: &CreateServiceRequest,
) -> OpResult<Service> {
    let service = build_service(namespace, request);

    tracing::info!(
        namespace,
        name = %request.name,
        service_type = %request.service_type,
        "Creating service"
    );
    cluster
        .services(namespace)
        .create(&service)
        .await
        .during("create service")
}

/// Update a service by read-modify-write
pub async fn update_service(
    cluster: &Cluster,
    namespace: &str,
    name: &str,
    request: &UpdateServiceRequest,
) -> OpResult<Service> {
    let api = cluster.services(namespace);
    let mut service = api.get(name).await.during("get service")?;

    apply_update(&mut service, request);

    api.replace(name, &service).await.during("update service")
}

/// Delete a service
pub async fn delete_service(cluster: &Cluster, namespace: &str, name: &str) -> OpResult<()> {
    cluster
        .services(namespace)
        .delete(name)
        .await
        .during("delete service")
}

/// Exposure and endpoint status for a service
pub async fn service_status(
    cluster: &Cluster,
    namespace: &str,
    name: &str,
) -> OpResult<ServiceStatusReport> {
    let service = get_service(cluster, namespace, name).await?;

    // No Endpoints object yet means no backing pods
    let endpoints = match cluster.endpoints(namespace).get(name).await {
        Ok(endpoints) => Some(endpoints),
        Err(err) if matches!(err.remote(), Some(RemoteError::NotFound { .. })) => None,
        Err(err) => return Err(err).during("get service endpoints"),
    };

    Ok(status_report(&service, endpoints.as_ref()))
}

fn service_port(request: &ServicePortRequest) -> ServicePort {
    ServicePort {
        name: request.name.clone().filter(|n| !n.is_empty()),
        port: request.port,
        target_port: Some(
            request
                .target_port
                .clone()
                .unwrap_or(IntOrString::Int(request.port)),
        ),
        node_port: request.node_port.filter(|p| *p > 0),
        protocol: Some(
            request
                .protocol
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_PROTOCOL.to_string()),
        ),
        ..Default::default()
    }
}

pub fn build_service(namespace: &str, request: &CreateServiceRequest) -> Service {
    Service {
        metadata: meta::new_meta(namespace, &request.name, request.labels.as_ref(), None),
        spec: Some(ServiceSpec {
            type_: Some(request.service_type.clone()),
            ports: Some(request.ports.iter().map(service_port).collect()),
            selector: Some(request.selector.clone()),
            external_ips: request.external_ips.clone().filter(|ips| !ips.is_empty()),
            ..Default::default()
        }),
        status: None,
    }
}

/// Overlay the fields present in `request`; an empty port list is ignored
pub fn apply_update(service: &mut Service, request: &UpdateServiceRequest) {
    let spec = service.spec.get_or_insert_with(Default::default);

    if let Some(ports) = request.ports.as_ref().filter(|p| !p.is_empty()) {
        spec.ports = Some(ports.iter().map(service_port).collect());
    }
    if let Some(selector) = &request.selector {
        spec.selector = Some(selector.clone());
    }
    if let Some(external_ips) = &request.external_ips {
        spec.external_ips = Some(external_ips.clone());
    }

    meta::overlay_meta(&mut service.metadata, request.labels.as_ref(), None);
    meta::set_write_precondition(&mut service.metadata, request.resource_version.as_deref());
}

fn port_info(port: &ServicePort) -> ServicePortInfo {
    let target_port = match &port.target_port {
        Some(IntOrString::Int(n)) => n.to_string(),
        Some(IntOrString::String(s)) => s.clone(),
        None => port.port.to_string(),
    };

    ServicePortInfo {
        name: port.name.clone(),
        protocol: port
            .protocol
            .clone()
            .unwrap_or_else(|| DEFAULT_PROTOCOL.to_string()),
        port: port.port,
        target_port,
        node_port: port.node_port,
    }
}

fn load_balancer_ingress(status: &LoadBalancerStatus) -> Vec<LoadBalancerIngressInfo> {
    status
        .ingress
        .iter()
        .flatten()
        .map(|lb| LoadBalancerIngressInfo {
            ip: lb.ip.clone(),
            hostname: lb.hostname.clone(),
        })
        .collect()
}

pub fn status_report(service: &Service, endpoints: Option<&Endpoints>) -> ServiceStatusReport {
    let spec = service.spec.clone().unwrap_or_default();

    let load_balancer = service
        .status
        .as_ref()
        .and_then(|s| s.load_balancer.as_ref())
        .map(load_balancer_ingress)
        .unwrap_or_default();

    let endpoints = endpoints
        .and_then(|e| e.subsets.as_ref())
        .into_iter()
        .flatten()
        .flat_map(|subset| subset.addresses.iter().flatten())
        .map(|address| EndpointAddressInfo {
            ip: address.ip.clone(),
            hostname: address.hostname.clone(),
            node_name: address.node_name.clone(),
            target_ref: address.target_ref.as_ref().map(|r| TargetRefInfo {
                kind: r.kind.clone(),
                name: r.name.clone(),
                namespace: r.namespace.clone(),
            }),
        })
        .collect();

    ServiceStatusReport {
        service_type: spec.type_.unwrap_or_else(|| DEFAULT_TYPE.to_string()),
        cluster_ip: spec.cluster_ip,
        external_ips: spec.external_ips.unwrap_or_default(),
        load_balancer,
        ports: spec.ports.iter().flatten().map(port_info).collect(),
        endpoints,
        selector: spec.selector.unwrap_or_default(),
        session_affinity: spec.session_affinity,
    }
}

/// Convert k8s Service to ServiceInfo
pub fn service_to_info(service: &Service) -> ServiceInfo {
    let metadata = &service.metadata;
    let spec = service.spec.as_ref();

    ServiceInfo {
        name: metadata.name.clone().unwrap_or_default(),
        namespace: metadata.namespace.clone().unwrap_or_default(),
        service_type: spec
            .and_then(|s| s.type_.clone())
            .unwrap_or_else(|| DEFAULT_TYPE.to_string()),
        cluster_ip: spec.and_then(|s| s.cluster_ip.clone()),
        ports: spec
            .and_then(|s| s.ports.as_ref())
            .map(|ports| ports.iter().map(port_info).collect())
            .unwrap_or_default(),
        selector: spec.and_then(|s| s.selector.clone()).unwrap_or_default(),
        labels: meta::labels(metadata),
        creation_time: meta::creation_time(metadata),
    }
}

pub fn service_to_detail(service: &Service) -> ServiceDetail {
    let spec = service.spec.as_ref();

    ServiceDetail {
        summary: service_to_info(service),
        external_ips: spec
            .and_then(|s| s.external_ips.clone())
            .unwrap_or_default(),
        session_affinity: spec.and_then(|s| s.session_affinity.clone()),
        annotations: meta::annotations(&service.metadata),
    }
}
