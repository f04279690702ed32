//! Ingress operations
//!
//! CRUD operations for Kubernetes Ingress resources. The status report is
//! assembled from a single read.

use k8s_openapi::api::networking::v1::{
    HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule,
    IngressServiceBackend, IngressSpec, IngressTLS, ServiceBackendPort,
};

use crate::kubernetes::cluster::Cluster;
use crate::kubernetes::error::{OpResult, ResultExt};
use crate::kubernetes::meta;
use crate::kubernetes::types::{
    CreateIngressRequest, IngressBackendInfo, IngressInfo, IngressPathInfo, IngressRuleInfo,
    IngressRuleRequest, IngressServiceInfo, IngressServicePort, IngressStatusReport,
    IngressTlsInfo, IngressTlsRequest, LoadBalancerIngressInfo, UpdateIngressRequest,
};

/// List Ingresses in a namespace
pub async fn list_ingresses(cluster: &Cluster, namespace: &str) -> OpResult<Vec<Ingress>> {
    cluster
        .ingresses(namespace)
        .list()
        .await
        .during("list ingresses")
}

/// Get a specific Ingress
pub async fn get_ingress(cluster: &Cluster, namespace: &str, name: &str) -> OpResult<Ingress> {
    cluster
        .ingresses(namespace)
        .get(name)
        .await
        .during("get ingress")
}

/// Create a new Ingress
pub async fn create_ingress(
    cluster: &Cluster,
    namespace: &str,
    request: &CreateIngressRequest,
) -> OpResult<Ingress> {
    let ingress = build_ingress(namespace, request);

    tracing::info!(namespace, name = %request.name, rules = request.rules.len(), "Creating ingress");
    cluster
        .ingresses(namespace)
        .create(&ingress)
        .await
        .during("create ingress")
}

/// Update an Ingress by read-modify-write
pub async fn update_ingress(
    cluster: &Cluster,
    namespace: &str,
    name: &str,
    request: &UpdateIngressRequest,
) -> OpResult<Ingress> {
    let api = cluster.ingresses(namespace);
    let mut ingress = api.get(name).await.during("get ingress")?;

    apply_update(&mut ingress, request);

    api.replace(name, &ingress).await.during("update ingress")
}

/// Delete an Ingress
pub async fn delete_ingress(cluster: &Cluster, namespace: &str, name: &str) -> OpResult<()> {
    cluster
        .ingresses(namespace)
        .delete(name)
        .await
        .during("delete ingress")
}

/// Routing table and load balancer status
pub async fn ingress_status(
    cluster: &Cluster,
    namespace: &str,
    name: &str,
) -> OpResult<IngressStatusReport> {
    let ingress = get_ingress(cluster, namespace, name).await?;
    Ok(status_report(&ingress))
}

fn k8s_rules(rules: &[IngressRuleRequest]) -> Vec<IngressRule> {
    rules
        .iter()
        .map(|r| {
            let paths: Vec<HTTPIngressPath> = r
                .paths
                .iter()
                .map(|p| HTTPIngressPath {
                    path: Some(p.path.clone()),
                    path_type: p.path_type.clone(),
                    backend: IngressBackend {
                        service: Some(IngressServiceBackend {
                            name: p.service_name.clone(),
                            port: Some(ServiceBackendPort {
                                number: Some(p.service_port),
                                name: None,
                            }),
                        }),
                        resource: None,
                    },
                })
                .collect();

            IngressRule {
                host: r.host.clone().filter(|h| !h.is_empty()),
                http: Some(HTTPIngressRuleValue { paths }),
            }
        })
        .collect()
}

fn k8s_tls(tls: &[IngressTlsRequest]) -> Vec<IngressTLS> {
    tls.iter()
        .map(|t| IngressTLS {
            hosts: Some(t.hosts.clone()),
            secret_name: t.secret_name.clone(),
        })
        .collect()
}

pub fn build_ingress(namespace: &str, request: &CreateIngressRequest) -> Ingress {
    Ingress {
        metadata: meta::new_meta(
            namespace,
            &request.name,
            request.labels.as_ref(),
            request.annotations.as_ref(),
        ),
        spec: Some(IngressSpec {
            ingress_class_name: request.class_name.clone().filter(|c| !c.is_empty()),
            rules: Some(k8s_rules(&request.rules)),
            tls: request
                .tls
                .as_deref()
                .filter(|tls| !tls.is_empty())
                .map(k8s_tls),
            default_backend: None,
        }),
        status: None,
    }
}

/// Overlay the fields present in `request`; empty rule or TLS lists are ignored
pub fn apply_update(ingress: &mut Ingress, request: &UpdateIngressRequest) {
    let spec = ingress.spec.get_or_insert_with(Default::default);

    if let Some(class_name) = &request.class_name {
        spec.ingress_class_name = Some(class_name.clone());
    }
    if let Some(rules) = request.rules.as_deref().filter(|r| !r.is_empty()) {
        spec.rules = Some(k8s_rules(rules));
    }
    if let Some(tls) = request.tls.as_deref().filter(|t| !t.is_empty()) {
        spec.tls = Some(k8s_tls(tls));
    }

    meta::overlay_meta(
        &mut ingress.metadata,
        request.labels.as_ref(),
        request.annotations.as_ref(),
    );
    meta::set_write_precondition(&mut ingress.metadata, request.resource_version.as_deref());
}

fn rule_info(rule: &IngressRule) -> IngressRuleInfo {
    let paths = rule
        .http
        .as_ref()
        .map(|http| {
            http.paths
                .iter()
                .map(|p| IngressPathInfo {
                    path: p.path.clone(),
                    path_type: p.path_type.clone(),
                    backend: IngressBackendInfo {
                        service: p.backend.service.as_ref().map(|s| IngressServiceInfo {
                            name: s.name.clone(),
                            port: s.port.as_ref().map(|port| IngressServicePort {
                                number: port.number,
                                name: port.name.clone(),
                            }),
                        }),
                    },
                })
                .collect()
        })
        .unwrap_or_default();

    IngressRuleInfo {
        host: rule.host.clone(),
        paths,
    }
}

fn tls_info(tls: &IngressTLS) -> IngressTlsInfo {
    IngressTlsInfo {
        hosts: tls.hosts.clone().unwrap_or_default(),
        secret_name: tls.secret_name.clone(),
    }
}

fn rules(ingress: &Ingress) -> Vec<IngressRuleInfo> {
    ingress
        .spec
        .as_ref()
        .and_then(|s| s.rules.as_ref())
        .map(|rules| rules.iter().map(rule_info).collect())
        .unwrap_or_default()
}

fn tls(ingress: &Ingress) -> Vec<IngressTlsInfo> {
    ingress
        .spec
        .as_ref()
        .and_then(|s| s.tls.as_ref())
        .map(|tls| tls.iter().map(tls_info).collect())
        .unwrap_or_default()
}

pub fn status_report(ingress: &Ingress) -> IngressStatusReport {
    let load_balancer = ingress
        .status
        .as_ref()
        .and_then(|s| s.load_balancer.as_ref())
        .and_then(|lb| lb.ingress.as_ref())
        .map(|entries| {
            entries
                .iter()
                .map(|lb| LoadBalancerIngressInfo {
                    ip: lb.ip.clone(),
                    hostname: lb.hostname.clone(),
                })
                .collect()
        })
        .unwrap_or_default();

    IngressStatusReport {
        load_balancer,
        rules: rules(ingress),
        tls: tls(ingress),
        class: ingress
            .spec
            .as_ref()
            .and_then(|s| s.ingress_class_name.clone()),
        annotations: meta::annotations(&ingress.metadata),
    }
}

/// Convert k8s Ingress to IngressInfo
pub fn ingress_to_info(ingress: &Ingress) -> IngressInfo {
    let metadata = &ingress.metadata;

    IngressInfo {
        name: metadata.name.clone().unwrap_or_default(),
        namespace: metadata.namespace.clone().unwrap_or_default(),
        class_name: ingress
            .spec
            .as_ref()
            .and_then(|s| s.ingress_class_name.clone()),
        rules: rules(ingress),
        tls: tls(ingress),
        labels: meta::labels(metadata),
        annotations: meta::annotations(metadata),
        creation_time: meta::creation_time(metadata),
    }
}
