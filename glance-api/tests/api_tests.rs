//! HTTP API tests
//!
//! Every test drives the full router (validation, handlers, resource
//! modules, error mapping) against an in-memory cluster.
//!
//! Run with: cargo test --test api_tests

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{GatedCluster, TestEnv, NAMESPACE};
use glance_api::config::GlanceConfig;
use k8s_openapi::api::core::v1::{Namespace, Pod};
use serde_json::json;
use tower::ServiceExt;

fn pod(name: &str, phase: &str, spec: serde_json::Value) -> Pod {
    serde_json::from_value(json!({
        "metadata": { "name": name, "namespace": NAMESPACE },
        "spec": spec,
        "status": { "phase": phase }
    }))
    .unwrap()
}

fn web_deployment() -> serde_json::Value {
    json!({
        "name": "web",
        "image": "nginx:1.27",
        "replicas": 2,
        "containerPort": 80,
        "labels": { "tier": "frontend" },
        "envVars": [{ "name": "MODE", "value": "prod" }]
    })
}

// ============== Health and middleware ==============

#[tokio::test]
async fn test_health() {
    let env = TestEnv::new();
    let response = env.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.data()["status"], "ok");
}

#[tokio::test]
async fn test_cors_preflight_short_circuits() {
    let env = TestEnv::new();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/namespaces")
        .header(header::ORIGIN, "https://ui.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();

    let response = env.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
    let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap();
    assert!(methods.contains("PUT"));
    assert!(methods.contains("DELETE"));
}

#[tokio::test]
async fn test_cors_header_on_normal_response() {
    let env = TestEnv::new();
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://ui.example.com")
        .body(Body::empty())
        .unwrap();

    let response = env.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_cors_configured_origins() {
    let mut config = GlanceConfig::default();
    config.server.cors_allowed_origins = vec!["https://ui.example.com".to_string()];
    let env = TestEnv::with_config(config);

    for (origin, allowed) in [
        ("https://ui.example.com", true),
        ("https://other.example.com", false),
    ] {
        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap();
        let response = env.router.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let allow = response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN);
        if allowed {
            assert_eq!(allow.unwrap(), origin);
        } else {
            assert!(allow.is_none());
        }
    }
}

// ============== Error mapping ==============

#[tokio::test]
async fn test_unknown_route_uses_envelope() {
    let env = TestEnv::new();
    let response = env.get("/api/v1/nope").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.error(), "No route for GET /api/v1/nope");
}

#[tokio::test]
async fn test_wrong_method_uses_envelope() {
    let env = TestEnv::new();
    let response = env.request(Method::PATCH, "/api/v1/namespaces", None).await;

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.error(), "Method Not Allowed");
}

#[tokio::test]
async fn test_request_timeout_uses_envelope() {
    let gated = Arc::new(GatedCluster::new(2));
    let mut config = GlanceConfig::default();
    config.server.request_timeout_secs = 1;
    let env = TestEnv::with_api(gated.clone(), config);

    // A lone gated read never passes the barrier
    gated.arm();
    let response = env.get("/api/v1/configmaps/namespaces/default/settings").await;
    gated.disarm();

    assert_eq!(response.status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.error(), "Request timed out");
}

#[tokio::test]
async fn test_missing_resource_is_server_error() {
    let env = TestEnv::new();
    let response = env
        .delete("/api/v1/configmaps/namespaces/default/ghost")
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["success"], false);
    assert!(response.error().starts_with("delete configmap failed"));
    assert!(response.error().contains("Reason: NotFound"));
    assert!(response.error().contains("Code: 404"));
}

#[tokio::test]
async fn test_remote_status_passthrough() {
    let mut config = GlanceConfig::default();
    config.server.remote_status_passthrough = true;
    let env = TestEnv::with_config(config);

    let response = env.get("/api/v1/secrets/namespaces/default/ghost").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.error().contains("NotFound"));

    // Request errors are unaffected
    let response = env
        .request(
            Method::PUT,
            "/api/v1/deployments/namespaces/default/web/scale?replicas=-2",
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_create_is_server_error() {
    let env = TestEnv::new();
    let body = json!({ "name": "settings", "data": { "a": "1" } });

    let first = env.post("/api/v1/configmaps/namespaces/default", body.clone()).await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = env.post("/api/v1/configmaps/namespaces/default", body).await;
    assert_eq!(second.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(second.error().contains("AlreadyExists"));
}

// ============== Validation ==============

#[tokio::test]
async fn test_missing_required_field_is_bad_request() {
    let env = TestEnv::new();
    let response = env
        .post(
            "/api/v1/deployments/namespaces/default",
            json!({ "name": "web", "image": "nginx" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.error().starts_with("Invalid request format:"));
}

#[tokio::test]
async fn test_wrong_type_is_bad_request() {
    let env = TestEnv::new();
    let response = env
        .post(
            "/api/v1/services/namespaces/default",
            json!({
                "name": "web",
                "type": "ClusterIP",
                "ports": "80",
                "selector": { "app": "web" }
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.error().starts_with("Invalid request format:"));
}

#[tokio::test]
async fn test_empty_name_is_bad_request() {
    let env = TestEnv::new();
    let response = env
        .post("/api/v1/secrets/namespaces/default", json!({ "name": "" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_replicas() {
    let env = TestEnv::new();
    env.post("/api/v1/deployments/namespaces/default", web_deployment())
        .await;

    for query in ["replicas=abc", "replicas=-1", "replicas=", "replicas=%203", ""] {
        let uri = format!("/api/v1/deployments/namespaces/default/web/scale?{}", query);
        let response = env.request(Method::PUT, &uri, None).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "query {:?}", query);
        assert_eq!(response.error(), "Invalid replicas value");
    }
}

// ============== Deployments ==============

#[tokio::test]
async fn test_deployment_lifecycle() {
    let env = TestEnv::new();

    let response = env
        .post("/api/v1/deployments/namespaces/default", web_deployment())
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(
        response.data(),
        &json!({ "name": "web", "namespace": "default", "status": "created" })
    );

    let response = env.get("/api/v1/deployments/namespaces/default/web").await;
    assert_eq!(response.status, StatusCode::OK);
    let detail = response.data();
    assert_eq!(detail["desiredReplicas"], 2);
    // No controller runs in the in-memory cluster
    assert_eq!(detail["replicas"], 0);
    assert_eq!(detail["selector"]["app"], "web");
    assert_eq!(detail["labels"]["tier"], "frontend");
    assert_eq!(detail["containers"][0]["name"], "web");
    assert_eq!(detail["containers"][0]["image"], "nginx:1.27");

    let response = env
        .request(
            Method::PUT,
            "/api/v1/deployments/namespaces/default/web/scale?replicas=5",
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "scaled");
    assert_eq!(response.data()["replicas"], 5);

    let response = env
        .put(
            "/api/v1/deployments/namespaces/default/web",
            json!({ "image": "nginx:1.28" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "updated");

    let response = env.get("/api/v1/deployments/namespaces/default/web").await;
    assert_eq!(response.data()["desiredReplicas"], 5);
    assert_eq!(response.data()["containers"][0]["image"], "nginx:1.28");

    let response = env
        .get("/api/v1/deployments/namespaces/default/web/status")
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["replicas"]["desired"], 5);

    let response = env
        .delete("/api/v1/deployments/namespaces/default/web")
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["message"], "Deployment web deleted");

    let response = env.get("/api/v1/deployments/namespaces/default").await;
    assert_eq!(response.data(), &json!([]));
}

// ============== Services ==============

#[tokio::test]
async fn test_service_status_after_create() {
    let env = TestEnv::new();

    let response = env
        .post(
            "/api/v1/services/namespaces/default",
            json!({
                "name": "web",
                "type": "ClusterIP",
                "ports": [{ "name": "http", "port": 80, "targetPort": 8080 }],
                "selector": { "app": "web", "tier": "frontend" }
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.data()["name"], "web");

    let response = env
        .get("/api/v1/services/namespaces/default/web/status")
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let status = response.data();
    assert_eq!(status["type"], "ClusterIP");
    assert_eq!(status["selector"], json!({ "app": "web", "tier": "frontend" }));
    assert_eq!(status["endpoints"], json!([]));

    let ports = status["ports"].as_array().unwrap();
    assert_eq!(ports.len(), 1);
    assert_eq!(ports[0]["name"], "http");
    assert_eq!(ports[0]["port"], 80);
    assert_eq!(ports[0]["targetPort"], "8080");
    assert_eq!(ports[0]["protocol"], "TCP");
}

#[tokio::test]
async fn test_service_empty_ports_update_is_ignored() {
    let env = TestEnv::new();
    env.post(
        "/api/v1/services/namespaces/default",
        json!({
            "name": "api",
            "type": "NodePort",
            "ports": [{ "port": 443, "nodePort": 30443 }],
            "selector": { "app": "api" }
        }),
    )
    .await;

    let response = env
        .put(
            "/api/v1/services/namespaces/default/api",
            json!({ "ports": [], "labels": { "team": "core" } }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = env.get("/api/v1/services/namespaces/default/api").await;
    let service = response.data();
    assert_eq!(service["labels"]["team"], "core");
    assert_eq!(service["ports"][0]["port"], 443);
    assert_eq!(service["ports"][0]["nodePort"], 30443);
}

// ============== Ingresses ==============

#[tokio::test]
async fn test_ingress_create_and_status() {
    let env = TestEnv::new();

    let response = env
        .post(
            "/api/v1/namespaces/default/ingresses",
            json!({
                "name": "web",
                "className": "nginx",
                "rules": [{
                    "host": "web.example.com",
                    "paths": [{
                        "path": "/",
                        "pathType": "Prefix",
                        "serviceName": "web",
                        "servicePort": 80
                    }]
                }],
                "tls": [{ "hosts": ["web.example.com"], "secretName": "web-tls" }]
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.data()["className"], "nginx");

    let response = env
        .get("/api/v1/namespaces/default/ingresses/web/status")
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let status = response.data();
    assert_eq!(status["class"], "nginx");
    assert_eq!(status["loadBalancer"], json!([]));
    assert_eq!(status["rules"][0]["host"], "web.example.com");
    let path = &status["rules"][0]["paths"][0];
    assert_eq!(path["pathType"], "Prefix");
    assert_eq!(path["backend"]["service"]["name"], "web");
    assert_eq!(path["backend"]["service"]["port"]["number"], 80);
    assert_eq!(status["tls"][0]["secretName"], "web-tls");
}

#[tokio::test]
async fn test_ingress_without_paths_is_bad_request() {
    let env = TestEnv::new();
    let response = env
        .post(
            "/api/v1/namespaces/default/ingresses",
            json!({ "name": "web", "rules": [{ "host": "a.example.com", "paths": [] }] }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// ============== Config maps ==============

#[tokio::test]
async fn test_empty_update_leaves_configmap_unchanged() {
    let env = TestEnv::new();
    env.post(
        "/api/v1/configmaps/namespaces/default",
        json!({
            "name": "settings",
            "data": { "LOG_LEVEL": "info", "PORT": "8080" },
            "labels": { "app": "web" }
        }),
    )
    .await;

    let before = env
        .get("/api/v1/configmaps/namespaces/default/settings")
        .await;

    let response = env
        .put("/api/v1/configmaps/namespaces/default/settings", json!({}))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let after = env
        .get("/api/v1/configmaps/namespaces/default/settings")
        .await;
    assert_eq!(before.data(), after.data());
    assert_eq!(after.data()["keys"], json!(["LOG_LEVEL", "PORT"]));
    assert_eq!(after.data()["dataCount"], 2);
}

#[tokio::test]
async fn test_configmap_values_are_not_exposed() {
    let env = TestEnv::new();
    env.post(
        "/api/v1/configmaps/namespaces/default",
        json!({ "name": "settings", "data": { "DATABASE_URL": "postgres://db:5432/app" } }),
    )
    .await;

    let response = env.get("/api/v1/configmaps/namespaces/default").await;
    let text = response.body.to_string();
    assert!(text.contains("DATABASE_URL"));
    assert!(!text.contains("postgres://"));
}

#[tokio::test]
async fn test_configmap_usage() {
    let env = TestEnv::new();
    env.post(
        "/api/v1/configmaps/namespaces/default",
        json!({ "name": "settings", "data": { "MODE": "prod" } }),
    )
    .await;

    let pods = env.cluster.pods(NAMESPACE);
    pods.create(&pod(
        "web-1",
        "Running",
        json!({
            "containers": [{
                "name": "app",
                "image": "web",
                "envFrom": [{ "configMapRef": { "name": "settings" } }],
                "env": [{
                    "name": "MODE",
                    "valueFrom": { "configMapKeyRef": { "name": "settings", "key": "MODE" } }
                }]
            }]
        }),
    ))
    .await
    .unwrap();
    pods.create(&pod(
        "worker-1",
        "Running",
        json!({ "containers": [{ "name": "worker", "image": "worker" }] }),
    ))
    .await
    .unwrap();

    let response = env
        .get("/api/v1/configmaps/namespaces/default/settings/usage")
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let usage = response.data();
    assert_eq!(usage["totalPods"], 1);
    let using = &usage["podsUsingConfigMap"][0];
    assert_eq!(using["name"], "web-1");
    assert_eq!(using["status"], "Running");
    assert_eq!(using["usage"]["envFrom"], json!(["app"]));
    assert_eq!(using["usage"]["envVars"], json!(["app:MODE"]));
    assert!(using["usage"].get("volumeMounts").is_none());
}

// ============== Secrets ==============

#[tokio::test]
async fn test_secret_values_never_leave_the_api() {
    let env = TestEnv::new();
    // base64 of "hunter2"
    let leaks = ["hunter2", "aHVudGVyMg=="];

    let response = env
        .post(
            "/api/v1/secrets/namespaces/default",
            json!({ "name": "db", "stringData": { "password": "hunter2" } }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.data()["type"], "Opaque");

    let response = env
        .put(
            "/api/v1/secrets/namespaces/default/db",
            json!({ "stringData": { "username": "admin" } }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let responses = [
        response,
        env.get("/api/v1/secrets/namespaces/default").await,
        env.get("/api/v1/secrets/namespaces/default/db").await,
        env.get("/api/v1/secrets/namespaces/default/db/keys").await,
    ];
    for response in &responses {
        assert_eq!(response.status, StatusCode::OK);
        let text = response.body.to_string();
        for leak in leaks {
            assert!(!text.contains(leak), "secret value leaked: {}", text);
        }
    }

    // The merge kept the original key
    let keys = env.get("/api/v1/secrets/namespaces/default/db/keys").await;
    assert_eq!(keys.data()["keys"], json!(["password", "username"]));
    assert_eq!(keys.data()["type"], "Opaque");
}

#[tokio::test]
async fn test_secret_usage_via_volume() {
    let env = TestEnv::new();
    env.post(
        "/api/v1/secrets/namespaces/default",
        json!({ "name": "tls", "type": "Opaque", "stringData": { "cert": "x" } }),
    )
    .await;

    env.cluster
        .pods(NAMESPACE)
        .create(&pod(
            "proxy-1",
            "Pending",
            json!({
                "containers": [{ "name": "proxy", "image": "envoy" }],
                "volumes": [{ "name": "certs", "secret": { "secretName": "tls" } }]
            }),
        ))
        .await
        .unwrap();

    let response = env
        .get("/api/v1/secrets/namespaces/default/tls/usage")
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["totalPods"], 1);
    assert_eq!(
        response.data()["podsUsingSecret"][0]["usage"]["volumeMounts"],
        json!(["certs"])
    );
}

// ============== Namespaces and pods ==============

#[tokio::test]
async fn test_namespace_metrics() {
    let env = TestEnv::new();
    let namespace: Namespace = serde_json::from_value(json!({
        "metadata": { "name": "default" },
        "status": { "phase": "Active" }
    }))
    .unwrap();
    env.cluster.namespaces().create(&namespace).await.unwrap();

    let pods = env.cluster.pods(NAMESPACE);
    let containers = json!({ "containers": [{ "name": "c", "image": "busybox" }] });
    for (name, phase) in [("a", "Running"), ("b", "Running"), ("c", "Pending"), ("d", "Failed")] {
        pods.create(&pod(name, phase, containers.clone())).await.unwrap();
    }

    let response = env.get("/api/v1/namespaces").await;
    assert_eq!(response.data()[0]["name"], "default");
    assert_eq!(response.data()[0]["status"], "Active");

    let response = env.get("/api/v1/namespaces/default/metrics").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["podCount"], 4);
    assert_eq!(response.data()["status"]["running"], 2);
    assert_eq!(response.data()["status"]["pending"], 1);
    assert_eq!(response.data()["status"]["failed"], 1);
    assert_eq!(response.data()["status"]["succeeded"], 0);
}

#[tokio::test]
async fn test_pod_read_and_delete() {
    let env = TestEnv::new();
    env.cluster
        .pods(NAMESPACE)
        .create(&pod(
            "web-1",
            "Running",
            json!({ "nodeName": "node-a", "containers": [{ "name": "web", "image": "nginx" }] }),
        ))
        .await
        .unwrap();

    let response = env.get("/api/v1/pods/namespaces/default").await;
    assert_eq!(response.data().as_array().unwrap().len(), 1);
    assert_eq!(response.data()[0]["status"], "Running");

    let response = env.get("/api/v1/pods/namespaces/default/web-1").await;
    assert_eq!(response.data()["nodeName"], "node-a");
    assert_eq!(response.data()["containers"][0]["image"], "nginx");

    let response = env.get("/api/v1/pods/namespaces/default/web-1/metrics").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["phase"], "Running");

    let response = env.delete("/api/v1/pods/namespaces/default/web-1").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["message"], "Pod web-1 deleted");

    let response = env.get("/api/v1/pods/namespaces/default/web-1").await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
}
