//! Common test fixtures

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use kubeconsole_api::cmdb::MemoryCmdb;
use kubeconsole_api::config::ConsoleConfig;
use kubeconsole_api::{handlers, AppState};
use kubeconsole_common::{
    AvailabilityZoneRecord, ClusterRecord, ConnectScheme, DatacenterRecord, RecordStatus,
};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_CA: &str = include_str!("../fixtures/ca.pem");

/// Nothing listens here, so live calls fail fast with a refused connection
pub const UNREACHABLE_API_SERVER: &str = "https://127.0.0.1:1";

pub fn datacenter(id: &str) -> DatacenterRecord {
    DatacenterRecord {
        id: id.to_string(),
        cn_name: String::new(),
        en_name: format!("dc-{}", id),
        address: String::new(),
        status: RecordStatus::Enabled,
        is_deleted: false,
    }
}

pub fn zone(id: &str, datacenter_id: &str) -> AvailabilityZoneRecord {
    AvailabilityZoneRecord {
        id: id.to_string(),
        cn_name: String::new(),
        en_name: format!("zone-{}", id),
        datacenter_id: datacenter_id.to_string(),
        status: RecordStatus::Enabled,
        is_deleted: false,
    }
}

pub fn cluster(id: &str, datacenter_id: &str, zone_id: &str) -> ClusterRecord {
    ClusterRecord {
        id: id.to_string(),
        datacenter_id: datacenter_id.to_string(),
        zone_id: zone_id.to_string(),
        cn_name: String::new(),
        en_name: format!("cluster-{}", id),
        api_server: UNREACHABLE_API_SERVER.to_string(),
        connect_scheme: ConnectScheme::Token,
        cluster_user: String::new(),
        ca: TEST_CA.to_string(),
        cert: String::new(),
        key: String::new(),
        token: "t0ken".to_string(),
        kubeconfig: String::new(),
        version: "v1.32.0".to_string(),
        runtime: "containerd".to_string(),
        pod_cidr: String::new(),
        service_cidr: String::new(),
        status: RecordStatus::Enabled,
        is_deleted: false,
        updated_at: 1,
    }
}

/// Datacenter D1 with zone Z1 holding cluster C1, and an empty datacenter D2
pub async fn seeded_cmdb() -> MemoryCmdb {
    let cmdb = MemoryCmdb::new();
    cmdb.insert_datacenter(datacenter("D1")).await;
    cmdb.insert_datacenter(datacenter("D2")).await;
    cmdb.insert_zone(zone("Z1", "D1")).await;
    cmdb.insert_cluster(cluster("C1", "D1", "Z1")).await;
    cmdb
}

pub fn test_config() -> ConsoleConfig {
    let mut config = ConsoleConfig::default();
    config.paging.page_size = 10;
    config.kubernetes.connect_timeout_secs = 2;
    config.kubernetes.read_timeout_secs = 2;
    config
}

pub async fn test_app() -> Router {
    let cmdb = seeded_cmdb().await;
    handlers::router(AppState::new(Arc::new(test_config()), Arc::new(cmdb)))
}

/// Send one request and decode the JSON body
pub async fn call(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    call(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    call(app, request).await
}

pub const BOUNDARY: &str = "kubeconsole-test-boundary";

/// POST `fields` as multipart form data, each `(name, filename, value)`
pub async fn post_multipart(
    app: Router,
    uri: &str,
    fields: &[(&str, Option<&str>, &str)],
) -> (StatusCode, serde_json::Value) {
    let mut body = String::new();
    for (name, filename, value) in fields {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        match filename {
            Some(file) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/x-yaml\r\n\r\n",
                name, file
            )),
            None => body.push_str(&format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)),
        }
        body.push_str(value);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));

    let request = Request::post(uri)
        .header("content-type", format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from(body))
        .unwrap();
    call(app, request).await
}
