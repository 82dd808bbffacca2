//! Scripted API server for module tests
//!
//! A [`K8sClient`] over a `tower_test` mock service. Each [`Step`] names the
//! request the client must send next and the reply it gets back.

use http::{Method, Request, Response, StatusCode};
use kube::client::Body;
use kube::Client;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tower_test::mock;

use super::K8sClient;

pub enum Reply {
    Json(StatusCode, Value),
    /// Send the request body back as the created object
    Echo,
}

pub struct Step {
    method: Method,
    path: String,
    reply: Reply,
}

impl Step {
    pub fn get(path: &str, body: Value) -> Self {
        Self::new(Method::GET, path, Reply::Json(StatusCode::OK, body))
    }

    pub fn create(path: &str) -> Self {
        Self::new(Method::POST, path, Reply::Echo)
    }

    pub fn delete(path: &str, body: Value) -> Self {
        Self::new(Method::DELETE, path, Reply::Json(StatusCode::OK, body))
    }

    pub fn not_found(method: Method, path: &str) -> Self {
        let status = json!({
            "kind": "Status",
            "apiVersion": "v1",
            "status": "Failure",
            "message": format!("{} not found", path),
            "reason": "NotFound",
            "code": 404
        });
        Self::new(method, path, Reply::Json(StatusCode::NOT_FOUND, status))
    }

    fn new(method: Method, path: &str, reply: Reply) -> Self {
        Self {
            method,
            path: path.to_string(),
            reply,
        }
    }
}

/// One request the server answered
#[derive(Debug)]
pub struct Served {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// Client for cluster `C1` answered by `steps` in order
///
/// The handle resolves to every served request once the script is done.
/// It panics if a request arrives out of order.
pub fn scripted_client(steps: Vec<Step>) -> (K8sClient, JoinHandle<Vec<Served>>) {
    let (service, mut handle) = mock::pair::<Request<Body>, Response<Body>>();
    let client = K8sClient::from_client(Client::new(service, "default"), "C1", "cluster-C1");

    let server = tokio::spawn(async move {
        let mut served = Vec::new();
        for step in steps {
            let (request, send) = handle
                .next_request()
                .await
                .expect("client stopped before the script ended");
            assert_eq!(*request.method(), step.method, "method for {}", step.path);
            assert_eq!(request.uri().path(), step.path.as_str());

            let method = request.method().clone();
            let path = request.uri().path().to_string();
            let bytes = request.into_body().collect_bytes().await.unwrap();

            let (status, reply) = match step.reply {
                Reply::Json(status, body) => (status, serde_json::to_vec(&body).unwrap()),
                Reply::Echo => (StatusCode::CREATED, bytes.to_vec()),
            };
            send.send_response(Response::builder().status(status).body(Body::from(reply)).unwrap());

            served.push(Served {
                method,
                path,
                body: serde_json::from_slice(&bytes).ok(),
            });
        }
        served
    });

    (client, server)
}

/// A list response around `items`
pub fn list_of(kind: &str, items: Vec<Value>) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": format!("{}List", kind),
        "metadata": { "resourceVersion": "1" },
        "items": items
    })
}

/// A core/v1 object with the given metadata
pub fn core_object(kind: &str, name: &str, namespace: Option<&str>) -> Value {
    let mut metadata = json!({ "name": name, "creationTimestamp": "2024-01-01T00:00:00Z" });
    if let Some(ns) = namespace {
        metadata["namespace"] = json!(ns);
    }
    json!({ "apiVersion": "v1", "kind": kind, "metadata": metadata })
}
