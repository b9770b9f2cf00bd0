//! An `OpenshiftClient` talking to an in-process API server, for testing the client's operations
//! without a cluster.

use super::OpenshiftClient;
use http::{Method, Request, Response, StatusCode};
use hyper::Body;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower_test::mock;

pub(crate) const NAMESPACE: &str = "tnb";

/// A request received by the mocked API server.
#[derive(Clone, Debug)]
pub(crate) struct Received {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) body: Vec<u8>,
}

impl Received {
    pub(crate) fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub(crate) fn is(&self, method: Method, path: &str) -> bool {
        self.method == method && self.path == path
    }
}

pub(crate) type Requests = Arc<Mutex<Vec<Received>>>;

/// Creates a client working in [`NAMESPACE`] whose requests are answered by `respond`. Every
/// request is recorded before it is answered.
pub(crate) fn client<F>(respond: F) -> (OpenshiftClient, Requests)
where
    F: Fn(&Received) -> (StatusCode, Value) + Send + 'static,
{
    let (service, mut handle) = mock::pair::<Request<Body>, Response<Body>>();
    let requests = Requests::default();
    let recorded = requests.clone();
    tokio::spawn(async move {
        while let Some((request, send)) = handle.next_request().await {
            let (parts, body) = request.into_parts();
            let received = Received {
                method: parts.method,
                path: parts.uri.path().to_string(),
                body: hyper::body::to_bytes(body).await.unwrap().to_vec(),
            };
            let (status, value) = respond(&received);
            recorded.lock().unwrap().push(received);
            send.send_response(
                Response::builder()
                    .status(status)
                    .body(Body::from(value.to_string()))
                    .unwrap(),
            );
        }
    });
    let k8s_client = kube::Client::new(service, NAMESPACE);
    (OpenshiftClient::new(k8s_client, NAMESPACE), requests)
}

/// The path of the namespaced objects of `plural` in the API group `group_version`.
pub(crate) fn collection(group_version: &str, plural: &str) -> String {
    let prefix = if group_version == "v1" { "/api" } else { "/apis" };
    format!(
        "{}/{}/namespaces/{}/{}",
        prefix, group_version, NAMESPACE, plural
    )
}

/// The path of the namespaced object `name`.
pub(crate) fn path(group_version: &str, plural: &str, name: &str) -> String {
    format!("{}/{}", collection(group_version, plural), name)
}

pub(crate) fn ok(value: Value) -> (StatusCode, Value) {
    (StatusCode::OK, value)
}

pub(crate) fn not_found() -> (StatusCode, Value) {
    failure(StatusCode::NOT_FOUND, "NotFound")
}

/// An API error response as the API server sends it.
pub(crate) fn failure(code: StatusCode, reason: &str) -> (StatusCode, Value) {
    (
        code,
        json!({
            "kind": "Status",
            "apiVersion": "v1",
            "metadata": {},
            "status": "Failure",
            "message": format!("mocked {}", reason),
            "reason": reason,
            "code": code.as_u16(),
        }),
    )
}

pub(crate) fn count(requests: &Requests, method: Method, path: &str) -> usize {
    requests
        .lock()
        .unwrap()
        .iter()
        .filter(|request| request.is(method.clone(), path))
        .count()
}
