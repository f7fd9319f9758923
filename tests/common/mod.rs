//! Shared utilities for integration testing against a stub admin API.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;

/// What the stub server saw for one request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: String,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
}

type Reply = Pin<Box<dyn Future<Output = (u16, String)> + Send>>;
type Responder = Arc<dyn Fn(RecordedRequest) -> Reply + Send + Sync>;

#[derive(Clone)]
struct StubState {
    seen: Arc<Mutex<Vec<RecordedRequest>>>,
    responder: Responder,
}

/// A running stub admin API.
pub struct StubAdminApi {
    pub addr: SocketAddr,
    seen: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[allow(dead_code)]
impl StubAdminApi {
    pub fn base_url(&self) -> String {
        format!("http://{}/admin", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("stub saw no requests")
    }
}

/// Start a stub that answers every request with a fixed status and body.
#[allow(dead_code)]
pub async fn start_stub_api(status: u16, body: &'static str) -> StubAdminApi {
    start_programmable_api(move |_| async move { (status, body.to_string()) }).await
}

/// Start a programmable stub admin API on an ephemeral port.
pub async fn start_programmable_api<F, Fut>(f: F) -> StubAdminApi
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let responder: Responder = Arc::new(move |req: RecordedRequest| Box::pin(f(req)) as Reply);
    let state = StubState {
        seen: seen.clone(),
        responder,
    };
    let app = Router::new().fallback(handle).with_state(state);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    StubAdminApi { addr, seen }
}

async fn handle(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let recorded = RecordedRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        body,
        content_type: header_value(header::CONTENT_TYPE),
        authorization: header_value(header::AUTHORIZATION),
    };
    state.seen.lock().unwrap().push(recorded.clone());

    let (status, body) = (state.responder)(recorded).await;
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}
