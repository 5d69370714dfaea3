//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use tokio::net::TcpListener;
use tower::ServiceExt;

use route_dispatch::{Engine, HttpServer, ServerConfig, Shutdown};

/// Ordered log of handler names, shared between handlers and assertions.
pub type CallLog = Arc<Mutex<Vec<&'static str>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Middleware that records `name` and continues the chain.
pub fn recording_middleware(
    log: &CallLog,
    name: &'static str,
) -> impl Fn(&mut route_dispatch::Context) + Send + Sync + 'static {
    let log = Arc::clone(log);
    move |ctx: &mut route_dispatch::Context| {
        log.lock().unwrap().push(name);
        ctx.next();
    }
}

/// Send one request through the full axum stack without a socket.
pub async fn send(server: &HttpServer, method: &str, uri: &str) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    server.router().oneshot(request).await.unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn expect(server: &HttpServer, method: &str, uri: &str, status: StatusCode) -> String {
    let response = send(server, method, uri).await;
    assert_eq!(response.status(), status, "{method} {uri}");
    body_string(response).await
}

/// Serve `engine` on an ephemeral port. The returned `Shutdown` stops it.
pub async fn spawn_server(engine: Engine) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = ServerConfig::default();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(engine, config);
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}
