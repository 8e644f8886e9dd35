//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::from_fn_with_state;
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceExt;

use origin_scrutiny::config::{AppConfig, ScrutinyConfig};
use origin_scrutiny::http::{scrutiny_middleware, HttpServer, ScrutinyState};

/// A router whose handler counts how often it is reached.
#[allow(dead_code)]
pub fn counting_router(exclusions: Option<&str>, context_path: &str) -> (Router, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let handler_calls = calls.clone();
    let state = ScrutinyState::from_config(&ScrutinyConfig {
        context_path: context_path.to_string(),
        path_exclusion_pattern: exclusions.map(str::to_string),
    });

    let router = Router::new()
        .route(
            "/{*path}",
            any(move || {
                let calls = handler_calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    "downstream"
                }
            }),
        )
        .layer(from_fn_with_state(state, scrutiny_middleware));
    (router, calls)
}

/// Build a request with repeated headers allowed.
#[allow(dead_code)]
pub fn request(path: &str, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).unwrap()
}

/// Drive one request through a router in-process.
#[allow(dead_code)]
pub async fn send(router: &Router, req: Request<Body>) -> (Response<Body>, String) {
    let response = router.clone().oneshot(req).await.unwrap();
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    (Response::from_parts(parts, Body::empty()), text)
}

/// Start the full server on an ephemeral port.
#[allow(dead_code)]
pub async fn start_server(config: AppConfig) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    addr
}
