//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the downstream handler
//! - Wire up middleware (request ID, tracing, timeout, origin scrutiny)
//! - Bind server to listener and shut down gracefully

use std::time::Duration;

use axum::{
    extract::Request,
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::any,
    Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::middleware::{scrutiny_middleware, ScrutinyState};
use crate::http::request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};

/// HTTP server fronting an echo handler with origin scrutiny.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        let scrutiny = ScrutinyState::from_config(&config.scrutiny);
        let router = Self::build_router(&config, scrutiny);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers added last run first: the request ID exists before tracing and
    /// scrutiny see the request.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, scrutiny: ScrutinyState) -> Router {
        Router::new()
            .route("/{*path}", any(echo_handler))
            .route("/", any(echo_handler))
            .layer(from_fn_with_state(scrutiny, scrutiny_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Downstream handler: describes the request it received.
async fn echo_handler(request: Request) -> impl IntoResponse {
    tracing::debug!(
        request_id = %request.request_id(),
        method = %request.method(),
        path = %request.uri().path(),
        "Forwarded request reached handler"
    );
    Json(json!({
        "method": request.method().as_str(),
        "path": request.uri().path(),
        "request_id": request.request_id(),
    }))
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
