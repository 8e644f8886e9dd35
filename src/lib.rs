//! OWASP origin header scrutiny for axum services.
//!
//! Requests whose `Origin` or `Referer` header names a host other than the
//! server's own (`X-Forwarded-Host`, else `Host`) are rejected with a bare
//! `403 Forbidden`. Configured path prefixes skip the check entirely.
//!
//! ```no_run
//! use axum::{middleware::from_fn_with_state, routing::post, Router};
//! use origin_scrutiny::config::ScrutinyConfig;
//! use origin_scrutiny::http::{scrutiny_middleware, ScrutinyState};
//!
//! let state = ScrutinyState::from_config(&ScrutinyConfig {
//!     context_path: String::new(),
//!     path_exclusion_pattern: Some("/health, /webhooks".into()),
//! });
//! let app: Router = Router::new()
//!     .route("/api/items", post(|| async { "created" }))
//!     .layer(from_fn_with_state(state, scrutiny_middleware));
//! ```

pub mod config;
pub mod http;
pub mod observability;
pub mod scrutiny;

pub use config::AppConfig;
pub use http::{HttpServer, ScrutinyState};
pub use scrutiny::{PathExclusionMatcher, ScrutinyEngine, Verdict, Violation};
