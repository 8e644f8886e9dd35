//! Origin Scrutiny Middleware.
//! Rejects cross-origin requests whose Origin or Referer names a foreign host.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::config::ScrutinyConfig;
use crate::http::request::RequestIdExt;
use crate::http::response::forbidden;
use crate::observability::metrics;
use crate::scrutiny::{PathExclusionMatcher, ScrutinyEngine, Verdict, Violation};

/// What the middleware decided for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Path is excluded; headers were not inspected.
    Excluded,
    Forwarded,
    Rejected(Violation),
}

/// Immutable state shared by every request.
#[derive(Debug, Clone)]
pub struct ScrutinyState {
    matcher: Arc<PathExclusionMatcher>,
    engine: ScrutinyEngine,
    context_path: Arc<str>,
}

impl ScrutinyState {
    pub fn new(matcher: PathExclusionMatcher, context_path: impl Into<String>) -> Self {
        Self {
            matcher: Arc::new(matcher),
            engine: ScrutinyEngine::new(),
            context_path: Arc::from(context_path.into()),
        }
    }

    /// Parse the exclusion setting and freeze the resulting matcher.
    pub fn from_config(config: &ScrutinyConfig) -> Self {
        let matcher = PathExclusionMatcher::from_setting(config.path_exclusion_pattern.as_deref());
        tracing::info!(
            context_path = %config.context_path,
            excluded_paths = ?matcher.patterns(),
            "Origin scrutiny configured"
        );
        Self::new(matcher, config.context_path.clone())
    }

    pub fn matcher(&self) -> &PathExclusionMatcher {
        &self.matcher
    }

    /// Decide the fate of a request without touching it.
    pub fn evaluate<B>(&self, req: &Request<B>) -> Outcome {
        if self.matcher.matches_request(req, &self.context_path) {
            return Outcome::Excluded;
        }
        match self.engine.check(req.headers()) {
            Verdict::Forward => Outcome::Forwarded,
            Verdict::Reject(violation) => Outcome::Rejected(violation),
        }
    }
}

/// Mount with `axum::middleware::from_fn_with_state(state, scrutiny_middleware)`.
pub async fn scrutiny_middleware(
    State(state): State<ScrutinyState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match state.evaluate(&req) {
        Outcome::Excluded => {
            tracing::trace!(
                request_id = %req.request_id(),
                path = %req.uri().path(),
                "Path excluded from origin scrutiny"
            );
            metrics::record_excluded();
            next.run(req).await
        }
        Outcome::Forwarded => {
            metrics::record_forwarded();
            next.run(req).await
        }
        Outcome::Rejected(violation) => {
            tracing::debug!(
                request_id = %req.request_id(),
                method = %req.method(),
                path = %req.uri().path(),
                reason = violation.kind(),
                "Origin scrutiny rejected request"
            );
            metrics::record_rejected(violation);
            forbidden()
        }
    }
}
