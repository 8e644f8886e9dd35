//! Response construction.
//!
//! # Responsibilities
//! - Build the single rejection response the middleware ever writes
//!
//! # Design Decisions
//! - The body is the literal `Forbidden`; rejection reasons stay server-side
//! - No headers are added

use axum::{
    body::Body,
    http::StatusCode,
    response::Response,
};

pub const FORBIDDEN_BODY: &str = "Forbidden";

/// The generic 403 returned for every scrutiny violation.
pub fn forbidden() -> Response {
    let mut response = Response::new(Body::from(FORBIDDEN_BODY));
    *response.status_mut() = StatusCode::FORBIDDEN;
    response
}
