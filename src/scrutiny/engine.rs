//! Origin header scrutiny.
//!
//! Checks that the `Origin` and `Referer` headers of a request name the same
//! host the server believes itself to be, following the OWASP "CORS Origin
//! Header Scrutiny" guidance.
//!
//! # Rules
//! - Any inspected header (`Origin`, `Referer`, `Host`, `X-Forwarded-Host`)
//!   with more than one value rejects the request
//! - The effective host is a single `X-Forwarded-Host`, else a single `Host`
//! - `Origin` and `Referer`, when present, must be non-empty absolute URIs
//!   whose host equals the effective host with its port removed
//! - Without `Origin` and `Referer` the request is forwarded
//!
//! Host comparison is byte-for-byte; no case folding is applied.
//! `X-Forwarded-Host` is trusted as-is, so the engine belongs behind a proxy
//! that overwrites it.

use axum::http::header::{HeaderMap, HOST, ORIGIN, REFERER};
use axum::http::Uri;
use thiserror::Error;

use crate::scrutiny::headers::{inspected_headers, single_header, HeaderValues, X_FORWARDED_HOST};

/// Why a request was rejected.
///
/// Kept for logs and metrics only; clients always see a bare `Forbidden`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Violation {
    #[error("inspected header has more than one value")]
    MultipleHeaderValues,

    #[error("header value is empty")]
    EmptyHeaderValue,

    #[error("URI host does not match the effective host")]
    HostMismatch,

    #[error("no usable Host or X-Forwarded-Host header")]
    MissingHost,

    #[error("header value is not a URI")]
    UriParseFailure,

    #[error("header value is not visible ASCII")]
    OpaqueHeaderValue,
}

impl Violation {
    /// Stable label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Violation::MultipleHeaderValues => "multiple_header_values",
            Violation::EmptyHeaderValue => "empty_header_value",
            Violation::HostMismatch => "host_mismatch",
            Violation::MissingHost => "missing_host",
            Violation::UriParseFailure => "uri_parse_failure",
            Violation::OpaqueHeaderValue => "opaque_header_value",
        }
    }
}

/// Outcome of scrutinizing one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Forward,
    Reject(Violation),
}

impl Verdict {
    pub fn is_forward(&self) -> bool {
        matches!(self, Verdict::Forward)
    }
}

/// Stateless header validator. A pure function of the header map.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrutinyEngine;

impl ScrutinyEngine {
    pub fn new() -> Self {
        Self
    }

    /// Decide whether a request with these headers may proceed.
    pub fn check(&self, headers: &HeaderMap) -> Verdict {
        match scrutinize(headers) {
            Ok(()) => Verdict::Forward,
            Err(violation) => Verdict::Reject(violation),
        }
    }
}

fn scrutinize(headers: &HeaderMap) -> Result<(), Violation> {
    // Repeats are fatal even when the header would not otherwise be read.
    for name in inspected_headers() {
        if matches!(HeaderValues::of(headers, &name), Ok(HeaderValues::Multiple)) {
            return Err(Violation::MultipleHeaderValues);
        }
    }

    if let Some(origin) = single_header(headers, &ORIGIN)? {
        validate_uri_header(headers, origin)?;
    }
    if let Some(referer) = single_header(headers, &REFERER)? {
        validate_uri_header(headers, referer)?;
    }
    Ok(())
}

/// The host the server answers as: `X-Forwarded-Host` wins over `Host`.
fn effective_host(headers: &HeaderMap) -> Result<Option<&str>, Violation> {
    match single_header(headers, &X_FORWARDED_HOST)? {
        Some(forwarded) => Ok(Some(forwarded)),
        None => single_header(headers, &HOST),
    }
}

fn validate_uri_header(headers: &HeaderMap, value: &str) -> Result<(), Violation> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Violation::EmptyHeaderValue);
    }

    let host_header = effective_host(headers)?.ok_or(Violation::MissingHost)?;
    if host_header.trim().is_empty() {
        return Err(Violation::MissingHost);
    }

    let uri: Uri = value.parse().map_err(|_| Violation::UriParseFailure)?;
    // Only absolute URIs carry a host; "null" or "/path" never match.
    let uri_host = uri.scheme().and(uri.host());

    let host_only = host_header.split(':').next().unwrap_or_default();
    if uri_host != Some(host_only) {
        return Err(Violation::HostMismatch);
    }
    Ok(())
}
