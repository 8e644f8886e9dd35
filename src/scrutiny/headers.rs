//! Single-valued header access.
//!
//! The engine must tell apart a header that is absent, present once, or
//! repeated. `HeaderMap::get` hides repeats, so every inspected header goes
//! through [`single_header`].

use axum::http::header::{HeaderMap, HeaderName, HOST, ORIGIN, REFERER};

use crate::scrutiny::engine::Violation;

/// `X-Forwarded-Host`, set by reverse proxies.
pub const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");

/// Every header the engine reads.
pub fn inspected_headers() -> [HeaderName; 4] {
    [ORIGIN, REFERER, HOST, X_FORWARDED_HOST]
}

/// How many values a request carries for one header name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderValues<'a> {
    Absent,
    Single(&'a str),
    Multiple,
}

impl<'a> HeaderValues<'a> {
    /// Classify the values of `name`. Names compare case-insensitively.
    ///
    /// A single value that is not visible ASCII text is an error.
    pub fn of(headers: &'a HeaderMap, name: &HeaderName) -> Result<Self, Violation> {
        let mut values = headers.get_all(name).iter();
        let Some(first) = values.next() else {
            return Ok(Self::Absent);
        };
        if values.next().is_some() {
            return Ok(Self::Multiple);
        }
        first
            .to_str()
            .map(Self::Single)
            .map_err(|_| Violation::OpaqueHeaderValue)
    }
}

/// Value of a header that may appear at most once.
///
/// Repeats are a violation; absence is `Ok(None)`.
pub fn single_header<'a>(
    headers: &'a HeaderMap,
    name: &HeaderName,
) -> Result<Option<&'a str>, Violation> {
    match HeaderValues::of(headers, name)? {
        HeaderValues::Absent => Ok(None),
        HeaderValues::Single(value) => Ok(Some(value)),
        HeaderValues::Multiple => Err(Violation::MultipleHeaderValues),
    }
}
