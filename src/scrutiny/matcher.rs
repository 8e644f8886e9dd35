//! Path exclusion matching.
//!
//! # Responsibilities
//! - Strip the context path from the request path
//! - Percent-decode request paths and patterns the same way
//! - Match decoded paths against prefixes on segment boundaries
//!
//! # Design Decisions
//! - No regex: patterns are compared as literal prefixes
//! - `/foo` covers `/foo` and `/foo/...`, never `/foobar`
//! - A path that cannot be decoded is never excluded (fail closed)
//! - Paths are not normalized: `/public/../admin` and `/public%2F..%2Fadmin`
//!   both fall under `/public`. Put normalization in front of this matcher
//!   if anything downstream resolves dot segments or encoded slashes

use std::borrow::Cow;

use axum::http::Request;
use percent_encoding::percent_decode_str;
use thiserror::Error;

use crate::config::exclusions::parse_exclusion_paths;

/// Failure to decode a percent-encoded path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A `%` not followed by two hex digits.
    #[error("malformed percent escape at byte {0}")]
    MalformedEscape(usize),

    /// The decoded bytes are not UTF-8.
    #[error("decoded path is not valid UTF-8")]
    InvalidUtf8,
}

/// Decode a path with form-style rules: `+` is a space and `%XX` escapes are
/// decoded as UTF-8.
pub fn decode_path(raw: &str) -> Result<String, DecodeError> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let well_formed = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(|b| b.is_ascii_hexdigit()));
            if !well_formed {
                return Err(DecodeError::MalformedEscape(i));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    // '+' must become a space before decoding so that "%2B" stays a literal plus.
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| DecodeError::InvalidUtf8)
}

/// Remove the mount prefix from a request path.
///
/// Paths outside the context path are returned unchanged.
pub fn strip_context_path<'a>(path: &'a str, context_path: &str) -> &'a str {
    path.strip_prefix(context_path).unwrap_or(path)
}

/// Segment-boundary prefix test.
fn covers(pattern: &str, path: &str) -> bool {
    match path.strip_prefix(pattern) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Immutable set of excluded path prefixes.
#[derive(Debug, Clone, Default)]
pub struct PathExclusionMatcher {
    patterns: Vec<String>,
}

impl PathExclusionMatcher {
    /// Compile a matcher from normalized patterns.
    ///
    /// Patterns are decoded up front so that `/x/%C3%A9` and `/x/é` are the
    /// same exclusion. A pattern that cannot be decoded is kept verbatim and
    /// compared against decoded request paths, so `/x/%FF` only excludes
    /// requests that spell it `/x/%25FF`.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut compiled: Vec<String> = Vec::new();
        for pattern in patterns {
            let pattern = pattern.into();
            let decoded = match decode_path(&pattern) {
                Ok(decoded) => decoded,
                Err(e) => {
                    tracing::warn!(
                        pattern = %pattern,
                        error = %e,
                        "Undecodable exclusion pattern kept literally; \
                         it only matches requests that percent-encode its '%'"
                    );
                    pattern
                }
            };
            if !compiled.contains(&decoded) {
                compiled.push(decoded);
            }
        }
        Self { patterns: compiled }
    }

    /// Build a matcher straight from the raw `path-exclusion-pattern` setting.
    pub fn from_setting(setting: Option<&str>) -> Self {
        Self::new(parse_exclusion_paths(setting))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The decoded patterns, in configured order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Returns true if the request path, once the context path is stripped
    /// and the remainder decoded, falls under an excluded prefix.
    pub fn matches(&self, request_path: &str, context_path: &str) -> bool {
        if self.patterns.is_empty() {
            return false;
        }

        let raw = strip_context_path(request_path, context_path);
        let path = match decode_path(raw) {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!(
                    path = %raw,
                    error = %e,
                    "Unable to decode request path; not excluding"
                );
                return false;
            }
        };

        self.patterns.iter().any(|pattern| covers(pattern, &path))
    }

    /// Convenience wrapper over [`matches`](Self::matches) for an HTTP request.
    pub fn matches_request<B>(&self, req: &Request<B>, context_path: &str) -> bool {
        self.matches(req.uri().path(), context_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn matcher(patterns: &[&str]) -> PathExclusionMatcher {
        PathExclusionMatcher::new(patterns.iter().copied())
    }

    fn matches(patterns: &[&str], request_path: &str) -> bool {
        matcher(patterns).matches(&format!("endpoint/{request_path}"), "endpoint")
    }

    #[test]
    fn test_decode_path() {
        assert_eq!(decode_path("/a%20b").unwrap(), "/a b");
        assert_eq!(decode_path("/a+b").unwrap(), "/a b");
        assert_eq!(decode_path("/a%2Bb").unwrap(), "/a+b");
        assert_eq!(decode_path("/x/%C3%A9").unwrap(), "/x/é");
        assert_eq!(decode_path("/x/%zz"), Err(DecodeError::MalformedEscape(3)));
        assert_eq!(decode_path("/x/%4"), Err(DecodeError::MalformedEscape(3)));
        assert_eq!(decode_path("/x/%"), Err(DecodeError::MalformedEscape(3)));
        assert_eq!(decode_path("/x/%FF"), Err(DecodeError::InvalidUtf8));
    }

    #[test]
    fn test_matches_request_within_path_list() {
        assert!(matches(&["/somewhere"], "somewhere"));
    }

    #[test]
    fn test_trailing_slash_pattern_does_not_match_bare_path() {
        assert!(!matches(&["/somewhere/"], "somewhere"));
    }

    #[test]
    fn test_unrelated_paths() {
        assert!(!matches(&["/other"], "somewhere"));
        assert!(!matches(&["/elsesomewhere"], "somewhere"));
        assert!(!matches(&["/else/somewhere"], "somewhere"));
    }

    #[test]
    fn test_segment_boundary() {
        let m = matcher(&["/foo"]);
        assert!(m.matches("/foo", ""));
        assert!(m.matches("/foo/", ""));
        assert!(m.matches("/foo/bar", ""));
        assert!(!m.matches("/foobar", ""));
        assert!(!m.matches("/fo", ""));
        assert!(!m.matches("/bar/foo", ""));

        assert!(!matches(&["/some"], "somewhere"));
        assert!(!matches(&["/somewhereelse"], "somewhere"));
    }

    #[test]
    fn test_pattern_more_specific_than_request() {
        assert!(!matches(&["/somewhere/else"], "somewhere"));
        assert!(matches(&["/somewhere/else"], "somewhere/else/specifically"));
    }

    #[test]
    fn test_percent_encoding_commutes() {
        assert!(matches(&["/somewhere/é"], "somewhere/%C3%A9"));
        assert!(matches(&["/somewhere/%C3%A9"], "somewhere/é"));
        assert!(!matches(&["/somewhere/élse"], "somewhere/%C3%A9"));
    }

    #[test]
    fn test_plus_is_space() {
        assert!(matches(&["/a+space/"], "a%20space/"));
    }

    #[test]
    fn test_any_pattern_in_list() {
        assert!(matches(&["/some/other/place", "/somewhere/else"], "somewhere/else/specifically"));
        assert!(!matches(&["/some/other/place", "/somewhere/else"], "somewhere/third/place"));
    }

    #[test]
    fn test_patterns_are_literal() {
        let m = matcher(&["/a.c", "/(x|y)", "/q*"]);
        assert!(m.matches("/a.c/d", ""));
        assert!(!m.matches("/abc", ""));
        assert!(m.matches("/(x|y)", ""));
        assert!(!m.matches("/x", ""));
        assert!(!m.matches("/qqq", ""));
    }

    #[test]
    fn test_undecodable_request_is_not_excluded() {
        let m = matcher(&["/api"]);
        assert!(!m.matches("/api/%zz", ""));
        assert!(m.matches("/api/ok", ""));
    }

    #[test]
    fn test_undecodable_pattern_is_kept_literally() {
        let m = matcher(&["/100%"]);
        assert_eq!(m.patterns(), ["/100%"]);
        assert!(m.matches("/100%25", ""));
        // the request side still has to decode
        assert!(!m.matches("/100%", ""));
    }

    #[test]
    fn test_non_utf8_pattern_needs_encoded_percent() {
        let m = matcher(&["/x/%FF"]);
        assert_eq!(m.patterns(), ["/x/%FF"]);
        assert!(m.matches("/x/%25FF", ""));
        assert!(m.matches("/x/%25FF/deeper", ""));
        assert!(!m.matches("/x/%FF", ""));
    }

    #[test]
    fn test_paths_are_not_normalized() {
        let m = matcher(&["/public"]);
        assert!(m.matches("/public/../admin", ""));
        assert!(m.matches("/public%2F..%2Fadmin", ""));
        assert!(!m.matches("/admin/../public", ""));
    }

    #[test]
    fn test_empty_matcher() {
        let m = PathExclusionMatcher::from_setting(None);
        assert!(m.is_empty());
        assert!(!m.matches("/anything", ""));
        assert!(!m.matches("/", ""));
    }

    #[test]
    fn test_from_setting() {
        let m = PathExclusionMatcher::from_setting(Some("health, api/public"));
        assert_eq!(m.patterns(), ["/health", "/api/public"]);
        assert!(m.matches("/api/public/x", ""));
    }

    #[test]
    fn test_matches_request_with_context_path() {
        let m = matcher(&["/somewhere"]);
        let req = Request::builder()
            .uri("http://example.com/app/somewhere/else")
            .body(Body::empty())
            .unwrap();
        assert!(m.matches_request(&req, "/app"));

        let req = Request::builder()
            .uri("http://example.com/app/somewhereelse")
            .body(Body::empty())
            .unwrap();
        assert!(!m.matches_request(&req, "/app"));
    }
}
