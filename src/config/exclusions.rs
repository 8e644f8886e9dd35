//! Parsing of the `path-exclusion-pattern` setting.
//!
//! The setting is a single string holding path prefixes separated by any run
//! of commas and whitespace. Parsing never fails: degenerate input simply
//! yields fewer (or zero) patterns.

/// Characters that separate exclusion paths.
fn is_delimiter(c: char) -> bool {
    matches!(c, ',' | ' ' | '\t' | '\n' | '\r')
}

/// Split an exclusion setting into normalized path patterns.
///
/// Tokens keep their configured order. Each token is taken literally and
/// gets a leading `/` if it lacks one.
pub fn parse_exclusion_paths(value: Option<&str>) -> Vec<String> {
    let Some(value) = value else {
        return Vec::new();
    };

    value
        .split(is_delimiter)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            if token.starts_with('/') {
                token.to_string()
            } else {
                format!("/{token}")
            }
        })
        .collect()
}
