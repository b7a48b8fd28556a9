//! Path matching.
//!
//! Two matching modes are used by the access manager:
//!
//! - **Prefix matching** for `public_paths` / `admin_paths`: a path matches a
//!   prefix when it equals the prefix or continues it with a `/`. A path
//!   that merely shares the leading characters does not match, so
//!   `/api/forms-laravel` covers `/api/forms-laravel/1` but not
//!   `/api/forms-laravelxyz`.
//! - **Pattern matching** for rules: both sides are split on `/` and must
//!   have the same number of segments. A pattern segment starting with `:`
//!   matches any single path segment; every other segment must be equal.
//!   There are no wildcards spanning several segments and no optional
//!   segments.

use std::fmt;

/// Returns true if `path` equals `prefix` or starts with `prefix` followed by `/`.
///
/// # Example
///
/// ```
/// use gatehouse_access::matches_prefix;
///
/// assert!(matches_prefix("/login", "/login"));
/// assert!(matches_prefix("/login", "/login/callback"));
/// assert!(!matches_prefix("/login", "/loginx"));
/// ```
#[must_use]
pub fn matches_prefix(prefix: &str, path: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Matches `path` against a rule pattern such as `/api/v1/forms/:id/schema`.
///
/// # Example
///
/// ```
/// use gatehouse_access::match_path_pattern;
///
/// assert!(match_path_pattern("/api/v1/forms/:id/schema", "/api/v1/forms/42/schema"));
/// assert!(!match_path_pattern("/api/v1/forms/:id/schema", "/api/v1/forms/schema"));
/// ```
#[must_use]
pub fn match_path_pattern(pattern: &str, path: &str) -> bool {
    let mut pattern_segments = pattern.split('/');
    let mut path_segments = path.split('/');

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some(expected), Some(actual)) => {
                if !segment_matches(expected, actual) {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

fn segment_matches(expected: &str, actual: &str) -> bool {
    expected.starts_with(':') || expected == actual
}

/// A rule path pattern split into segments once, at registration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

/// One `/`-separated piece of a [`PathPattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the path segment exactly.
    Literal(String),
    /// `:name`, matches any single path segment.
    Param(String),
}

impl PathPattern {
    /// Splits `raw` into segments.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let segments = raw
            .split('/')
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(segment.to_string()),
            })
            .collect();
        Self { raw, segments }
    }

    /// Returns the pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the parsed segments, including the empty leading segment of
    /// an absolute pattern.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the names of the `:param` segments in order.
    #[must_use]
    pub fn param_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Param(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Returns true if `path` matches this pattern.
    ///
    /// Same semantics as [`match_path_pattern`].
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let mut path_segments = path.split('/');
        for segment in &self.segments {
            let Some(actual) = path_segments.next() else {
                return false;
            };
            if let Segment::Literal(expected) = segment {
                if expected != actual {
                    return false;
                }
            }
        }
        path_segments.next().is_none()
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for PathPattern {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for PathPattern {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = "/api/v1/forms/:id/schema";

    #[test]
    fn test_pattern_matches_uuid_segment() {
        assert!(match_path_pattern(
            SCHEMA,
            "/api/v1/forms/61af2a0f-5b54-476f-9bf6-c2ee6ce5b822/schema"
        ));
    }

    #[test]
    fn test_pattern_rejects_different_literal_tail() {
        assert!(!match_path_pattern(SCHEMA, "/api/v1/forms/123/submit"));
    }

    #[test]
    fn test_pattern_rejects_missing_segment() {
        assert!(!match_path_pattern(SCHEMA, "/api/v1/forms/schema"));
    }

    #[test]
    fn test_pattern_rejects_extra_segment() {
        assert!(!match_path_pattern(SCHEMA, "/api/v1/forms/123/schema/extra"));
    }

    #[test]
    fn test_trailing_slash_changes_segment_count() {
        assert!(match_path_pattern("/forms", "/forms"));
        assert!(!match_path_pattern("/forms", "/forms/"));
    }

    #[test]
    fn test_param_matches_empty_segment() {
        assert!(match_path_pattern("/forms/:id", "/forms/"));
    }

    #[test]
    fn test_compiled_pattern_agrees_with_function() {
        let pattern = PathPattern::new(SCHEMA);
        for path in [
            "/api/v1/forms/abc/schema",
            "/api/v1/forms/abc/submit",
            "/api/v1/forms/schema",
            "/api/v1/forms/abc/schema/extra",
            "",
            "/",
        ] {
            assert_eq!(
                pattern.matches(path),
                match_path_pattern(SCHEMA, path),
                "disagreement on {path}"
            );
        }
    }

    #[test]
    fn test_param_names() {
        let pattern = PathPattern::new("/forms/:form_id/fields/:field_id");
        assert_eq!(pattern.param_names(), vec!["form_id", "field_id"]);
        assert_eq!(pattern.as_str(), "/forms/:form_id/fields/:field_id");
    }

    #[test]
    fn test_prefix_equality_and_separator() {
        assert!(matches_prefix("/api/forms-laravel", "/api/forms-laravel"));
        assert!(matches_prefix("/api/forms-laravel", "/api/forms-laravel/7"));
        assert!(!matches_prefix("/api/forms-laravel", "/api/forms-laravelxyz"));
        assert!(!matches_prefix("/api/forms-laravel", "/api/forms"));
    }

    #[test]
    fn test_root_prefix_only_matches_root() {
        assert!(matches_prefix("/", "/"));
        assert!(!matches_prefix("/", "/dashboard"));
    }
}
