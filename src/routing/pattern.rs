//! Route pattern mini-language.
//!
//! Segments are separated by `/`. Empty segments (from `//` or a trailing
//! slash) are dropped, so `/a//b/` and `/a/b` split identically.
//!
//! - `users`  literal, matched verbatim
//! - `:id`    parameter, matches exactly one segment
//! - `*path`  wildcard, matches every remaining segment; must be last

use crate::routing::error::{RouteError, RouteResult};

/// One classified pattern segment, borrowing from the pattern string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Param(&'a str),
    Wildcard(&'a str),
}

impl<'a> Segment<'a> {
    /// Classify a raw segment by its prefix.
    pub fn classify(raw: &'a str) -> Self {
        if let Some(name) = raw.strip_prefix(':') {
            Segment::Param(name)
        } else if let Some(name) = raw.strip_prefix('*') {
            Segment::Wildcard(name)
        } else {
            Segment::Literal(raw)
        }
    }

    /// True for parameter and wildcard segments.
    pub fn is_dynamic(&self) -> bool {
        !matches!(self, Segment::Literal(_))
    }
}

/// Split a path into its non-empty segments.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Parse and validate a route pattern.
///
/// Returns the raw segments in order. Fails when a wildcard is not the
/// final segment, when a dynamic segment has no name, or when a name is
/// bound twice.
pub fn parse_pattern(pattern: &str) -> RouteResult<Vec<&str>> {
    let parts = split_path(pattern);
    let mut names: Vec<&str> = Vec::new();

    for (i, raw) in parts.iter().enumerate() {
        let segment = Segment::classify(raw);
        if let Segment::Param(name) | Segment::Wildcard(name) = segment {
            if !name.is_empty() && names.contains(&name) {
                return Err(RouteError::DuplicateParam {
                    pattern: pattern.to_string(),
                    name: name.to_string(),
                });
            }
            names.push(name);
        }

        match segment {
            Segment::Param("") | Segment::Wildcard("") => {
                return Err(RouteError::EmptyName {
                    pattern: pattern.to_string(),
                    segment: raw.to_string(),
                });
            }
            Segment::Wildcard(_) if i + 1 != parts.len() => {
                return Err(RouteError::WildcardNotLast {
                    pattern: pattern.to_string(),
                    segment: raw.to_string(),
                });
            }
            _ => {}
        }
    }

    Ok(parts)
}

/// Canonical textual form of a segment list: `/` joined, leading slash.
pub fn canonical(parts: &[&str]) -> String {
    format!("/{}", parts.join("/"))
}
