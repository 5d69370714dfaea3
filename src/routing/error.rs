//! Registration error definitions.

use thiserror::Error;

/// Errors raised while building the route table or group tree.
///
/// All of these are setup-time failures. Nothing in the serving path
/// produces a `RouteError`: an unmatched request is a not-found outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// A `*name` segment appeared before the end of the pattern.
    #[error("wildcard segment `{segment}` must be the last segment in `{pattern}`")]
    WildcardNotLast { pattern: String, segment: String },

    /// A `:` or `*` segment without a name.
    #[error("segment `{segment}` in `{pattern}` has an empty name")]
    EmptyName { pattern: String, segment: String },

    /// The same parameter name bound twice in one pattern.
    #[error("parameter `{name}` appears more than once in `{pattern}`")]
    DuplicateParam { pattern: String, name: String },

    /// Two different dynamic segments registered at the same depth.
    #[error("segment `{segment}` in `{pattern}` conflicts with existing `{existing}`")]
    ConflictingSegment {
        pattern: String,
        segment: String,
        existing: String,
    },

    /// The method string is not a valid HTTP method token.
    #[error("invalid HTTP method `{0}`")]
    InvalidMethod(String),

    /// A group handle that was not created by this engine.
    #[error("unknown router group #{0}")]
    UnknownGroup(usize),
}

/// Result type for registration operations.
pub type RouteResult<T> = Result<T, RouteError>;
