//! Route table: `(method, pattern)` to handler.
//!
//! # Responsibilities
//! - Canonicalize methods and patterns on registration
//! - Insert patterns into the per-method trie
//! - Resolve a request to its handler and parameters
//!
//! # Design Decisions
//! - Generic over the handler type; the engine stores `HandlerFunc`s
//! - Re-registration replaces the handler, never the trie shape
//! - A trie hit without a handler is reported the same as no match

use std::collections::HashMap;
use std::fmt;

use axum::http::Method;

use crate::routing::error::{RouteError, RouteResult};
use crate::routing::matcher::PathMatcher;

/// Parse a method string case-insensitively into a canonical `Method`.
pub fn canonical_method(method: &str) -> RouteResult<Method> {
    Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|_| RouteError::InvalidMethod(method.to_string()))
}

/// Unique key of a registered route.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub method: Method,
    pub pattern: String,
}

impl RouteKey {
    pub fn new(method: Method, pattern: impl Into<String>) -> Self {
        Self {
            method,
            pattern: pattern.into(),
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.method, self.pattern)
    }
}

/// A resolved route.
#[derive(Debug)]
pub struct Resolved<'a, H> {
    pub pattern: &'a str,
    pub params: HashMap<String, String>,
    pub handler: &'a H,
}

/// Route table backed by a [`PathMatcher`].
#[derive(Debug)]
pub struct RouteTable<H> {
    matcher: PathMatcher,
    handlers: HashMap<RouteKey, H>,
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self {
            matcher: PathMatcher::new(),
            handlers: HashMap::new(),
        }
    }
}

impl<H> RouteTable<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` + `pattern`.
    ///
    /// Returns the key the handler was stored under.
    pub fn add_route(&mut self, method: &str, pattern: &str, handler: H) -> RouteResult<RouteKey> {
        let method = canonical_method(method)?;
        let pattern = self.matcher.insert(&method, pattern)?;
        let key = RouteKey::new(method, pattern);

        tracing::info!(route = %key, "Route registered");
        if self.handlers.insert(key.clone(), handler).is_some() {
            tracing::warn!(route = %key, "Route handler replaced");
        }

        Ok(key)
    }

    /// Resolve a request. `None` covers both an unmatched path and a
    /// matched pattern that has no handler bound.
    pub fn resolve(&self, method: &Method, path: &str) -> Option<Resolved<'_, H>> {
        let found = self.matcher.search(method, path)?;
        let key = RouteKey::new(method.clone(), found.pattern);

        match self.handlers.get(&key) {
            Some(handler) => Some(Resolved {
                pattern: found.pattern,
                params: found.params,
                handler,
            }),
            None => {
                tracing::error!(route = %key, "Pattern matched without a bound handler");
                None
            }
        }
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered keys, ordered by method then pattern.
    pub fn keys(&self) -> Vec<&RouteKey> {
        let mut keys: Vec<_> = self.handlers.keys().collect();
        keys.sort_by(|a, b| {
            a.method
                .as_str()
                .cmp(b.method.as_str())
                .then_with(|| a.pattern.cmp(&b.pattern))
        });
        keys
    }

    pub fn matcher(&self) -> &PathMatcher {
        &self.matcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_method() {
        assert_eq!(canonical_method("get").unwrap(), Method::GET);
        assert_eq!(canonical_method("Patch").unwrap(), Method::PATCH);
        assert!(matches!(
            canonical_method("BAD METHOD"),
            Err(RouteError::InvalidMethod(_))
        ));
    }

    #[test]
    fn test_route_key_display() {
        let key = RouteKey::new(Method::GET, "/p/:lang");
        assert_eq!(key.to_string(), "GET-/p/:lang");
    }

    #[test]
    fn test_methods_are_independent() {
        let mut table = RouteTable::new();
        table.add_route("GET", "/x", "get-x").unwrap();
        table.add_route("POST", "/x", "post-x").unwrap();

        assert_eq!(*table.resolve(&Method::GET, "/x").unwrap().handler, "get-x");
        assert_eq!(*table.resolve(&Method::POST, "/x").unwrap().handler, "post-x");
        assert!(table.resolve(&Method::PUT, "/x").is_none());
    }

    #[test]
    fn test_reregistration_replaces_handler_only() {
        let mut table = RouteTable::new();
        table.add_route("GET", "/p/:lang", "old").unwrap();
        table.add_route("GET", "/p/:lang/doc", "sibling").unwrap();
        table.add_route("get", "/p/:lang/", "new").unwrap();

        assert_eq!(table.len(), 2);
        let resolved = table.resolve(&Method::GET, "/p/rust").unwrap();
        assert_eq!(*resolved.handler, "new");
        assert_eq!(resolved.params["lang"], "rust");
        assert_eq!(
            *table.resolve(&Method::GET, "/p/rust/doc").unwrap().handler,
            "sibling"
        );
        assert_eq!(
            table.matcher().patterns(&Method::GET),
            vec!["/p/:lang", "/p/:lang/doc"]
        );
    }

    #[test]
    fn test_unmatched_path() {
        let mut table = RouteTable::new();
        table.add_route("GET", "/a", 1).unwrap();
        assert!(table.resolve(&Method::GET, "/b").is_none());
    }

    #[test]
    fn test_keys_sorted() {
        let mut table = RouteTable::new();
        table.add_route("POST", "/a", ()).unwrap();
        table.add_route("GET", "/b", ()).unwrap();
        table.add_route("GET", "/a", ()).unwrap();

        let keys: Vec<String> = table.keys().iter().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["GET-/a", "GET-/b", "POST-/a"]);
    }
}
