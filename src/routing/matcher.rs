//! Path matching trie.
//!
//! # Responsibilities
//! - Keep one segment trie per HTTP method
//! - Insert canonical patterns, marking the last node terminal
//! - Resolve a concrete path to a pattern plus extracted parameters
//!
//! # Design Decisions
//! - Children are keyed by raw segment text (`users`, `:id`, `*path`)
//! - At most one dynamic child per node; a second one is a setup error
//! - Search order per depth: literal, parameter, wildcard
//! - A failed branch falls back to the next candidate at the same depth

use std::collections::HashMap;

use axum::http::Method;

use crate::routing::error::{RouteError, RouteResult};
use crate::routing::pattern::{canonical, parse_pattern, split_path, Segment};

/// One segment position in the trie.
#[derive(Debug, Default)]
pub struct TrieNode {
    /// Raw segment text at this depth (empty at the root).
    part: String,
    /// A registered pattern ends here.
    terminal: bool,
    /// Full canonical pattern, set only on terminal nodes.
    pattern: String,
    children: HashMap<String, TrieNode>,
}

impl TrieNode {
    fn new(part: &str) -> Self {
        Self {
            part: part.to_string(),
            ..Self::default()
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    fn segment(&self) -> Segment<'_> {
        Segment::classify(&self.part)
    }

    fn literal_child(&self, part: &str) -> Option<&TrieNode> {
        self.children
            .get(part)
            .filter(|child| !child.segment().is_dynamic())
    }

    fn dynamic_child(&self) -> Option<&TrieNode> {
        self.children
            .values()
            .find(|child| child.segment().is_dynamic())
    }

    /// Walk the existing nodes looking for a dynamic segment clash.
    /// Read-only, so a rejected pattern never leaves partial nodes behind.
    fn conflict(&self, pattern: &str, parts: &[&str]) -> Option<RouteError> {
        let (first, rest) = parts.split_first()?;

        if let Some(child) = self.children.get(*first) {
            return child.conflict(pattern, rest);
        }

        if Segment::classify(first).is_dynamic() {
            if let Some(existing) = self.dynamic_child() {
                return Some(RouteError::ConflictingSegment {
                    pattern: pattern.to_string(),
                    segment: first.to_string(),
                    existing: existing.part.clone(),
                });
            }
        }

        None
    }

    fn insert(&mut self, pattern: &str, parts: &[&str]) {
        match parts.split_first() {
            None => {
                self.terminal = true;
                self.pattern = pattern.to_string();
            }
            Some((first, rest)) => self
                .children
                .entry(first.to_string())
                .or_insert_with(|| TrieNode::new(first))
                .insert(pattern, rest),
        }
    }

    fn search<'n>(
        &'n self,
        parts: &[&str],
        params: &mut HashMap<String, String>,
    ) -> Option<&'n TrieNode> {
        let Some((first, rest)) = parts.split_first() else {
            return self.terminal.then_some(self);
        };

        if let Some(child) = self.literal_child(first) {
            if let Some(found) = child.search(rest, params) {
                return Some(found);
            }
        }

        let child = self.dynamic_child()?;
        match child.segment() {
            Segment::Param(name) => {
                let previous = params.insert(name.to_string(), first.to_string());
                if let Some(found) = child.search(rest, params) {
                    return Some(found);
                }
                match previous {
                    Some(value) => params.insert(name.to_string(), value),
                    None => params.remove(name),
                };
                None
            }
            Segment::Wildcard(name) if child.terminal => {
                params.insert(name.to_string(), parts.join("/"));
                Some(child)
            }
            _ => None,
        }
    }

    fn collect_patterns<'n>(&'n self, out: &mut Vec<&'n str>) {
        if self.terminal {
            out.push(&self.pattern);
        }
        for child in self.children.values() {
            child.collect_patterns(out);
        }
    }
}

/// A successful trie lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch<'a> {
    /// Canonical pattern stored on the terminal node.
    pub pattern: &'a str,
    /// Parameter name to extracted value.
    pub params: HashMap<String, String>,
}

/// Per-method route trees.
#[derive(Debug, Default)]
pub struct PathMatcher {
    roots: HashMap<Method, TrieNode>,
}

impl PathMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pattern under `method` and return its canonical form.
    pub fn insert(&mut self, method: &Method, pattern: &str) -> RouteResult<String> {
        let parts = parse_pattern(pattern)?;
        let canonical = canonical(&parts);

        let root = self.roots.entry(method.clone()).or_default();
        if let Some(err) = root.conflict(&canonical, &parts) {
            return Err(err);
        }
        root.insert(&canonical, &parts);

        Ok(canonical)
    }

    /// Resolve `path` against the tree for `method`.
    pub fn search(&self, method: &Method, path: &str) -> Option<PathMatch<'_>> {
        let root = self.roots.get(method)?;
        let parts = split_path(path);
        let mut params = HashMap::new();

        root.search(&parts, &mut params).map(|node| PathMatch {
            pattern: node.pattern(),
            params,
        })
    }

    /// All registered patterns for `method`, sorted.
    pub fn patterns(&self, method: &Method) -> Vec<&str> {
        let mut out = Vec::new();
        if let Some(root) = self.roots.get(method) {
            root.collect_patterns(&mut out);
        }
        out.sort_unstable();
        out
    }

    /// Methods that have at least one tree.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.roots.keys()
    }
}
