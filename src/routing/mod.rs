//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (setup phase):
//!     (method, pattern, handler)
//!     → pattern.rs (split, classify, validate)
//!     → matcher.rs (insert into per-method trie)
//!     → router.rs (bind handler under METHOD-pattern)
//!
//! Incoming Request (method, path):
//!     → router.rs (resolve)
//!     → matcher.rs (trie descent, parameter capture)
//!     → Return: pattern + params + handler, or None
//! ```
//!
//! # Design Decisions
//! - Tables are built before serving and read-only afterwards
//! - Deterministic: same input always matches same route
//! - Literal segments take precedence over dynamic ones

pub mod error;
pub mod matcher;
pub mod pattern;
pub mod router;

pub use error::{RouteError, RouteResult};
pub use matcher::{PathMatch, PathMatcher};
pub use router::{canonical_method, Resolved, RouteKey, RouteTable};
