//! Dispatch engine.
//!
//! # Data Flow
//! ```text
//! Setup phase (&mut Engine):
//!     engine.group / scope(..).group   → group.rs (prefix arena)
//!     engine.use_middleware / scope    → group.rs (append middleware)
//!     engine.get / scope(..).post ...  → routing (trie + handler table)
//!     engine.freeze()                  → Arc<Engine>, read-only
//!
//! Serve phase (&Engine, per request):
//!     dispatch.rs
//!       → routing::RouteTable::resolve (miss → Outcome::NotFound)
//!       → group.rs resolve_middlewares(path)
//!       → context.rs Context { chain = middlewares ++ [route] }
//!       → ctx.next()
//! ```
//!
//! # Design Decisions
//! - The engine holds an explicit root group id and forwards root
//!   operations to it; groups are addressed through `scope`
//! - Routes registered on a group are stored under `prefix + pattern`
//! - Middleware never runs for unmatched routes

pub mod context;
pub mod dispatch;
pub mod group;
pub mod static_files;

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::Method;

use crate::routing::{RouteKey, RouteResult, RouteTable};

pub use context::{handler, Context, HandlerFunc};
pub use dispatch::Outcome;
pub use group::{GroupId, GroupTree};

/// Route table plus group tree.
pub struct Engine {
    routes: RouteTable<HandlerFunc>,
    groups: GroupTree<HandlerFunc>,
    root: GroupId,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            routes: RouteTable::new(),
            groups: GroupTree::new(),
            root: GroupId::ROOT,
        }
    }

    pub fn root(&self) -> GroupId {
        self.root
    }

    pub fn routes(&self) -> &RouteTable<HandlerFunc> {
        &self.routes
    }

    pub fn groups(&self) -> &GroupTree<HandlerFunc> {
        &self.groups
    }

    /// Registration handle for `group`.
    pub fn scope(&mut self, group: GroupId) -> Scope<'_> {
        Scope {
            engine: self,
            group,
        }
    }

    /// End the setup phase and share the engine for serving.
    pub fn freeze(self) -> Arc<Engine> {
        tracing::info!(
            routes = self.routes.len(),
            groups = self.groups.len(),
            "Route table frozen"
        );
        for key in self.routes.keys() {
            tracing::debug!(route = %key, "Serving route");
        }
        Arc::new(self)
    }

    // Root group delegation

    pub fn group(&mut self, prefix: &str) -> RouteResult<GroupId> {
        let root = self.root;
        self.scope(root).group(prefix)
    }

    pub fn use_middleware<F>(&mut self, middleware: F) -> RouteResult<&mut Self>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        let root = self.root;
        self.scope(root).use_middleware(middleware)?;
        Ok(self)
    }

    pub fn add_route<F>(&mut self, method: Method, pattern: &str, f: F) -> RouteResult<RouteKey>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        let root = self.root;
        self.scope(root).add_route(method, pattern, f)
    }

    pub fn static_dir(&mut self, relative: &str, root_dir: impl Into<PathBuf>) -> RouteResult<RouteKey> {
        let root = self.root;
        self.scope(root).static_dir(relative, root_dir)
    }
}

macro_rules! method_routes {
    ($($name:ident => $method:ident),* $(,)?) => {
        impl Engine {
            $(
                #[doc = concat!("Register a `", stringify!($method), "` route on the root group.")]
                pub fn $name<F>(&mut self, pattern: &str, f: F) -> RouteResult<&mut Self>
                where
                    F: Fn(&mut Context) + Send + Sync + 'static,
                {
                    self.add_route(Method::$method, pattern, f)?;
                    Ok(self)
                }
            )*
        }

        impl Scope<'_> {
            $(
                #[doc = concat!("Register a `", stringify!($method), "` route on this group.")]
                pub fn $name<F>(&mut self, pattern: &str, f: F) -> RouteResult<&mut Self>
                where
                    F: Fn(&mut Context) + Send + Sync + 'static,
                {
                    self.add_route(Method::$method, pattern, f)?;
                    Ok(self)
                }
            )*
        }
    };
}

method_routes! {
    get => GET,
    post => POST,
    put => PUT,
    delete => DELETE,
    patch => PATCH,
    head => HEAD,
    options => OPTIONS,
}

/// Mutable registration handle bound to one group.
pub struct Scope<'e> {
    engine: &'e mut Engine,
    group: GroupId,
}

impl Scope<'_> {
    pub fn prefix(&self) -> RouteResult<&str> {
        self.engine.groups.prefix(self.group)
    }

    /// Derive a child group.
    pub fn group(&mut self, prefix: &str) -> RouteResult<GroupId> {
        self.engine.groups.derive(self.group, prefix)
    }

    pub fn use_middleware<F>(&mut self, middleware: F) -> RouteResult<&mut Self>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.use_handlers([handler(middleware)])
    }

    /// Append several prepared handlers at once.
    pub fn use_handlers<I>(&mut self, middlewares: I) -> RouteResult<&mut Self>
    where
        I: IntoIterator<Item = HandlerFunc>,
    {
        self.engine.groups.use_middleware(self.group, middlewares)?;
        Ok(self)
    }

    pub fn add_route<F>(&mut self, method: Method, pattern: &str, f: F) -> RouteResult<RouteKey>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_handler(method, pattern, handler(f))
    }

    /// Register a prepared handler under `prefix + pattern`.
    pub fn add_handler(&mut self, method: Method, pattern: &str, h: HandlerFunc) -> RouteResult<RouteKey> {
        let full = format!("{}{}", self.prefix()?, pattern);
        self.engine.routes.add_route(method.as_str(), &full, h)
    }

    /// Serve files under `root_dir` at `relative/*filepath`.
    pub fn static_dir(&mut self, relative: &str, root_dir: impl Into<PathBuf>) -> RouteResult<RouteKey> {
        let root_dir = root_dir.into();
        let pattern = static_files::static_pattern(relative);

        tracing::info!(pattern = %pattern, root = %root_dir.display(), "Static directory mounted");
        self.add_handler(Method::GET, &pattern, static_files::static_handler(root_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use crate::routing::RouteError;

    #[test]
    fn test_group_routes_use_full_prefix() {
        let mut engine = Engine::new();
        let v1 = engine.group("/v1").unwrap();
        let key = engine
            .scope(v1)
            .add_route(Method::GET, "/hello/:name", |ctx| {
                let body = format!("hello {}", ctx.param("name"));
                ctx.string(StatusCode::OK, body);
            })
            .unwrap();

        assert_eq!(key.to_string(), "GET-/v1/hello/:name");
        assert!(engine.dispatch(Request::get("/hello/x").body(()).unwrap()).is_not_found());

        let outcome = engine.dispatch(Request::get("/v1/hello/geektutu").body(()).unwrap());
        assert_eq!(outcome.context().unwrap().body(), b"hello geektutu");
    }

    #[test]
    fn test_nested_scope_prefix() {
        let mut engine = Engine::new();
        let api = engine.group("/api").unwrap();
        let mut scope = engine.scope(api);
        let v2 = scope.group("/v2").unwrap();

        assert_eq!(engine.scope(v2).prefix().unwrap(), "/api/v2");
        assert_eq!(engine.groups().parent(v2).unwrap(), Some(api));
    }

    #[test]
    fn test_invalid_pattern_propagates() {
        let mut engine = Engine::new();
        let err = engine.get("/files/*path/meta", |_| {}).unwrap_err();
        assert!(matches!(err, RouteError::WildcardNotLast { .. }));

        let err = engine.get("/a/:x/:x", |_| {}).unwrap_err();
        assert!(matches!(err, RouteError::DuplicateParam { .. }));
        assert!(engine.routes().is_empty());
    }

    #[test]
    fn test_reregister_replaces_handler() {
        let mut engine = Engine::new();
        engine
            .get("/x", |ctx| ctx.string(StatusCode::OK, "old"))
            .unwrap()
            .get("/x", |ctx| ctx.string(StatusCode::OK, "new"))
            .unwrap();

        let outcome = engine.dispatch(Request::get("/x").body(()).unwrap());
        assert_eq!(outcome.context().unwrap().body(), b"new");
        assert_eq!(engine.routes().len(), 1);
    }

    #[test]
    fn test_freeze_shares_engine() {
        let mut engine = Engine::new();
        engine.head("/ping", |ctx| ctx.set_status(StatusCode::OK)).unwrap();
        let frozen = engine.freeze();

        let shared = Arc::clone(&frozen);
        let handle = std::thread::spawn(move || {
            shared
                .dispatch(Request::head("/ping").body(()).unwrap())
                .is_not_found()
        });
        assert!(!handle.join().unwrap());
        assert!(!frozen.dispatch(Request::head("/ping").body(()).unwrap()).is_not_found());
    }
}
