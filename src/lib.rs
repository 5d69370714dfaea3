//! HTTP request-dispatch core.
//!
//! A segment trie resolves `(method, path)` to a registered pattern with
//! `:param` and `*wildcard` captures. Prefix groups contribute middleware,
//! and the route handler is appended to form a chain that handlers continue
//! explicitly with `Context::next()`.
//!
//! ```
//! use route_dispatch::engine::Engine;
//! use axum::http::{Request, StatusCode};
//!
//! let mut engine = Engine::new();
//! engine
//!     .get("/p/:lang", |ctx| {
//!         let body = format!("Lang: {}", ctx.param("lang"));
//!         ctx.string(StatusCode::OK, body);
//!     })
//!     .unwrap();
//!
//! let outcome = engine.dispatch(Request::get("/p/rust").body(()).unwrap());
//! assert_eq!(outcome.context().unwrap().body(), b"Lang: rust");
//! ```

pub mod config;
pub mod engine;
pub mod http;
pub mod lifecycle;
pub mod middleware;
pub mod observability;
pub mod routing;

pub use config::ServerConfig;
pub use engine::{handler, Context, Engine, GroupId, HandlerFunc, Outcome};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::RouteError;
