//! Request dispatch: route resolution, chain assembly, execution.

use axum::http::request::Parts;
use axum::http::Request;

use crate::engine::context::Context;
use crate::engine::Engine;

/// Result of dispatching one request.
#[derive(Debug)]
pub enum Outcome {
    /// No route matched. No handler ran.
    NotFound,
    /// A route matched and its chain was started.
    Handled(Context),
}

impl Outcome {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Outcome::NotFound)
    }

    pub fn context(&self) -> Option<&Context> {
        match self {
            Outcome::Handled(ctx) => Some(ctx),
            Outcome::NotFound => None,
        }
    }
}

impl Engine {
    /// Dispatch a request. The body is never read.
    pub fn dispatch<B>(&self, request: Request<B>) -> Outcome {
        let (parts, _body) = request.into_parts();
        self.handle(parts)
    }

    /// Resolve the route, build the chain and run it.
    ///
    /// The path is percent-decoded once and that form is used for route
    /// matching, group prefixes and parameter values. A path that does
    /// not decode to UTF-8 is not found. Unmatched requests return before
    /// any middleware is collected.
    pub fn handle(&self, parts: Parts) -> Outcome {
        let path = match urlencoding::decode(parts.uri.path()) {
            Ok(path) => path.into_owned(),
            Err(e) => {
                tracing::debug!(
                    path = %parts.uri.path(),
                    error = %e,
                    "Request path is not valid UTF-8"
                );
                return Outcome::NotFound;
            }
        };

        let Some(resolved) = self.routes().resolve(&parts.method, &path) else {
            tracing::debug!(method = %parts.method, path = %path, "No route matched");
            return Outcome::NotFound;
        };

        let mut chain = self.groups().resolve_middlewares(&path);
        chain.push(resolved.handler.clone());

        tracing::debug!(
            method = %parts.method,
            path = %path,
            pattern = %resolved.pattern,
            chain_len = chain.len(),
            "Dispatching request"
        );

        let mut ctx = Context::new(parts, path, resolved.params, chain);
        ctx.next();
        Outcome::Handled(ctx)
    }
}
