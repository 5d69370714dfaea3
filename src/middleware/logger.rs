//! Request logging middleware.

use std::time::Instant;

use crate::engine::{handler, HandlerFunc};

/// Log method, path, final status and elapsed time of every request.
///
/// Runs the rest of the chain first, so the status it reports is the one
/// the route handler (or a later middleware) settled on.
pub fn logger() -> HandlerFunc {
    handler(|ctx| {
        let start = Instant::now();
        ctx.next();

        tracing::info!(
            method = %ctx.method(),
            path = %ctx.path(),
            status = ctx.status().as_u16(),
            request_id = ctx.request_id().unwrap_or("-"),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Request completed"
        );
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use axum::http::{Request, StatusCode};

    #[test]
    fn test_logger_passes_through() {
        let mut engine = Engine::new();
        let root = engine.root();
        engine.scope(root).use_handlers([logger()]).unwrap();
        engine
            .get("/b", |ctx| ctx.string(StatusCode::OK, "11111!"))
            .unwrap();

        let outcome = engine.dispatch(Request::get("/b").body(()).unwrap());
        let ctx = outcome.context().unwrap();
        assert_eq!(ctx.body(), b"11111!");
        assert_eq!(ctx.handlers_run(), 2);
    }
}
