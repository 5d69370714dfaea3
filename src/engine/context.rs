//! Per-request context and handler chain execution.

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::header::{self, HeaderMap, HeaderValue, IntoHeaderName};
use axum::http::request::Parts;
use axum::http::{Method, StatusCode};
use serde::Serialize;

use crate::http::request::X_REQUEST_ID;

/// A middleware or route handler.
pub type HandlerFunc = Arc<dyn Fn(&mut Context) + Send + Sync + 'static>;

/// Wrap a closure as a [`HandlerFunc`].
pub fn handler<F>(f: F) -> HandlerFunc
where
    F: Fn(&mut Context) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// State for one request: parameters, buffered response, and the chain.
///
/// Created by the dispatcher for a single request and dropped once the
/// response has been produced.
pub struct Context {
    request: Parts,
    /// Percent-decoded request path.
    path: String,
    params: HashMap<String, String>,

    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,

    handlers: Vec<HandlerFunc>,
    /// Next slot to run.
    cursor: usize,
}

impl Context {
    pub(crate) fn new(
        request: Parts,
        path: String,
        params: HashMap<String, String>,
        handlers: Vec<HandlerFunc>,
    ) -> Self {
        Self {
            request,
            path,
            params,
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
            handlers,
            cursor: 0,
        }
    }

    /// Run the next handler in the chain.
    ///
    /// The cursor moves past the slot before the handler is invoked, so a
    /// handler that calls `next()` runs the rest of the chain and regains
    /// control afterwards. A handler that does not call `next()` ends the
    /// chain. Once the chain is exhausted this does nothing.
    pub fn next(&mut self) {
        if let Some(handler) = self.handlers.get(self.cursor).cloned() {
            self.cursor += 1;
            handler(self);
        }
    }

    /// Number of handlers that have been started.
    pub fn handlers_run(&self) -> usize {
        self.cursor
    }

    pub fn chain_len(&self) -> usize {
        self.handlers.len()
    }

    // Request

    pub fn method(&self) -> &Method {
        &self.request.method
    }

    /// Decoded request path, as matched against the route table.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path exactly as it appeared on the request line.
    pub fn raw_path(&self) -> &str {
        self.request.uri.path()
    }

    /// Path parameter value, or `""` when the route has no such parameter.
    pub fn param(&self, name: &str) -> &str {
        self.params.get(name).map(String::as_str).unwrap_or_default()
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Request header value, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
    }

    pub fn request_id(&self) -> Option<&str> {
        self.header(X_REQUEST_ID)
    }

    // Response

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn set_header<K: IntoHeaderName>(&mut self, name: K, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    pub fn response_headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Set the status and append raw bytes to the body.
    pub fn data(&mut self, status: StatusCode, data: impl AsRef<[u8]>) {
        self.set_status(status);
        self.body.extend_from_slice(data.as_ref());
    }

    pub fn string(&mut self, status: StatusCode, text: impl AsRef<str>) {
        self.set_header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        self.data(status, text.as_ref());
    }

    pub fn html(&mut self, status: StatusCode, html: impl AsRef<str>) {
        self.set_header(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
        self.data(status, html.as_ref());
    }

    /// Serialize `value` as the JSON body. A serialization failure turns
    /// the response into a 500.
    pub fn json<T: Serialize + ?Sized>(&mut self, status: StatusCode, value: &T) {
        self.set_header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        match serde_json::to_vec(value) {
            Ok(bytes) => self.data(status, bytes),
            Err(e) => {
                tracing::error!(path = %self.path(), error = %e, "JSON serialization failed");
                self.set_status(StatusCode::INTERNAL_SERVER_ERROR);
            }
        }
    }

    pub(crate) fn into_parts(self) -> (StatusCode, HeaderMap, Vec<u8>) {
        (self.status, self.headers, self.body)
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("method", self.method())
            .field("path", &self.path())
            .field("params", &self.params)
            .field("status", &self.status)
            .field("cursor", &self.cursor)
            .field("chain_len", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use std::sync::Mutex;

    fn parts(path: &str) -> Parts {
        Request::get(path).body(()).unwrap().into_parts().0
    }

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str, call_next: bool) -> HandlerFunc {
        let log = Arc::clone(log);
        handler(move |ctx| {
            log.lock().unwrap().push(name);
            if call_next {
                ctx.next();
            }
        })
    }

    #[test]
    fn test_next_runs_chain_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = vec![
            recorder(&log, "a", true),
            recorder(&log, "b", true),
            recorder(&log, "route", false),
        ];
        let mut ctx = Context::new(parts("/"), "/".into(), HashMap::new(), chain);
        ctx.next();

        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "route"]);
        assert_eq!(ctx.handlers_run(), 3);
    }

    #[test]
    fn test_wrap_around_sees_downstream_state() {
        let seen = Arc::new(Mutex::new(None));
        let seen_in = Arc::clone(&seen);
        let chain = vec![
            handler(move |ctx| {
                assert_eq!(ctx.status(), StatusCode::OK);
                ctx.next();
                *seen_in.lock().unwrap() = Some(ctx.status());
                ctx.set_header("x-wrapped", HeaderValue::from_static("1"));
            }),
            handler(|ctx| ctx.set_status(StatusCode::CREATED)),
        ];
        let mut ctx = Context::new(parts("/"), "/".into(), HashMap::new(), chain);
        ctx.next();

        assert_eq!(*seen.lock().unwrap(), Some(StatusCode::CREATED));
        assert_eq!(ctx.response_headers()["x-wrapped"], "1");
    }

    #[test]
    fn test_handler_without_next_short_circuits() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = vec![
            recorder(&log, "auth", false),
            recorder(&log, "route", false),
        ];
        let mut ctx = Context::new(parts("/"), "/".into(), HashMap::new(), chain);
        ctx.next();

        assert_eq!(*log.lock().unwrap(), vec!["auth"]);
        assert_eq!(ctx.handlers_run(), 1);
    }

    #[test]
    fn test_next_after_exhaustion_is_noop() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = vec![recorder(&log, "route", true)];
        let mut ctx = Context::new(parts("/"), "/".into(), HashMap::new(), chain);
        ctx.next();
        ctx.next();
        ctx.next();

        assert_eq!(*log.lock().unwrap(), vec!["route"]);

        let mut empty = Context::new(parts("/"), "/".into(), HashMap::new(), Vec::new());
        empty.next();
        assert_eq!(empty.handlers_run(), 0);
    }

    #[test]
    fn test_param_defaults_to_empty() {
        let params = HashMap::from([("lang".to_string(), "rust".to_string())]);
        let ctx = Context::new(parts("/p/rust"), "/p/rust".into(), params, Vec::new());

        assert_eq!(ctx.param("lang"), "rust");
        assert_eq!(ctx.param("missing"), "");
        assert_eq!(ctx.path(), "/p/rust");
        assert_eq!(*ctx.method(), Method::GET);
    }

    #[test]
    fn test_response_helpers() {
        let mut ctx = Context::new(parts("/"), "/".into(), HashMap::new(), Vec::new());
        ctx.string(StatusCode::ACCEPTED, "hello ");
        ctx.data(StatusCode::ACCEPTED, b"world");

        assert_eq!(ctx.status(), StatusCode::ACCEPTED);
        assert_eq!(ctx.body(), b"hello world");
        assert_eq!(
            ctx.response_headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );

        let mut ctx = Context::new(parts("/"), "/".into(), HashMap::new(), Vec::new());
        ctx.json(StatusCode::OK, &serde_json::json!({ "name": "gee" }));
        assert_eq!(ctx.body(), br#"{"name":"gee"}"#);
        assert_eq!(
            ctx.response_headers()[header::CONTENT_TYPE],
            "application/json; charset=utf-8"
        );
    }

    #[test]
    fn test_json_failure_is_500() {
        use std::collections::BTreeMap;

        // non-string map keys cannot be serialized to JSON
        let bad: BTreeMap<(u8, u8), u8> = BTreeMap::from([((1, 2), 3)]);
        let mut ctx = Context::new(parts("/"), "/".into(), HashMap::new(), Vec::new());
        ctx.json(StatusCode::OK, &bad);

        assert_eq!(ctx.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(ctx.body().is_empty());
    }

    #[test]
    fn test_request_header_access() {
        let request = Request::get("/")
            .header(X_REQUEST_ID, "abc-123")
            .body(())
            .unwrap();
        let ctx = Context::new(request.into_parts().0, "/".into(), HashMap::new(), Vec::new());

        assert_eq!(ctx.request_id(), Some("abc-123"));
        assert_eq!(ctx.header("x-missing"), None);
    }
}
