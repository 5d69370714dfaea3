//! Static file serving under a `*filepath` wildcard route.

use std::path::{Path, PathBuf};

use axum::http::header::{self, HeaderValue};
use axum::http::StatusCode;

use crate::engine::context::{handler, HandlerFunc};

/// Wildcard parameter the static route binds.
pub const FILEPATH_PARAM: &str = "filepath";

/// Route pattern for a static mount at `relative`.
pub fn static_pattern(relative: &str) -> String {
    format!("{}/*{}", relative.trim_end_matches('/'), FILEPATH_PARAM)
}

/// Join `relative` onto `root`, refusing anything that could step
/// outside of `root`.
pub fn resolve_file(root: &Path, relative: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for segment in relative.split('/').filter(|s| !s.is_empty()) {
        if segment == "." || segment == ".." || segment.contains('\\') || segment.contains(':') {
            return None;
        }
        path.push(segment);
    }
    (path != root).then_some(path)
}

/// Content type by file extension.
pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("wasm") => "application/wasm",
        _ => "application/octet-stream",
    }
}

/// Handler serving files from `root` using the `filepath` parameter.
///
/// Missing or unreadable files produce a bare 404.
pub fn static_handler(root: PathBuf) -> HandlerFunc {
    handler(move |ctx| {
        let Some(file) = resolve_file(&root, ctx.param(FILEPATH_PARAM)) else {
            tracing::debug!(path = %ctx.path(), "Rejected static file path");
            ctx.set_status(StatusCode::NOT_FOUND);
            return;
        };

        match std::fs::read(&file) {
            Ok(bytes) => {
                ctx.set_header(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(content_type(&file)),
                );
                ctx.data(StatusCode::OK, bytes);
            }
            Err(e) => {
                tracing::debug!(file = %file.display(), error = %e, "Static file unavailable");
                ctx.set_status(StatusCode::NOT_FOUND);
            }
        }
    })
}
