//! Conversion of dispatch results into HTTP responses.

use axum::body::Body;
use axum::http::header::{self, HeaderValue};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::engine::{Context, Outcome};

/// Body written for unmatched routes.
pub const NOT_FOUND_BODY: &str = "404 page not found\n";

impl IntoResponse for Context {
    fn into_response(self) -> Response {
        let (status, headers, body) = self.into_parts();
        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Outcome::Handled(ctx) => ctx.into_response(),
            Outcome::NotFound => (
                StatusCode::NOT_FOUND,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("text/plain; charset=utf-8"),
                )],
                NOT_FOUND_BODY,
            )
                .into_response(),
        }
    }
}
