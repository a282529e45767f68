//! HTTP request and response types used by the middleware.

use bytes::Bytes;
use http_body_util::Full;

/// The HTTP request type used by middleware.
///
/// The body is carried for completeness; validation reads the already-parsed
/// body from [`MiddlewareContext::segments`](crate::MiddlewareContext::segments).
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type used by middleware.
pub type Response = http::Response<Full<Bytes>>;

/// Extension trait for building error responses.
pub trait ResponseExt {
    /// Creates a JSON response with the given status code.
    fn json(status: http::StatusCode, body: &serde_json::Value) -> Response;

    /// Creates a JSON error envelope response.
    fn json_error(status: http::StatusCode, code: &str, message: &str) -> Response;
}

impl ResponseExt for Response {
    fn json(status: http::StatusCode, body: &serde_json::Value) -> Response {
        http::Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body.to_string())))
            .expect("failed to build JSON response")
    }

    fn json_error(status: http::StatusCode, code: &str, message: &str) -> Response {
        let body = serde_json::json!({
            "error": {
                "code": code,
                "message": message
            }
        });

        Self::json(status, &body)
    }
}
